//! JSON merge helpers for layered configuration.

use serde_json::Value;

/// Merge overlay values into the base, recursing into objects.
///
/// Non-object values (including arrays) in the overlay replace the base.
pub(super) fn merge_json_values(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => merge_json_values(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base_slot, overlay_value) => {
            *base_slot = overlay_value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::merge_json_values;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn nested_objects_merge_and_arrays_replace() {
        let mut base = json!({
            "client": { "base_url": "http://a", "headers": { "x-a": "1" } },
            "environment": { "defaults": { "workspace": "C:/data" } },
        });
        let overlay = json!({
            "client": { "headers": { "x-b": "2" } },
            "environment": { "defaults": { "workspace": "D:/gis" } },
        });
        merge_json_values(&mut base, &overlay);
        assert_eq!(
            base,
            json!({
                "client": { "base_url": "http://a", "headers": { "x-a": "1", "x-b": "2" } },
                "environment": { "defaults": { "workspace": "D:/gis" } },
            })
        );
    }
}
