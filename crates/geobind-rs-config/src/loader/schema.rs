//! Schema validation helpers for geobind JSON5 configuration.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Validate a single config layer (or the merged document) against the schema.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    ensure_allowed_keys(
        map,
        &["$schema", "client", "invocation", "environment"],
        layer,
        "",
    )?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("client") {
        validate_client(value, layer, "client")?;
    }
    if let Some(value) = map.get("invocation") {
        validate_invocation(value, layer, "invocation")?;
    }
    if let Some(value) = map.get("environment") {
        validate_environment(value, layer, "environment")?;
    }
    Ok(())
}

/// Validate the "client" block.
fn validate_client(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &["base_url", "headers", "connect_timeout_ms", "user_agent"],
        layer,
        path,
    )?;

    if let Some(value) = map.get("base_url") {
        expect_string(value, layer, &join_path(path, "base_url"))?;
    }
    if let Some(value) = map.get("headers") {
        let headers_path = join_path(path, "headers");
        let headers = expect_object(value, layer, &headers_path)?;
        for (name, value) in headers {
            expect_string(value, layer, &join_path(&headers_path, name))?;
        }
    }
    if let Some(value) = map.get("connect_timeout_ms") {
        expect_u64(value, layer, &join_path(path, "connect_timeout_ms"))?;
    }
    if let Some(value) = map.get("user_agent") {
        expect_string(value, layer, &join_path(path, "user_agent"))?;
    }
    Ok(())
}

/// Validate the "invocation" block.
fn validate_invocation(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &["derived_slots", "unknown_parameters", "submit_timeout_ms"],
        layer,
        path,
    )?;

    if let Some(value) = map.get("derived_slots") {
        expect_one_of(
            value,
            &["omit", "placeholder"],
            layer,
            &join_path(path, "derived_slots"),
        )?;
    }
    if let Some(value) = map.get("unknown_parameters") {
        expect_one_of(
            value,
            &["reject", "ignore"],
            layer,
            &join_path(path, "unknown_parameters"),
        )?;
    }
    if let Some(value) = map.get("submit_timeout_ms")
        && !value.is_null()
    {
        expect_u64(value, layer, &join_path(path, "submit_timeout_ms"))?;
    }
    Ok(())
}

/// Validate the "environment" block.
fn validate_environment(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["defaults"], layer, path)?;

    if let Some(value) = map.get("defaults") {
        let defaults_path = join_path(path, "defaults");
        let defaults = expect_object(value, layer, &defaults_path)?;
        for (key, value) in defaults {
            expect_scalar(value, layer, &join_path(&defaults_path, key))?;
        }
    }
    Ok(())
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

/// Expect a JSON string or return a typed error.
fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.as_str().is_some() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

/// Expect a non-negative JSON integer.
fn expect_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected non-negative integer"))
    }
}

/// Expect a string drawn from a fixed keyword set.
fn expect_one_of(
    value: &Value,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    match value.as_str() {
        Some(keyword) if allowed.contains(&keyword) => Ok(()),
        _ => Err(invalid_field(
            layer,
            path,
            &format!("expected one of: {}", allowed.join(", ")),
        )),
    }
}

/// Expect a string, number, or boolean.
fn expect_scalar(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    match value {
        Value::String(_) | Value::Number(_) | Value::Bool(_) => Ok(()),
        _ => Err(invalid_field(layer, path, "expected string, number, or bool")),
    }
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid_field(layer, &join_path(path, key), "unknown key"));
        }
    }
    Ok(())
}

/// Join nested paths for better error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}
