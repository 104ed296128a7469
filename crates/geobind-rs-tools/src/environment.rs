//! Per-invocation environment settings restricted to a tool's whitelist.

use crate::builder::encode_value;
use crate::descriptor::ToolDescriptor;
use crate::error::{ValidationError, ValidationErrors};
use crate::value::ParamValue;
use geobind_rs_config::EnvironmentConfig;
use geobind_rs_protocol::WireValue;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Well-known environment setting keys.
pub mod keys {
    pub const WORKSPACE: &str = "workspace";
    pub const SCRATCH_WORKSPACE: &str = "scratchWorkspace";
    pub const OUTPUT_COORDINATE_SYSTEM: &str = "outputCoordinateSystem";
    pub const EXTENT: &str = "extent";
    pub const CELL_SIZE: &str = "cellSize";
    pub const MASK: &str = "mask";
    pub const PARALLEL_PROCESSING_FACTOR: &str = "parallelProcessingFactor";
    pub const GEOGRAPHIC_TRANSFORMATIONS: &str = "geographicTransformations";
}

/// Environment settings requested for one invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvironmentSettings(BTreeMap<String, ParamValue>);

impl EnvironmentSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ParamValue> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for EnvironmentSettings {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Restrict requested settings to the tool's whitelist.
///
/// Every unsupported key is reported. Nothing outside `requested` is added.
pub fn overlay(
    descriptor: &ToolDescriptor,
    requested: &EnvironmentSettings,
) -> Result<BTreeMap<String, WireValue>, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let mut environment = BTreeMap::new();
    for (key, value) in requested.iter() {
        if !descriptor.accepts_environment_key(key) {
            errors.push(ValidationError::UnsupportedEnvironmentKey { key: key.clone() });
            continue;
        }
        match encode_value(value, None) {
            Ok(wire) => {
                environment.insert(key.clone(), wire);
            }
            // Symbols carry no mapping outside a parameter domain.
            Err(err) => {
                debug!(
                    "rejecting coded environment value (tool={}, key={}): {}",
                    descriptor.tool_name, key, err
                );
                errors.push(ValidationError::TypeMismatch {
                    name: key.clone(),
                    expected: "environment value".to_string(),
                    found: value.shape(),
                });
            }
        }
    }
    if errors.is_empty() {
        Ok(environment)
    } else {
        Err(errors)
    }
}

/// Fill configured defaults for keys this tool whitelists.
///
/// Explicitly requested keys win. Defaults for keys outside the whitelist are
/// skipped, as are non-scalar values.
pub fn with_configured_defaults(
    descriptor: &ToolDescriptor,
    config: &EnvironmentConfig,
    mut requested: EnvironmentSettings,
) -> EnvironmentSettings {
    for (key, value) in &config.defaults {
        if requested.contains(key) || !descriptor.accepts_environment_key(key) {
            continue;
        }
        match ParamValue::from_json(value) {
            Some(value) => {
                debug!(
                    "applying environment default (tool={}, key={})",
                    descriptor.tool_name, key
                );
                requested.insert(key.clone(), value);
            }
            None => warn!("skipping non-scalar environment default (key={key})"),
        }
    }
    requested
}
