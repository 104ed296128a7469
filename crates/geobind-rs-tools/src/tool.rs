//! Typed tool wrappers over descriptors.

use crate::builder::{BuildOptions, ParameterValues, prepare};
use crate::descriptor::ToolDescriptor;
use crate::environment::EnvironmentSettings;
use crate::error::{DescriptorError, InvocationError, ValidationError, ValidationErrors};
use crate::value::ParamValue;
use geobind_rs_protocol::InvocationPayload;
use log::debug;
use std::sync::Arc;

/// Values and environment collected by a typed tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolParams {
    pub values: ParameterValues,
    pub environment: EnvironmentSettings,
}

/// A strongly typed geoprocessing tool.
///
/// Constructors take required parameters; optional ones go through setters
/// that call [`GpTool::try_set`]. Setters and the builder check values
/// against the same descriptor.
pub trait GpTool: Send + Sync {
    /// Shared descriptor, built once per tool type.
    fn descriptor() -> Result<Arc<ToolDescriptor>, DescriptorError>
    where
        Self: Sized;

    fn params(&self) -> &ToolParams;

    fn params_mut(&mut self) -> &mut ToolParams;

    /// Set a parameter, checking it eagerly.
    ///
    /// Values for derived parameters are dropped.
    fn try_set(&mut self, name: &str, value: impl Into<ParamValue>) -> Result<(), InvocationError>
    where
        Self: Sized,
    {
        let descriptor = Self::descriptor()?;
        let value = value.into();
        let Some(param) = descriptor.parameter(name) else {
            return Err(rejected(
                &descriptor,
                ValidationError::UnknownParameter {
                    name: name.to_string(),
                },
            ));
        };
        if param.is_derived() {
            debug!(
                "dropping value for derived parameter (tool={}, name={})",
                descriptor.tool_name, name
            );
            return Ok(());
        }
        param.check(&value).map_err(|err| rejected(&descriptor, err))?;
        self.params_mut().values.insert(name, value);
        Ok(())
    }

    /// Set an environment value, restricted to the tool's whitelist.
    fn set_environment(
        &mut self,
        key: &str,
        value: impl Into<ParamValue>,
    ) -> Result<(), InvocationError>
    where
        Self: Sized,
    {
        let descriptor = Self::descriptor()?;
        if !descriptor.accepts_environment_key(key) {
            return Err(rejected(
                &descriptor,
                ValidationError::UnsupportedEnvironmentKey {
                    key: key.to_string(),
                },
            ));
        }
        self.params_mut().environment.insert(key, value);
        Ok(())
    }

    /// Assemble the payload for the current values.
    fn to_payload(&self, options: &BuildOptions) -> Result<InvocationPayload, InvocationError>
    where
        Self: Sized,
    {
        let descriptor = Self::descriptor()?;
        let params = self.params();
        prepare(&descriptor, &params.values, &params.environment, options)
    }
}

fn rejected(descriptor: &ToolDescriptor, err: ValidationError) -> InvocationError {
    InvocationError::Validation {
        tool: descriptor.tool_name.clone(),
        errors: ValidationErrors(vec![err]),
    }
}

/// Lazily build and cache a tool descriptor.
///
/// Intended for `GpTool::descriptor` implementations backed by a `static`
/// `OnceLock`; a failed build is cached and returned on every call.
pub fn cached_descriptor(
    cell: &'static std::sync::OnceLock<Result<Arc<ToolDescriptor>, DescriptorError>>,
    build: impl FnOnce() -> Result<ToolDescriptor, DescriptorError>,
) -> Result<Arc<ToolDescriptor>, DescriptorError> {
    cell.get_or_init(|| build().map(Arc::new)).clone()
}
