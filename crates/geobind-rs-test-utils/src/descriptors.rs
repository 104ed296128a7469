use geobind_rs_tools::{DescriptorRegistry, ParamType, ParameterDescriptor, ToolDescriptor};
use std::sync::Arc;

/// `Scenario` tool: `a` required long, `b` optional boolean defaulting to
/// true, `c` derived string. Whitelists `workspace`.
pub fn scenario_descriptor() -> Arc<ToolDescriptor> {
    let descriptor = ToolDescriptor::builder("Scenario", "test")
        .parameter(ParameterDescriptor::required("a", ParamType::Long))
        .parameter(ParameterDescriptor::optional("b", ParamType::Boolean).with_default(true))
        .parameter(ParameterDescriptor::derived("c", ParamType::String))
        .environment_keys(["workspace"])
        .build();
    match descriptor {
        Ok(descriptor) => Arc::new(descriptor),
        Err(err) => panic!("scenario descriptor is invalid: {err}"),
    }
}

/// Registry holding only the scenario descriptor.
pub fn scenario_registry() -> DescriptorRegistry {
    let registry = DescriptorRegistry::new();
    if let Err(err) = registry.register(scenario_descriptor()) {
        panic!("scenario registration failed: {err}");
    }
    registry
}
