//! Representative catalogue of typed geoprocessing tools.
//!
//! Each tool pairs a lazily built descriptor with a typed parameter object.
//! Required parameters go through the constructor; optional ones through
//! setters that validate eagerly.

/// Implement `GpTool` for a struct with a `params: ToolParams` field.
macro_rules! gp_tool {
    ($tool:ident, $describe:path) => {
        impl geobind_rs_tools::GpTool for $tool {
            fn descriptor() -> ::std::result::Result<
                ::std::sync::Arc<geobind_rs_tools::ToolDescriptor>,
                geobind_rs_tools::DescriptorError,
            > {
                static DESCRIPTOR: ::std::sync::OnceLock<
                    ::std::result::Result<
                        ::std::sync::Arc<geobind_rs_tools::ToolDescriptor>,
                        geobind_rs_tools::DescriptorError,
                    >,
                > = ::std::sync::OnceLock::new();
                geobind_rs_tools::cached_descriptor(&DESCRIPTOR, $describe)
            }

            fn params(&self) -> &geobind_rs_tools::ToolParams {
                &self.params
            }

            fn params_mut(&mut self) -> &mut geobind_rs_tools::ToolParams {
                &mut self.params
            }
        }
    };
}

pub mod network;
pub mod stats;

use geobind_rs_tools::{DescriptorRegistry, GpTool, RegistryError};
use log::info;

pub use network::{AddLocations, FieldMapping, MakeRouteLayer, SearchCriteria};
pub use stats::{GeographicallyWeightedRegression, HotSpotAnalysis};

/// Register every catalogue tool with the provided registry.
pub fn register_catalog_tools(registry: &DescriptorRegistry) -> Result<(), RegistryError> {
    registry.register(MakeRouteLayer::descriptor()?)?;
    registry.register(AddLocations::descriptor()?)?;
    registry.register(HotSpotAnalysis::descriptor()?)?;
    registry.register(GeographicallyWeightedRegression::descriptor()?)?;
    info!("registered catalog tools (count={})", registry.len());
    Ok(())
}

/// Build a registry pre-populated with the catalogue.
pub fn catalog_registry() -> Result<DescriptorRegistry, RegistryError> {
    let registry = DescriptorRegistry::new();
    register_catalog_tools(&registry)?;
    Ok(registry)
}
