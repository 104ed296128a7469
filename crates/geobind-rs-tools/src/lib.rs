//! Parameter binding, validation, and invocation for geoprocessing tools.

pub mod builder;
pub mod client;
pub mod descriptor;
pub mod domain;
pub mod enums;
pub mod environment;
pub mod error;
pub mod executor;
pub mod http;
pub mod registry;
pub mod tool;
pub mod value;

/// Payload assembly and caller value maps.
pub use builder::{BuildOptions, ParameterValues, build, prepare};
/// Execution client interface.
pub use client::ExecutionClient;
/// Tool and parameter metadata.
pub use descriptor::{ParamType, ParameterDescriptor, Requirement, ToolDescriptor, ToolDescriptorBuilder};
/// Domains and the domain validator.
pub use domain::{Domain, Validated, validate};
/// Coded-value mappings.
pub use enums::{CodedEnum, EnumEntry, EnumMapping};
/// Environment overlay.
pub use environment::{EnvironmentSettings, keys as env_keys, overlay, with_configured_defaults};
/// Error types.
pub use error::{
    DescriptorError, DomainError, DomainKind, InternalMappingError, InvocationError,
    MappingDefinitionError, RegistryError, ValidationError, ValidationErrors,
};
/// Executor and its options.
pub use executor::{ExecutorOptions, GeoprocessingExecutor};
/// HTTP execution client.
pub use http::HttpExecutionClient;
/// Descriptor registry.
pub use registry::DescriptorRegistry;
/// Typed tool trait.
pub use tool::{GpTool, ToolParams, cached_descriptor};
/// Caller-side values.
pub use value::{CodedValue, FieldRef, FieldType, LinearUnit, LinearUnitKind, ParamValue, Symbol};
