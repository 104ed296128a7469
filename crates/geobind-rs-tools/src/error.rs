//! Error types for descriptor construction, validation, and invocation.

use crate::value::ParamValue;
use geobind_rs_protocol::RemoteExecutionError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Kind of domain that rejected a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainKind {
    Range,
    CodedValues,
    FieldTypes,
    ValueTable,
    Composite,
}

impl fmt::Display for DomainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DomainKind::Range => "range",
            DomainKind::CodedValues => "coded-value",
            DomainKind::FieldTypes => "field-type",
            DomainKind::ValueTable => "value-table",
            DomainKind::Composite => "composite",
        };
        f.write_str(name)
    }
}

/// A value rejected by its parameter's declared domain.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{parameter_name}: {offending_value} is outside the {domain_kind} domain")]
pub struct DomainError {
    pub parameter_name: String,
    pub domain_kind: DomainKind,
    pub offending_value: ParamValue,
}

/// Recoverable, pre-submission validation failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Required value absent and no literal default declared.
    #[error("missing required parameter: {name}")]
    MissingRequiredParameter { name: String },
    /// Supplied value rejected by the parameter's domain.
    #[error("domain violation: {0}")]
    DomainViolation(DomainError),
    /// Supplied value has the wrong shape for the declared type.
    #[error("type mismatch for {name}: expected {expected}, found {found}")]
    TypeMismatch {
        name: String,
        expected: String,
        found: &'static str,
    },
    /// Supplied name is not a parameter of the tool.
    #[error("unknown parameter: {name}")]
    UnknownParameter { name: String },
    /// Environment key outside the tool's whitelist.
    #[error("unsupported environment key: {key}")]
    UnsupportedEnvironmentKey { key: String },
}

impl From<DomainError> for ValidationError {
    fn from(err: DomainError) -> Self {
        ValidationError::DomainViolation(err)
    }
}

/// All validation failures collected for a single call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub(crate) fn push(&mut self, err: impl Into<ValidationError>) {
        self.0.push(err.into());
    }

    pub(crate) fn extend(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = self.0.iter().map(ToString::to_string).collect::<Vec<_>>();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Symbol missing from its mapping table.
///
/// Signals defective metadata, never bad caller input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("symbol {symbol} is not defined by mapping {mapping}")]
pub struct InternalMappingError {
    pub mapping: String,
    pub symbol: String,
}

/// Enum mapping declared with broken metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingDefinitionError {
    #[error("mapping {mapping} declares no entries")]
    Empty { mapping: String },
    #[error("mapping {mapping} repeats symbol {symbol}")]
    DuplicateSymbol { mapping: String, symbol: String },
    #[error("mapping {mapping} repeats token {token}")]
    DuplicateToken { mapping: String, token: String },
}

/// Tool descriptor declared with broken metadata.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DescriptorError {
    #[error("tool descriptor has an empty {0}")]
    EmptyName(&'static str),
    #[error("tool {tool} declares parameter {name} twice")]
    DuplicateParameter { tool: String, name: String },
    #[error("tool {tool} declares a default for derived parameter {name}")]
    DerivedWithDefault { tool: String, name: String },
    #[error("tool {tool}: default for {name} does not match its type")]
    DefaultTypeMismatch { tool: String, name: String },
    #[error("tool {tool}: invalid default: {source}")]
    InvalidDefault { tool: String, source: DomainError },
    #[error(transparent)]
    Mapping(#[from] MappingDefinitionError),
}

/// Errors from registering descriptors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("tool already registered: {0}")]
    DuplicateTool(String),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

/// Errors returned by invocation preparation and execution.
#[derive(Debug, Error)]
pub enum InvocationError {
    /// Tool name was not found in the registry.
    #[error("tool not found: {0}")]
    UnknownTool(String),
    /// Caller supplied invalid values; every problem is listed.
    #[error("invalid invocation of {tool}: {errors}")]
    Validation {
        tool: String,
        errors: ValidationErrors,
    },
    /// Descriptor metadata references an undefined enum symbol.
    #[error("internal mapping error in {tool}: {source}")]
    Mapping {
        tool: String,
        source: InternalMappingError,
    },
    /// Descriptor metadata could not be constructed.
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    /// Submission exceeded the configured timeout.
    #[error("{tool} did not complete within {after:?}")]
    Timeout { tool: String, after: Duration },
    /// The execution client failed; the error is passed through verbatim.
    #[error("{tool} failed remotely: {source}")]
    Remote {
        tool: String,
        source: RemoteExecutionError,
    },
}

impl InvocationError {
    /// Validation failures, if this is a validation error.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            InvocationError::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// Whether the caller can fix the problem by changing inputs.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            InvocationError::Validation { .. } | InvocationError::UnknownTool(_)
        )
    }
}
