//! Immutable tool and parameter descriptors.

use crate::domain::{self, Domain};
use crate::error::{DescriptorError, ValidationError};
use crate::value::{CodedValue, ParamValue};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Whether a caller must, may, or must not supply a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Optional,
    /// Output-only; filled by the engine.
    Derived,
}

/// Declared value type of a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    String,
    Long,
    Double,
    Boolean,
    Date,
    LinearUnit,
    FeatureReference,
    Field,
    ValueTable,
    /// Shape decided at runtime by the parameter's composite domain.
    Composite,
    MultiValue(Box<ParamType>),
}

impl ParamType {
    pub fn multi(inner: ParamType) -> Self {
        ParamType::MultiValue(Box::new(inner))
    }

    /// Whether a value has a shape this type admits.
    pub fn accepts(&self, value: &ParamValue) -> bool {
        match (self, value) {
            (ParamType::Composite, _) => true,
            (ParamType::MultiValue(inner), ParamValue::List(items)) => {
                items.iter().all(|item| inner.accepts(item))
            }
            (ParamType::String, ParamValue::String(_) | ParamValue::Coded(_)) => true,
            (ParamType::Long, ParamValue::Long(_)) => true,
            (ParamType::Double, ParamValue::Double(_) | ParamValue::Long(_)) => true,
            (ParamType::Boolean, ParamValue::Bool(_)) => true,
            (ParamType::Boolean, ParamValue::Coded(CodedValue::Symbol(_))) => true,
            (ParamType::Date, ParamValue::Date(_)) => true,
            (ParamType::LinearUnit, ParamValue::LinearUnit(_)) => true,
            (ParamType::FeatureReference, ParamValue::FeatureRef(_) | ParamValue::String(_)) => {
                true
            }
            (ParamType::Field, ParamValue::Field(_)) => true,
            (ParamType::ValueTable, ParamValue::Table(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::String => f.write_str("string"),
            ParamType::Long => f.write_str("long"),
            ParamType::Double => f.write_str("double"),
            ParamType::Boolean => f.write_str("boolean"),
            ParamType::Date => f.write_str("date"),
            ParamType::LinearUnit => f.write_str("linear-unit"),
            ParamType::FeatureReference => f.write_str("feature-reference"),
            ParamType::Field => f.write_str("field"),
            ParamType::ValueTable => f.write_str("value-table"),
            ParamType::Composite => f.write_str("composite"),
            ParamType::MultiValue(inner) => write!(f, "multi-value<{inner}>"),
        }
    }
}

/// Metadata for one positional tool parameter.
#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
    pub name: String,
    pub requirement: Requirement,
    pub param_type: ParamType,
    pub domain: Option<Domain>,
    /// Substituted when the caller leaves the parameter unset.
    pub default: Option<ParamValue>,
    /// Display grouping only.
    pub category: Option<String>,
}

impl ParameterDescriptor {
    fn new(name: impl Into<String>, requirement: Requirement, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            requirement,
            param_type,
            domain: None,
            default: None,
            category: None,
        }
    }

    pub fn required(name: impl Into<String>, param_type: ParamType) -> Self {
        Self::new(name, Requirement::Required, param_type)
    }

    pub fn optional(name: impl Into<String>, param_type: ParamType) -> Self {
        Self::new(name, Requirement::Optional, param_type)
    }

    pub fn derived(name: impl Into<String>, param_type: ParamType) -> Self {
        Self::new(name, Requirement::Derived, param_type)
    }

    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    pub fn with_default(mut self, default: impl Into<ParamValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn is_derived(&self) -> bool {
        self.requirement == Requirement::Derived
    }

    /// Check a supplied value against the declared type, then the domain.
    ///
    /// Shared by eager setters and the invocation builder. Symbols must
    /// belong to a mapping declared by the parameter's domain.
    pub fn check(&self, value: &ParamValue) -> Result<(), ValidationError> {
        if !self.admits(value) || has_unmapped_symbol(value, self.domain.as_ref()) {
            return Err(ValidationError::TypeMismatch {
                name: self.name.clone(),
                expected: self.param_type.to_string(),
                found: value.shape(),
            });
        }
        if let Some(domain) = &self.domain {
            domain::validate(&self.name, value, domain)?;
        }
        Ok(())
    }

    fn admits(&self, value: &ParamValue) -> bool {
        if self.param_type.accepts(value) {
            return true;
        }
        // Boolean flags with a coded domain also take their raw tokens.
        self.param_type == ParamType::Boolean
            && matches!(
                value,
                ParamValue::Coded(CodedValue::Raw(_)) | ParamValue::String(_)
            )
            && self.domain.as_ref().is_some_and(Domain::is_enum_backed)
    }
}

/// Whether `value` holds a symbol whose mapping `domain` does not declare.
fn has_unmapped_symbol(value: &ParamValue, domain: Option<&Domain>) -> bool {
    match value {
        ParamValue::Coded(CodedValue::Symbol(symbol)) => {
            domain.and_then(|d| d.find_mapping(symbol.mapping)).is_none()
        }
        ParamValue::List(items) => items.iter().any(|item| has_unmapped_symbol(item, domain)),
        ParamValue::Table(rows) => {
            let columns = domain.and_then(Domain::table_columns).unwrap_or_default();
            rows.iter().any(|row| {
                row.iter().enumerate().any(|(idx, cell)| {
                    has_unmapped_symbol(cell, columns.get(idx).and_then(Option::as_ref))
                })
            })
        }
        _ => false,
    }
}

/// Immutable description of a remote tool.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub tool_name: String,
    /// Remote operation identifier, e.g. `MakeRouteLayer_na`.
    pub execute_name: String,
    pub toolbox_id: String,
    /// Parameters in the order the engine expects them.
    pub parameters: Vec<ParameterDescriptor>,
    pub valid_environment_keys: BTreeSet<String>,
}

impl ToolDescriptor {
    pub fn builder(tool_name: impl Into<String>, toolbox_id: impl Into<String>) -> ToolDescriptorBuilder {
        ToolDescriptorBuilder::new(tool_name, toolbox_id)
    }

    /// Look up a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.parameters.iter().find(|param| param.name == name)
    }

    /// Names of derived parameters in declaration order.
    pub fn output_names(&self) -> Vec<String> {
        self.parameters
            .iter()
            .filter(|param| param.is_derived())
            .map(|param| param.name.clone())
            .collect()
    }

    pub fn accepts_environment_key(&self, key: &str) -> bool {
        self.valid_environment_keys.contains(key)
    }
}

/// Builder that validates descriptor metadata on `build`.
#[derive(Debug, Clone)]
pub struct ToolDescriptorBuilder {
    tool_name: String,
    toolbox_id: String,
    execute_name: Option<String>,
    parameters: Vec<ParameterDescriptor>,
    valid_environment_keys: BTreeSet<String>,
}

impl ToolDescriptorBuilder {
    fn new(tool_name: impl Into<String>, toolbox_id: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            toolbox_id: toolbox_id.into(),
            execute_name: None,
            parameters: Vec::new(),
            valid_environment_keys: BTreeSet::new(),
        }
    }

    /// Override the remote identifier; defaults to `{tool}_{toolbox}`.
    pub fn execute_name(mut self, execute_name: impl Into<String>) -> Self {
        self.execute_name = Some(execute_name.into());
        self
    }

    pub fn parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn environment_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_environment_keys
            .extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Result<ToolDescriptor, DescriptorError> {
        if self.tool_name.is_empty() {
            return Err(DescriptorError::EmptyName("tool name"));
        }
        if self.toolbox_id.is_empty() {
            return Err(DescriptorError::EmptyName("toolbox id"));
        }

        let mut seen = HashSet::with_capacity(self.parameters.len());
        for param in &self.parameters {
            if param.name.is_empty() {
                return Err(DescriptorError::EmptyName("parameter name"));
            }
            if !seen.insert(param.name.as_str()) {
                return Err(DescriptorError::DuplicateParameter {
                    tool: self.tool_name.clone(),
                    name: param.name.clone(),
                });
            }
            let Some(default) = &param.default else {
                continue;
            };
            if param.is_derived() {
                return Err(DescriptorError::DerivedWithDefault {
                    tool: self.tool_name.clone(),
                    name: param.name.clone(),
                });
            }
            match param.check(default) {
                Ok(()) => {}
                Err(ValidationError::DomainViolation(source)) => {
                    return Err(DescriptorError::InvalidDefault {
                        tool: self.tool_name.clone(),
                        source,
                    });
                }
                Err(_) => {
                    return Err(DescriptorError::DefaultTypeMismatch {
                        tool: self.tool_name.clone(),
                        name: param.name.clone(),
                    });
                }
            }
        }

        let execute_name = self
            .execute_name
            .unwrap_or_else(|| format!("{}_{}", self.tool_name, self.toolbox_id));
        Ok(ToolDescriptor {
            tool_name: self.tool_name,
            execute_name,
            toolbox_id: self.toolbox_id,
            parameters: self.parameters,
            valid_environment_keys: self.valid_environment_keys,
        })
    }
}
