//! Parameter domains and the pure domain validator.

use crate::enums::{CodedEnum, EnumMapping, FALSE_TOKEN, TRUE_TOKEN};
use crate::error::{DomainError, DomainKind, MappingDefinitionError};
use crate::value::{CodedValue, FieldType, ParamValue};
use std::sync::Arc;

/// Constraint on the values a parameter accepts.
#[derive(Debug, Clone)]
pub enum Domain {
    /// Inclusive numeric range.
    Range { min: f64, max: f64 },
    /// Closed set of coded-value tokens.
    CodedValues(Arc<EnumMapping>),
    /// Allowed storage types for a field reference.
    FieldTypes(Vec<FieldType>),
    /// Rows with one cell per column; `None` leaves a column unconstrained.
    ValueTable(Vec<Option<Domain>>),
    /// Accepts a value when any nested domain does.
    Composite(Vec<Domain>),
}

impl Domain {
    pub fn range(min: f64, max: f64) -> Self {
        Domain::Range { min, max }
    }

    /// Coded-value domain backed by a typed enum's mapping.
    pub fn coded<E: CodedEnum>() -> Result<Self, MappingDefinitionError> {
        Ok(Domain::CodedValues(E::mapping()?))
    }

    pub fn field_types(types: impl IntoIterator<Item = FieldType>) -> Self {
        Domain::FieldTypes(types.into_iter().collect())
    }

    pub fn kind(&self) -> DomainKind {
        match self {
            Domain::Range { .. } => DomainKind::Range,
            Domain::CodedValues(_) => DomainKind::CodedValues,
            Domain::FieldTypes(_) => DomainKind::FieldTypes,
            Domain::ValueTable(_) => DomainKind::ValueTable,
            Domain::Composite(_) => DomainKind::Composite,
        }
    }

    /// Find a coded-value mapping by name anywhere in this domain.
    pub fn find_mapping(&self, name: &str) -> Option<&Arc<EnumMapping>> {
        match self {
            Domain::CodedValues(mapping) if mapping.name() == name => Some(mapping),
            Domain::Composite(domains) => domains.iter().find_map(|d| d.find_mapping(name)),
            _ => None,
        }
    }

    /// First coded-value mapping in this domain.
    pub fn first_mapping(&self) -> Option<&Arc<EnumMapping>> {
        match self {
            Domain::CodedValues(mapping) => Some(mapping),
            Domain::Composite(domains) => domains.iter().find_map(Domain::first_mapping),
            _ => None,
        }
    }

    /// Column domains of the value-table part of this domain.
    pub fn table_columns(&self) -> Option<&[Option<Domain>]> {
        match self {
            Domain::ValueTable(columns) => Some(columns),
            Domain::Composite(domains) => domains.iter().find_map(Domain::table_columns),
            _ => None,
        }
    }

    /// Whether values under this domain are mapped to wire tokens.
    pub fn is_enum_backed(&self) -> bool {
        self.first_mapping().is_some()
    }
}

/// A value that passed domain validation.
#[derive(Debug, Clone, Copy)]
pub struct Validated<'a> {
    pub value: &'a ParamValue,
    /// Kind of the (innermost) domain that accepted the value.
    pub accepted_by: DomainKind,
}

/// Validate a value against a domain.
///
/// Multi-value lists are checked element by element unless the domain is a
/// value table. Composite domains accept a value when any member does.
pub fn validate<'a>(
    name: &str,
    value: &'a ParamValue,
    domain: &Domain,
) -> Result<Validated<'a>, DomainError> {
    if let ParamValue::List(items) = value
        && !matches!(domain, Domain::ValueTable(_))
    {
        for item in items {
            validate(name, item, domain)?;
        }
        return Ok(Validated {
            value,
            accepted_by: domain.kind(),
        });
    }

    let accepted = match domain {
        Domain::Range { min, max } => numeric(value).is_some_and(|n| *min <= n && n <= *max),
        Domain::CodedValues(mapping) => coded_accepts(mapping, value),
        Domain::FieldTypes(types) => match value {
            ParamValue::Field(field) => types.contains(&field.field_type),
            _ => false,
        },
        Domain::ValueTable(columns) => table_accepts(name, value, columns),
        Domain::Composite(domains) => {
            return domains
                .iter()
                .find_map(|domain| validate(name, value, domain).ok())
                .ok_or_else(|| violation(name, value, DomainKind::Composite));
        }
    };

    if accepted {
        Ok(Validated {
            value,
            accepted_by: domain.kind(),
        })
    } else {
        Err(violation(name, value, domain.kind()))
    }
}

fn violation(name: &str, value: &ParamValue, kind: DomainKind) -> DomainError {
    DomainError {
        parameter_name: name.to_string(),
        domain_kind: kind,
        offending_value: value.clone(),
    }
}

/// Numeric magnitude of a value, if it has one. NaN has none.
fn numeric(value: &ParamValue) -> Option<f64> {
    let number = match value {
        ParamValue::Long(value) => *value as f64,
        ParamValue::Double(value) => *value,
        ParamValue::LinearUnit(unit) => unit.value,
        _ => return None,
    };
    (!number.is_nan()).then_some(number)
}

fn coded_accepts(mapping: &EnumMapping, value: &ParamValue) -> bool {
    match value {
        ParamValue::Coded(CodedValue::Raw(token)) | ParamValue::String(token) => {
            mapping.contains_token(token)
        }
        // Resolution of the member happens in the encoder.
        ParamValue::Coded(CodedValue::Symbol(symbol)) => symbol.mapping == mapping.name(),
        ParamValue::Bool(flag) => {
            mapping.contains_token(if *flag { TRUE_TOKEN } else { FALSE_TOKEN })
        }
        _ => false,
    }
}

fn table_accepts(name: &str, value: &ParamValue, columns: &[Option<Domain>]) -> bool {
    let ParamValue::Table(rows) = value else {
        return false;
    };
    rows.iter().all(|row| {
        row.len() == columns.len()
            && row.iter().zip(columns).all(|(cell, column)| match column {
                Some(domain) => validate(name, cell, domain).is_ok(),
                None => true,
            })
    })
}
