//! Assemble positional invocation payloads from descriptors and caller values.

use crate::descriptor::{Requirement, ToolDescriptor};
use crate::domain::Domain;
use crate::environment::{EnvironmentSettings, overlay};
use crate::error::{InternalMappingError, InvocationError, ValidationError, ValidationErrors};
use crate::value::{CodedValue, ParamValue};
use geobind_rs_config::{DerivedSlotPolicy, InvocationConfig, UnknownParameterPolicy};
use geobind_rs_protocol::{InvocationPayload, WireValue};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::collections::btree_map;
use uuid::Uuid;

/// Policies applied while building a payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub derived_slots: DerivedSlotPolicy,
    pub unknown_parameters: UnknownParameterPolicy,
}

impl From<&InvocationConfig> for BuildOptions {
    fn from(config: &InvocationConfig) -> Self {
        Self {
            derived_slots: config.derived_slots,
            unknown_parameters: config.unknown_parameters,
        }
    }
}

/// Caller-supplied parameter values keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterValues(BTreeMap<String, ParamValue>);

impl ParameterValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ParamValue> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParameterValues {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

/// Build a payload for `descriptor` from caller values.
///
/// Every recoverable problem is collected before returning; no payload is
/// produced unless all parameters check out. The payload's environment is
/// left empty, see [`prepare`].
pub fn build(
    descriptor: &ToolDescriptor,
    values: &ParameterValues,
    options: &BuildOptions,
) -> Result<InvocationPayload, InvocationError> {
    let mut errors = ValidationErrors::default();

    for (name, _) in values.iter() {
        if descriptor.parameter(name).is_some() {
            continue;
        }
        match options.unknown_parameters {
            UnknownParameterPolicy::Reject => {
                errors.push(ValidationError::UnknownParameter { name: name.clone() })
            }
            UnknownParameterPolicy::Ignore => warn!(
                "ignoring unknown parameter (tool={}, name={})",
                descriptor.tool_name, name
            ),
        }
    }

    let mut ordered_values = Vec::with_capacity(descriptor.parameters.len());
    let mut output_names = Vec::new();

    for param in &descriptor.parameters {
        let value = match param.requirement {
            Requirement::Derived => {
                if values.contains(&param.name) {
                    debug!(
                        "ignoring value supplied for derived parameter (tool={}, name={})",
                        descriptor.tool_name, param.name
                    );
                }
                output_names.push(param.name.clone());
                if options.derived_slots == DerivedSlotPolicy::Placeholder {
                    ordered_values.push(WireValue::Null);
                }
                continue;
            }
            requirement => match (values.get(&param.name), &param.default) {
                (Some(value), _) => {
                    if let Err(err) = param.check(value) {
                        errors.push(err);
                        continue;
                    }
                    value
                }
                (None, Some(default)) => default,
                (None, None) if requirement == Requirement::Required => {
                    errors.push(ValidationError::MissingRequiredParameter {
                        name: param.name.clone(),
                    });
                    continue;
                }
                (None, None) => {
                    ordered_values.push(WireValue::Null);
                    continue;
                }
            },
        };

        let wire = encode_value(value, param.domain.as_ref()).map_err(|source| {
            InvocationError::Mapping {
                tool: descriptor.tool_name.clone(),
                source,
            }
        })?;
        ordered_values.push(wire);
    }

    if !errors.is_empty() {
        debug!(
            "invocation rejected (tool={}, errors={})",
            descriptor.tool_name,
            errors.len()
        );
        return Err(InvocationError::Validation {
            tool: descriptor.tool_name.clone(),
            errors,
        });
    }

    Ok(InvocationPayload {
        invocation_id: Uuid::new_v4(),
        tool_target: descriptor.execute_name.clone(),
        ordered_values,
        environment: BTreeMap::new(),
        output_names,
    })
}

/// Build a payload and overlay the requested environment.
///
/// Parameter and environment problems are reported together.
pub fn prepare(
    descriptor: &ToolDescriptor,
    values: &ParameterValues,
    environment: &EnvironmentSettings,
    options: &BuildOptions,
) -> Result<InvocationPayload, InvocationError> {
    match (build(descriptor, values, options), overlay(descriptor, environment)) {
        (Ok(mut payload), Ok(environment)) => {
            payload.environment = environment;
            Ok(payload)
        }
        (Err(InvocationError::Validation { tool, mut errors }), Err(env_errors)) => {
            errors.extend(env_errors);
            Err(InvocationError::Validation { tool, errors })
        }
        (Err(err), _) => Err(err),
        (Ok(_), Err(errors)) => Err(InvocationError::Validation {
            tool: descriptor.tool_name.clone(),
            errors,
        }),
    }
}

/// Encode a caller value into its wire shape.
///
/// Values under an enum-backed domain are mapped to their tokens.
pub(crate) fn encode_value(
    value: &ParamValue,
    domain: Option<&Domain>,
) -> Result<WireValue, InternalMappingError> {
    let mapping = domain.and_then(Domain::first_mapping);
    let wire = match value {
        ParamValue::Bool(flag) => WireValue::Bool(*flag),
        ParamValue::Long(number) => WireValue::Long(*number),
        ParamValue::Double(number) => WireValue::Double(*number),
        ParamValue::String(text) => match mapping {
            Some(mapping) if mapping.contains_token(text) => mapping.encode_token(text),
            _ => WireValue::String(text.clone()),
        },
        ParamValue::Date(date) => WireValue::Date(*date),
        ParamValue::LinearUnit(unit) => WireValue::LinearUnit {
            value: unit.value,
            unit: unit.unit.keyword().to_string(),
        },
        ParamValue::FeatureRef(path) => WireValue::String(path.clone()),
        ParamValue::Field(field) => WireValue::String(field.name.clone()),
        ParamValue::Coded(CodedValue::Raw(token)) => match mapping {
            Some(mapping) => mapping.encode_token(token),
            None => WireValue::String(token.clone()),
        },
        ParamValue::Coded(CodedValue::Symbol(symbol)) => {
            let mapping = domain
                .and_then(|domain| domain.find_mapping(symbol.mapping))
                .ok_or_else(|| InternalMappingError {
                    mapping: symbol.mapping.to_string(),
                    symbol: symbol.to_string(),
                })?;
            let token = mapping.symbol_to_wire(*symbol)?;
            mapping.encode_token(token)
        }
        ParamValue::List(items) => WireValue::List(
            items
                .iter()
                .map(|item| encode_value(item, domain))
                .collect::<Result<_, _>>()?,
        ),
        ParamValue::Table(rows) => {
            let columns = domain.and_then(Domain::table_columns).unwrap_or_default();
            let rows = rows
                .iter()
                .map(|row| {
                    row.iter()
                        .enumerate()
                        .map(|(idx, cell)| {
                            encode_value(cell, columns.get(idx).and_then(Option::as_ref))
                        })
                        .collect::<Result<Vec<_>, _>>()
                })
                .collect::<Result<Vec<_>, _>>()?;
            WireValue::Table(rows)
        }
    };
    Ok(wire)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ParamType, ParameterDescriptor};
    use crate::enums::{EnumEntry, EnumMapping};
    use crate::value::{LinearUnit, LinearUnitKind, Symbol};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn shape() -> Domain {
        Domain::CodedValues(Arc::new(
            EnumMapping::new(
                "LineShape",
                [
                    EnumEntry::new("AlongNetwork", "ALONG_NETWORK", "Along network"),
                    EnumEntry::new("StraightLine", "STRAIGHT_LINE", "Straight line"),
                ],
            )
            .expect("mapping"),
        ))
    }

    fn descriptor() -> ToolDescriptor {
        ToolDescriptor::builder("Route", "na")
            .parameter(ParameterDescriptor::required("network", ParamType::FeatureReference))
            .parameter(
                ParameterDescriptor::optional("line_shape", ParamType::String)
                    .with_domain(shape())
                    .with_default(Symbol::new("LineShape", "AlongNetwork")),
            )
            .parameter(ParameterDescriptor::optional("cutoff", ParamType::LinearUnit))
            .parameter(ParameterDescriptor::derived("out_layer", ParamType::String))
            .build()
            .expect("descriptor")
    }

    #[test]
    fn unset_optionals_use_default_or_placeholder() {
        let values = ParameterValues::new().with("network", "Streets_ND");
        let payload = build(&descriptor(), &values, &BuildOptions::default()).expect("payload");
        assert_eq!(payload.tool_target, "Route_na");
        assert_eq!(
            payload.ordered_values,
            vec![
                WireValue::String("Streets_ND".to_string()),
                WireValue::String("ALONG_NETWORK".to_string()),
                WireValue::Null,
            ]
        );
        assert_eq!(payload.output_names, vec!["out_layer".to_string()]);
        assert!(payload.environment.is_empty());
    }

    #[test]
    fn placeholder_policy_keeps_derived_slots() {
        let values = ParameterValues::new()
            .with("network", "Streets_ND")
            .with("cutoff", LinearUnit::new(5.0, LinearUnitKind::Kilometers))
            .with("out_layer", "ignored");
        let options = BuildOptions {
            derived_slots: DerivedSlotPolicy::Placeholder,
            ..BuildOptions::default()
        };
        let payload = build(&descriptor(), &values, &options).expect("payload");
        assert_eq!(payload.ordered_values.len(), 4);
        assert_eq!(
            payload.ordered_values[2],
            WireValue::LinearUnit {
                value: 5.0,
                unit: "Kilometers".to_string()
            }
        );
        assert_eq!(payload.ordered_values[3], WireValue::Null);
    }

    #[test]
    fn unknown_parameters_follow_policy() {
        let values = ParameterValues::new()
            .with("network", "Streets_ND")
            .with("netwrok", "typo");
        let err = build(&descriptor(), &values, &BuildOptions::default()).unwrap_err();
        assert_eq!(
            err.validation_errors().map(|errors| errors.0.clone()),
            Some(vec![ValidationError::UnknownParameter {
                name: "netwrok".to_string()
            }])
        );

        let options = BuildOptions {
            unknown_parameters: UnknownParameterPolicy::Ignore,
            ..BuildOptions::default()
        };
        assert!(build(&descriptor(), &values, &options).is_ok());
    }

    #[test]
    fn undefined_symbol_is_a_mapping_error() {
        let values = ParameterValues::new()
            .with("network", "Streets_ND")
            .with("line_shape", Symbol::new("LineShape", "Curvy"));
        let err = build(&descriptor(), &values, &BuildOptions::default()).unwrap_err();
        let InvocationError::Mapping { tool, source } = err else {
            panic!("expected mapping error");
        };
        assert_eq!(tool, "Route");
        assert_eq!(source.symbol, "Curvy");
        assert!(!InvocationError::Mapping { tool, source }.is_recoverable());
    }

    #[test]
    fn unmapped_symbol_is_collected_with_other_errors() {
        let descriptor = ToolDescriptor::builder("Label", "test")
            .parameter(ParameterDescriptor::optional("label", ParamType::String))
            .parameter(ParameterDescriptor::required("count", ParamType::Long))
            .build()
            .expect("descriptor");
        let values = ParameterValues::new().with("label", Symbol::new("Sequence", "FindBest"));
        let err = build(&descriptor, &values, &BuildOptions::default()).unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(
            err.validation_errors().map(|errors| errors.0.clone()),
            Some(vec![
                ValidationError::TypeMismatch {
                    name: "label".to_string(),
                    expected: "string".to_string(),
                    found: "coded-value",
                },
                ValidationError::MissingRequiredParameter {
                    name: "count".to_string()
                },
            ])
        );
    }

    #[test]
    fn raw_boolean_tokens_encode_as_booleans() {
        let descriptor = ToolDescriptor::builder("Flags", "test")
            .parameter(
                ParameterDescriptor::optional("append", ParamType::Boolean).with_domain(
                    Domain::CodedValues(Arc::new(
                        EnumMapping::boolean("Append", "Append", "Clear").expect("mapping"),
                    )),
                ),
            )
            .build()
            .expect("descriptor");
        for (value, expected) in [
            (ParamValue::token("false"), false),
            (ParamValue::from("true"), true),
        ] {
            let values = ParameterValues::new().with("append", value);
            let payload = build(&descriptor, &values, &BuildOptions::default()).expect("payload");
            assert_eq!(payload.ordered_values, vec![WireValue::Bool(expected)]);
        }
    }

    #[test]
    fn encode_maps_table_cells_by_column() {
        let domain = Domain::ValueTable(vec![None, Some(shape())]);
        let table = ParamValue::Table(vec![vec![
            ParamValue::from("Streets"),
            ParamValue::from(Symbol::new("LineShape", "StraightLine")),
        ]]);
        let wire = encode_value(&table, Some(&domain)).expect("encode");
        assert_eq!(
            wire,
            WireValue::Table(vec![vec![
                WireValue::String("Streets".to_string()),
                WireValue::String("STRAIGHT_LINE".to_string()),
            ]])
        );
    }
}
