//! Caller-side parameter values.

use chrono::{DateTime, Utc};
use std::fmt;

/// Symbolic member of a coded-value enum, e.g. `UturnPolicy::AllowUturns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol {
    /// Name of the mapping the member belongs to.
    pub mapping: &'static str,
    /// Member name within the mapping.
    pub member: &'static str,
}

impl Symbol {
    /// Create a symbol for a mapping member.
    pub const fn new(mapping: &'static str, member: &'static str) -> Self {
        Self { mapping, member }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.mapping, self.member)
    }
}

/// A coded-value argument: either a raw wire token or a symbolic member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodedValue {
    /// Token as the engine spells it, e.g. `"ALLOW_UTURNS"`.
    Raw(String),
    /// Member of a closed enum, mapped to its token at build time.
    Symbol(Symbol),
}

impl fmt::Display for CodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodedValue::Raw(token) => f.write_str(token),
            CodedValue::Symbol(symbol) => symbol.fmt(f),
        }
    }
}

/// Storage type of a field in a feature class or table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Short,
    Long,
    BigInteger,
    Float,
    Double,
    Text,
    Date,
    Oid,
    Guid,
    GlobalId,
    Geometry,
    Blob,
    Raster,
}

impl FieldType {
    /// Keyword used by the engine for this field type.
    pub fn keyword(self) -> &'static str {
        match self {
            FieldType::Short => "Short",
            FieldType::Long => "Long",
            FieldType::BigInteger => "BigInteger",
            FieldType::Float => "Float",
            FieldType::Double => "Double",
            FieldType::Text => "Text",
            FieldType::Date => "Date",
            FieldType::Oid => "OID",
            FieldType::Guid => "GUID",
            FieldType::GlobalId => "GlobalID",
            FieldType::Geometry => "Geometry",
            FieldType::Blob => "Blob",
            FieldType::Raster => "Raster",
        }
    }

    /// Numeric storage types accepted by statistics tools.
    pub const NUMERIC: [FieldType; 5] = [
        FieldType::Short,
        FieldType::Long,
        FieldType::BigInteger,
        FieldType::Float,
        FieldType::Double,
    ];
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Reference to a field on an input dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    /// Field name.
    pub name: String,
    /// Declared storage type of the field.
    pub field_type: FieldType,
}

impl FieldRef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Linear unit keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinearUnitKind {
    Meters,
    Kilometers,
    Feet,
    Miles,
    NauticalMiles,
    Yards,
}

impl LinearUnitKind {
    pub fn keyword(self) -> &'static str {
        match self {
            LinearUnitKind::Meters => "Meters",
            LinearUnitKind::Kilometers => "Kilometers",
            LinearUnitKind::Feet => "Feet",
            LinearUnitKind::Miles => "Miles",
            LinearUnitKind::NauticalMiles => "NauticalMiles",
            LinearUnitKind::Yards => "Yards",
        }
    }
}

/// Distance with a unit, e.g. `5000 Meters`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearUnit {
    pub value: f64,
    pub unit: LinearUnitKind,
}

impl LinearUnit {
    pub fn new(value: f64, unit: LinearUnitKind) -> Self {
        Self { value, unit }
    }
}

/// A value supplied for a tool parameter or environment setting.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Long(i64),
    Double(f64),
    String(String),
    Date(DateTime<Utc>),
    LinearUnit(LinearUnit),
    /// Path or layer name of a dataset.
    FeatureRef(String),
    Field(FieldRef),
    Coded(CodedValue),
    /// Multi-value list.
    List(Vec<ParamValue>),
    /// Value table rows.
    Table(Vec<Vec<ParamValue>>),
}

impl ParamValue {
    /// Short name of the value's shape, used in error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            ParamValue::Bool(_) => "boolean",
            ParamValue::Long(_) => "long",
            ParamValue::Double(_) => "double",
            ParamValue::String(_) => "string",
            ParamValue::Date(_) => "date",
            ParamValue::LinearUnit(_) => "linear-unit",
            ParamValue::FeatureRef(_) => "feature-reference",
            ParamValue::Field(_) => "field",
            ParamValue::Coded(_) => "coded-value",
            ParamValue::List(_) => "multi-value",
            ParamValue::Table(_) => "value-table",
        }
    }

    /// Convenience constructor for a raw coded-value token.
    pub fn token(token: impl Into<String>) -> Self {
        ParamValue::Coded(CodedValue::Raw(token.into()))
    }

    /// Convert a scalar JSON value (as found in config files).
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(value) => Some(ParamValue::Bool(*value)),
            serde_json::Value::String(value) => Some(ParamValue::String(value.clone())),
            serde_json::Value::Number(number) => number
                .as_i64()
                .map(ParamValue::Long)
                .or_else(|| number.as_f64().map(ParamValue::Double)),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(value) => write!(f, "{value}"),
            ParamValue::Long(value) => write!(f, "{value}"),
            ParamValue::Double(value) => write!(f, "{value}"),
            ParamValue::String(value) | ParamValue::FeatureRef(value) => {
                write!(f, "{value:?}")
            }
            ParamValue::Date(value) => f.write_str(&value.to_rfc3339()),
            ParamValue::LinearUnit(unit) => write!(f, "{} {}", unit.value, unit.unit.keyword()),
            ParamValue::Field(field) => write!(f, "{} ({})", field.name, field.field_type),
            ParamValue::Coded(coded) => coded.fmt(f),
            ParamValue::List(values) => {
                let parts = values.iter().map(ToString::to_string).collect::<Vec<_>>();
                write!(f, "[{}]", parts.join(", "))
            }
            ParamValue::Table(rows) => write!(f, "<{} rows>", rows.len()),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Long(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Long(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Double(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(value: DateTime<Utc>) -> Self {
        ParamValue::Date(value)
    }
}

impl From<LinearUnit> for ParamValue {
    fn from(value: LinearUnit) -> Self {
        ParamValue::LinearUnit(value)
    }
}

impl From<FieldRef> for ParamValue {
    fn from(value: FieldRef) -> Self {
        ParamValue::Field(value)
    }
}

impl From<Symbol> for ParamValue {
    fn from(value: Symbol) -> Self {
        ParamValue::Coded(CodedValue::Symbol(value))
    }
}

impl From<CodedValue> for ParamValue {
    fn from(value: CodedValue) -> Self {
        ParamValue::Coded(value)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        ParamValue::List(values.into_iter().map(Into::into).collect())
    }
}
