//! Wire protocol types for geoprocessing invocations, outputs, and events.

mod remote;

pub use remote::RemoteExecutionError;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a single invocation.
pub type InvocationId = Uuid;

/// A parameter or environment value in the shape the engine receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum WireValue {
    /// Empty positional placeholder.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// 64-bit integer.
    Long(i64),
    /// Double precision number.
    Double(f64),
    /// String value or coded-value token.
    String(String),
    /// Date-time value.
    Date(DateTime<Utc>),
    /// Distance with a unit keyword, e.g. `5 Meters`.
    LinearUnit { value: f64, unit: String },
    /// Multi-value list.
    List(Vec<WireValue>),
    /// Value table rows.
    Table(Vec<Vec<WireValue>>),
}

impl WireValue {
    /// Whether this value is the empty placeholder.
    pub fn is_null(&self) -> bool {
        matches!(self, WireValue::Null)
    }

    /// Return the inner string, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            WireValue::String(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireValue::Null => f.write_str("#"),
            WireValue::Bool(value) => write!(f, "{value}"),
            WireValue::Long(value) => write!(f, "{value}"),
            WireValue::Double(value) => write!(f, "{value}"),
            WireValue::String(value) => f.write_str(value),
            WireValue::Date(value) => write!(f, "{}", value.to_rfc3339()),
            WireValue::LinearUnit { value, unit } => write!(f, "{value} {unit}"),
            WireValue::List(values) => {
                let parts = values.iter().map(ToString::to_string).collect::<Vec<_>>();
                f.write_str(&parts.join(";"))
            }
            WireValue::Table(rows) => {
                let rows = rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join(" ")
                    })
                    .collect::<Vec<_>>();
                f.write_str(&rows.join(";"))
            }
        }
    }
}

/// Positional remote call assembled from a tool descriptor and caller values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationPayload {
    /// Unique id used to correlate logs and events.
    pub invocation_id: InvocationId,
    /// Fully qualified remote operation identifier.
    pub tool_target: String,
    /// Values in the order the engine expects them.
    pub ordered_values: Vec<WireValue>,
    /// Whitelisted environment settings.
    #[serde(default)]
    pub environment: BTreeMap<String, WireValue>,
    /// Names of derived parameters the engine fills on completion.
    #[serde(default)]
    pub output_names: Vec<String>,
}

/// Severity of an engine message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageSeverity {
    /// Informational progress message.
    Info,
    /// Non-fatal warning.
    Warning,
    /// Error reported by the engine.
    Error,
}

/// Message emitted by the engine while executing a tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolMessage {
    /// Message severity.
    pub severity: MessageSeverity,
    /// Message text.
    pub text: String,
}

/// Results returned by the engine for a completed invocation.
///
/// Output values are keyed by derived parameter name and passed through
/// untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolOutputs {
    /// Output values keyed by derived parameter name.
    #[serde(default)]
    pub values: BTreeMap<String, WireValue>,
    /// Engine messages in emission order.
    #[serde(default)]
    pub messages: Vec<ToolMessage>,
}

impl ToolOutputs {
    /// Fetch an output value by derived parameter name.
    pub fn get(&self, name: &str) -> Option<&WireValue> {
        self.values.get(name)
    }

    /// Whether the engine reported any warning messages.
    pub fn has_warnings(&self) -> bool {
        self.messages
            .iter()
            .any(|message| message.severity == MessageSeverity::Warning)
    }
}

/// Wrapper for events emitted around invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationEvent {
    /// Invocation the event belongs to.
    pub invocation_id: InvocationId,
    /// Tool name associated with the event.
    pub tool_name: String,
    /// Timestamp when the event was created.
    pub created_at: DateTime<Utc>,
    /// Event payload content.
    pub payload: InvocationEventPayload,
}

/// Lifecycle events for a single invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "payload")]
pub enum InvocationEventPayload {
    /// Payload handed to the execution client.
    Submitted { tool_target: String },
    /// Execution client returned outputs.
    Completed { output_count: usize },
    /// Execution client or timeout failed the invocation.
    Failed { message: String },
}

/// Sink interface for invocation events.
pub trait EventSink: Send + Sync {
    /// Emit an event to downstream listeners.
    fn emit(&self, event: InvocationEvent);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn wire_values_use_adjacent_tags() {
        let encoded = serde_json::to_value(WireValue::Long(5)).expect("serialize");
        assert_eq!(encoded, json!({ "type": "long", "value": 5 }));

        let encoded = serde_json::to_value(WireValue::Null).expect("serialize");
        assert_eq!(encoded, json!({ "type": "null" }));

        let encoded = serde_json::to_value(WireValue::LinearUnit {
            value: 250.0,
            unit: "Meters".to_string(),
        })
        .expect("serialize");
        assert_eq!(
            encoded,
            json!({ "type": "linear_unit", "value": { "value": 250.0, "unit": "Meters" } })
        );
    }

    #[test]
    fn outputs_decode_with_missing_sections() {
        let outputs: ToolOutputs = serde_json::from_value(json!({
            "values": { "out_layer": { "type": "string", "value": "Route" } }
        }))
        .expect("deserialize");
        assert_eq!(
            outputs.get("out_layer"),
            Some(&WireValue::String("Route".to_string()))
        );
        assert!(outputs.messages.is_empty());
        assert!(!outputs.has_warnings());
    }

    #[test]
    fn display_renders_engine_text_form() {
        let value = WireValue::Table(vec![
            vec![
                WireValue::String("Streets".to_string()),
                WireValue::String("SHAPE".to_string()),
            ],
            vec![
                WireValue::String("Junctions".to_string()),
                WireValue::String("NONE".to_string()),
            ],
        ]);
        assert_eq!(value.to_string(), "Streets SHAPE;Junctions NONE");
        assert_eq!(WireValue::Null.to_string(), "#");
    }
}
