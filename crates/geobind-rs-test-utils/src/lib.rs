//! Test helpers shared across geobind crates.

pub mod client;
pub mod descriptors;
pub mod events;

pub use client::{FailingExecutionClient, RecordingExecutionClient, SlowExecutionClient};
pub use descriptors::{scenario_descriptor, scenario_registry};
pub use events::RecordingEventSink;
