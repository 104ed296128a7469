//! Execution client interface.

use async_trait::async_trait;
use geobind_rs_protocol::{InvocationPayload, RemoteExecutionError, ToolOutputs};

/// Submits assembled payloads to a geoprocessing engine.
///
/// Implementations must not retry or reinterpret engine failures.
#[async_trait]
pub trait ExecutionClient: Send + Sync {
    async fn submit(&self, payload: InvocationPayload) -> Result<ToolOutputs, RemoteExecutionError>;
}
