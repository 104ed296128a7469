use async_trait::async_trait;
use geobind_rs_protocol::{InvocationPayload, RemoteExecutionError, ToolOutputs};
use geobind_rs_tools::ExecutionClient;
use parking_lot::Mutex;
use std::time::Duration;

/// Client that records payloads and answers with fixed outputs.
#[derive(Debug, Default)]
pub struct RecordingExecutionClient {
    outputs: ToolOutputs,
    submitted: Mutex<Vec<InvocationPayload>>,
}

impl RecordingExecutionClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outputs(mut self, outputs: ToolOutputs) -> Self {
        self.outputs = outputs;
        self
    }

    pub fn submitted(&self) -> Vec<InvocationPayload> {
        self.submitted.lock().clone()
    }

    pub fn last(&self) -> Option<InvocationPayload> {
        self.submitted.lock().last().cloned()
    }
}

#[async_trait]
impl ExecutionClient for RecordingExecutionClient {
    async fn submit(&self, payload: InvocationPayload) -> Result<ToolOutputs, RemoteExecutionError> {
        self.submitted.lock().push(payload);
        Ok(self.outputs.clone())
    }
}

/// Client that always fails with the given error.
#[derive(Debug, Clone)]
pub struct FailingExecutionClient {
    error: RemoteExecutionError,
}

impl FailingExecutionClient {
    pub fn new(error: RemoteExecutionError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl ExecutionClient for FailingExecutionClient {
    async fn submit(&self, _payload: InvocationPayload) -> Result<ToolOutputs, RemoteExecutionError> {
        Err(self.error.clone())
    }
}

/// Client that sleeps before answering.
#[derive(Debug, Clone)]
pub struct SlowExecutionClient {
    delay: Duration,
}

impl SlowExecutionClient {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ExecutionClient for SlowExecutionClient {
    async fn submit(&self, _payload: InvocationPayload) -> Result<ToolOutputs, RemoteExecutionError> {
        tokio::time::sleep(self.delay).await;
        Ok(ToolOutputs::default())
    }
}
