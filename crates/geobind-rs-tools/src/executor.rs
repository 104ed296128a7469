//! Validate, build, and submit invocations through an execution client.

use crate::builder::{BuildOptions, ParameterValues, prepare};
use crate::client::ExecutionClient;
use crate::descriptor::ToolDescriptor;
use crate::environment::EnvironmentSettings;
use crate::error::InvocationError;
use crate::registry::DescriptorRegistry;
use crate::tool::GpTool;
use chrono::Utc;
use geobind_rs_config::InvocationConfig;
use geobind_rs_protocol::{
    EventSink, InvocationEvent, InvocationEventPayload, InvocationPayload, ToolOutputs,
};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;

/// Build policies plus the submission timeout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutorOptions {
    pub build: BuildOptions,
    /// Unbounded when `None`.
    pub submit_timeout: Option<Duration>,
}

impl From<&InvocationConfig> for ExecutorOptions {
    fn from(config: &InvocationConfig) -> Self {
        Self {
            build: BuildOptions::from(config),
            submit_timeout: config.submit_timeout_ms.map(Duration::from_millis),
        }
    }
}

/// Runs tools from a descriptor registry against an execution client.
///
/// Cheap to clone; independent invocations may run concurrently.
#[derive(Clone)]
pub struct GeoprocessingExecutor {
    registry: DescriptorRegistry,
    client: Arc<dyn ExecutionClient>,
    options: ExecutorOptions,
    event_sink: Option<Arc<dyn EventSink>>,
}

impl GeoprocessingExecutor {
    pub fn new(registry: DescriptorRegistry, client: Arc<dyn ExecutionClient>) -> Self {
        Self {
            registry,
            client,
            options: ExecutorOptions::default(),
            event_sink: None,
        }
    }

    pub fn with_options(mut self, options: ExecutorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = Some(sink);
        self
    }

    pub fn registry(&self) -> &DescriptorRegistry {
        &self.registry
    }

    pub fn options(&self) -> &ExecutorOptions {
        &self.options
    }

    /// Validate and build a payload without submitting it.
    pub fn prepare(
        &self,
        tool_name: &str,
        values: &ParameterValues,
        environment: &EnvironmentSettings,
    ) -> Result<InvocationPayload, InvocationError> {
        let descriptor = self
            .registry
            .describe(tool_name)
            .ok_or_else(|| InvocationError::UnknownTool(tool_name.to_string()))?;
        prepare(&descriptor, values, environment, &self.options.build)
    }

    /// Run a registered tool by name.
    pub async fn execute(
        &self,
        tool_name: &str,
        values: &ParameterValues,
        environment: &EnvironmentSettings,
    ) -> Result<ToolOutputs, InvocationError> {
        let descriptor = self
            .registry
            .describe(tool_name)
            .ok_or_else(|| InvocationError::UnknownTool(tool_name.to_string()))?;
        let payload = prepare(&descriptor, values, environment, &self.options.build)?;
        self.submit(&descriptor, payload).await
    }

    /// Run a typed tool. The tool need not be registered.
    pub async fn run<T: GpTool>(&self, tool: &T) -> Result<ToolOutputs, InvocationError> {
        let descriptor = T::descriptor()?;
        let payload = tool.to_payload(&self.options.build)?;
        self.submit(&descriptor, payload).await
    }

    /// Hand a prepared payload to the client, emitting lifecycle events.
    pub async fn submit(
        &self,
        descriptor: &ToolDescriptor,
        payload: InvocationPayload,
    ) -> Result<ToolOutputs, InvocationError> {
        let tool = descriptor.tool_name.clone();
        let invocation_id = payload.invocation_id;
        info!(
            "submitting invocation (tool={}, id={}, values={}, env_keys={})",
            tool,
            invocation_id,
            payload.ordered_values.len(),
            payload.environment.len()
        );
        self.emit(
            descriptor,
            &payload,
            InvocationEventPayload::Submitted {
                tool_target: payload.tool_target.clone(),
            },
        );

        let submission = self.client.submit(payload.clone());
        let result = match self.options.submit_timeout {
            Some(after) => match tokio::time::timeout(after, submission).await {
                Ok(result) => result.map_err(|source| InvocationError::Remote {
                    tool: tool.clone(),
                    source,
                }),
                Err(_) => Err(InvocationError::Timeout {
                    tool: tool.clone(),
                    after,
                }),
            },
            None => submission.await.map_err(|source| InvocationError::Remote {
                tool: tool.clone(),
                source,
            }),
        };

        match &result {
            Ok(outputs) => {
                debug!(
                    "invocation completed (tool={}, id={}, outputs={}, messages={})",
                    tool,
                    invocation_id,
                    outputs.values.len(),
                    outputs.messages.len()
                );
                if outputs.has_warnings() {
                    warn!("engine reported warnings (tool={}, id={})", tool, invocation_id);
                }
                self.emit(
                    descriptor,
                    &payload,
                    InvocationEventPayload::Completed {
                        output_count: outputs.values.len(),
                    },
                );
            }
            Err(err) => {
                warn!("invocation failed (tool={}, id={}): {}", tool, invocation_id, err);
                self.emit(
                    descriptor,
                    &payload,
                    InvocationEventPayload::Failed {
                        message: err.to_string(),
                    },
                );
            }
        }
        result
    }

    fn emit(
        &self,
        descriptor: &ToolDescriptor,
        payload: &InvocationPayload,
        event: InvocationEventPayload,
    ) {
        let Some(sink) = self.event_sink.as_ref() else {
            return;
        };
        sink.emit(InvocationEvent {
            invocation_id: payload.invocation_id,
            tool_name: descriptor.tool_name.clone(),
            created_at: Utc::now(),
            payload: event,
        });
    }
}

impl std::fmt::Debug for GeoprocessingExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoprocessingExecutor")
            .field("registry", &self.registry)
            .field("options", &self.options)
            .field("event_sink", &self.event_sink.is_some())
            .finish()
    }
}
