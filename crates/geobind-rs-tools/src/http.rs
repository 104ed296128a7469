//! JSON-over-HTTP execution client.

use crate::client::ExecutionClient;
use async_trait::async_trait;
use geobind_rs_config::ClientConfig;
use geobind_rs_protocol::{InvocationPayload, RemoteExecutionError, ToolOutputs};
use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use std::time::Duration;

/// Failure body returned by the engine on non-success statuses.
#[derive(Debug, Deserialize)]
struct FailureBody {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

/// Execution client that posts payloads to `{base_url}/{execute_name}/execute`.
#[derive(Debug, Clone)]
pub struct HttpExecutionClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpExecutionClient {
    /// Client with default transport settings.
    pub fn new(base_url: impl Into<String>) -> Result<Self, RemoteExecutionError> {
        Self::from_config(&ClientConfig {
            base_url: Some(base_url.into()),
            ..ClientConfig::default()
        })
    }

    /// Client configured from the `client` config section.
    pub fn from_config(config: &ClientConfig) -> Result<Self, RemoteExecutionError> {
        let base_url = config
            .base_url
            .as_deref()
            .ok_or_else(|| RemoteExecutionError::Transport("client.base_url is not set".into()))?
            .trim_end_matches('/')
            .to_string();

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let header = HeaderName::from_bytes(name.as_bytes())
                .map_err(|err| RemoteExecutionError::Transport(format!("header {name}: {err}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|err| RemoteExecutionError::Transport(format!("header {name}: {err}")))?;
            headers.insert(header, value);
        }

        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .default_headers(headers);
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let client = builder
            .build()
            .map_err(|err| RemoteExecutionError::Transport(err.to_string()))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn execute_url(&self, tool_target: &str) -> String {
        format!("{}/{}/execute", self.base_url, tool_target)
    }
}

#[async_trait]
impl ExecutionClient for HttpExecutionClient {
    async fn submit(&self, payload: InvocationPayload) -> Result<ToolOutputs, RemoteExecutionError> {
        let url = self.execute_url(&payload.tool_target);
        debug!(
            "posting invocation (id={}, url={})",
            payload.invocation_id, url
        );
        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| RemoteExecutionError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<ToolOutputs>()
                .await
                .map_err(|err| RemoteExecutionError::InvalidResponse(err.to_string()));
        }

        let body = response
            .text()
            .await
            .map_err(|err| RemoteExecutionError::Transport(err.to_string()))?;
        let (code, message) = match serde_json::from_str::<FailureBody>(&body) {
            Ok(failure) => (failure.code, failure.message),
            Err(_) => (None, body),
        };
        Err(RemoteExecutionError::Failed {
            status: status.as_u16(),
            code,
            message,
        })
    }
}
