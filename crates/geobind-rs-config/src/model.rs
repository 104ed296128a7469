//! Configuration schema for geobind.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Root config for geobind clients.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeobindConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub invocation: InvocationConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
}

impl GeobindConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> GeobindConfigBuilder {
        GeobindConfigBuilder::new()
    }
}

/// Builder for assembling a `GeobindConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct GeobindConfigBuilder {
    config: GeobindConfig,
}

impl GeobindConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: GeobindConfig::default(),
        }
    }

    /// Replace the execution client configuration.
    pub fn client(mut self, client: ClientConfig) -> Self {
        self.config.client = client;
        self
    }

    /// Replace the invocation policy configuration.
    pub fn invocation(mut self, invocation: InvocationConfig) -> Self {
        self.config.invocation = invocation;
        self
    }

    /// Replace the caller-side environment defaults.
    pub fn environment(mut self, environment: EnvironmentConfig) -> Self {
        self.config.environment = environment;
        self
    }

    /// Finalize and return the built `GeobindConfig`.
    pub fn build(self) -> GeobindConfig {
        self.config
    }
}

/// HTTP execution client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the geoprocessing service.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Extra headers sent with every submission.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Connection timeout for the HTTP transport.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            headers: BTreeMap::new(),
            connect_timeout_ms: default_connect_timeout_ms(),
            user_agent: None,
        }
    }
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

/// How derived (output-only) parameters occupy positional slots.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DerivedSlotPolicy {
    /// Leave derived parameters out of the ordered values.
    #[default]
    Omit,
    /// Send an empty placeholder in the derived parameter's position.
    Placeholder,
}

/// How supplied values with no matching parameter are treated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnknownParameterPolicy {
    /// Report an error for each unknown name.
    #[default]
    Reject,
    /// Drop unknown names with a warning.
    Ignore,
}

/// Invocation building and submission policy.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct InvocationConfig {
    #[serde(default)]
    pub derived_slots: DerivedSlotPolicy,
    #[serde(default)]
    pub unknown_parameters: UnknownParameterPolicy,
    /// Upper bound on a single submission; unbounded when unset.
    #[serde(default)]
    pub submit_timeout_ms: Option<u64>,
}

/// Caller-side environment defaults.
///
/// These are never merged by the invocation layer itself; callers apply them
/// per tool, restricted to that tool's whitelist.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EnvironmentConfig {
    #[serde(default)]
    pub defaults: BTreeMap<String, Value>,
}
