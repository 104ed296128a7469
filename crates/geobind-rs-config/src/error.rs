//! Config loading and validation errors.

use thiserror::Error;

/// Errors returned while loading or validating geobind config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file could not be read.
    #[error("failed to read config: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// A config file is not valid JSON5.
    #[error("failed to parse config: {0}")]
    ParseFailed(#[from] json5::Error),
    /// The merged document does not decode into the config model.
    #[error("failed to decode config: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// A field failed schema validation; `path` is `layer:dotted.path`.
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
    /// The service base URL is unusable.
    #[error("invalid client.base_url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    /// Cross-field invariant failure.
    #[error("invalid config: {0}")]
    Invalid(String),
}
