//! Public SDK surface for geobind.
//!
//! This crate re-exports the core building blocks and provides helpers to
//! wire configuration, the HTTP client, and the catalogue together.

/// Re-export for convenience.
pub use geobind_rs_catalog as catalog;
/// Re-export for convenience.
pub use geobind_rs_config as config;
/// Re-export for convenience.
pub use geobind_rs_protocol as protocol;
/// Re-export for convenience.
pub use geobind_rs_tools as tools;

use geobind_rs_config::GeobindConfig;
use geobind_rs_tools::{
    DescriptorRegistry, ExecutorOptions, GeoprocessingExecutor, HttpExecutionClient,
};
use log::info;
use std::sync::Arc;
use thiserror::Error;

/// Errors from assembling an executor out of configuration.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Registry(#[from] geobind_rs_tools::RegistryError),
    #[error(transparent)]
    Client(#[from] geobind_rs_protocol::RemoteExecutionError),
}

/// Build an executor over the full catalogue with an HTTP client.
pub fn http_executor(config: &GeobindConfig) -> Result<GeoprocessingExecutor, SetupError> {
    let registry = geobind_rs_catalog::catalog_registry()?;
    let client = HttpExecutionClient::from_config(&config.client)?;
    info!(
        "http executor ready (base_url={}, tools={})",
        client.base_url(),
        registry.len()
    );
    Ok(executor_with(registry, Arc::new(client), config))
}

/// Build an executor over a registry and client using config policies.
pub fn executor_with(
    registry: DescriptorRegistry,
    client: Arc<dyn geobind_rs_tools::ExecutionClient>,
    config: &GeobindConfig,
) -> GeoprocessingExecutor {
    GeoprocessingExecutor::new(registry, client)
        .with_options(ExecutorOptions::from(&config.invocation))
}

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
