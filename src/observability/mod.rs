//! # Observability Infrastructure
//!
//! Structured logging setup for the ledgerd API using the tracing ecosystem.

use crate::config::ObservabilityConfig;
use crate::errors::{Error, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// The filter honors `RUST_LOG` when set and falls back to the configured
/// log level otherwise. With `json_logging` enabled, events are emitted as
/// structured JSON for log shippers; the default is human-readable output.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{}={},tower_http=info", env!("CARGO_CRATE_NAME"), config.log_level))
    });

    let registry = tracing_subscriber::registry().with(filter);

    let init_result = if config.json_logging {
        registry.with(tracing_subscriber::fmt::layer().json().with_target(true)).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer().with_target(true)).try_init()
    };

    init_result
        .map_err(|e| Error::config_with_source("Failed to initialize tracing", Box::new(e)))?;

    tracing::info!(
        service_name = %config.service_name,
        log_level = %config.log_level,
        json_logging = config.json_logging,
        "Tracing initialized"
    );

    Ok(())
}
