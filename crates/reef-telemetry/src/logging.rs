//! Structured logging initialization.

use crate::error::{TelemetryError, TelemetryResult};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,reef=debug";

/// Initialize structured logging with the default filter.
///
/// `RUST_LOG` overrides the filter when set.
pub fn init_logging() -> TelemetryResult<()> {
    init_logging_with(DEFAULT_FILTER)
}

/// Initialize structured logging with a fallback filter directive.
///
/// Configures tracing with JSON output when `RUST_ENV=production` and
/// pretty output otherwise.
pub fn init_logging_with(default_filter: &str) -> TelemetryResult<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let is_production = std::env::var("RUST_ENV")
        .map(|v| v == "production")
        .unwrap_or(false);

    let result = if is_production {
        // JSON format for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init()
    } else {
        // Pretty format for development
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_target(true))
            .try_init()
    };

    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    tracing::debug!(production = is_production, "Logging initialized");
    Ok(())
}
