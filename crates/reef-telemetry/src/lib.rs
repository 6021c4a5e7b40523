//! Prometheus metrics and structured logging for reef.
//!
//! - Structured logging with tracing (JSON in production, pretty otherwise)
//! - Prometheus collectors for ticks, signals, fills, PnL and arbitrage scans

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, init_logging_with};
pub use metrics::Metrics;
