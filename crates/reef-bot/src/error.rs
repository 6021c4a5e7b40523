//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Detector error: {0}")]
    Detector(#[from] reef_detector::DetectorError),

    #[error("Executor error: {0}")]
    Executor(#[from] reef_executor::ExecutorError),

    #[error("Arbitrage error: {0}")]
    Arb(#[from] reef_arb::ArbError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] reef_telemetry::TelemetryError),

    #[error("Tick data error: {0}")]
    TickData(#[from] serde_json::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type AppResult<T> = Result<T, AppError>;
