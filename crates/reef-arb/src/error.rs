//! Arbitrage error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArbError {
    #[error("Invalid conversion graph: {0}")]
    InvalidGraph(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type ArbResult<T> = Result<T, ArbError>;
