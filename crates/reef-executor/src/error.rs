//! Executor error types.

use reef_position::PositionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Ledger rejected fill: {0}")]
    Position(#[from] PositionError),
}

pub type ExecutorResult<T> = Result<T, ExecutorError>;
