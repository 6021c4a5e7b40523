//! Error types for reef-core.

use crate::book::BookState;
use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("No quote: book is {0}")]
    NoQuote(BookState),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
