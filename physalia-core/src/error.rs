//! Structured error types for the physalia ecosystem.

use thiserror::Error;

/// Unified error type for all physalia operations.
#[derive(Debug, Error)]
pub enum PhysaliaError {
    /// Parse error (malformed input data)
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid input (bad arguments, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the physalia ecosystem.
pub type Result<T> = std::result::Result<T, PhysaliaError>;
