//! Error types for pool operations.

use thiserror::Error;

/// Errors produced by the thread pool and its builders.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Submission was rejected because the pool has been closed.
    #[error("pool `{0}` is closed")]
    Closed(String),
    /// Configuration validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
