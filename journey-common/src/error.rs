//! Common error types for Journey Map

use thiserror::Error;

/// Common result type for Journey Map operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the store, config and sync layers
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Photo source returned a failure
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Credential exchange or trigger secret rejected
    #[error("Authorization error: {0}")]
    Auth(String),
}
