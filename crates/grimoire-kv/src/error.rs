//! Error types for the key-value backends.

use thiserror::Error;

/// Key-value storage error type.
///
/// Only store *construction* returns these; see the crate docs for the
/// degrade-and-log policy on the operations themselves.
#[derive(Error, Debug)]
pub enum KvError {
    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Schema/migration error
    #[error("Schema error: {0}")]
    Schema(String),

    /// Underlying rusqlite error
    #[error("SQLite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
}

/// Result type for key-value operations.
pub type KvResult<T> = Result<T, KvError>;
