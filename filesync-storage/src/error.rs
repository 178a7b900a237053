//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend refused a write.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// The backend could not report its usage.
    #[error("storage estimate unavailable: {0}")]
    EstimateUnavailable(String),

    /// A blocking storage task panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(String),

    /// The backend lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    LockPoisoned,
}
