//! Storage error types.

use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors surfaced by a storage backend.
///
/// Absence of a record is not an error; lookups return `Option` and deletes
/// return `bool`. These variants cover genuine failures plus the one
/// invariant a write can violate (unique usernames).
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to reach or initialize the backend.
    #[error("storage connection error: {0}")]
    Connection(String),

    /// A read statement failed.
    #[error("storage read error: {0}")]
    Read(String),

    /// A write statement failed.
    #[error("storage write error: {0}")]
    Write(String),

    /// A uniqueness invariant was violated.
    #[error("storage conflict: {0}")]
    Conflict(String),

    /// Anything else.
    #[error("storage internal error: {0}")]
    Internal(String),
}

impl StorageError {
    /// Connection-level failure.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Read failure.
    pub fn read(msg: impl Into<String>) -> Self {
        Self::Read(msg.into())
    }

    /// Write failure.
    pub fn write(msg: impl Into<String>) -> Self {
        Self::Write(msg.into())
    }

    /// Uniqueness violation.
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Unexpected failure.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
