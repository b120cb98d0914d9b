//! Transaction error types.

use thiserror::Error;

/// Errors that can occur during transaction operations.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// The storage layer returned an error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Attempted a write operation on a read-only transaction.
    #[error("cannot write in read-only transaction")]
    ReadOnly,

    /// The transaction has already been committed or rolled back.
    #[error("transaction already completed")]
    AlreadyCompleted,

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for transaction operations.
pub type TransactionResult<T> = Result<T, TransactionError>;
