//! Editor error types.

use gtfs_editor_core::TransactionError;
use thiserror::Error;

/// Errors surfaced by editor operations.
///
/// Operations that fail after having started a write transaction roll the
/// transaction back before returning, so an `Err` never leaves partial
/// edits behind.
#[derive(Debug, Error)]
pub enum Error {
    /// The request was malformed or inconsistent.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An entity with the given ID already exists.
    #[error("{kind} already exists: {id}")]
    DuplicateId {
        /// Entity kind, e.g. `"route"`.
        kind: &'static str,
        /// The conflicting identifier.
        id: String,
    },

    /// The referenced entity does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. `"route"`.
        kind: &'static str,
        /// The missing identifier.
        id: String,
    },

    /// A pattern stop edit changed more than the reconciler can map onto
    /// existing trips.
    #[error("unsupported stop sequence edit: {0}")]
    UnsupportedEdit(String),

    /// Branding assets could not be stored.
    #[error("branding storage failed: {0}")]
    Branding(String),

    /// A transaction could not be started, committed, or rolled back.
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// The database could not be opened.
    #[error("failed to open database: {0}")]
    Open(String),
}

impl Error {
    /// Whether this is a not-found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result alias for editor operations.
pub type Result<T> = std::result::Result<T, Error>;
