//! Core storage engine traits.

use super::StorageError;

/// A key-value pair returned by range scans.
pub type KeyValue = (Vec<u8>, Vec<u8>);

/// A storage engine that provides transactional key-value operations.
pub trait StorageEngine: Send + Sync {
    /// The transaction type for this engine.
    type Transaction<'a>: Transaction
    where
        Self: 'a;

    /// Begin a read-only transaction.
    fn begin_read(&self) -> Result<Self::Transaction<'_>, StorageError>;

    /// Begin a read-write transaction.
    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError>;
}

/// A transaction over ordered key-value tables.
///
/// Tables are addressed by name and created on first write; reading a
/// table that was never written returns empty results rather than an
/// error.
pub trait Transaction {
    /// Get a value by key from a table.
    fn get(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    /// Put a key-value pair into a table.
    fn put(&mut self, table: &str, key: &[u8], value: &[u8]) -> Result<(), StorageError>;

    /// Delete a key from a table. Returns whether the key was present.
    fn delete(&mut self, table: &str, key: &[u8]) -> Result<bool, StorageError>;

    /// Collect all entries of a table with `start <= key < end`, in key
    /// order.
    fn range(&self, table: &str, start: &[u8], end: &[u8]) -> Result<Vec<KeyValue>, StorageError>;

    /// Commit the transaction.
    fn commit(self) -> Result<(), StorageError>;

    /// Rollback the transaction (implicit on drop for uncommitted
    /// transactions).
    fn rollback(self) -> Result<(), StorageError>;

    /// Whether this transaction rejects writes.
    fn is_read_only(&self) -> bool;
}
