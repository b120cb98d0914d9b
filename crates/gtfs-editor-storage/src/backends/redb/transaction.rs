//! Redb transaction implementation.
//!
//! `RedbTransaction` wraps both read-only and read-write Redb transactions
//! behind the `Transaction` trait. Each logical table name maps to its own
//! Redb table; tables are created lazily on first write, and reading a
//! table that does not exist yet yields empty results rather than an
//! error.

use redb::{ReadTransaction, ReadableTable, TableDefinition, WriteTransaction};

use crate::engine::{KeyValue, StorageError, Transaction};

fn table_def(name: &str) -> TableDefinition<'_, &'static [u8], &'static [u8]> {
    TableDefinition::new(name)
}

/// A transaction for the Redb storage engine.
///
/// Boxing the `WriteTransaction` would add indirection on every operation
/// and transactions are short-lived, so the size difference between
/// variants is accepted.
#[allow(clippy::large_enum_variant)]
pub enum RedbTransaction {
    /// A read-only transaction.
    Read(ReadTransaction),
    /// A read-write transaction.
    Write(WriteTransaction),
}

impl RedbTransaction {
    /// Create a new read-only transaction.
    pub const fn new_read(tx: ReadTransaction) -> Self {
        Self::Read(tx)
    }

    /// Create a new read-write transaction.
    pub const fn new_write(tx: WriteTransaction) -> Self {
        Self::Write(tx)
    }
}

impl Transaction for RedbTransaction {
    fn get(&self, table: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        match self {
            Self::Read(tx) => match tx.open_table(table_def(table)) {
                Ok(t) => match t.get(key) {
                    Ok(Some(value)) => Ok(Some(value.value().to_vec())),
                    Ok(None) => Ok(None),
                    Err(e) => Err(StorageError::Internal(e.to_string())),
                },
                // No table means no data, which is not an error
                Err(redb::TableError::TableDoesNotExist(_)) => Ok(None),
                Err(e) => Err(StorageError::Internal(e.to_string())),
            },
            Self::Write(tx) => match tx.open_table(table_def(table)) {
                Ok(t) => match t.get(key) {
                    Ok(Some(value)) => Ok(Some(value.value().to_vec())),
                    Ok(None) => Ok(None),
                    Err(e) => Err(StorageError::Internal(e.to_string())),
                },
                Err(redb::TableError::TableDoesNotExist(_)) => Ok(None),
                Err(e) => Err(StorageError::Internal(e.to_string())),
            },
        }
    }

    fn put(&mut self, table: &str, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let mut t = tx
                    .open_table(table_def(table))
                    .map_err(|e| StorageError::Internal(e.to_string()))?;
                t.insert(key, value).map_err(|e| StorageError::Internal(e.to_string()))?;
                Ok(())
            }
        }
    }

    fn delete(&mut self, table: &str, key: &[u8]) -> Result<bool, StorageError> {
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => match tx.open_table(table_def(table)) {
                Ok(mut t) => match t.remove(key) {
                    Ok(Some(_)) => Ok(true),
                    Ok(None) => Ok(false),
                    Err(e) => Err(StorageError::Internal(e.to_string())),
                },
                // Table doesn't exist, so the key doesn't either
                Err(redb::TableError::TableDoesNotExist(_)) => Ok(false),
                Err(e) => Err(StorageError::Internal(e.to_string())),
            },
        }
    }

    fn range(&self, table: &str, start: &[u8], end: &[u8]) -> Result<Vec<KeyValue>, StorageError> {
        match self {
            Self::Read(tx) => match tx.open_table(table_def(table)) {
                Ok(t) => collect_range(&t, start, end),
                Err(redb::TableError::TableDoesNotExist(_)) => Ok(Vec::new()),
                Err(e) => Err(StorageError::Internal(e.to_string())),
            },
            Self::Write(tx) => match tx.open_table(table_def(table)) {
                Ok(t) => collect_range(&t, start, end),
                Err(redb::TableError::TableDoesNotExist(_)) => Ok(Vec::new()),
                Err(e) => Err(StorageError::Internal(e.to_string())),
            },
        }
    }

    fn commit(self) -> Result<(), StorageError> {
        match self {
            // Read transactions don't need explicit commit
            Self::Read(_) => Ok(()),
            Self::Write(tx) => tx.commit().map_err(|e| StorageError::Transaction(e.to_string())),
        }
    }

    fn rollback(self) -> Result<(), StorageError> {
        match self {
            // Read transactions just get dropped
            Self::Read(_) => Ok(()),
            Self::Write(tx) => {
                // Ignore abort result, the transaction is discarded either way
                drop(tx.abort());
                Ok(())
            }
        }
    }

    fn is_read_only(&self) -> bool {
        matches!(self, Self::Read(_))
    }
}

fn collect_range(
    table: &impl ReadableTable<&'static [u8], &'static [u8]>,
    start: &[u8],
    end: &[u8],
) -> Result<Vec<KeyValue>, StorageError> {
    let range = table.range(start..end).map_err(|e| StorageError::Internal(e.to_string()))?;

    let mut entries = Vec::new();
    for result in range {
        let (k, v) = result.map_err(|e| StorageError::Internal(e.to_string()))?;
        entries.push((k.value().to_vec(), v.value().to_vec()));
    }
    Ok(entries)
}
