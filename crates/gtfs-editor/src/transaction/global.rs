//! Global transaction handle for the feed registry.

use gtfs_editor_core::{Feed, TransactionError, TransactionResult};
use gtfs_editor_storage::Transaction;

use super::feed::storage_error_to_tx_error;
use super::tables;

/// A transaction over the feed registry.
///
/// Global transactions create and remove feeds and answer existence
/// checks before a feed-scoped transaction is opened. Existence checks
/// always roll back; they perform no mutation.
pub struct GlobalTransaction<T: Transaction> {
    tx_id: u64,
    storage: Option<T>,
}

impl<T: Transaction> GlobalTransaction<T> {
    pub(crate) fn new(tx_id: u64, storage: T) -> Self {
        Self { tx_id, storage: Some(storage) }
    }

    /// Get the transaction ID.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.tx_id
    }

    /// Whether the transaction has been neither committed nor rolled
    /// back.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.storage.is_some()
    }

    fn storage(&self) -> TransactionResult<&T> {
        self.storage.as_ref().ok_or(TransactionError::AlreadyCompleted)
    }

    fn storage_mut(&mut self) -> TransactionResult<&mut T> {
        self.storage.as_mut().ok_or(TransactionError::AlreadyCompleted)
    }

    /// Get a feed by ID.
    pub fn get_feed(&self, id: &str) -> TransactionResult<Option<Feed>> {
        let bytes = self
            .storage()?
            .get(tables::FEEDS, id.as_bytes())
            .map_err(storage_error_to_tx_error)?;
        match bytes {
            Some(bytes) => {
                let feed = bincode::deserialize(&bytes)
                    .map_err(|e| TransactionError::Serialization(e.to_string()))?;
                Ok(Some(feed))
            }
            None => Ok(None),
        }
    }

    /// Check whether a feed exists.
    pub fn contains_feed(&self, id: &str) -> TransactionResult<bool> {
        let bytes = self
            .storage()?
            .get(tables::FEEDS, id.as_bytes())
            .map_err(storage_error_to_tx_error)?;
        Ok(bytes.is_some())
    }

    /// Store a feed, overwriting any existing feed with the same ID.
    pub fn put_feed(&mut self, feed: &Feed) -> TransactionResult<()> {
        let bytes = bincode::serialize(feed)
            .map_err(|e| TransactionError::Serialization(e.to_string()))?;
        self.storage_mut()?
            .put(tables::FEEDS, feed.id.as_str().as_bytes(), &bytes)
            .map_err(storage_error_to_tx_error)
    }

    /// Remove a feed from the registry. Returns whether it was present.
    ///
    /// Only the registry entry is removed; the feed's records are not
    /// touched.
    pub fn remove_feed(&mut self, id: &str) -> TransactionResult<bool> {
        self.storage_mut()?
            .delete(tables::FEEDS, id.as_bytes())
            .map_err(storage_error_to_tx_error)
    }

    /// Collect all registered feeds, in ID order.
    pub fn feeds(&self) -> TransactionResult<Vec<Feed>> {
        // UTF-8 keys never start with 0xFF, so this spans the whole table.
        let entries = self
            .storage()?
            .range(tables::FEEDS, &[], &[0xFF])
            .map_err(storage_error_to_tx_error)?;

        let mut feeds = Vec::with_capacity(entries.len());
        for (_, bytes) in entries {
            let feed = bincode::deserialize(&bytes)
                .map_err(|e| TransactionError::Serialization(e.to_string()))?;
            feeds.push(feed);
        }
        Ok(feeds)
    }

    /// Commit the transaction.
    pub fn commit(mut self) -> TransactionResult<()> {
        let storage = self.storage.take().ok_or(TransactionError::AlreadyCompleted)?;
        storage.commit().map_err(storage_error_to_tx_error)
    }

    /// Rollback the transaction, discarding all changes.
    pub fn rollback(mut self) -> TransactionResult<()> {
        let storage = self.storage.take().ok_or(TransactionError::AlreadyCompleted)?;
        storage.rollback().map_err(storage_error_to_tx_error)
    }

    /// Rollback if the transaction is still open; a no-op otherwise.
    pub fn rollback_if_open(&mut self) -> TransactionResult<()> {
        match self.storage.take() {
            Some(storage) => storage.rollback().map_err(storage_error_to_tx_error),
            None => Ok(()),
        }
    }
}

impl<T: Transaction> Drop for GlobalTransaction<T> {
    fn drop(&mut self) {
        if let Some(storage) = self.storage.take() {
            let _ = storage.rollback();
        }
    }
}
