//! Transaction manager implementation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use gtfs_editor_core::{FeedId, TransactionResult};
use gtfs_editor_storage::StorageEngine;

use super::feed::{storage_error_to_tx_error, FeedTransaction};
use super::global::GlobalTransaction;

/// Hands out feed-scoped and global transactions over one storage engine.
///
/// Every scope is a write transaction; there is no separate read-only
/// fast path. Read-only callers open a scope, read from its consistent
/// snapshot, and roll back. The backend serializes writers, so two
/// transactions never race on the same feed.
///
/// # Thread Safety
///
/// `TransactionManager` is `Send + Sync` and can be shared across threads
/// with `Arc<TransactionManager<E>>`.
pub struct TransactionManager<E: StorageEngine> {
    /// The underlying storage engine.
    engine: Arc<E>,

    /// Counter for generating unique transaction IDs.
    next_tx_id: AtomicU64,
}

impl<E: StorageEngine> TransactionManager<E> {
    /// Create a new transaction manager with the given storage engine.
    pub fn new(engine: E) -> Self {
        Self { engine: Arc::new(engine), next_tx_id: AtomicU64::new(1) }
    }

    /// Get a reference to the underlying storage engine.
    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Begin a transaction scoped to one feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started.
    pub fn begin_feed(
        &self,
        feed: &FeedId,
    ) -> TransactionResult<FeedTransaction<E::Transaction<'_>>> {
        let tx_id = self.next_tx_id.fetch_add(1, Ordering::Relaxed);
        let storage = self.engine.begin_write().map_err(storage_error_to_tx_error)?;
        Ok(FeedTransaction::new(tx_id, storage, feed.clone()))
    }

    /// Begin a transaction over the feed registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started.
    pub fn begin_global(&self) -> TransactionResult<GlobalTransaction<E::Transaction<'_>>> {
        let tx_id = self.next_tx_id.fetch_add(1, Ordering::Relaxed);
        let storage = self.engine.begin_write().map_err(storage_error_to_tx_error)?;
        Ok(GlobalTransaction::new(tx_id, storage))
    }
}
