//! Feed-scoped transaction handle.

use gtfs_editor_core::encoding::keys::{
    decode_index_child, decode_record_id, encode_index_key, encode_record_key, feed_prefix,
    index_parent_prefix, prefix_end,
};
use gtfs_editor_core::{FeedId, Route, TransactionError, TransactionResult, Trip, TripPattern};
use gtfs_editor_storage::{StorageError, Transaction};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::tables;
use super::SecondaryIndex;

/// A record type stored per feed in its own table.
///
/// Implementations tie an entity type to its table name and the
/// human-readable kind used in error messages.
pub trait FeedRecord: Serialize + DeserializeOwned {
    /// Table holding records of this type.
    const TABLE: &'static str;
    /// Entity kind for error messages, e.g. `"route"`.
    const KIND: &'static str;

    /// The record's identifier within its feed.
    fn record_id(&self) -> &str;
}

impl FeedRecord for Route {
    const TABLE: &'static str = tables::ROUTES;
    const KIND: &'static str = "route";

    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

impl FeedRecord for TripPattern {
    const TABLE: &'static str = tables::TRIP_PATTERNS;
    const KIND: &'static str = "trip pattern";

    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

impl FeedRecord for Trip {
    const TABLE: &'static str = tables::TRIPS;
    const KIND: &'static str = "trip";

    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

/// A transaction bound to a single feed.
///
/// All record and index operations are scoped to the feed the transaction
/// was opened for; records of other feeds are invisible. Every scope is a
/// write transaction: read-only callers open one, read, and roll back.
///
/// Record operations never touch secondary indices. Editor operations
/// that change ownership update the affected index through
/// [`FeedTransaction::index_insert`] and [`FeedTransaction::index_remove`]
/// in the same transaction.
///
/// Dropping the handle without committing rolls the transaction back, so
/// no code path can leak the store's write lock.
pub struct FeedTransaction<T: Transaction> {
    /// Unique transaction ID for logging.
    tx_id: u64,

    /// The underlying storage transaction. `None` once completed.
    storage: Option<T>,

    /// The feed this transaction is scoped to.
    feed: FeedId,
}

impl<T: Transaction> FeedTransaction<T> {
    pub(crate) fn new(tx_id: u64, storage: T, feed: FeedId) -> Self {
        Self { tx_id, storage: Some(storage), feed }
    }

    /// Get the transaction ID.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.tx_id
    }

    /// The feed this transaction is scoped to.
    #[must_use]
    pub const fn feed(&self) -> &FeedId {
        &self.feed
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

    // ========================================================================
    // Record operations
    // ========================================================================

    /// Get a record by ID.
    ///
    /// Returns `Ok(None)` if the record does not exist in this feed.
    pub fn get_record<R: FeedRecord>(&self, id: &str) -> TransactionResult<Option<R>> {
        let key = encode_record_key(&self.feed, id);
        let bytes = self.storage()?.get(R::TABLE, &key).map_err(storage_error_to_tx_error)?;
        match bytes {
            Some(bytes) => {
                let record = bincode::deserialize(&bytes)
                    .map_err(|e| TransactionError::Serialization(e.to_string()))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Store a record, overwriting any existing record with the same ID.
    pub fn put_record<R: FeedRecord>(&mut self, record: &R) -> TransactionResult<()> {
        let key = encode_record_key(&self.feed, record.record_id());
        let bytes = bincode::serialize(record)
            .map_err(|e| TransactionError::Serialization(e.to_string()))?;
        self.storage_mut()?.put(R::TABLE, &key, &bytes).map_err(storage_error_to_tx_error)
    }

    /// Check whether a record exists without deserializing it.
    pub fn contains_record<R: FeedRecord>(&self, id: &str) -> TransactionResult<bool> {
        let key = encode_record_key(&self.feed, id);
        let bytes = self.storage()?.get(R::TABLE, &key).map_err(storage_error_to_tx_error)?;
        Ok(bytes.is_some())
    }

    /// Remove a record. Returns whether it was present.
    pub fn remove_record<R: FeedRecord>(&mut self, id: &str) -> TransactionResult<bool> {
        let key = encode_record_key(&self.feed, id);
        self.storage_mut()?.delete(R::TABLE, &key).map_err(storage_error_to_tx_error)
    }

    /// Collect all records of a type in this feed, in ID order.
    ///
    /// The snapshot reflects the transaction's view at call time,
    /// including its own uncommitted writes.
    pub fn records<R: FeedRecord>(&self) -> TransactionResult<Vec<R>> {
        let prefix = feed_prefix(&self.feed);
        let end = prefix_end(&prefix);
        let entries =
            self.storage()?.range(R::TABLE, &prefix, &end).map_err(storage_error_to_tx_error)?;

        let mut records = Vec::with_capacity(entries.len());
        for (_, bytes) in entries {
            let record = bincode::deserialize(&bytes)
                .map_err(|e| TransactionError::Serialization(e.to_string()))?;
            records.push(record);
        }
        Ok(records)
    }

    /// Collect the IDs of all records of a type in this feed, in order.
    pub fn record_ids<R: FeedRecord>(&self) -> TransactionResult<Vec<String>> {
        let prefix = feed_prefix(&self.feed);
        let end = prefix_end(&prefix);
        let entries =
            self.storage()?.range(R::TABLE, &prefix, &end).map_err(storage_error_to_tx_error)?;

        Ok(entries
            .iter()
            .filter_map(|(key, _)| decode_record_id(key).map(str::to_string))
            .collect())
    }

    // ========================================================================
    // Typed wrappers
    // ========================================================================

    /// Get a route by ID.
    pub fn get_route(&self, id: &str) -> TransactionResult<Option<Route>> {
        self.get_record(id)
    }

    /// Store a route.
    pub fn put_route(&mut self, route: &Route) -> TransactionResult<()> {
        self.put_record(route)
    }

    /// Collect all routes in this feed.
    pub fn routes(&self) -> TransactionResult<Vec<Route>> {
        self.records()
    }

    /// Get a trip pattern by ID.
    pub fn get_pattern(&self, id: &str) -> TransactionResult<Option<TripPattern>> {
        self.get_record(id)
    }

    /// Store a trip pattern.
    pub fn put_pattern(&mut self, pattern: &TripPattern) -> TransactionResult<()> {
        self.put_record(pattern)
    }

    /// Collect all trip patterns in this feed.
    pub fn patterns(&self) -> TransactionResult<Vec<TripPattern>> {
        self.records()
    }

    /// Get a trip by ID.
    pub fn get_trip(&self, id: &str) -> TransactionResult<Option<Trip>> {
        self.get_record(id)
    }

    /// Store a trip.
    pub fn put_trip(&mut self, trip: &Trip) -> TransactionResult<()> {
        self.put_record(trip)
    }

    /// Collect all trips in this feed.
    pub fn trips(&self) -> TransactionResult<Vec<Trip>> {
        self.records()
    }

    // ========================================================================
    // Index operations
    // ========================================================================

    /// Insert a `(parent, child)` entry into an index.
    pub fn index_insert(
        &mut self,
        index: SecondaryIndex,
        parent: &str,
        child: &str,
    ) -> TransactionResult<()> {
        let key = encode_index_key(&self.feed, parent, child);
        self.storage_mut()?.put(index.table, &key, &[]).map_err(storage_error_to_tx_error)
    }

    /// Remove a `(parent, child)` entry from an index. Returns whether it
    /// was present.
    pub fn index_remove(
        &mut self,
        index: SecondaryIndex,
        parent: &str,
        child: &str,
    ) -> TransactionResult<bool> {
        let key = encode_index_key(&self.feed, parent, child);
        self.storage_mut()?.delete(index.table, &key).map_err(storage_error_to_tx_error)
    }

    /// Collect the child IDs of one parent, in ID order.
    ///
    /// Reflects in-transaction state: entries inserted or removed earlier
    /// in this transaction are visible.
    pub fn index_children(
        &self,
        index: SecondaryIndex,
        parent: &str,
    ) -> TransactionResult<Vec<String>> {
        let prefix = index_parent_prefix(&self.feed, parent);
        let end = prefix_end(&prefix);
        let entries =
            self.storage()?.range(index.table, &prefix, &end).map_err(storage_error_to_tx_error)?;

        Ok(entries
            .iter()
            .filter_map(|(key, _)| decode_index_child(key).map(str::to_string))
            .collect())
    }

    /// IDs of a route's trips.
    pub fn trips_by_route(&self, route_id: &str) -> TransactionResult<Vec<String>> {
        self.index_children(SecondaryIndex::TRIPS_BY_ROUTE, route_id)
    }

    /// IDs of a route's trip patterns.
    pub fn patterns_by_route(&self, route_id: &str) -> TransactionResult<Vec<String>> {
        self.index_children(SecondaryIndex::TRIP_PATTERNS_BY_ROUTE, route_id)
    }

    /// Add a trip to its route's index.
    pub fn index_trip(&mut self, route_id: &str, trip_id: &str) -> TransactionResult<()> {
        self.index_insert(SecondaryIndex::TRIPS_BY_ROUTE, route_id, trip_id)
    }

    /// Remove a trip from its route's index.
    pub fn unindex_trip(&mut self, route_id: &str, trip_id: &str) -> TransactionResult<bool> {
        self.index_remove(SecondaryIndex::TRIPS_BY_ROUTE, route_id, trip_id)
    }

    /// Add a trip pattern to its route's index.
    pub fn index_pattern(&mut self, route_id: &str, pattern_id: &str) -> TransactionResult<()> {
        self.index_insert(SecondaryIndex::TRIP_PATTERNS_BY_ROUTE, route_id, pattern_id)
    }

    /// Remove a trip pattern from its route's index.
    pub fn unindex_pattern(&mut self, route_id: &str, pattern_id: &str) -> TransactionResult<bool> {
        self.index_remove(SecondaryIndex::TRIP_PATTERNS_BY_ROUTE, route_id, pattern_id)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Commit the transaction, persisting all changes.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::AlreadyCompleted`] if the transaction
    /// was already committed or rolled back.
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
    ///
    /// Safe to call from error paths that may run after an explicit commit
    /// or rollback.
    pub fn rollback_if_open(&mut self) -> TransactionResult<()> {
        match self.storage.take() {
            Some(storage) => storage.rollback().map_err(storage_error_to_tx_error),
            None => Ok(()),
        }
    }
}

impl<T: Transaction> Drop for FeedTransaction<T> {
    fn drop(&mut self) {
        // Still open means neither committed nor rolled back. Errors cannot
        // propagate out of drop, so the rollback is best effort.
        if let Some(storage) = self.storage.take() {
            let _ = storage.rollback();
        }
    }
}

pub(crate) fn storage_error_to_tx_error(err: StorageError) -> TransactionError {
    match err {
        StorageError::ReadOnly => TransactionError::ReadOnly,
        other => TransactionError::Storage(other.to_string()),
    }
}
