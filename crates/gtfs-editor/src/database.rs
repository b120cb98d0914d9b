//! The top-level editor database.

use std::path::Path;

use gtfs_editor_core::{is_valid_id, Feed, FeedId};
use gtfs_editor_storage::backends::RedbTransaction;
use gtfs_editor_storage::RedbEngine;
use tracing::debug;

use crate::config::DatabaseConfig;
use crate::editor::{Editor, FeedScope};
use crate::error::{Error, Result};
use crate::transaction::{FeedTransaction, GlobalTransaction, TransactionManager};

/// An editor database holding any number of feeds.
///
/// Each feed carries its own routes, trip patterns, and trips, edited
/// through feed-scoped transactions. The feed registry itself is edited
/// through global transactions.
pub struct Database {
    manager: TransactionManager<RedbEngine>,
}

impl Database {
    /// Open or create a database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`] if the database cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, DatabaseConfig::default())
    }

    /// Open or create a database with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`] if the database cannot be opened.
    pub fn open_with_config(path: impl AsRef<Path>, config: DatabaseConfig) -> Result<Self> {
        let engine = RedbEngine::open_with_config(path, config.storage)
            .map_err(|e| Error::Open(e.to_string()))?;
        Ok(Self { manager: TransactionManager::new(engine) })
    }

    /// Create an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`] if the database cannot be created.
    pub fn in_memory() -> Result<Self> {
        let engine = RedbEngine::in_memory().map_err(|e| Error::Open(e.to_string()))?;
        Ok(Self { manager: TransactionManager::new(engine) })
    }

    /// Get the transaction manager.
    #[must_use]
    pub const fn manager(&self) -> &TransactionManager<RedbEngine> {
        &self.manager
    }

    // ========================================================================
    // Feed registry
    // ========================================================================

    /// Register a new feed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the feed ID is empty or contains a
    /// NUL byte, and [`Error::DuplicateId`] if the feed already exists.
    pub fn create_feed(&self, feed: Feed) -> Result<()> {
        if !is_valid_id(feed.id.as_str()) {
            return Err(Error::Validation(format!("invalid feed id: {:?}", feed.id.as_str())));
        }

        let mut tx = self.manager.begin_global()?;
        if tx.contains_feed(feed.id.as_str())? {
            tx.rollback()?;
            return Err(Error::DuplicateId { kind: "feed", id: feed.id.to_string() });
        }
        tx.put_feed(&feed)?;
        tx.commit()?;

        debug!(feed = %feed.id, "created feed");
        Ok(())
    }

    /// Remove a feed from the registry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the feed does not exist.
    pub fn delete_feed(&self, feed: &FeedId) -> Result<()> {
        let mut tx = self.manager.begin_global()?;
        if !tx.remove_feed(feed.as_str())? {
            tx.rollback()?;
            return Err(Error::NotFound { kind: "feed", id: feed.to_string() });
        }
        tx.commit()?;

        debug!(feed = %feed, "deleted feed");
        Ok(())
    }

    /// Check whether a feed exists.
    ///
    /// The check runs in a global transaction that is always rolled back;
    /// it performs no mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub fn feed_exists(&self, feed: &FeedId) -> Result<bool> {
        let tx = self.manager.begin_global()?;
        let exists = tx.contains_feed(feed.as_str())?;
        tx.rollback()?;
        Ok(exists)
    }

    /// Collect all registered feeds, in ID order.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub fn feeds(&self) -> Result<Vec<Feed>> {
        let tx = self.manager.begin_global()?;
        let feeds = tx.feeds()?;
        tx.rollback()?;
        Ok(feeds)
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Open an editor over the feed named by `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the scope is ambiguous or names no
    /// feed, and [`Error::NotFound`] if the resolved feed does not exist.
    pub fn editor(&self, scope: FeedScope) -> Result<Editor<'_>> {
        let feed = scope.resolve()?;
        if !self.feed_exists(&feed)? {
            return Err(Error::NotFound { kind: "feed", id: feed.to_string() });
        }
        Ok(Editor::new(self, feed))
    }

    /// Begin a transaction scoped to one feed.
    ///
    /// Most callers should go through [`Database::editor`]; this is the
    /// low-level entry point for multi-step edits that need one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started.
    pub fn begin_feed(&self, feed: &FeedId) -> Result<FeedTransaction<RedbTransaction>> {
        Ok(self.manager.begin_feed(feed)?)
    }

    /// Begin a transaction over the feed registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started.
    pub fn begin_global(&self) -> Result<GlobalTransaction<RedbTransaction>> {
        Ok(self.manager.begin_global()?)
    }
}
