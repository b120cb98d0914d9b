//! Editing operations.
//!
//! An [`Editor`] is bound to one feed and runs each operation in its own
//! transaction: committed when the operation succeeds, rolled back when it
//! fails. Reads run in transactions that are always rolled back, so they
//! never persist anything.

mod branding;
mod cascade;
mod patterns;
mod reconcile;
mod routes;
mod scope;
mod trips;

pub use branding::BrandingStore;
pub use reconcile::{classify_stop_edit, StopSequenceEdit};
pub use scope::FeedScope;

use gtfs_editor_core::FeedId;
use gtfs_editor_storage::backends::RedbTransaction;

use crate::database::Database;
use crate::error::Result;
use crate::transaction::FeedTransaction;

/// Editing handle bound to one feed.
///
/// Created through [`Database::editor`], which validates that the feed
/// exists.
pub struct Editor<'a> {
    db: &'a Database,
    feed: FeedId,
}

impl std::fmt::Debug for Editor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("feed", &self.feed)
            .finish_non_exhaustive()
    }
}

impl<'a> Editor<'a> {
    pub(crate) const fn new(db: &'a Database, feed: FeedId) -> Self {
        Self { db, feed }
    }

    /// The feed this editor is bound to.
    #[must_use]
    pub const fn feed(&self) -> &FeedId {
        &self.feed
    }

    /// Run a closure in a write transaction.
    ///
    /// Commits when the closure returns `Ok`, rolls back when it returns
    /// `Err`. The rollback happens before the error is surfaced, so a
    /// failed operation never leaves partial edits behind.
    pub(crate) fn with_tx<R>(
        &self,
        f: impl FnOnce(&mut FeedTransaction<RedbTransaction>) -> Result<R>,
    ) -> Result<R> {
        let mut tx = self.db.begin_feed(&self.feed)?;
        match f(&mut tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                tx.rollback_if_open()?;
                Err(err)
            }
        }
    }

    /// Check that a payload-carried feed ID names this editor's feed.
    pub(crate) fn check_entity_feed(
        &self,
        kind: &str,
        id: &dyn std::fmt::Display,
        feed_id: &FeedId,
    ) -> Result<()> {
        if *feed_id == self.feed {
            Ok(())
        } else {
            Err(crate::error::Error::Validation(format!(
                "{kind} {id} belongs to feed {feed_id}, not {}",
                self.feed
            )))
        }
    }

    /// Run a read-only closure in a transaction that is always rolled
    /// back, whether it succeeds or fails.
    pub(crate) fn read_tx<R>(
        &self,
        f: impl FnOnce(&FeedTransaction<RedbTransaction>) -> Result<R>,
    ) -> Result<R> {
        let mut tx = self.db.begin_feed(&self.feed)?;
        let result = f(&tx);
        tx.rollback_if_open()?;
        result
    }
}
