//! Transaction layer.
//!
//! Editor transactions come in two scopes. A [`FeedTransaction`] is bound
//! to one feed and sees only that feed's records and index entries. A
//! [`GlobalTransaction`] covers the feed registry itself.
//!
//! Dropping either handle without committing rolls the transaction back.

mod feed;
mod global;
mod index;
mod manager;

pub use feed::{FeedRecord, FeedTransaction};
pub use global::GlobalTransaction;
pub use index::SecondaryIndex;
pub use manager::TransactionManager;

/// Well-known table names.
pub(crate) mod tables {
    /// Feed registry, keyed by feed ID.
    pub const FEEDS: &str = "feeds";
    /// Route records, keyed by `feed ++ 0x00 ++ route_id`.
    pub const ROUTES: &str = "routes";
    /// Trip pattern records.
    pub const TRIP_PATTERNS: &str = "trip_patterns";
    /// Trip records.
    pub const TRIPS: &str = "trips";
    /// Index `(route_id, trip_id) -> ()`.
    pub const TRIPS_BY_ROUTE: &str = "trips_by_route";
    /// Index `(route_id, pattern_id) -> ()`.
    pub const TRIP_PATTERNS_BY_ROUTE: &str = "trip_patterns_by_route";
}
