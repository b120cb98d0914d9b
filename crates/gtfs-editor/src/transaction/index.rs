//! Secondary index descriptors.

use super::tables;

/// A hand-maintained secondary index mapping parent IDs to child IDs.
///
/// Entries are keyed `feed ++ 0x00 ++ parent ++ 0x00 ++ child` with empty
/// values; membership is the only information stored. Index entries are
/// written by editor operations alongside the records they mirror, inside
/// the same transaction. The record maps themselves never touch indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondaryIndex {
    /// The table holding this index's entries.
    pub table: &'static str,
}

impl SecondaryIndex {
    /// Trips of a route: `(route_id, trip_id)`.
    pub const TRIPS_BY_ROUTE: Self = Self { table: tables::TRIPS_BY_ROUTE };

    /// Trip patterns of a route: `(route_id, pattern_id)`.
    pub const TRIP_PATTERNS_BY_ROUTE: Self = Self { table: tables::TRIP_PATTERNS_BY_ROUTE };
}
