//! Trip pattern operations.
//!
//! Stop-list and modality edits flow through the reconciler so that
//! existing trips stay aligned with the pattern.

use gtfs_editor_core::{is_valid_id, PatternId, Route, RouteId, TripPattern};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::transaction::SecondaryIndex;

use super::reconcile::{purge_stale_frequency_trips, reconcile_pattern_stops};
use super::Editor;

impl Editor<'_> {
    /// Create a trip pattern.
    ///
    /// The stops' `shape_dist_traveled` values are recomputed before the
    /// pattern is stored, and the by-route index gains an entry in the
    /// same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the pattern ID is invalid or the
    /// pattern names a different feed, [`Error::NotFound`] if its route
    /// does not exist, and [`Error::DuplicateId`] if a pattern with the
    /// same ID exists.
    pub fn create_pattern(&self, mut pattern: TripPattern) -> Result<TripPattern> {
        if !is_valid_id(pattern.id.as_str()) {
            return Err(Error::Validation(format!(
                "invalid trip pattern id: {:?}",
                pattern.id.as_str()
            )));
        }
        self.check_entity_feed("trip pattern", &pattern.id, &pattern.feed_id)?;
        pattern.recalculate_shape_dist_traveled();

        self.with_tx(|tx| {
            if !tx.contains_record::<Route>(pattern.route_id.as_str())? {
                return Err(Error::NotFound {
                    kind: "route",
                    id: pattern.route_id.to_string(),
                });
            }
            if tx.contains_record::<TripPattern>(pattern.id.as_str())? {
                return Err(Error::DuplicateId {
                    kind: "trip pattern",
                    id: pattern.id.to_string(),
                });
            }
            tx.put_record(&pattern)?;
            tx.index_insert(
                SecondaryIndex::TRIP_PATTERNS_BY_ROUTE,
                pattern.route_id.as_str(),
                pattern.id.as_str(),
            )?;
            Ok(())
        })?;

        debug!(feed = %self.feed(), pattern = %pattern.id, route = %pattern.route_id, "created trip pattern");
        Ok(pattern)
    }

    /// Get a trip pattern by ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the pattern does not exist.
    pub fn get_pattern(&self, id: &PatternId) -> Result<TripPattern> {
        self.read_tx(|tx| {
            tx.get_record(id.as_str())?
                .ok_or_else(|| Error::NotFound { kind: "trip pattern", id: id.to_string() })
        })
    }

    /// Collect all patterns in the feed, in pattern ID order.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub fn patterns(&self) -> Result<Vec<TripPattern>> {
        self.read_tx(|tx| Ok(tx.patterns()?))
    }

    /// Collect a route's patterns, in pattern ID order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the route does not exist.
    pub fn patterns_for_route(&self, route_id: &RouteId) -> Result<Vec<TripPattern>> {
        self.read_tx(|tx| {
            if !tx.contains_record::<Route>(route_id.as_str())? {
                return Err(Error::NotFound { kind: "route", id: route_id.to_string() });
            }
            let ids =
                tx.index_children(SecondaryIndex::TRIP_PATTERNS_BY_ROUTE, route_id.as_str())?;
            let mut patterns = Vec::with_capacity(ids.len());
            for id in ids {
                if let Some(pattern) = tx.get_record::<TripPattern>(&id)? {
                    patterns.push(pattern);
                }
            }
            Ok(patterns)
        })
    }

    /// Replace a trip pattern, reconciling its trips with every change.
    ///
    /// The pattern stored under the path ID is replaced wholesale; the ID
    /// and feed carried inside `pattern` are overwritten by the addressed
    /// identity. The update runs as one transaction, in order:
    ///
    /// 1. If the service modality flag changed, trips generated under the
    ///    previous modality are purged.
    /// 2. The stop-list edit is mapped onto the remaining trips. It must
    ///    be a single insertion, removal, or substitution.
    /// 3. The stops' `shape_dist_traveled` values are recomputed against
    ///    the (possibly new) shape.
    /// 4. If the owning route changed, the pattern's index entry moves to
    ///    the new route. Its trips keep their own route assignment.
    ///
    /// Any failure rolls the whole update back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the pattern, or the new owning
    /// route, does not exist; [`Error::UnsupportedEdit`] if the stop-list
    /// edit cannot be mapped onto existing trips; and
    /// [`Error::Validation`] if a trip's stop times disagree with the
    /// stored pattern.
    pub fn update_pattern(&self, id: &PatternId, mut pattern: TripPattern) -> Result<TripPattern> {
        pattern.id = id.clone();
        pattern.feed_id = self.feed().clone();

        let (pattern, purged, patched) = self.with_tx(|tx| {
            let existing: TripPattern = tx
                .get_pattern(id.as_str())?
                .ok_or_else(|| Error::NotFound { kind: "trip pattern", id: id.to_string() })?;

            let purged = purge_stale_frequency_trips(tx, &existing, pattern.use_frequency)?;

            let (_, patched) = reconcile_pattern_stops(tx, &existing, &pattern.stops)?;

            if existing.route_id != pattern.route_id {
                if !tx.contains_record::<Route>(pattern.route_id.as_str())? {
                    return Err(Error::NotFound {
                        kind: "route",
                        id: pattern.route_id.to_string(),
                    });
                }
                tx.unindex_pattern(existing.route_id.as_str(), id.as_str())?;
                tx.index_pattern(pattern.route_id.as_str(), id.as_str())?;
            }

            pattern.recalculate_shape_dist_traveled();
            tx.put_pattern(&pattern)?;
            Ok((pattern, purged, patched))
        })?;

        info!(
            feed = %self.feed(),
            pattern = %id,
            purged_trips = purged,
            patched_trips = patched,
            "updated trip pattern"
        );
        Ok(pattern)
    }
}
