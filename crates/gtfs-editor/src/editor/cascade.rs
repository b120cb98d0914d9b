//! Cascading deletes and route merges.
//!
//! Each operation collects the IDs it will touch through the by-route
//! indices first, then mutates, all inside one transaction. A failure at
//! any point rolls the whole edit back.

use gtfs_editor_core::{Route, RouteId, PatternId, Trip, TripPattern};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::transaction::SecondaryIndex;

use super::Editor;

impl Editor<'_> {
    /// Delete a route together with its trips and trip patterns.
    ///
    /// Children are removed before the route: trips first, then patterns,
    /// each with its index entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the route does not exist.
    pub fn delete_route(&self, id: &RouteId) -> Result<()> {
        let (trip_count, pattern_count) = self.with_tx(|tx| {
            if !tx.contains_record::<Route>(id.as_str())? {
                return Err(Error::NotFound { kind: "route", id: id.to_string() });
            }

            let trip_ids = tx.index_children(SecondaryIndex::TRIPS_BY_ROUTE, id.as_str())?;
            for trip_id in &trip_ids {
                tx.remove_record::<Trip>(trip_id)?;
                tx.index_remove(SecondaryIndex::TRIPS_BY_ROUTE, id.as_str(), trip_id)?;
            }

            let pattern_ids =
                tx.index_children(SecondaryIndex::TRIP_PATTERNS_BY_ROUTE, id.as_str())?;
            for pattern_id in &pattern_ids {
                tx.remove_record::<TripPattern>(pattern_id)?;
                tx.index_remove(SecondaryIndex::TRIP_PATTERNS_BY_ROUTE, id.as_str(), pattern_id)?;
            }

            tx.remove_record::<Route>(id.as_str())?;
            Ok((trip_ids.len(), pattern_ids.len()))
        })?;

        info!(
            feed = %self.feed(),
            route = %id,
            trips = trip_count,
            patterns = pattern_count,
            "deleted route with children"
        );
        Ok(())
    }

    /// Delete a trip pattern together with its trips.
    ///
    /// Deleting a pattern that does not exist is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub fn delete_pattern(&self, id: &PatternId) -> Result<()> {
        let deleted = self.with_tx(|tx| {
            let Some(pattern) = tx.get_record::<TripPattern>(id.as_str())? else {
                return Ok(false);
            };

            // The pattern's trips are found by scanning the trip map: a
            // trip's route may differ from the pattern's after the pattern
            // moved to another route, so the by-route index cannot locate
            // them. Each trip unindexes under its own route.
            let trips = tx.trips()?;
            for trip in trips {
                if trip.pattern_id == *id {
                    tx.remove_record::<Trip>(trip.id.as_str())?;
                    tx.index_remove(
                        SecondaryIndex::TRIPS_BY_ROUTE,
                        trip.route_id.as_str(),
                        trip.id.as_str(),
                    )?;
                }
            }

            tx.index_remove(
                SecondaryIndex::TRIP_PATTERNS_BY_ROUTE,
                pattern.route_id.as_str(),
                id.as_str(),
            )?;
            tx.remove_record::<TripPattern>(id.as_str())?;
            Ok(true)
        })?;

        if deleted {
            debug!(feed = %self.feed(), pattern = %id, "deleted trip pattern with trips");
        }
        Ok(())
    }

    /// Merge one route into another.
    ///
    /// Every pattern and trip of `from` is deep-copied, reassigned to
    /// `into`, and stored back under its original ID; the by-route index
    /// entries move with them. The `from` route record is then removed
    /// directly, without cascading, since its children now belong to
    /// `into`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if either route does not exist, and
    /// [`Error::Validation`] if `from` and `into` are the same route.
    pub fn merge_routes(&self, from: &RouteId, into: &RouteId) -> Result<()> {
        if from == into {
            return Err(Error::Validation(format!("cannot merge route {from} into itself")));
        }

        let (trip_count, pattern_count) = self.with_tx(|tx| {
            if !tx.contains_record::<Route>(from.as_str())? {
                return Err(Error::NotFound { kind: "route", id: from.to_string() });
            }
            if !tx.contains_record::<Route>(into.as_str())? {
                return Err(Error::NotFound { kind: "route", id: into.to_string() });
            }

            let pattern_ids =
                tx.index_children(SecondaryIndex::TRIP_PATTERNS_BY_ROUTE, from.as_str())?;
            for pattern_id in &pattern_ids {
                let Some(mut pattern) = tx.get_record::<TripPattern>(pattern_id)? else {
                    continue;
                };
                pattern.route_id = into.clone();
                tx.put_record(&pattern)?;
                tx.index_remove(
                    SecondaryIndex::TRIP_PATTERNS_BY_ROUTE,
                    from.as_str(),
                    pattern_id,
                )?;
                tx.index_insert(
                    SecondaryIndex::TRIP_PATTERNS_BY_ROUTE,
                    into.as_str(),
                    pattern_id,
                )?;
            }

            let trip_ids = tx.index_children(SecondaryIndex::TRIPS_BY_ROUTE, from.as_str())?;
            for trip_id in &trip_ids {
                let Some(mut trip) = tx.get_record::<Trip>(trip_id)? else { continue };
                trip.route_id = into.clone();
                tx.put_record(&trip)?;
                tx.index_remove(SecondaryIndex::TRIPS_BY_ROUTE, from.as_str(), trip_id)?;
                tx.index_insert(SecondaryIndex::TRIPS_BY_ROUTE, into.as_str(), trip_id)?;
            }

            // The children were reassigned above, so no cascade here.
            tx.remove_record::<Route>(from.as_str())?;
            Ok((trip_ids.len(), pattern_ids.len()))
        })?;

        info!(
            feed = %self.feed(),
            from = %from,
            into = %into,
            trips = trip_count,
            patterns = pattern_count,
            "merged routes"
        );
        Ok(())
    }
}
