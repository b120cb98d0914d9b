//! Trip operations.

use gtfs_editor_core::{is_valid_id, PatternId, Route, RouteId, Trip, TripId, TripPattern};
use tracing::debug;

use crate::error::{Error, Result};
use crate::transaction::SecondaryIndex;

use super::Editor;

impl Editor<'_> {
    /// Create a trip.
    ///
    /// The trip must instantiate an existing pattern of its route, match
    /// the pattern's service modality, and carry one stop time per pattern
    /// stop. The by-route index gains an entry in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the trip is inconsistent with its
    /// pattern, [`Error::NotFound`] if the pattern does not exist, and
    /// [`Error::DuplicateId`] if a trip with the same ID exists.
    pub fn create_trip(&self, trip: Trip) -> Result<Trip> {
        if !is_valid_id(trip.id.as_str()) {
            return Err(Error::Validation(format!("invalid trip id: {:?}", trip.id.as_str())));
        }
        self.check_entity_feed("trip", &trip.id, &trip.feed_id)?;

        self.with_tx(|tx| {
            let pattern: TripPattern =
                tx.get_record(trip.pattern_id.as_str())?.ok_or_else(|| Error::NotFound {
                    kind: "trip pattern",
                    id: trip.pattern_id.to_string(),
                })?;

            if pattern.route_id != trip.route_id {
                return Err(Error::Validation(format!(
                    "trip {} names route {}, but pattern {} belongs to route {}",
                    trip.id, trip.route_id, pattern.id, pattern.route_id
                )));
            }
            if pattern.use_frequency != trip.use_frequency {
                return Err(Error::Validation(format!(
                    "trip {} does not match the service modality of pattern {}",
                    trip.id, pattern.id
                )));
            }
            if trip.stop_times.len() != pattern.stops.len() {
                return Err(Error::Validation(format!(
                    "trip {} has {} stop times for a pattern with {} stops",
                    trip.id,
                    trip.stop_times.len(),
                    pattern.stops.len()
                )));
            }
            if tx.contains_record::<Trip>(trip.id.as_str())? {
                return Err(Error::DuplicateId { kind: "trip", id: trip.id.to_string() });
            }

            tx.put_record(&trip)?;
            tx.index_insert(
                SecondaryIndex::TRIPS_BY_ROUTE,
                trip.route_id.as_str(),
                trip.id.as_str(),
            )?;
            Ok(())
        })?;

        debug!(feed = %self.feed(), trip = %trip.id, route = %trip.route_id, "created trip");
        Ok(trip)
    }

    /// Get a trip by ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the trip does not exist.
    pub fn get_trip(&self, id: &TripId) -> Result<Trip> {
        self.read_tx(|tx| {
            tx.get_record(id.as_str())?
                .ok_or_else(|| Error::NotFound { kind: "trip", id: id.to_string() })
        })
    }

    /// Collect a route's trips, in trip ID order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the route does not exist.
    pub fn trips_for_route(&self, route_id: &RouteId) -> Result<Vec<Trip>> {
        self.read_tx(|tx| {
            if !tx.contains_record::<Route>(route_id.as_str())? {
                return Err(Error::NotFound { kind: "route", id: route_id.to_string() });
            }
            let ids = tx.index_children(SecondaryIndex::TRIPS_BY_ROUTE, route_id.as_str())?;
            let mut trips = Vec::with_capacity(ids.len());
            for id in ids {
                if let Some(trip) = tx.get_record::<Trip>(&id)? {
                    trips.push(trip);
                }
            }
            Ok(trips)
        })
    }

    /// Collect a pattern's trips, in trip ID order.
    ///
    /// There is no by-pattern index; the trip map is scanned and filtered.
    /// A trip's route may differ from the pattern's after the pattern
    /// moved to another route, so the by-route index is no shortcut here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the pattern does not exist.
    pub fn trips_for_pattern(&self, pattern_id: &PatternId) -> Result<Vec<Trip>> {
        self.read_tx(|tx| {
            if !tx.contains_record::<TripPattern>(pattern_id.as_str())? {
                return Err(Error::NotFound {
                    kind: "trip pattern",
                    id: pattern_id.to_string(),
                });
            }

            let mut trips = tx.trips()?;
            trips.retain(|trip| trip.pattern_id == *pattern_id);
            Ok(trips)
        })
    }

    /// Replace a trip.
    ///
    /// The trip stored under the path ID is replaced wholesale; the ID and
    /// feed carried inside `trip` are overwritten by the addressed
    /// identity. The replacement is validated against its pattern the same
    /// way a new trip is. If the route changed, the by-route index entry
    /// moves in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the trip or its pattern does not
    /// exist and [`Error::Validation`] if the trip is inconsistent with
    /// its pattern.
    pub fn update_trip(&self, id: &TripId, mut trip: Trip) -> Result<Trip> {
        trip.id = id.clone();
        trip.feed_id = self.feed().clone();

        self.with_tx(|tx| {
            let existing: Trip = tx
                .get_record(id.as_str())?
                .ok_or_else(|| Error::NotFound { kind: "trip", id: id.to_string() })?;

            let pattern: TripPattern =
                tx.get_record(trip.pattern_id.as_str())?.ok_or_else(|| Error::NotFound {
                    kind: "trip pattern",
                    id: trip.pattern_id.to_string(),
                })?;

            if pattern.route_id != trip.route_id {
                return Err(Error::Validation(format!(
                    "trip {} names route {}, but pattern {} belongs to route {}",
                    trip.id, trip.route_id, pattern.id, pattern.route_id
                )));
            }
            if pattern.use_frequency != trip.use_frequency {
                return Err(Error::Validation(format!(
                    "trip {} does not match the service modality of pattern {}",
                    trip.id, pattern.id
                )));
            }
            if trip.stop_times.len() != pattern.stops.len() {
                return Err(Error::Validation(format!(
                    "trip {} has {} stop times for a pattern with {} stops",
                    trip.id,
                    trip.stop_times.len(),
                    pattern.stops.len()
                )));
            }

            if existing.route_id != trip.route_id {
                tx.unindex_trip(existing.route_id.as_str(), id.as_str())?;
                tx.index_trip(trip.route_id.as_str(), id.as_str())?;
            }
            tx.put_record(&trip)?;
            Ok(())
        })?;

        debug!(feed = %self.feed(), trip = %id, "updated trip");
        Ok(trip)
    }

    /// Delete a trip.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the trip does not exist.
    pub fn delete_trip(&self, id: &TripId) -> Result<()> {
        self.with_tx(|tx| {
            let trip: Trip = tx
                .get_record(id.as_str())?
                .ok_or_else(|| Error::NotFound { kind: "trip", id: id.to_string() })?;

            tx.remove_record::<Trip>(id.as_str())?;
            tx.index_remove(SecondaryIndex::TRIPS_BY_ROUTE, trip.route_id.as_str(), id.as_str())?;
            Ok(())
        })?;

        debug!(feed = %self.feed(), trip = %id, "deleted trip");
        Ok(())
    }
}
