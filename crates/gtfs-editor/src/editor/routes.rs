//! Route operations.

use gtfs_editor_core::{is_valid_id, Route, RouteId};
use tracing::debug;

use crate::error::{Error, Result};

use super::Editor;

impl Editor<'_> {
    /// Create a route.
    ///
    /// Fills in the derived GTFS route ID when the caller did not set one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the route ID is invalid or the
    /// route names a different feed, and [`Error::DuplicateId`] if a route
    /// with the same ID exists.
    pub fn create_route(&self, mut route: Route) -> Result<Route> {
        if !is_valid_id(route.id.as_str()) {
            return Err(Error::Validation(format!("invalid route id: {:?}", route.id.as_str())));
        }
        self.check_entity_feed("route", &route.id, &route.feed_id)?;
        route.ensure_gtfs_route_id();

        self.with_tx(|tx| {
            if tx.contains_record::<Route>(route.id.as_str())? {
                return Err(Error::DuplicateId { kind: "route", id: route.id.to_string() });
            }
            tx.put_record(&route)?;
            Ok(())
        })?;

        debug!(feed = %self.feed(), route = %route.id, "created route");
        Ok(route)
    }

    /// Get a route by ID.
    ///
    /// The derived GTFS route ID is filled in on the returned value if the
    /// stored record predates it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the route does not exist.
    pub fn get_route(&self, id: &RouteId) -> Result<Route> {
        let mut route: Route = self.read_tx(|tx| {
            tx.get_record(id.as_str())?
                .ok_or_else(|| Error::NotFound { kind: "route", id: id.to_string() })
        })?;
        route.ensure_gtfs_route_id();
        Ok(route)
    }

    /// Collect all routes of this feed, in ID order.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub fn routes(&self) -> Result<Vec<Route>> {
        let mut routes: Vec<Route> = self.read_tx(|tx| Ok(tx.records()?))?;
        for route in &mut routes {
            route.ensure_gtfs_route_id();
        }
        Ok(routes)
    }

    /// Replace a route's record.
    ///
    /// The `id` argument names the route being updated and wins over
    /// whatever ID the payload carries; the stored record always keeps the
    /// addressed identity. The feed is likewise forced to this editor's
    /// feed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the route does not exist.
    pub fn update_route(&self, id: &RouteId, mut route: Route) -> Result<Route> {
        route.id = id.clone();
        route.feed_id = self.feed().clone();
        route.ensure_gtfs_route_id();

        self.with_tx(|tx| {
            if !tx.contains_record::<Route>(id.as_str())? {
                return Err(Error::NotFound { kind: "route", id: id.to_string() });
            }
            tx.put_record(&route)?;
            Ok(())
        })?;

        Ok(route)
    }
}
