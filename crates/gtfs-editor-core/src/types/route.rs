//! Route entities.

use serde::{Deserialize, Serialize};

use super::{FeedId, RouteId};

/// A transit route within a feed.
///
/// Routes own trip patterns and trips. The ownership is recorded on the
/// children (`TripPattern::route_id`, `Trip::route_id`) and mirrored in the
/// by-route secondary indices maintained by the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Unique identifier for this route.
    pub id: RouteId,
    /// The feed this route belongs to.
    pub feed_id: FeedId,
    /// The route ID exported to GTFS. Derived as `"ROUTE_" + id` when
    /// absent.
    pub gtfs_route_id: Option<String>,
    /// Short display name (e.g. "7" or "N").
    pub short_name: Option<String>,
    /// Long display name.
    pub long_name: Option<String>,
    /// GTFS route type code (3 = bus, 1 = subway, ...).
    pub route_type: u16,
    /// Display color as a hex string, without the leading `#`.
    pub color: Option<String>,
    /// URL of uploaded branding assets, if any.
    pub branding_url: Option<String>,
}

impl Route {
    /// Create a new route in the given feed.
    #[must_use]
    pub fn new(id: impl Into<RouteId>, feed_id: impl Into<FeedId>) -> Self {
        Self {
            id: id.into(),
            feed_id: feed_id.into(),
            gtfs_route_id: None,
            short_name: None,
            long_name: None,
            route_type: 3,
            color: None,
            branding_url: None,
        }
    }

    /// Set the short name.
    #[must_use]
    pub fn with_short_name(mut self, name: impl Into<String>) -> Self {
        self.short_name = Some(name.into());
        self
    }

    /// Set the long name.
    #[must_use]
    pub fn with_long_name(mut self, name: impl Into<String>) -> Self {
        self.long_name = Some(name.into());
        self
    }

    /// Set the GTFS route type code.
    #[must_use]
    pub const fn with_route_type(mut self, route_type: u16) -> Self {
        self.route_type = route_type;
        self
    }

    /// Fill in the derived GTFS route ID if it has not been set explicitly.
    pub fn ensure_gtfs_route_id(&mut self) {
        if self.gtfs_route_id.is_none() {
            self.gtfs_route_id = Some(format!("ROUTE_{}", self.id));
        }
    }
}
