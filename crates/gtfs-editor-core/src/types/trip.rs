//! Trip entities.

use serde::{Deserialize, Serialize};

use super::{FeedId, PatternId, RouteId, StopId, TripId};

/// One stop-time entry on a trip.
///
/// A trip carries exactly one stop time per stop of its pattern, in
/// pattern order. Times are seconds since midnight; `None` means the time
/// has not been entered yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopTime {
    /// The stop this entry references. Tracks the pattern stop at the same
    /// position.
    pub stop_id: StopId,
    /// Arrival time in seconds since midnight.
    pub arrival_secs: Option<u32>,
    /// Departure time in seconds since midnight.
    pub departure_secs: Option<u32>,
    /// Whether the timing was interpolated by the editor rather than
    /// entered by a user. Reconciliation marks inserted entries this way.
    pub interpolated: bool,
}

impl StopTime {
    /// Create a new stop time with no timing information.
    #[must_use]
    pub fn new(stop_id: impl Into<StopId>) -> Self {
        Self { stop_id: stop_id.into(), arrival_secs: None, departure_secs: None, interpolated: false }
    }

    /// Set arrival and departure times.
    #[must_use]
    pub const fn timed(mut self, arrival_secs: u32, departure_secs: u32) -> Self {
        self.arrival_secs = Some(arrival_secs);
        self.departure_secs = Some(departure_secs);
        self
    }
}

/// A trip: one run over a pattern's stop sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    /// Unique identifier for this trip.
    pub id: TripId,
    /// The feed this trip belongs to.
    pub feed_id: FeedId,
    /// The route that owns this trip.
    pub route_id: RouteId,
    /// The pattern this trip instantiates.
    pub pattern_id: PatternId,
    /// Whether this trip was generated for frequency-based service.
    pub use_frequency: bool,
    /// Headway between departures in seconds, for frequency trips.
    pub headway_secs: Option<u32>,
    /// One entry per pattern stop, in pattern order.
    pub stop_times: Vec<StopTime>,
}

impl Trip {
    /// Create a new trip on the given route and pattern.
    #[must_use]
    pub fn new(
        id: impl Into<TripId>,
        feed_id: impl Into<FeedId>,
        route_id: impl Into<RouteId>,
        pattern_id: impl Into<PatternId>,
    ) -> Self {
        Self {
            id: id.into(),
            feed_id: feed_id.into(),
            route_id: route_id.into(),
            pattern_id: pattern_id.into(),
            use_frequency: false,
            headway_secs: None,
            stop_times: Vec::new(),
        }
    }

    /// Append a stop time.
    #[must_use]
    pub fn with_stop_time(mut self, stop_time: StopTime) -> Self {
        self.stop_times.push(stop_time);
        self
    }

    /// Mark this trip as frequency-based.
    #[must_use]
    pub const fn with_frequency(mut self, use_frequency: bool) -> Self {
        self.use_frequency = use_frequency;
        self
    }
}
