//! Trip pattern entities.
//!
//! A trip pattern is the stop-sequence template that trips instantiate.
//! Every trip referencing a pattern keeps a stop-time entry per pattern
//! stop, in the same order; the editor's reconciler preserves that
//! correspondence when the stop list is edited.

use geo::{HaversineDistance, Point};
use serde::{Deserialize, Serialize};

use super::{FeedId, PatternId, RouteId, StopId};

/// A point on a pattern's shape polyline, in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapePoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl ShapePoint {
    /// Create a new shape point.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    fn as_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

/// One stop in a pattern's ordered stop sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternStop {
    /// The stop this entry references.
    pub stop_id: StopId,
    /// Stop location as `(lat, lon)` degrees, when known.
    pub location: Option<(f64, f64)>,
    /// Default dwell time at this stop, in seconds.
    pub default_dwell_secs: u32,
    /// Cumulative distance traveled along the pattern up to this stop, in
    /// meters. Derived; recomputed by
    /// [`TripPattern::recalculate_shape_dist_traveled`].
    pub shape_dist_traveled: f64,
}

impl PatternStop {
    /// Create a new pattern stop with no location.
    #[must_use]
    pub fn new(stop_id: impl Into<StopId>) -> Self {
        Self {
            stop_id: stop_id.into(),
            location: None,
            default_dwell_secs: 0,
            shape_dist_traveled: 0.0,
        }
    }

    /// Set the stop location.
    #[must_use]
    pub fn at(mut self, lat: f64, lon: f64) -> Self {
        self.location = Some((lat, lon));
        self
    }
}

/// A trip pattern: an ordered stop sequence owned by a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPattern {
    /// Unique identifier for this pattern (feed-wide, not per route).
    pub id: PatternId,
    /// The feed this pattern belongs to.
    pub feed_id: FeedId,
    /// The route that owns this pattern.
    pub route_id: RouteId,
    /// Optional display name.
    pub name: Option<String>,
    /// Whether trips on this pattern are frequency-based rather than
    /// timetabled.
    pub use_frequency: bool,
    /// The ordered stop sequence.
    pub stops: Vec<PatternStop>,
    /// Shape polyline for this pattern, possibly empty.
    pub shape: Vec<ShapePoint>,
}

impl TripPattern {
    /// Create a new pattern on the given route.
    #[must_use]
    pub fn new(
        id: impl Into<PatternId>,
        feed_id: impl Into<FeedId>,
        route_id: impl Into<RouteId>,
    ) -> Self {
        Self {
            id: id.into(),
            feed_id: feed_id.into(),
            route_id: route_id.into(),
            name: None,
            use_frequency: false,
            stops: Vec::new(),
            shape: Vec::new(),
        }
    }

    /// Append a stop to the sequence.
    #[must_use]
    pub fn with_stop(mut self, stop: PatternStop) -> Self {
        self.stops.push(stop);
        self
    }

    /// Mark this pattern as frequency-based.
    #[must_use]
    pub const fn with_frequency(mut self, use_frequency: bool) -> Self {
        self.use_frequency = use_frequency;
        self
    }

    /// Recompute the derived cumulative `shape_dist_traveled` of every stop.
    ///
    /// With a shape of two or more points, each located stop is resolved to
    /// its nearest shape vertex at or after the previous stop's vertex (the
    /// projection is monotone along the shape), and takes the cumulative
    /// haversine length of the polyline up to that vertex. Without a usable
    /// shape, cumulative straight-line distances between consecutive
    /// located stops are used. Stops without a location carry the previous
    /// cumulative value forward.
    ///
    /// The computation is idempotent: it reads only stop locations and the
    /// shape, never the previous distances.
    pub fn recalculate_shape_dist_traveled(&mut self) {
        if self.shape.len() >= 2 {
            self.project_onto_shape();
        } else {
            self.straight_line_distances();
        }
    }

    fn project_onto_shape(&mut self) {
        // Cumulative length of the shape up to each vertex.
        let mut cumulative = Vec::with_capacity(self.shape.len());
        let mut total = 0.0;
        cumulative.push(0.0);
        for pair in self.shape.windows(2) {
            total += pair[0].as_point().haversine_distance(&pair[1].as_point());
            cumulative.push(total);
        }

        let mut min_vertex = 0;
        let mut previous = 0.0;
        for stop in &mut self.stops {
            let Some((lat, lon)) = stop.location else {
                stop.shape_dist_traveled = previous;
                continue;
            };
            let here = Point::new(lon, lat);
            let mut best = min_vertex;
            let mut best_dist = f64::INFINITY;
            for (i, vertex) in self.shape.iter().enumerate().skip(min_vertex) {
                let d = here.haversine_distance(&vertex.as_point());
                if d < best_dist {
                    best_dist = d;
                    best = i;
                }
            }
            min_vertex = best;
            stop.shape_dist_traveled = cumulative[best];
            previous = cumulative[best];
        }
    }

    fn straight_line_distances(&mut self) {
        let mut total = 0.0;
        let mut last_located: Option<Point<f64>> = None;
        for stop in &mut self.stops {
            if let Some((lat, lon)) = stop.location {
                let here = Point::new(lon, lat);
                if let Some(prev) = last_located {
                    total += prev.haversine_distance(&here);
                }
                last_located = Some(here);
            }
            stop.shape_dist_traveled = total;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop_at(id: &str, lat: f64, lon: f64) -> PatternStop {
        PatternStop::new(id).at(lat, lon)
    }

    #[test]
    fn straight_line_distances_are_cumulative() {
        let mut pattern = TripPattern::new("p1", "feed1", "r1")
            .with_stop(stop_at("a", 45.0, -122.0))
            .with_stop(stop_at("b", 45.01, -122.0))
            .with_stop(stop_at("c", 45.02, -122.0));
        pattern.recalculate_shape_dist_traveled();

        let dists: Vec<f64> = pattern.stops.iter().map(|s| s.shape_dist_traveled).collect();
        assert_eq!(dists[0], 0.0);
        assert!(dists[1] > 1000.0 && dists[1] < 1300.0, "one hundredth of a degree of latitude");
        assert!((dists[2] - 2.0 * dists[1]).abs() < 1.0);
    }

    #[test]
    fn recalculation_is_idempotent() {
        let mut pattern = TripPattern::new("p1", "feed1", "r1")
            .with_stop(stop_at("a", 45.0, -122.0))
            .with_stop(stop_at("b", 45.01, -122.01));
        pattern.recalculate_shape_dist_traveled();
        let first: Vec<f64> = pattern.stops.iter().map(|s| s.shape_dist_traveled).collect();
        pattern.recalculate_shape_dist_traveled();
        let second: Vec<f64> = pattern.stops.iter().map(|s| s.shape_dist_traveled).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn unlocated_stop_carries_previous_distance() {
        let mut pattern = TripPattern::new("p1", "feed1", "r1")
            .with_stop(stop_at("a", 45.0, -122.0))
            .with_stop(PatternStop::new("b"))
            .with_stop(stop_at("c", 45.02, -122.0));
        pattern.recalculate_shape_dist_traveled();

        assert_eq!(pattern.stops[0].shape_dist_traveled, 0.0);
        assert_eq!(pattern.stops[1].shape_dist_traveled, 0.0);
        assert!(pattern.stops[2].shape_dist_traveled > 2000.0);
    }

    #[test]
    fn shape_projection_is_monotone() {
        let mut pattern = TripPattern::new("p1", "feed1", "r1")
            .with_stop(stop_at("a", 45.0, -122.0))
            .with_stop(stop_at("b", 45.01, -122.0))
            .with_stop(stop_at("c", 45.02, -122.0));
        pattern.shape = vec![
            ShapePoint::new(45.0, -122.0),
            ShapePoint::new(45.005, -122.0),
            ShapePoint::new(45.01, -122.0),
            ShapePoint::new(45.015, -122.0),
            ShapePoint::new(45.02, -122.0),
        ];
        pattern.recalculate_shape_dist_traveled();

        let dists: Vec<f64> = pattern.stops.iter().map(|s| s.shape_dist_traveled).collect();
        assert_eq!(dists[0], 0.0);
        assert!(dists[0] < dists[1]);
        assert!(dists[1] < dists[2]);
    }
}
