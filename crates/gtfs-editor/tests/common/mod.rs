//! Shared test fixtures.
#![allow(dead_code)]

use gtfs_editor::core::{
    Feed, PatternStop, Route, StopTime, Trip, TripPattern,
};
use gtfs_editor::{Database, Editor, FeedScope};

pub const FEED: &str = "testfeed";

/// In-memory database with one registered feed.
pub fn database() -> Database {
    let db = Database::in_memory().expect("failed to create database");
    db.create_feed(Feed::new(FEED)).expect("failed to create feed");
    db
}

pub fn editor(db: &Database) -> Editor<'_> {
    db.editor(FeedScope::session(FEED)).expect("failed to open editor")
}

/// A route with one three-stop pattern and `trip_count` timetabled trips.
pub fn seed_route(editor: &Editor<'_>, route_id: &str, trip_count: usize) {
    editor
        .create_route(Route::new(route_id, FEED).with_short_name(route_id.to_uppercase()))
        .expect("failed to create route");

    let pattern_id = format!("{route_id}-p1");
    editor
        .create_pattern(
            TripPattern::new(pattern_id.as_str(), FEED, route_id)
                .with_stop(PatternStop::new("s1"))
                .with_stop(PatternStop::new("s2"))
                .with_stop(PatternStop::new("s3")),
        )
        .expect("failed to create pattern");

    for n in 0..trip_count {
        let trip_id = format!("{route_id}-t{n}");
        editor
            .create_trip(
                Trip::new(trip_id.as_str(), FEED, route_id, pattern_id.as_str())
                    .with_stop_time(StopTime::new("s1").timed(100, 110))
                    .with_stop_time(StopTime::new("s2").timed(200, 210))
                    .with_stop_time(StopTime::new("s3").timed(300, 310)),
            )
            .expect("failed to create trip");
    }
}
