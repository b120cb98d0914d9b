//! Cascade delete behavior.

mod common;

use common::{database, editor, seed_route};
use gtfs_editor::core::{PatternId, RouteId, TripId};

#[test]
fn delete_route_removes_trips_patterns_and_index_entries() {
    let db = database();
    let ed = editor(&db);
    seed_route(&ed, "r1", 3);
    seed_route(&ed, "r2", 2);

    ed.delete_route(&RouteId::new("r1")).expect("failed to delete route");

    let err = ed.get_route(&RouteId::new("r1")).expect_err("route should be gone");
    assert!(err.is_not_found());
    assert!(ed.get_pattern(&PatternId::new("r1-p1")).expect_err("gone").is_not_found());
    assert!(ed.get_trip(&TripId::new("r1-t0")).expect_err("gone").is_not_found());

    // The other route is untouched.
    assert_eq!(ed.trips_for_route(&RouteId::new("r2")).expect("failed to list").len(), 2);
    assert_eq!(ed.patterns_for_route(&RouteId::new("r2")).expect("failed to list").len(), 1);
}

#[test]
fn delete_route_not_found_when_missing() {
    let db = database();
    let ed = editor(&db);

    let err = ed.delete_route(&RouteId::new("ghost")).expect_err("should fail");
    assert!(err.is_not_found());
}

#[test]
fn failed_delete_leaves_no_partial_edits() {
    let db = database();
    let ed = editor(&db);
    seed_route(&ed, "r1", 2);

    ed.delete_route(&RouteId::new("ghost")).expect_err("should fail");

    // Everything from the failed operation's transaction is still there.
    assert_eq!(ed.trips_for_route(&RouteId::new("r1")).expect("failed to list").len(), 2);
}

#[test]
fn delete_pattern_removes_only_its_trips() {
    let db = database();
    let ed = editor(&db);
    seed_route(&ed, "r1", 2);

    // Second pattern on the same route with its own trip.
    ed.create_pattern(
        gtfs_editor::core::TripPattern::new("r1-p2", common::FEED, "r1")
            .with_stop(gtfs_editor::core::PatternStop::new("s9")),
    )
    .expect("failed to create pattern");
    ed.create_trip(
        gtfs_editor::core::Trip::new("r1-x0", common::FEED, "r1", "r1-p2")
            .with_stop_time(gtfs_editor::core::StopTime::new("s9")),
    )
    .expect("failed to create trip");

    ed.delete_pattern(&PatternId::new("r1-p1")).expect("failed to delete pattern");

    assert!(ed.get_pattern(&PatternId::new("r1-p1")).expect_err("gone").is_not_found());
    assert!(ed.get_trip(&TripId::new("r1-t0")).expect_err("gone").is_not_found());
    assert!(ed.get_trip(&TripId::new("r1-t1")).expect_err("gone").is_not_found());

    // The other pattern and its trip survive.
    let trips = ed.trips_for_route(&RouteId::new("r1")).expect("failed to list");
    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0].id.as_str(), "r1-x0");
}

#[test]
fn delete_pattern_finds_trips_after_a_route_move() {
    let db = database();
    let ed = editor(&db);
    seed_route(&ed, "r1", 1);
    seed_route(&ed, "r2", 0);

    // Move the pattern to r2; its trip stays on r1.
    let pattern_id = PatternId::new("r1-p1");
    let mut payload = ed.get_pattern(&pattern_id).expect("failed to get pattern");
    payload.route_id = RouteId::new("r2");
    ed.update_pattern(&pattern_id, payload).expect("failed to update pattern");

    let trips = ed.trips_for_pattern(&pattern_id).expect("failed to list");
    assert_eq!(trips.len(), 1);

    ed.delete_pattern(&pattern_id).expect("failed to delete pattern");

    // The trip went with its pattern, index entry included.
    assert!(ed.get_trip(&TripId::new("r1-t0")).expect_err("gone").is_not_found());
    assert!(ed.trips_for_route(&RouteId::new("r1")).expect("failed to list").is_empty());
}

#[test]
fn delete_pattern_is_idempotent() {
    let db = database();
    let ed = editor(&db);
    seed_route(&ed, "r1", 1);

    ed.delete_pattern(&PatternId::new("nope")).expect("missing pattern is a no-op");
    ed.delete_pattern(&PatternId::new("r1-p1")).expect("failed to delete pattern");
    ed.delete_pattern(&PatternId::new("r1-p1")).expect("second delete is a no-op");
}

#[test]
fn delete_trip_not_found_when_missing() {
    let db = database();
    let ed = editor(&db);
    seed_route(&ed, "r1", 1);

    let err = ed.delete_trip(&TripId::new("ghost")).expect_err("should fail");
    assert!(err.is_not_found());

    ed.delete_trip(&TripId::new("r1-t0")).expect("failed to delete trip");
    assert_eq!(ed.trips_for_route(&RouteId::new("r1")).expect("failed to list").len(), 0);
}
