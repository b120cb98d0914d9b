//! Pattern stop reconciliation through the editor.

mod common;

use common::{database, editor, seed_route, FEED};
use gtfs_editor::core::{PatternId, PatternStop, StopTime, Trip, TripId};
use gtfs_editor::Error;

fn stops(ids: &[&str]) -> Vec<PatternStop> {
    ids.iter().map(|id| PatternStop::new(*id)).collect()
}

#[test]
fn insertion_patches_every_trip() {
    let db = database();
    let ed = editor(&db);
    seed_route(&ed, "r1", 2);

    let pattern = ed
        .update_pattern_stops(&PatternId::new("r1-p1"), stops(&["s1", "s2", "sx", "s3"]))
        .expect("failed to update stops");
    assert_eq!(pattern.stops.len(), 4);

    for trip_id in ["r1-t0", "r1-t1"] {
        let trip = ed.get_trip(&TripId::new(trip_id)).expect("failed to get trip");
        assert_eq!(trip.stop_times.len(), 4);
        let inserted = &trip.stop_times[2];
        assert_eq!(inserted.stop_id.as_str(), "sx");
        // Seeded from the preceding entry and flagged as interpolated.
        assert_eq!(inserted.arrival_secs, Some(200));
        assert!(inserted.interpolated);
        assert!(!trip.stop_times[1].interpolated);
    }
}

#[test]
fn removal_drops_the_matching_stop_times() {
    let db = database();
    let ed = editor(&db);
    seed_route(&ed, "r1", 1);

    ed.update_pattern_stops(&PatternId::new("r1-p1"), stops(&["s1", "s3"]))
        .expect("failed to update stops");

    let trip = ed.get_trip(&TripId::new("r1-t0")).expect("failed to get trip");
    assert_eq!(trip.stop_times.len(), 2);
    assert_eq!(trip.stop_times[0].stop_id.as_str(), "s1");
    assert_eq!(trip.stop_times[1].stop_id.as_str(), "s3");
    assert_eq!(trip.stop_times[1].arrival_secs, Some(300));
}

#[test]
fn substitution_keeps_timings_under_the_new_stop() {
    let db = database();
    let ed = editor(&db);
    seed_route(&ed, "r1", 1);

    ed.update_pattern_stops(&PatternId::new("r1-p1"), stops(&["s1", "sx", "s3"]))
        .expect("failed to update stops");

    let trip = ed.get_trip(&TripId::new("r1-t0")).expect("failed to get trip");
    assert_eq!(trip.stop_times[1].stop_id.as_str(), "sx");
    assert_eq!(trip.stop_times[1].arrival_secs, Some(200));
    assert_eq!(trip.stop_times[1].departure_secs, Some(210));
}

#[test]
fn multi_change_edit_is_rejected_and_nothing_changes() {
    let db = database();
    let ed = editor(&db);
    seed_route(&ed, "r1", 1);

    let err = ed
        .update_pattern_stops(&PatternId::new("r1-p1"), stops(&["s1", "sa", "sb"]))
        .expect_err("two substitutions should fail");
    assert!(matches!(err, Error::UnsupportedEdit(_)));

    // Pattern and trips are untouched.
    let pattern = ed.get_pattern(&PatternId::new("r1-p1")).expect("failed to get pattern");
    assert_eq!(pattern.stops[1].stop_id.as_str(), "s2");
    let trip = ed.get_trip(&TripId::new("r1-t0")).expect("failed to get trip");
    assert_eq!(trip.stop_times.len(), 3);
}

#[test]
fn dwell_only_edit_leaves_trips_alone() {
    let db = database();
    let ed = editor(&db);
    seed_route(&ed, "r1", 1);

    let mut new_stops = stops(&["s1", "s2", "s3"]);
    new_stops[1].default_dwell_secs = 45;

    let pattern = ed
        .update_pattern_stops(&PatternId::new("r1-p1"), new_stops)
        .expect("failed to update stops");
    assert_eq!(pattern.stops[1].default_dwell_secs, 45);

    let trip = ed.get_trip(&TripId::new("r1-t0")).expect("failed to get trip");
    assert_eq!(trip.stop_times.len(), 3);
    assert!(trip.stop_times.iter().all(|st| !st.interpolated));
}

#[test]
fn located_stops_get_cumulative_distances() {
    let db = database();
    let ed = editor(&db);
    seed_route(&ed, "r1", 0);

    let new_stops = vec![
        PatternStop::new("s1").at(45.0, -122.0),
        PatternStop::new("s2").at(45.01, -122.0),
        PatternStop::new("s3").at(45.02, -122.0),
    ];
    let pattern = ed
        .update_pattern_stops(&PatternId::new("r1-p1"), new_stops)
        .expect("failed to update stops");

    assert_eq!(pattern.stops[0].shape_dist_traveled, 0.0);
    assert!(pattern.stops[1].shape_dist_traveled > 0.0);
    assert!(pattern.stops[2].shape_dist_traveled > pattern.stops[1].shape_dist_traveled);
}

#[test]
fn modality_flip_purges_stale_trips() {
    let db = database();
    let ed = editor(&db);
    seed_route(&ed, "r1", 2);

    let pattern = ed
        .set_pattern_use_frequency(&PatternId::new("r1-p1"), true)
        .expect("failed to flip modality");
    assert!(pattern.use_frequency);

    // Both timetabled trips carried the old modality and are gone.
    assert!(ed.get_trip(&TripId::new("r1-t0")).expect_err("gone").is_not_found());
    assert!(ed.get_trip(&TripId::new("r1-t1")).expect_err("gone").is_not_found());

    // A frequency trip can now be created on the pattern.
    ed.create_trip(
        Trip::new("r1-f0", FEED, "r1", "r1-p1")
            .with_frequency(true)
            .with_stop_time(StopTime::new("s1"))
            .with_stop_time(StopTime::new("s2"))
            .with_stop_time(StopTime::new("s3")),
    )
    .expect("failed to create frequency trip");
}

#[test]
fn combined_update_purges_before_reconciling() {
    let db = database();
    let ed = editor(&db);
    seed_route(&ed, "r1", 2);

    // One update flips the modality and inserts a stop. The timetabled
    // trips are purged first, so the stop edit has nothing left to patch
    // and cannot fail on them.
    let mut payload = ed.get_pattern(&PatternId::new("r1-p1")).expect("failed to get pattern");
    payload.use_frequency = true;
    payload.stops = stops(&["s1", "s2", "sx", "s3"]);
    let pattern =
        ed.update_pattern(&PatternId::new("r1-p1"), payload).expect("failed to update pattern");

    assert!(pattern.use_frequency);
    assert_eq!(pattern.stops.len(), 4);
    assert!(ed.get_trip(&TripId::new("r1-t0")).expect_err("gone").is_not_found());
    assert!(ed.trips_for_pattern(&PatternId::new("r1-p1")).expect("failed to list").is_empty());
}

#[test]
fn trip_with_wrong_stop_count_fails_the_edit() {
    let db = database();
    let ed = editor(&db);
    seed_route(&ed, "r1", 1);

    // Store a trip whose stop times disagree with the pattern, bypassing
    // the editor's create-time validation.
    let mut tx = db.begin_feed(&gtfs_editor::core::FeedId::new(FEED)).expect("failed to begin");
    let corrupt = Trip::new("r1-bad", FEED, "r1", "r1-p1").with_stop_time(StopTime::new("s1"));
    tx.put_trip(&corrupt).expect("failed to put");
    tx.index_trip("r1", "r1-bad").expect("failed to index");
    tx.commit().expect("failed to commit");

    let err = ed
        .update_pattern_stops(&PatternId::new("r1-p1"), stops(&["s1", "s3"]))
        .expect_err("corrupt trip should fail the edit");
    assert!(err.is_validation());

    // Nothing was patched, not even the well-formed trip.
    let trip = ed.get_trip(&TripId::new("r1-t0")).expect("failed to get trip");
    assert_eq!(trip.stop_times.len(), 3);
}

#[test]
fn reconcile_and_purge_follow_trips_across_a_route_move() {
    let db = database();
    let ed = editor(&db);
    seed_route(&ed, "r1", 2);
    seed_route(&ed, "r2", 0);

    // Move the pattern to r2; its trips stay on r1.
    let pattern_id = PatternId::new("r1-p1");
    let mut payload = ed.get_pattern(&pattern_id).expect("failed to get pattern");
    payload.route_id = gtfs_editor::core::RouteId::new("r2");
    ed.update_pattern(&pattern_id, payload).expect("failed to update pattern");

    // A stop edit still reaches the moved pattern's trips.
    ed.update_pattern_stops(&pattern_id, stops(&["s1", "s2", "sx", "s3"]))
        .expect("failed to update stops");
    for trip_id in ["r1-t0", "r1-t1"] {
        let trip = ed.get_trip(&TripId::new(trip_id)).expect("failed to get trip");
        assert_eq!(trip.stop_times.len(), 4);
    }

    // So does a modality flip.
    ed.set_pattern_use_frequency(&pattern_id, true).expect("failed to flip modality");
    assert!(ed.get_trip(&TripId::new("r1-t0")).expect_err("gone").is_not_found());
    assert!(ed.get_trip(&TripId::new("r1-t1")).expect_err("gone").is_not_found());
    assert!(ed.trips_for_pattern(&pattern_id).expect("failed to list").is_empty());
}

#[test]
fn modality_noop_keeps_trips() {
    let db = database();
    let ed = editor(&db);
    seed_route(&ed, "r1", 2);

    ed.set_pattern_use_frequency(&PatternId::new("r1-p1"), false)
        .expect("failed to set modality");

    assert_eq!(
        ed.trips_for_pattern(&PatternId::new("r1-p1")).expect("failed to list").len(),
        2
    );
}
