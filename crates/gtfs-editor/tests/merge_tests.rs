//! Route merge behavior.

mod common;

use common::{database, editor, seed_route};
use gtfs_editor::core::{PatternId, RouteId, TripId};
use gtfs_editor::Error;

#[test]
fn merge_moves_children_and_keeps_their_ids() {
    let db = database();
    let ed = editor(&db);
    seed_route(&ed, "old", 2);
    seed_route(&ed, "new", 1);

    ed.merge_routes(&RouteId::new("old"), &RouteId::new("new"))
        .expect("failed to merge routes");

    // Children keep their original IDs but now belong to the target.
    let pattern = ed.get_pattern(&PatternId::new("old-p1")).expect("pattern should survive");
    assert_eq!(pattern.route_id.as_str(), "new");

    let trip = ed.get_trip(&TripId::new("old-t0")).expect("trip should survive");
    assert_eq!(trip.route_id.as_str(), "new");

    // Index entries moved: the target's listings cover both routes' children.
    let trips = ed.trips_for_route(&RouteId::new("new")).expect("failed to list");
    let mut ids: Vec<&str> = trips.iter().map(|t| t.id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["new-t0", "old-t0", "old-t1"]);

    let patterns = ed.patterns_for_route(&RouteId::new("new")).expect("failed to list");
    assert_eq!(patterns.len(), 2);
}

#[test]
fn merge_removes_source_without_cascade() {
    let db = database();
    let ed = editor(&db);
    seed_route(&ed, "old", 1);
    seed_route(&ed, "new", 0);

    ed.merge_routes(&RouteId::new("old"), &RouteId::new("new"))
        .expect("failed to merge routes");

    assert!(ed.get_route(&RouteId::new("old")).expect_err("gone").is_not_found());
    // The source's former children were reassigned, not deleted.
    assert!(ed.get_trip(&TripId::new("old-t0")).is_ok());
    assert!(ed.get_pattern(&PatternId::new("old-p1")).is_ok());
}

#[test]
fn merge_requires_both_routes() {
    let db = database();
    let ed = editor(&db);
    seed_route(&ed, "r1", 1);

    let err = ed
        .merge_routes(&RouteId::new("ghost"), &RouteId::new("r1"))
        .expect_err("missing source should fail");
    assert!(err.is_not_found());

    let err = ed
        .merge_routes(&RouteId::new("r1"), &RouteId::new("ghost"))
        .expect_err("missing target should fail");
    assert!(err.is_not_found());

    // The failed merges changed nothing.
    assert_eq!(ed.trips_for_route(&RouteId::new("r1")).expect("failed to list").len(), 1);
}

#[test]
fn merge_into_itself_is_rejected() {
    let db = database();
    let ed = editor(&db);
    seed_route(&ed, "r1", 1);

    let err = ed
        .merge_routes(&RouteId::new("r1"), &RouteId::new("r1"))
        .expect_err("self merge should fail");
    assert!(matches!(err, Error::Validation(_)));
}
