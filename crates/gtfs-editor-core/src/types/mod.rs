//! Core entity types for the feed editor.
//!
//! All entities are scoped to a single feed. Cloning an entity produces a
//! fully independent value: every field is owned, so the clone shares no
//! mutable state with the original. Cascade editing relies on this when it
//! copies and reassigns children during a route merge.

mod feed;
mod id;
mod pattern;
mod route;
mod trip;

pub use feed::Feed;
pub use id::{is_valid_id, FeedId, PatternId, RouteId, StopId, TripId};
pub use pattern::{PatternStop, ShapePoint, TripPattern};
pub use route::Route;
pub use trip::{StopTime, Trip};
