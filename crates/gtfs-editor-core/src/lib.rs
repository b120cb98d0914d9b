//! GTFS Editor Core
//!
//! This crate provides the fundamental types shared across the feed editor:
//! the transit entities being edited, their identifiers, and the key
//! encoding used to lay them out in ordered key-value storage.
//!
//! # Modules
//!
//! - [`types`] - Entity types (Feed, Route, TripPattern, Trip) and IDs
//! - [`encoding`] - Ordered key encoding for records and index entries
//! - [`error`] - Transaction error types

pub mod encoding;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{TransactionError, TransactionResult};
pub use types::{
    is_valid_id, Feed, FeedId, PatternId, PatternStop, Route, RouteId, ShapePoint, StopId,
    StopTime, Trip, TripId, TripPattern,
};
