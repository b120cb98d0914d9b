//! Transactional editing core for GTFS transit feeds.
//!
//! The editor stores any number of feeds in one embedded database. Each
//! feed owns routes, trip patterns, and trips, kept consistent by two
//! hand-maintained by-route indices and a reconciler that keeps trips
//! aligned with their pattern's stop list.
//!
//! # Example
//!
//! ```no_run
//! use gtfs_editor::{Database, FeedScope};
//! use gtfs_editor::core::{Feed, Route};
//!
//! # fn main() -> gtfs_editor::Result<()> {
//! let db = Database::open("editor.redb")?;
//! db.create_feed(Feed::new("nyc"))?;
//!
//! let editor = db.editor(FeedScope::session("nyc"))?;
//! editor.create_route(Route::new("m14", "nyc").with_short_name("M14"))?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod database;
pub mod editor;
pub mod error;
pub mod transaction;

/// Entity and ID types shared across the editor.
pub use gtfs_editor_core as core;

pub use config::DatabaseConfig;
pub use database::Database;
pub use editor::{BrandingStore, Editor, FeedScope, StopSequenceEdit};
pub use error::{Error, Result};
