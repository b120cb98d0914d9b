//! Key-value storage engine abstraction for the GTFS editor.
//!
//! The editor persists its entities through the [`engine::StorageEngine`]
//! trait, which hides the concrete embedded database behind ordered-table
//! get/put/delete/range operations. The default backend is
//! [`backends::RedbEngine`].

pub mod backends;
pub mod engine;

pub use backends::RedbEngine;
pub use engine::{StorageEngine, StorageError, Transaction};
