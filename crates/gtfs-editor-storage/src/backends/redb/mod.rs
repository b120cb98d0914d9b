//! Redb-backed storage engine.

mod engine;
mod transaction;

pub use engine::{RedbConfig, RedbEngine};
pub use transaction::RedbTransaction;
