//! Storage engine traits and errors.

mod error;
mod traits;

pub use error::StorageError;
pub use traits::{KeyValue, StorageEngine, Transaction};
