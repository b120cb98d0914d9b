//! Key encoding for ordered storage.

pub mod keys;
