//! Database configuration.

use gtfs_editor_storage::backends::RedbConfig;

/// Configuration for opening an editor database.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatabaseConfig {
    /// Storage backend configuration.
    pub storage: RedbConfig,
}

impl DatabaseConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the storage cache size in bytes.
    #[must_use]
    pub const fn cache_size(mut self, size: usize) -> Self {
        self.storage = self.storage.cache_size(size);
        self
    }
}
