//! Feed registry entries.

use serde::{Deserialize, Serialize};

use super::FeedId;

/// A feed known to the editor.
///
/// The feed is the top-level scope: every route, pattern, and trip belongs
/// to exactly one feed, and every editing transaction is bound to one feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    /// Unique identifier for this feed.
    pub id: FeedId,
    /// Optional human-readable name.
    pub name: Option<String>,
}

impl Feed {
    /// Create a new feed with the given ID.
    #[must_use]
    pub fn new(id: impl Into<FeedId>) -> Self {
        Self { id: id.into(), name: None }
    }

    /// Set the feed name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
