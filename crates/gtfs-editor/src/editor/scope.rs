//! Feed scope resolution.

use gtfs_editor_core::FeedId;

use crate::error::{Error, Result};

/// Names the feed an editing request applies to.
///
/// A request may carry a feed in its session, as an explicit parameter, or
/// both. When both are present they must agree; a mismatch is rejected
/// rather than silently preferring one source.
#[derive(Debug, Clone, Default)]
pub struct FeedScope {
    session: Option<FeedId>,
    param: Option<FeedId>,
}

impl FeedScope {
    /// Scope taken from the session.
    #[must_use]
    pub fn session(feed: impl Into<FeedId>) -> Self {
        Self { session: Some(feed.into()), param: None }
    }

    /// Scope taken from an explicit parameter.
    #[must_use]
    pub fn param(feed: impl Into<FeedId>) -> Self {
        Self { session: None, param: Some(feed.into()) }
    }

    /// Scope with both sources present.
    #[must_use]
    pub fn new(session: Option<FeedId>, param: Option<FeedId>) -> Self {
        Self { session, param }
    }

    /// Resolve the scope to a single feed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if no feed is named, or if the
    /// session and parameter disagree.
    pub fn resolve(self) -> Result<FeedId> {
        match (self.session, self.param) {
            (Some(session), Some(param)) if session == param => Ok(session),
            (Some(session), Some(param)) => Err(Error::Validation(format!(
                "session feed {session} conflicts with requested feed {param}"
            ))),
            (Some(feed), None) | (None, Some(feed)) => Ok(feed),
            (None, None) => Err(Error::Validation("no feed in scope".to_string())),
        }
    }
}
