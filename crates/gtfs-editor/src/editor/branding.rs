//! Route branding assets.

use gtfs_editor_core::{FeedId, Route, RouteId};
use tracing::debug;

use crate::error::{Error, Result};

use super::Editor;

/// Stores uploaded branding assets and hands back their public URL.
///
/// The editor core does not talk to object storage itself; deployments
/// plug in an implementation (S3, local disk, ...) behind this trait.
pub trait BrandingStore {
    /// Store an asset for a route and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Branding`] if the asset cannot be stored.
    fn store(
        &self,
        feed: &FeedId,
        route: &RouteId,
        content_type: &str,
        data: &[u8],
    ) -> Result<String>;
}

impl Editor<'_> {
    /// Upload branding for a route and record the resulting URL on it.
    ///
    /// The asset is stored first; the route record is only updated once
    /// the store has handed back a URL. The existence check runs before
    /// the upload so a missing route never leaves an orphaned asset
    /// behind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the route does not exist and
    /// [`Error::Branding`] if the store rejects the asset.
    pub fn set_route_branding(
        &self,
        id: &RouteId,
        store: &dyn BrandingStore,
        content_type: &str,
        data: &[u8],
    ) -> Result<Route> {
        // Fails fast on a missing route, before any bytes are uploaded.
        self.get_route(id)?;

        let url = store.store(self.feed(), id, content_type, data)?;

        let route = self.with_tx(|tx| {
            let mut route: Route = tx
                .get_record(id.as_str())?
                .ok_or_else(|| Error::NotFound { kind: "route", id: id.to_string() })?;
            route.branding_url = Some(url);
            tx.put_record(&route)?;
            Ok(route)
        })?;

        debug!(feed = %self.feed(), route = %id, "updated route branding");
        Ok(route)
    }
}
