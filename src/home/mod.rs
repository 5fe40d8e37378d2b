//! Post-mount bootstrap for the ungated landing page.
//!
//! The landing page always renders; identity, catalog data, and the cart
//! sync are loaded afterwards, fire-and-forget relative to rendering. A
//! failed fetch degrades to an empty value and must never blank the page.

use crate::session::{AuthenticatedResult, IdentityGateway};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

/// Catalog and cart operations the landing page needs after mount.
#[async_trait]
pub trait StorefrontGateway: Send + Sync {
    async fn fetch_categories(&self) -> Result<Value>;
    async fn fetch_countries(&self) -> Result<Value>;

    /// Push the locally held cart to the backend.
    async fn sync_cart(&self, items: &Value) -> Result<()>;
}

/// Data the landing page renders with after mount.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeData {
    pub identity: Option<AuthenticatedResult>,
    pub categories: Value,
    pub countries: Value,
}

/// Load identity and catalog data and push the cart to the backend.
///
/// Every step tolerates failure; the caller always gets a renderable value.
pub async fn bootstrap(
    identity: &dyn IdentityGateway,
    storefront: &dyn StorefrontGateway,
    cart: &Value,
) -> HomeData {
    let mut data = HomeData::default();

    match identity.probe(None).await {
        Ok(result) => data.identity = Some(result),
        Err(err) => warn!("identity unavailable on landing page: {err}"),
    }

    match storefront.fetch_categories().await {
        Ok(categories) => data.categories = categories,
        Err(err) => warn!("category fetch failed: {err}"),
    }

    match storefront.fetch_countries().await {
        Ok(countries) => data.countries = countries,
        Err(err) => warn!("country list fetch failed: {err}"),
    }

    if let Err(err) = storefront.sync_cart(cart).await {
        warn!("cart sync failed: {err}");
    }

    data
}
