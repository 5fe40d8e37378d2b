//! Catalog and cart calls used by the landing page bootstrap.

use super::ApiClient;
use crate::home::StorefrontGateway;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

#[async_trait]
impl StorefrontGateway for ApiClient {
    async fn fetch_categories(&self) -> Result<Value> {
        self.fetch_json("/categories").await
    }

    async fn fetch_countries(&self) -> Result<Value> {
        self.fetch_json("/countries").await
    }

    /// `POST /order/cart` with the cart array body.
    #[instrument(skip(self, items))]
    async fn sync_cart(&self, items: &Value) -> Result<()> {
        let url = self.endpoint_url("/order/cart")?;

        let response = self.http().post(&url).json(items).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("cart sync rejected: {}", response.status()));
        }

        Ok(())
    }
}

impl ApiClient {
    #[instrument(skip(self))]
    async fn fetch_json(&self, path: &str) -> Result<Value> {
        let url = self.endpoint_url(path)?;

        let response = self.http().get(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("{} - {}", url, response.status()));
        }

        Ok(response.json().await?)
    }
}
