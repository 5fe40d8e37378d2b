//! Outbound client for the store backend API.
//!
//! One [`ApiClient`] is bound to a base URL and implements the gateway
//! traits the gate and the workflows depend on.

pub mod catalog;
pub mod session;
pub mod users;
pub mod verification;

use crate::error::ErrorKind;
use anyhow::{anyhow, Result};
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::debug;
use url::Url;

/// HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// # Errors
    /// Returns an error if the base URL cannot be parsed, has no host, or
    /// uses an unsupported scheme.
    pub fn endpoint_url(&self, path: &str) -> Result<String> {
        let url = Url::parse(&self.base_url)?;

        let scheme = url.scheme();

        let host = url
            .host()
            .ok_or_else(|| anyhow!("Error parsing URL: no host specified"))?
            .to_owned();

        let port = match url.port() {
            Some(p) => p,
            None => match scheme {
                "http" => 80,
                "https" => 443,
                _ => return Err(anyhow!("Error parsing URL: unsupported scheme {scheme}")),
            },
        };

        let endpoint_url = format!("{scheme}://{host}:{port}{path}");

        debug!("endpoint URL: {}", endpoint_url);

        Ok(endpoint_url)
    }
}

/// Exception identifier out of a backend error payload.
pub(crate) fn error_code(json_response: &Value) -> Option<&str> {
    json_response
        .get("code")
        .or_else(|| json_response.get("__type"))
        .and_then(Value::as_str)
}

/// Classify a non-success response into an [`ErrorKind`].
pub(crate) async fn rejection(response: Response) -> ErrorKind {
    let status = response.status();
    match response.json::<Value>().await {
        Ok(body) => error_code(&body).map_or_else(
            || ErrorKind::Unmapped(status.to_string()),
            ErrorKind::from_code,
        ),
        Err(_) => ErrorKind::Unmapped(status.to_string()),
    }
}
