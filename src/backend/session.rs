//! Identity probe and session refresh calls.

use super::ApiClient;
use crate::session::{
    AuthenticatedResult, ForwardedCookie, IdentityGateway, ProbeFailure, RefreshFailure,
};
use async_trait::async_trait;
use reqwest::header::COOKIE;
use tracing::{debug, instrument};

#[async_trait]
impl IdentityGateway for ApiClient {
    /// `GET /auth`.
    ///
    /// The cookie header is attached explicitly only for server-rendered
    /// calls; browser-context calls already carry credentials on the
    /// transport. Every failure collapses into `ProbeFailure`.
    #[instrument(skip(self, cookie))]
    async fn probe(
        &self,
        cookie: Option<&ForwardedCookie>,
    ) -> Result<AuthenticatedResult, ProbeFailure> {
        let url = self.endpoint_url("/auth").map_err(|err| {
            debug!("probe URL error: {err}");
            ProbeFailure
        })?;

        let mut request = self.http().get(&url);
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie.header_value());
        }

        let response = request.send().await.map_err(|err| {
            debug!("probe transport error: {err}");
            ProbeFailure
        })?;

        if !response.status().is_success() {
            debug!("probe rejected: {}", response.status());
            return Err(ProbeFailure);
        }

        response.json::<AuthenticatedResult>().await.map_err(|err| {
            debug!("probe payload error: {err}");
            ProbeFailure
        })
    }

    /// `POST /refresh`. Resolves or fails without re-deriving identity.
    #[instrument(skip(self, cookie))]
    async fn refresh(&self, cookie: Option<&ForwardedCookie>) -> Result<(), RefreshFailure> {
        let url = self.endpoint_url("/refresh").map_err(|err| {
            debug!("refresh URL error: {err}");
            RefreshFailure
        })?;

        let mut request = self.http().post(&url);
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie.header_value());
        }

        let response = request.send().await.map_err(|err| {
            debug!("refresh transport error: {err}");
            RefreshFailure
        })?;

        if response.status().is_success() {
            Ok(())
        } else {
            debug!("refresh rejected: {}", response.status());
            Err(RefreshFailure)
        }
    }
}
