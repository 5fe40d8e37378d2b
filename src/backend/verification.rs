//! One-time-code calls for the verification flow.

use super::{rejection, ApiClient};
use crate::error::ErrorKind;
use crate::verification::VerificationGateway;
use async_trait::async_trait;
use tracing::instrument;

#[async_trait]
impl VerificationGateway for ApiClient {
    /// `POST /verify` with no code: ask the backend to send one.
    async fn request_code(&self) -> Result<(), ErrorKind> {
        self.post_verify(None).await
    }

    /// `POST /verify?code=`: check the entered code.
    async fn submit_code(&self, code: &str) -> Result<(), ErrorKind> {
        self.post_verify(Some(code)).await
    }
}

impl ApiClient {
    #[instrument(skip(self))]
    async fn post_verify(&self, code: Option<&str>) -> Result<(), ErrorKind> {
        let url = self
            .endpoint_url("/verify")
            .map_err(|err| ErrorKind::Unmapped(err.to_string()))?;

        let mut request = self.http().post(&url);
        if let Some(code) = code {
            request = request.query(&[("code", code)]);
        }

        let response = request
            .send()
            .await
            .map_err(|err| ErrorKind::Unmapped(err.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(rejection(response).await)
        }
    }
}
