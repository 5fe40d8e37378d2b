//! User directory and group membership calls.

use super::{rejection, ApiClient};
use crate::error::ErrorKind;
use crate::groups::{GroupGateway, UserRecord};
use async_trait::async_trait;
use tracing::instrument;

impl ApiClient {
    /// `GET /users`: the ordered user directory.
    ///
    /// # Errors
    /// Returns the mapped kind on a structured rejection
    /// (`NotAuthorized` for insufficient privilege) and `Unmapped` on
    /// transport failures.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, ErrorKind> {
        let url = self
            .endpoint_url("/users")
            .map_err(|err| ErrorKind::Unmapped(err.to_string()))?;

        let response = self
            .http()
            .get(&url)
            .send()
            .await
            .map_err(|err| ErrorKind::Unmapped(err.to_string()))?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        response
            .json()
            .await
            .map_err(|err| ErrorKind::Unmapped(err.to_string()))
    }
}

#[async_trait]
impl GroupGateway for ApiClient {
    /// `POST /user-group/{group}?username=`: assign, with no request body.
    #[instrument(skip(self))]
    async fn assign_group(&self, group: &str, username: &str) -> Result<(), ErrorKind> {
        let url = self
            .endpoint_url(&format!("/user-group/{group}"))
            .map_err(|err| ErrorKind::Unmapped(err.to_string()))?;

        let response = self
            .http()
            .post(&url)
            .query(&[("username", username)])
            .send()
            .await
            .map_err(|err| ErrorKind::Unmapped(err.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(rejection(response).await)
        }
    }

    /// `DELETE /user-group/{group}?username=`: revoke.
    #[instrument(skip(self))]
    async fn revoke_group(&self, group: &str, username: &str) -> Result<(), ErrorKind> {
        let url = self
            .endpoint_url(&format!("/user-group/{group}"))
            .map_err(|err| ErrorKind::Unmapped(err.to_string()))?;

        let response = self
            .http()
            .delete(&url)
            .query(&[("username", username)])
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
