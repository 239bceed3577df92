//! Reqwest-backed implementation of the registration API.
//!
//! Wraps the collaborator's two endpoints (`GET /registrations/`,
//! `PUT /registrations/{id}/`) behind [`RegistrationApi`].

use async_trait::async_trait;

use alertsync_core::registration::{Registration, RegistrationId};

use crate::api::{ApiError, RegistrationApi, RegistrationUpdate};
use crate::config::ClientConfig;

/// HTTP client for the registration server.
pub struct HttpRegistrationApi {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpRegistrationApi {
    /// Create a client from a resolved [`ClientConfig`].
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url,
            auth_token: config.auth_token,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across services).
    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        Self {
            client,
            base_url: config.base_url,
            auth_token: config.auth_token,
        }
    }

    // ---- private helpers ----

    /// Attach the bearer token, if the deployment requires one.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or an [`ApiError::Api`] containing the status
    /// and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl RegistrationApi for HttpRegistrationApi {
    async fn list(&self) -> Result<Vec<Registration>, ApiError> {
        let response = self
            .authorize(self.client.get(format!("{}/registrations/", self.base_url)))
            .send()
            .await?;

        let records: Vec<Registration> = Self::parse_response(response).await?;
        tracing::debug!(count = records.len(), "Fetched registration list");
        Ok(records)
    }

    async fn update(
        &self,
        id: RegistrationId,
        update: RegistrationUpdate,
    ) -> Result<(), ApiError> {
        tracing::debug!(id, ?update, "Updating registration");

        let response = self
            .authorize(
                self.client
                    .put(format!("{}/registrations/{}/", self.base_url, id))
                    .json(&update.body()),
            )
            .send()
            .await?;

        Self::check_status(response).await
    }
}
