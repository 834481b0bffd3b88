//! HTTP implementation of the sighting server contract

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::SightingApi;
use crate::config::ServerConfig;
use crate::error::{Result, SightingError};
use crate::types::{Coordinates, CredentialToken, LoginStatus, Sighting, SightingId};

/// HTTP client for the sighting server
///
/// The server tracks sign-in with a session cookie, so the underlying
/// client keeps a cookie store for its whole lifetime.
///
/// # Example
///
/// ```rust,no_run
/// use sighting_client::{HttpSightingApi, ServerConfig, SightingApi};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let api = HttpSightingApi::new(&ServerConfig {
///     base_url: "http://localhost:81".into(),
///     ..Default::default()
/// })?;
///
/// let sightings = api.list_sightings().await?;
/// # Ok(())
/// # }
/// ```
pub struct HttpSightingApi {
    base_url: String,
    client: Client,
}

impl HttpSightingApi {
    /// Create a new client for the configured server
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SightingError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fail on any non-2xx status, keeping the body for diagnostics
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(SightingError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        Err(SightingError::Server {
            status: status.as_u16(),
            message: body,
        })
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let response = Self::ensure_success(response).await?;
        let body = response.json().await?;
        Ok(body)
    }
}

#[async_trait]
impl SightingApi for HttpSightingApi {
    async fn check_login(&self) -> Result<LoginStatus> {
        let response = self.client.get(self.url("/check_login")).send().await?;
        Self::handle_response(response).await
    }

    async fn login(&self, token: &CredentialToken) -> Result<()> {
        let body = serde_json::json!({ "token": token.expose() });

        let response = self
            .client
            .post(self.url("/login"))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), body = %body, "Login refused");
            return Err(SightingError::LoginRejected {
                status: status.as_u16(),
            });
        }

        Ok(())
    }

    async fn logout(&self) -> Result<()> {
        let response = self.client.post(self.url("/logout")).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn list_sightings(&self) -> Result<Vec<Sighting>> {
        let response = self.client.get(self.url("/locations")).send().await?;
        Self::handle_response(response).await
    }

    async fn create_sighting(&self, at: Coordinates) -> Result<Sighting> {
        let response = self
            .client
            .post(self.url("/locations"))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&at)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    async fn delete_sighting(&self, id: &SightingId) -> Result<()> {
        let url = self.url(&format!("/locations/{}", urlencoding::encode(id.as_str())));

        let response = self.client.delete(&url).send().await?;

        if response.status() == StatusCode::FORBIDDEN {
            warn!(sighting_id = %id, "Delete refused: not the reporter");
            return Err(SightingError::AuthorizationDenied(id.clone()));
        }

        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let api = HttpSightingApi::new(&ServerConfig {
            base_url: "http://localhost:81/".into(),
            timeout_secs: 1,
        })
        .unwrap();

        assert_eq!(api.url("/locations"), "http://localhost:81/locations");
    }
}
