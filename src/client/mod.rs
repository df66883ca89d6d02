//! Fetch client for the gateway API.
//!
//! [`DashboardApi`] is the seam the poll scheduler talks to. [`ApiClient`]
//! implements it over HTTP; tests substitute scripted implementations.
//!
//! The two poll operations have separate error domains: metrics failures are
//! surfaced to the user, health failures are absorbed into a synthetic
//! "down" status.

mod error;
mod types;

pub use error::{FetchError, DEFAULT_REJECTION};
pub use types::{HealthStatus, MetricsSnapshot, HEALTHY};

use crate::config::ApiConfig;
use crate::session::Credential;
use async_trait::async_trait;
use reqwest::Client;
use types::RegisterResponse;

/// Header carrying the API key on authenticated requests.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Operations the dashboard needs from the gateway.
///
/// # Cancellation Safety
///
/// Both methods are cancellation-safe. Dropping the future aborts the
/// in-flight request.
#[async_trait]
pub trait DashboardApi: Send + Sync + 'static {
    /// `GET /metrics` authenticated with `credential`.
    async fn fetch_metrics(&self, credential: &Credential) -> Result<MetricsSnapshot, FetchError>;

    /// `GET /health`. Never fails: problems map to [`HealthStatus::down`].
    async fn fetch_health(&self) -> HealthStatus;
}

/// HTTP implementation of [`DashboardApi`].
pub struct ApiClient {
    /// Base URL without trailing slash (e.g., "http://localhost:8000")
    base_url: String,
    /// Shared HTTP client for connection pooling
    client: Client,
}

impl ApiClient {
    /// Create a client with the configured per-request timeout.
    pub fn new(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self::with_client(&config.base_url, client))
    }

    /// Create a client around an existing HTTP client (for testing).
    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /register`: ask the gateway for a new API key.
    pub async fn register(&self) -> Result<String, FetchError> {
        let response = self.client.post(self.url("/register")).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::rejected(status.as_u16(), &body));
        }

        let parsed: RegisterResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::Unreachable(format!("invalid register response: {}", e)))?;

        tracing::info!(
            api_key = %crate::logging::redact_key(&parsed.api_key),
            "Registered new API key"
        );
        Ok(parsed.api_key)
    }
}

#[async_trait]
impl DashboardApi for ApiClient {
    async fn fetch_metrics(&self, credential: &Credential) -> Result<MetricsSnapshot, FetchError> {
        let response = self
            .client
            .get(self.url("/metrics"))
            .header(API_KEY_HEADER, credential.expose())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!(
                status = status.as_u16(),
                api_key = %credential.redacted(),
                "Metrics request rejected"
            );
            return Err(FetchError::rejected(status.as_u16(), &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| FetchError::Unreachable(format!("invalid metrics response: {}", e)))
    }

    async fn fetch_health(&self) -> HealthStatus {
        let response = match self.client.get(self.url("/health")).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, "Health request failed");
                return HealthStatus::down();
            }
        };

        if !response.status().is_success() {
            tracing::debug!(status = response.status().as_u16(), "Health request rejected");
            return HealthStatus::down();
        }

        match response.json::<HealthStatus>().await {
            Ok(health) => health,
            Err(e) => {
                tracing::debug!(error = %e, "Health response unparseable");
                HealthStatus::down()
            }
        }
    }
}
