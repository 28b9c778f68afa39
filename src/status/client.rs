//! Status endpoint HTTP client
//!
//! Fetches `/api/status` from the chat server and parses the body.

use async_trait::async_trait;
use reqwest::Client;

use super::snapshot::{parse_snapshot, StatusSnapshot};
use super::StatusSource;
use crate::error::{DashboardError, DashboardResult};

/// Status endpoint client
pub struct StatusClient {
    client: Client,
    config: StatusClientConfig,
}

/// Configuration for the status client
#[derive(Debug, Clone)]
pub struct StatusClientConfig {
    /// Base URL of the chat server web interface (e.g., "http://localhost:8080")
    pub base_url: String,
    /// Path of the status resource
    pub status_path: String,
    /// Request timeout in milliseconds, `None` leaves the client default
    pub request_timeout_ms: Option<u64>,
}

impl Default for StatusClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            status_path: "/api/status".to_string(),
            request_timeout_ms: None,
        }
    }
}

impl StatusClient {
    /// Create a new status client with the given configuration
    pub fn new(config: StatusClientConfig) -> DashboardResult<Self> {
        let mut builder = Client::builder();
        if let Some(ms) = config.request_timeout_ms {
            builder = builder.timeout(std::time::Duration::from_millis(ms));
        }
        let client = builder.build().map_err(DashboardError::Network)?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &StatusClientConfig {
        &self.config
    }

    /// Full URL of the status resource
    pub fn status_url(&self) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.status_path
        )
    }
}

#[async_trait]
impl StatusSource for StatusClient {
    async fn fetch_snapshot(&self) -> DashboardResult<StatusSnapshot> {
        let url = self.status_url();

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(DashboardError::from_request)?;

        // The status code is not checked: any body that parses is rendered.
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(DashboardError::from_request)?;

        tracing::trace!(%url, status = status.as_u16(), bytes = body.len(), "Status response received");

        parse_snapshot(&body)
    }
}
