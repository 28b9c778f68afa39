//! Dashboard error types
//!
//! Defines all errors that can occur while polling and rendering.

use thiserror::Error;

/// Errors that can occur during a poll cycle
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Request failed for a reason other than timeout or refused connection
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Request did not complete within the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Status endpoint could not be reached
    #[error("Status endpoint unreachable: {0}")]
    Unreachable(String),

    /// Response body is not a valid status snapshot
    #[error("Invalid status payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Render target lacks an element the dashboard writes into
    #[error("Missing page element: {0}")]
    MissingElement(String),

    /// Writing to the render target failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DashboardError {
    /// Classify a reqwest error the same way for every call site
    pub fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DashboardError::Timeout
        } else if err.is_connect() {
            DashboardError::Unreachable(err.to_string())
        } else {
            DashboardError::Network(err)
        }
    }

    /// Whether the failure happened before a payload was received
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            DashboardError::Network(_) | DashboardError::Timeout | DashboardError::Unreachable(_)
        )
    }
}

/// Result type alias for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;
