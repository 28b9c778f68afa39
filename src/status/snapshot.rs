//! Status snapshot types
//!
//! The payload served by the chat server at `/api/status`.

use serde::{Deserialize, Serialize};

use crate::error::DashboardResult;

/// One fetched-and-parsed status payload
///
/// Every field is required. A snapshot fully replaces whatever was rendered
/// before it; nothing is carried over between polls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Number of connected clients as reported by the server
    pub client_count: u64,
    /// Client identifiers, in the order they are rendered
    pub clients: Vec<String>,
    /// Event log, oldest first
    pub logs: Vec<LogEntry>,
}

/// A single server event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Pre-formatted timestamp, rendered verbatim
    pub timestamp: String,
    /// Event category (`SERVER`, `CONNECT`, `MESSAGE`, ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable event description
    pub message: String,
}

impl LogEntry {
    pub fn new(
        timestamp: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Style hook for the type cell
    pub fn css_class(&self) -> String {
        self.kind.to_lowercase()
    }
}

impl StatusSnapshot {
    /// A snapshot with no clients and no log entries
    pub fn empty() -> Self {
        Self {
            client_count: 0,
            clients: Vec::new(),
            logs: Vec::new(),
        }
    }
}

/// Parse a response body into a snapshot
pub fn parse_snapshot(body: &[u8]) -> DashboardResult<StatusSnapshot> {
    Ok(serde_json::from_slice(body)?)
}
