//! Status Source
//!
//! Where snapshots come from. The dashboard only depends on the
//! [`StatusSource`] trait; [`StatusClient`] is the HTTP implementation that
//! talks to the chat server.

mod client;
mod snapshot;

pub use client::{StatusClient, StatusClientConfig};
pub use snapshot::{parse_snapshot, LogEntry, StatusSnapshot};

use async_trait::async_trait;

use crate::error::DashboardResult;

/// Anything that can produce a status snapshot
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch and parse the current status
    async fn fetch_snapshot(&self) -> DashboardResult<StatusSnapshot>;
}
