//! # Whisper Dashboard
//!
//! Live monitor for the Whisper Chat server. Polls the server's
//! `/api/status` endpoint on a fixed period and renders the connected-client
//! count, the client list and the event log.
//!
//! ## Modules
//!
//! - [`status`]: Snapshot types and the HTTP status client
//! - [`view`]: Render targets (in-memory document, terminal)
//! - [`poller`]: Refresh cycle and the repeating timer
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use whisper_dashboard::{Dashboard, Document, StatusClient, StatusClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = StatusClient::new(StatusClientConfig::default())?;
//!     let dashboard = Arc::new(Dashboard::new(Arc::new(client), Document::dashboard()));
//!
//!     // One immediate refresh, then every two seconds
//!     let poller = Arc::clone(&dashboard).start(Duration::from_secs(2))?;
//!
//!     tokio::time::sleep(Duration::from_secs(10)).await;
//!     println!("{}", dashboard.view().lock().await.to_html());
//!
//!     poller.stop().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod poller;
pub mod status;
pub mod view;

pub use config::{generate_default_config, Config, ConfigError, LoggingConfig, PollerConfig, ViewConfig};

pub use error::{DashboardError, DashboardResult};

pub use poller::{Dashboard, PollStats, PollerHandle, DEFAULT_INTERVAL};

pub use status::{parse_snapshot, LogEntry, StatusClient, StatusClientConfig, StatusSnapshot, StatusSource};

pub use view::{DashboardView, Document, Element, Selector, TerminalView};
