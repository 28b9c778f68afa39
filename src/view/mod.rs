//! Render Targets
//!
//! A render applies one snapshot to a view, replacing whatever the previous
//! snapshot put there:
//!
//! 1. the client count display,
//! 2. the client rows (one cell each),
//! 3. the log rows (timestamp, type, message), then scroll to the newest entry.
//!
//! - [`Document`]: in-memory page with the same element contract as the
//!   browser dashboard
//! - [`TerminalView`]: full-screen redraw on any `io::Write`

mod document;
mod terminal;

pub use document::{Document, Element, Selector};
pub use terminal::{TerminalView, DEFAULT_LOG_ROWS};

use crate::error::DashboardResult;
use crate::status::StatusSnapshot;

/// Client count display
pub const CLIENT_COUNT: &str = "#client-count";
/// Client rows container
pub const CLIENTS_LIST: &str = "#clients-list";
/// Log rows container
pub const LOGS_LIST: &str = "#logs-list";
/// Scrollable log viewport
pub const LOGS_VIEWPORT: &str = ".logs";

/// Something a snapshot can be rendered into
///
/// Rendering is synchronous: once started it runs to completion without
/// yielding, so callers holding the view behind a lock never observe a
/// partial render.
pub trait DashboardView: Send {
    fn render(&mut self, snapshot: &StatusSnapshot) -> DashboardResult<()>;
}
