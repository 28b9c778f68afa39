//! Terminal renderer
//!
//! Redraws the whole dashboard on every snapshot. The log table keeps the
//! newest entries on screen by showing only the tail of the log.

use std::io::Write;

use chrono::Local;

use super::DashboardView;
use crate::error::DashboardResult;
use crate::status::StatusSnapshot;

/// Default number of log rows kept on screen
pub const DEFAULT_LOG_ROWS: usize = 20;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Full-screen text view over any writer
pub struct TerminalView<W: Write + Send> {
    out: W,
    log_rows: usize,
    clear_screen: bool,
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            log_rows: DEFAULT_LOG_ROWS,
            clear_screen: true,
        }
    }

    /// Limit the log table to the last `rows` entries
    pub fn with_log_rows(mut self, rows: usize) -> Self {
        self.log_rows = rows.max(1);
        self
    }

    /// Append frames instead of clearing the screen (for pipes and logs)
    pub fn without_clear(mut self) -> Self {
        self.clear_screen = false;
        self
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn frame(&self, snapshot: &StatusSnapshot) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "Whisper Chat Server    updated {}",
            Local::now().format("%H:%M:%S")
        ));
        lines.push(format!("Connected clients: {}", snapshot.client_count));
        lines.push(String::new());

        lines.push("CLIENTS".to_string());
        if snapshot.clients.is_empty() {
            lines.push("  (none)".to_string());
        }
        for client in &snapshot.clients {
            lines.push(format!("  {}", client));
        }
        lines.push(String::new());

        let skip = snapshot.logs.len().saturating_sub(self.log_rows);
        let shown = &snapshot.logs[skip..];

        if skip > 0 {
            lines.push(format!(
                "LOGS (last {} of {})",
                shown.len(),
                snapshot.logs.len()
            ));
        } else {
            lines.push("LOGS".to_string());
        }

        let ts_width = shown
            .iter()
            .map(|e| e.timestamp.chars().count())
            .chain(std::iter::once("TIMESTAMP".len()))
            .max()
            .unwrap_or(0);
        let type_width = shown
            .iter()
            .map(|e| e.kind.chars().count())
            .chain(std::iter::once("TYPE".len()))
            .max()
            .unwrap_or(0);

        lines.push(format!(
            "  {:<ts$}  {:<ty$}  MESSAGE",
            "TIMESTAMP",
            "TYPE",
            ts = ts_width,
            ty = type_width
        ));
        for entry in shown {
            lines.push(format!(
                "  {:<ts$}  {:<ty$}  {}",
                entry.timestamp,
                entry.kind,
                entry.message,
                ts = ts_width,
                ty = type_width
            ));
        }

        let mut frame = lines.join("\n");
        frame.push('\n');
        frame
    }
}

impl<W: Write + Send> DashboardView for TerminalView<W> {
    fn render(&mut self, snapshot: &StatusSnapshot) -> DashboardResult<()> {
        let frame = self.frame(snapshot);

        if self.clear_screen {
            self.out.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;

        Ok(())
    }
}
