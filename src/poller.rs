//! Dashboard Poller
//!
//! Fetches a snapshot from a [`StatusSource`] and renders it into a
//! [`DashboardView`], once on demand via [`Dashboard::refresh`] or on a fixed
//! period via [`Dashboard::start`].
//!
//! Scheduled cycles are fire-and-forget: every tick spawns its own refresh,
//! so a slow response never delays the next poll. Overlapping cycles are not
//! ordered; whichever response arrives last is what stays rendered.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::{DashboardError, DashboardResult};
use crate::status::{StatusSnapshot, StatusSource};
use crate::view::DashboardView;

/// Default polling period
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(2000);

/// Poll/render loop over one status source and one view
pub struct Dashboard<V: DashboardView> {
    source: Arc<dyn StatusSource>,
    view: Arc<Mutex<V>>,
    stats: Arc<PollStats>,
}

/// Counters for poll cycles, readable while the poller runs
#[derive(Debug, Default)]
pub struct PollStats {
    started: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
}

impl PollStats {
    pub fn started(&self) -> u64 {
        self.started.load(Ordering::Relaxed)
    }

    pub fn succeeded(&self) -> u64 {
        self.succeeded.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Cycles started but not yet finished
    pub fn in_flight(&self) -> u64 {
        self.started()
            .saturating_sub(self.succeeded() + self.failed())
    }
}

impl std::fmt::Display for PollStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} cycles, {} rendered, {} failed",
            self.started(),
            self.succeeded(),
            self.failed()
        )
    }
}

impl<V: DashboardView + 'static> Dashboard<V> {
    pub fn new(source: Arc<dyn StatusSource>, view: V) -> Self {
        Self {
            source,
            view: Arc::new(Mutex::new(view)),
            stats: Arc::new(PollStats::default()),
        }
    }

    /// Shared handle to the view, for inspection between cycles
    pub fn view(&self) -> Arc<Mutex<V>> {
        Arc::clone(&self.view)
    }

    pub fn stats(&self) -> Arc<PollStats> {
        Arc::clone(&self.stats)
    }

    /// Run one poll cycle: fetch, parse, render
    ///
    /// On error nothing is rendered and the view keeps the last snapshot.
    pub async fn refresh(&self) -> DashboardResult<()> {
        let cycle = self.stats.started.fetch_add(1, Ordering::Relaxed) + 1;

        match self.poll_once().await {
            Ok(snapshot) => {
                self.stats.succeeded.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(
                    cycle,
                    clients = snapshot.clients.len(),
                    logs = snapshot.logs.len(),
                    "Dashboard refreshed"
                );
                Ok(())
            }
            Err(e) => {
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(cycle, error = %e, "Dashboard refresh failed");
                Err(e)
            }
        }
    }

    async fn poll_once(&self) -> DashboardResult<StatusSnapshot> {
        let snapshot = self.source.fetch_snapshot().await?;

        // The whole render happens under the lock
        let mut view = self.view.lock().await;
        view.render(&snapshot)?;

        Ok(snapshot)
    }

    /// Start polling: refresh now, then once every `period`
    ///
    /// Runs until [`PollerHandle::stop`] is called. Dropping the handle
    /// detaches the timer, which then runs for the life of the runtime.
    pub fn start(self: Arc<Self>, period: Duration) -> DashboardResult<PollerHandle> {
        if period.is_zero() {
            return Err(DashboardError::Config(
                "poll interval must be greater than zero".to_string(),
            ));
        }

        tracing::info!(interval_ms = period.as_millis() as u64, "Starting dashboard poller");

        let stats = self.stats();
        let task = tokio::spawn(async move {
            // The first tick completes immediately
            let mut ticker = tokio::time::interval(period);
            // After a stall, fire once and resume the period instead of catching up
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let dashboard = Arc::clone(&self);
                tokio::spawn(async move {
                    // Already logged and counted by refresh
                    let _ = dashboard.refresh().await;
                });
            }
        });

        Ok(PollerHandle { task, stats })
    }
}

/// Handle to a running poller
pub struct PollerHandle {
    task: JoinHandle<()>,
    stats: Arc<PollStats>,
}

impl PollerHandle {
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn stats(&self) -> Arc<PollStats> {
        Arc::clone(&self.stats)
    }

    /// Cancel the timer
    ///
    /// Cycles already in flight are left to finish on their own.
    pub async fn stop(self) {
        self.task.abort();
        // Resolves once the abort has taken effect
        let _ = self.task.await;

        tracing::info!(stats = %self.stats, "Dashboard poller stopped");
    }
}
