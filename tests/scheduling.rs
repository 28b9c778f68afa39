//! Timer and overlap behavior of the poller, driven by in-process sources.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use whisper_dashboard::view::CLIENT_COUNT;
use whisper_dashboard::{
    Dashboard, DashboardResult, Document, LogEntry, StatusSnapshot, StatusSource,
};

fn snapshot(count: u64) -> StatusSnapshot {
    StatusSnapshot {
        client_count: count,
        clients: (0..count).map(|i| format!("user{}", i)).collect(),
        logs: vec![LogEntry::new("12:00:00", "SERVER", format!("{} online", count))],
    }
}

/// Answers call N with `responses[N]`, after that response's delay
struct ScriptedSource {
    calls: AtomicUsize,
    responses: Vec<(Duration, StatusSnapshot)>,
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn fetch_snapshot(&self) -> DashboardResult<StatusSnapshot> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let (delay, snapshot) = self.responses[call.min(self.responses.len() - 1)].clone();
        tokio::time::sleep(delay).await;
        Ok(snapshot)
    }
}

/// Never answers within the test's lifetime
struct StalledSource {
    calls: AtomicUsize,
}

#[async_trait]
impl StatusSource for StalledSource {
    async fn fetch_snapshot(&self) -> DashboardResult<StatusSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(snapshot(0))
    }
}

#[tokio::test]
async fn test_last_response_to_arrive_wins() {
    let source = Arc::new(ScriptedSource {
        calls: AtomicUsize::new(0),
        responses: vec![
            (Duration::from_millis(200), snapshot(1)),
            (Duration::ZERO, snapshot(5)),
        ],
    });
    let dashboard = Dashboard::new(source, Document::dashboard());

    // The older, slower poll lands last and overwrites the newer data
    let (first, second) = tokio::join!(dashboard.refresh(), dashboard.refresh());
    first.unwrap();
    second.unwrap();

    let doc = dashboard.view().lock().await.clone();
    assert_eq!(doc.require(CLIENT_COUNT).unwrap().text_content(), "1");
}

#[tokio::test]
async fn test_slow_polls_do_not_delay_the_timer() {
    let source = Arc::new(StalledSource {
        calls: AtomicUsize::new(0),
    });
    let dashboard = Arc::new(Dashboard::new(
        Arc::clone(&source) as Arc<dyn StatusSource>,
        Document::dashboard(),
    ));

    let poller = Arc::clone(&dashboard)
        .start(Duration::from_millis(50))
        .unwrap();
    tokio::time::sleep(Duration::from_millis(275)).await;

    let stats = poller.stats();
    assert!(stats.started() >= 4, "started {}", stats.started());
    assert_eq!(stats.succeeded(), 0);
    assert_eq!(stats.in_flight(), stats.started());
    assert!(source.calls.load(Ordering::SeqCst) >= 4);

    poller.stop().await;

    // Nothing rendered yet: the page still shows its initial state
    let doc = dashboard.view().lock().await.clone();
    assert_eq!(doc, Document::dashboard());
}

#[tokio::test]
async fn test_stop_cancels_timer() {
    let source = Arc::new(ScriptedSource {
        calls: AtomicUsize::new(0),
        responses: vec![(Duration::ZERO, snapshot(3))],
    });
    let dashboard = Arc::new(Dashboard::new(
        Arc::clone(&source) as Arc<dyn StatusSource>,
        Document::dashboard(),
    ));

    let poller = Arc::clone(&dashboard)
        .start(Duration::from_millis(30))
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let stats = poller.stats();
    poller.stop().await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    let stopped_at = stats.started();
    assert!(stopped_at >= 2);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(stats.started(), stopped_at);
    assert_eq!(stats.succeeded(), stopped_at);

    let doc = dashboard.view().lock().await.clone();
    assert_eq!(doc.require(CLIENT_COUNT).unwrap().text_content(), "3");
}

#[tokio::test]
async fn test_stalled_runtime_does_not_burst_polls() {
    let source = Arc::new(ScriptedSource {
        calls: AtomicUsize::new(0),
        responses: vec![(Duration::ZERO, snapshot(1))],
    });
    let dashboard = Arc::new(Dashboard::new(
        Arc::clone(&source) as Arc<dyn StatusSource>,
        Document::dashboard(),
    ));

    let poller = Arc::clone(&dashboard)
        .start(Duration::from_millis(50))
        .unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let stats = poller.stats();
    let before = stats.started();
    assert_eq!(before, 1);

    // Block the single-threaded runtime across many periods
    std::thread::sleep(Duration::from_millis(600));
    tokio::time::sleep(Duration::from_millis(5)).await;

    let after = stats.started();
    assert!(
        after - before <= 2,
        "{} cycles started right after the stall",
        after - before
    );

    poller.stop().await;
}
