//! Outer polling loop.

use std::future::{Future, poll_fn};
use std::task::Poll;
use std::time::Duration;

use super::scanner::ActivityScanner;
use crate::client::MessageSink;
use crate::persistence::WatermarkStore;

/// Runs scanner cycles back to back with a fixed idle delay in between.
///
/// Cycles never overlap. A failed cycle is logged and the loop carries on
/// after the usual delay.
#[derive(Debug)]
pub struct Poller<S, W> {
    scanner: ActivityScanner<S, W>,
    interval: Duration,
}

impl<S, W> Poller<S, W>
where
    S: MessageSink,
    W: WatermarkStore,
{
    /// Creates a poller that waits `interval` after each cycle.
    #[must_use]
    pub fn new(scanner: ActivityScanner<S, W>, interval: Duration) -> Self {
        Self { scanner, interval }
    }

    /// Returns the wrapped scanner.
    #[must_use]
    pub fn scanner(&self) -> &ActivityScanner<S, W> {
        &self.scanner
    }

    /// Polls until `shutdown` resolves and returns the number of cycles run.
    ///
    /// `shutdown` is polled once before the first cycle, so futures that
    /// register signal handlers on first poll are armed from the start. If it
    /// has already resolved at that point no cycle runs. Afterwards shutdown
    /// is only observed between cycles: an in-flight cycle always finishes,
    /// so sent notifications are never left without the matching watermark
    /// update.
    pub async fn run<F>(&self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut cycles: u64 = 0;

        let requested = poll_fn(|cx| Poll::Ready(shutdown.as_mut().poll(cx).is_ready())).await;
        if requested {
            tracing::info!("shutdown requested before first cycle");
            return cycles;
        }

        loop {
            cycles = cycles.saturating_add(1);
            match self.scanner.run_cycle().await {
                Ok(report) => tracing::info!(
                    cycle = cycles,
                    previous = %report.previous,
                    next = %report.next,
                    cards = report.cards_scanned,
                    skipped_cards = report.cards_skipped,
                    activities = report.activities_seen,
                    notified = report.notified,
                    failed = report.failed,
                    types = ?report.activity_types,
                    "cycle completed"
                ),
                Err(e) => tracing::error!(
                    cycle = cycles,
                    code = e.error_code(),
                    error = %e,
                    "cycle failed"
                ),
            }

            tokio::select! {
                () = tokio::time::sleep(self.interval) => {}
                () = &mut shutdown => {
                    tracing::info!(cycles, "shutdown requested, stopping poller");
                    return cycles;
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::pin::Pin;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::Context;

    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    use super::*;
    use crate::client::BoardClient;
    use crate::domain::Watermark;
    use crate::persistence::MemoryWatermarkStore;
    use crate::test_support::{FailingStore, RecordingSink, test_config};

    fn poller(server: &MockServer, interval: Duration) -> Poller<RecordingSink, MemoryWatermarkStore> {
        let config = test_config(&server.uri(), "http://unused");
        let client = match BoardClient::new(&config) {
            Ok(c) => c,
            Err(e) => panic!("client should build: {e}"),
        };
        let store = MemoryWatermarkStore::with_value(Watermark::from_raw("2025-01-01T00:00:00.000000Z"));
        let scanner = ActivityScanner::new(&config, client, RecordingSink::default(), store);
        Poller::new(scanner, interval)
    }

    /// Shutdown future that counts its polls and resolves on poll `ready_on`.
    struct CountingShutdown {
        polls: Arc<AtomicUsize>,
        ready_on: usize,
    }

    impl Future for CountingShutdown {
        type Output = ();

        fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
            let polls = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
            if polls >= self.ready_on {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        }
    }

    #[tokio::test]
    async fn stops_after_current_cycle_on_shutdown() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/boards/b1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"lists": []})))
            .expect(1)
            .mount(&server)
            .await;

        let poller = poller(&server, Duration::from_secs(3600));
        let polls = Arc::new(AtomicUsize::new(0));
        let cycles = poller
            .run(CountingShutdown {
                polls: Arc::clone(&polls),
                ready_on: 2,
            })
            .await;

        assert_eq!(cycles, 1);
        assert_eq!(polls.load(Ordering::SeqCst), 2);
        let stored = poller.scanner().store().current();
        assert!(stored.is_some_and(|wm| wm > Watermark::from_raw("2025-01-01T00:00:00.000000Z")));
    }

    #[tokio::test]
    async fn shutdown_is_armed_before_first_cycle() {
        let server = MockServer::start().await;
        let polls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&polls);
        // The board only answers once the shutdown future has been polled.
        Mock::given(method("GET"))
            .and(path("/api/v1/boards/b1"))
            .respond_with(move |_: &Request| {
                if seen.load(Ordering::SeqCst) >= 1 {
                    ResponseTemplate::new(200).set_body_json(json!({"lists": []}))
                } else {
                    ResponseTemplate::new(503)
                }
            })
            .expect(1)
            .mount(&server)
            .await;

        let poller = poller(&server, Duration::from_secs(3600));
        let cycles = poller
            .run(CountingShutdown {
                polls: Arc::clone(&polls),
                ready_on: 2,
            })
            .await;

        assert_eq!(cycles, 1);
        let stored = poller.scanner().store().current();
        assert!(stored.is_some_and(|wm| wm > Watermark::from_raw("2025-01-01T00:00:00.000000Z")));
    }

    #[tokio::test]
    async fn already_resolved_shutdown_runs_no_cycle() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/boards/b1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"lists": []})))
            .expect(0)
            .mount(&server)
            .await;

        let poller = poller(&server, Duration::from_secs(3600));
        let cycles = poller.run(std::future::ready(())).await;

        assert_eq!(cycles, 0);
        assert_eq!(
            poller.scanner().store().current(),
            Some(Watermark::from_raw("2025-01-01T00:00:00.000000Z"))
        );
    }

    #[tokio::test]
    async fn failed_cycles_do_not_stop_the_loop() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/boards/b1"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let poller = poller(&server, Duration::from_millis(5));
        let cycles = poller
            .run(tokio::time::sleep(Duration::from_millis(300)))
            .await;

        assert!(cycles >= 2, "only {cycles} cycles ran");
        assert_eq!(
            poller.scanner().store().current(),
            Some(Watermark::from_raw("2025-01-01T00:00:00.000000Z"))
        );
    }

    #[tokio::test]
    async fn save_failures_do_not_stop_the_loop() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/boards/b1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"lists": []})))
            .mount(&server)
            .await;

        let config = test_config(&server.uri(), "http://unused");
        let client = match BoardClient::new(&config) {
            Ok(c) => c,
            Err(e) => panic!("client should build: {e}"),
        };
        let store = FailingStore::new(Watermark::from_raw("2025-01-01T00:00:00.000000Z"));
        let scanner = ActivityScanner::new(&config, client, RecordingSink::default(), store);
        let poller = Poller::new(scanner, Duration::from_millis(5));

        let cycles = poller
            .run(tokio::time::sleep(Duration::from_millis(300)))
            .await;

        assert!(cycles >= 2, "only {cycles} cycles ran");
        let attempts = poller.scanner().store().save_attempts();
        assert_eq!(u64::try_from(attempts).ok(), Some(cycles));
    }
}
