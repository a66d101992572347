//! Activity scanner: one poll-diff-notify pass over the board.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::client::{BoardClient, MessageSink};
use crate::config::NotifierConfig;
use crate::domain::{Activity, Card, NotificationMessage, Watermark};
use crate::error::NotifierError;
use crate::persistence::WatermarkStore;

/// Outcome of one completed cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Watermark the cycle filtered against.
    pub previous: Watermark,
    /// Watermark stored at the end of the cycle.
    pub next: Watermark,
    /// Cards found on the board.
    pub cards_scanned: usize,
    /// Cards whose activity history could not be fetched.
    pub cards_skipped: usize,
    /// Activities decoded across all cards, old and new.
    pub activities_seen: usize,
    /// Notifications accepted by the sink.
    pub notified: usize,
    /// Activities newer than the watermark that could not be delivered,
    /// plus entries that failed to decode.
    pub failed: usize,
    /// Distinct type tags observed, handy for spotting unhandled ones.
    pub activity_types: BTreeSet<String>,
}

impl CycleReport {
    fn new(previous: Watermark, next: Watermark) -> Self {
        Self {
            previous,
            next,
            cards_scanned: 0,
            cards_skipped: 0,
            activities_seen: 0,
            notified: 0,
            failed: 0,
            activity_types: BTreeSet::new(),
        }
    }
}

/// Fetches the board, diffs each card's activities against the stored
/// watermark and forwards new ones to the sink.
///
/// Delivery is at most once per window: the watermark advances at the end
/// of every cycle that got past the board fetch, even if some sends failed.
#[derive(Debug)]
pub struct ActivityScanner<S, W> {
    client: BoardClient,
    sink: S,
    store: W,
    board_id: String,
    base_url: String,
}

impl<S, W> ActivityScanner<S, W>
where
    S: MessageSink,
    W: WatermarkStore,
{
    /// Creates a scanner for the configured board.
    #[must_use]
    pub fn new(config: &NotifierConfig, client: BoardClient, sink: S, store: W) -> Self {
        Self {
            client,
            sink,
            store,
            board_id: config.board_id.clone(),
            base_url: config.base_url.clone(),
        }
    }

    /// Returns a reference to the message sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns a reference to the watermark store.
    #[must_use]
    pub fn store(&self) -> &W {
        &self.store
    }

    /// Runs one cycle using the current time as the next watermark.
    ///
    /// # Errors
    ///
    /// Returns the board fetch error (watermark left untouched) or the
    /// store's save error.
    pub async fn run_cycle(&self) -> Result<CycleReport, NotifierError> {
        let watermark = self.store.load().await;
        let now = Utc::now();
        self.scan(watermark, now).await
    }

    /// Runs one cycle that will store `now` as the next watermark.
    ///
    /// # Errors
    ///
    /// Same as [`ActivityScanner::run_cycle`].
    pub async fn run_cycle_at(&self, now: DateTime<Utc>) -> Result<CycleReport, NotifierError> {
        let watermark = self.store.load().await;
        self.scan(watermark, now).await
    }

    async fn scan(
        &self,
        watermark: Watermark,
        now: DateTime<Utc>,
    ) -> Result<CycleReport, NotifierError> {
        // Captured before any network I/O so activities created while the
        // cycle runs land in the next window.
        let next = Watermark::from_datetime(now);

        let board = self.client.fetch_board(&self.board_id).await?;
        let mut report = CycleReport::new(watermark, next);

        for card in board.cards() {
            report.cards_scanned += 1;

            let Some(entries) = self.client.fetch_activities(&card.public_id).await else {
                report.cards_skipped += 1;
                continue;
            };

            for entry in entries {
                let activity = match Activity::from_value(entry) {
                    Ok(activity) => activity,
                    Err(e) => {
                        tracing::warn!(card = %card.public_id, error = %e, "skipping undecodable activity");
                        report.failed += 1;
                        continue;
                    }
                };

                report.activities_seen += 1;
                report.activity_types.insert(activity.activity_type.clone());

                if !report.previous.is_before(&activity.created_at) {
                    continue;
                }

                match self.notify(card, &activity).await {
                    Ok(()) => report.notified += 1,
                    Err(e) => {
                        tracing::warn!(
                            card = %card.public_id,
                            activity_type = %activity.activity_type,
                            created_at = %activity.created_at,
                            code = e.error_code(),
                            error = %e,
                            "notification failed"
                        );
                        report.failed += 1;
                    }
                }
            }
        }

        self.store.save(&report.next).await?;
        Ok(report)
    }

    async fn notify(&self, card: &Card, activity: &Activity) -> Result<(), NotifierError> {
        let message = NotificationMessage::render(card, activity, &self.base_url)?;
        self.sink.send(&message.sanitized()).await?;
        tracing::debug!(
            card = %card.public_id,
            activity_type = %activity.activity_type,
            "notification sent"
        );
        Ok(())
    }
}
