//! Fetch, dedupe, score and dispatch for one poll cycle

use crate::alerts::{market_status_message, AlertBuilder, Evaluation, Suppression};
use crate::dedup::DedupStore;
use crate::error::AlertError;
use crate::feeds::{FeedType, MarketDataFeed};
use crate::notify::Notifier;
use crate::record::compute_record_identity;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// First page is the only one polled
pub const FIRST_PAGE: u32 = 1;

/// Outcome counts for one feed cycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub fetched: usize,
    pub duplicates: usize,
    pub suppressed: usize,
    pub alerted: usize,
    pub dispatch_failures: usize,
}

/// Running totals since start-up
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AlertStatistics {
    pub cycles: u64,
    pub records_fetched: u64,
    pub duplicates_skipped: u64,
    pub suppressed_premium: u64,
    pub suppressed_confidence: u64,
    pub alerts_sent: u64,
    pub dispatch_failures: u64,
    /// Share of `dispatch_failures` that may clear up on retry
    pub transient_failures: u64,
    pub status_messages: u64,
}

pub struct AlertPipeline {
    builder: AlertBuilder,
    feed: Arc<dyn MarketDataFeed>,
    notifier: Arc<dyn Notifier>,
    dedup: Arc<DedupStore>,
    statistics: Arc<RwLock<AlertStatistics>>,
}

impl AlertPipeline {
    pub fn new(
        builder: AlertBuilder,
        feed: Arc<dyn MarketDataFeed>,
        notifier: Arc<dyn Notifier>,
        dedup: Arc<DedupStore>,
    ) -> Self {
        Self {
            builder,
            feed,
            notifier,
            dedup,
            statistics: Arc::new(RwLock::new(AlertStatistics::default())),
        }
    }

    pub fn builder(&self) -> &AlertBuilder {
        &self.builder
    }

    pub fn dedup(&self) -> &Arc<DedupStore> {
        &self.dedup
    }

    pub fn statistics(&self) -> AlertStatistics {
        self.statistics.read().clone()
    }

    /// Poll one feed and alert on every new record that clears both floors.
    ///
    /// A key is remembered only once its record produced an alert, whether
    /// or not dispatch succeeded. Suppressed records are re-evaluated on
    /// the next poll.
    pub async fn run_feed_cycle(&self, feed: FeedType) -> CycleReport {
        info!("🔍 {} task...", feed.name().to_uppercase());
        let mut report = CycleReport::default();

        let records = self.feed.fetch_records(feed, FIRST_PAGE).await;
        self.statistics.write().cycles += 1;

        if records.is_empty() {
            info!("{}: no records returned", feed);
            return report;
        }

        report.fetched = records.len();
        info!("{} count: {}", feed, records.len());
        info!("{} sample record: {}", feed, records[0]);

        let now = self.builder.now();
        let mut suppressed_premium = 0u64;
        let mut suppressed_confidence = 0u64;

        for record in &records {
            let key = compute_record_identity(record);
            if self.dedup.contains(feed, &key) {
                report.duplicates += 1;
                continue;
            }

            let alert = match self.builder.evaluate(feed, record, now) {
                Evaluation::Alert(alert) => alert,
                Evaluation::Suppressed(reason) => {
                    debug!("{} suppressed {}: {}", feed, key, reason);
                    report.suppressed += 1;
                    match reason {
                        Suppression::BelowPremium { .. } => suppressed_premium += 1,
                        Suppression::BelowConfidence { .. } => suppressed_confidence += 1,
                    }
                    continue;
                }
            };

            self.dedup.insert(feed, key);
            report.alerted += 1;
            info!(
                "🚨 {} alert: {} {} ({}/100)",
                feed, alert.symbol, alert.direction, alert.score
            );

            if let Err(e) = self.notifier.send(&alert.text).await {
                self.log_send_failure(&e);
                report.dispatch_failures += 1;
            }
        }

        {
            let mut stats = self.statistics.write();
            stats.records_fetched += report.fetched as u64;
            stats.duplicates_skipped += report.duplicates as u64;
            stats.suppressed_premium += suppressed_premium;
            stats.suppressed_confidence += suppressed_confidence;
            stats.alerts_sent += (report.alerted - report.dispatch_failures) as u64;
            stats.dispatch_failures += report.dispatch_failures as u64;
        }

        report
    }

    /// Send the heartbeat; false if dispatch failed
    pub async fn run_market_status(&self) -> bool {
        info!("🔍 MARKET STATUS task...");
        let message = market_status_message(&self.builder.now());

        match self.notifier.send(&message).await {
            Ok(()) => {
                self.statistics.write().status_messages += 1;
                true
            }
            Err(e) => {
                self.log_send_failure(&e);
                self.statistics.write().dispatch_failures += 1;
                false
            }
        }
    }

    fn log_send_failure(&self, e: &AlertError) {
        if e.is_transient() {
            warn!("{} send failed (transient): {}", self.notifier.name(), e);
            self.statistics.write().transient_failures += 1;
        } else {
            error!("{} send error: {}", self.notifier.name(), e);
        }
    }
}
