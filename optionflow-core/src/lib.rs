//! Options Flow Alerting Library
//!
//! Polls unusual options activity and options flow, scores each record with
//! a five-timeframe ensemble, drops repeats and pushes high-conviction
//! alerts to Telegram. Can be embedded as a library or driven by the
//! `option-trader` binary.

pub mod error;
pub mod record;
pub mod classify;
pub mod format;
pub mod scoring;
pub mod config;
pub mod dedup;
pub mod feeds;
pub mod notify;
pub mod alerts;
pub mod pipeline;
pub mod scheduler;

// Re-export main types for easy access
pub use alerts::{
    evaluate_options_flow, evaluate_unusual_activity, market_status_message, AlertBuilder,
    Evaluation, FormattedAlert, Suppression,
};
pub use classify::{detect_whale, Direction};
pub use config::{AlertConfig, AppConfig, ScheduleConfig};
pub use dedup::DedupStore;
pub use error::AlertError;
pub use feeds::{FeedType, MarketDataFeed, MboumClient};
pub use notify::{Notifier, TelegramNotifier};
pub use pipeline::{AlertPipeline, AlertStatistics, CycleReport};
pub use record::{compute_record_identity, safe_float, RawRecord};
pub use scheduler::AlertScheduler;
pub use scoring::{EnsemblePredictor, EnsembleResult, ScoringModel, Timeframe};

use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

/// Main interface: Mboum feed, Telegram notifier and a shared dedup store
/// wired into one scheduler
pub struct OptionFlowAlerter {
    scheduler: AlertScheduler,
}

impl OptionFlowAlerter {
    /// Wire the production feed and notifier from configuration
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let api_key = config
            .mboum_api_key
            .clone()
            .context("MBOUM_API_KEY is required")?;

        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        let feed = MboumClient::new(api_key, client.clone(), &config.base_url)?;
        let notifier = TelegramNotifier::new(
            client,
            config.telegram_bot_token.clone(),
            config.telegram_chat_id.clone(),
        );
        if !notifier.has_credentials() {
            warn!("Telegram credentials missing; alerts will only be logged");
        }

        Ok(Self::with_components(config, Arc::new(feed), Arc::new(notifier)))
    }

    /// Wire arbitrary feed and notifier implementations
    pub fn with_components(
        config: AppConfig,
        feed: Arc<dyn MarketDataFeed>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let dedup = match config.dedup_max_entries {
            Some(limit) => DedupStore::with_capacity_limit(limit),
            None => DedupStore::new(),
        };

        let pipeline = AlertPipeline::new(
            AlertBuilder::new(config.alerts),
            feed,
            notifier,
            Arc::new(dedup),
        );

        Self {
            scheduler: AlertScheduler::new(Arc::new(pipeline), config.schedule),
        }
    }

    /// Poll on schedule until `shutdown` resolves
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        self.scheduler.run(shutdown).await
    }

    /// One pass over both feeds plus the heartbeat
    pub async fn run_once(&self) {
        self.scheduler.run_once().await
    }

    pub fn pipeline(&self) -> &Arc<AlertPipeline> {
        self.scheduler.pipeline()
    }

    pub fn statistics(&self) -> AlertStatistics {
        self.pipeline().statistics()
    }
}
