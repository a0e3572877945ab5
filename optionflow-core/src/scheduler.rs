//! Fixed-cadence polling loop

use crate::config::ScheduleConfig;
use crate::feeds::FeedType;
use crate::pipeline::AlertPipeline;
use std::future::Future;
use std::sync::Arc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

/// Drives the unusual-activity, flow and market-status tasks.
///
/// Every task fires once at start and then on its own interval. Tasks run
/// one at a time on the calling task; a slow cycle delays the others
/// rather than overlapping them.
pub struct AlertScheduler {
    pipeline: Arc<AlertPipeline>,
    schedule: ScheduleConfig,
}

impl AlertScheduler {
    pub fn new(pipeline: Arc<AlertPipeline>, schedule: ScheduleConfig) -> Self {
        Self { pipeline, schedule }
    }

    pub fn pipeline(&self) -> &Arc<AlertPipeline> {
        &self.pipeline
    }

    /// Run every task once, in order
    pub async fn run_once(&self) {
        for feed in FeedType::ALL {
            self.pipeline.run_feed_cycle(feed).await;
        }
        self.pipeline.run_market_status().await;
    }

    /// Poll until `shutdown` resolves. An in-flight cycle finishes first.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut unusual = interval(self.schedule.unusual_interval);
        let mut flow = interval(self.schedule.flow_interval);
        let mut status = interval(self.schedule.market_status_interval);
        unusual.set_missed_tick_behavior(MissedTickBehavior::Delay);
        flow.set_missed_tick_behavior(MissedTickBehavior::Delay);
        status.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "⏱️ Polling every {:?} (unusual), {:?} (flow), status every {:?}",
            self.schedule.unusual_interval,
            self.schedule.flow_interval,
            self.schedule.market_status_interval
        );

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("🛑 Scheduler stopping");
                    break;
                }
                _ = unusual.tick() => {
                    self.pipeline.run_feed_cycle(FeedType::UnusualActivity).await;
                }
                _ = flow.tick() => {
                    self.pipeline.run_feed_cycle(FeedType::OptionsFlow).await;
                }
                _ = status.tick() => {
                    self.pipeline.run_market_status().await;
                }
            }
        }
    }
}
