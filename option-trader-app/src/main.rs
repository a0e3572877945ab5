//! Option Trader Alerting Application
//!
//! Polls Mboum for unusual options activity and options flow on a fixed
//! cadence and forwards high-conviction alerts to a Telegram chat.

use anyhow::Result;
use tokio::signal;
use tracing::{error, info, warn};

use optionflow_core::{AppConfig, OptionFlowAlerter};

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up a local .env before reading configuration
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    info!("🤖 Option Trader ML v2.0 starting...");

    let config = AppConfig::from_env()?;
    if let Err(e) = config.require_credentials() {
        error!("❌ {}", e);
        std::process::exit(1);
    }

    info!(
        "⚙️ Min premium ${:.0}, min confidence {}, times in {}",
        config.alerts.min_premium,
        config.alerts.min_confidence,
        config.alerts.timezone.name()
    );
    if let Some(limit) = config.dedup_max_entries {
        info!("🧹 Remembering at most {} alerts per feed", limit);
    }

    let alerter = OptionFlowAlerter::from_config(config)?;

    info!("📊 System is running. Press Ctrl+C to stop.");

    alerter
        .run(async {
            if let Err(e) = signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            info!("🛑 Shutdown signal received...");
        })
        .await;

    let stats = alerter.statistics();
    info!(
        "📈 Cycles: {}, records: {}, duplicates: {}, alerts sent: {}, send failures: {}",
        stats.cycles,
        stats.records_fetched,
        stats.duplicates_skipped,
        stats.alerts_sent,
        stats.dispatch_failures
    );
    info!("✅ Option trader shutdown complete");

    Ok(())
}
