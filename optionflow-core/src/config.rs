//! Configuration from environment variables

use crate::error::AlertError;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.mboum.com";
pub const DEFAULT_TIMEZONE: &str = "America/New_York";
pub const DEFAULT_MIN_PREMIUM: f64 = 50_000.0;
pub const DEFAULT_MIN_CONFIDENCE: u8 = 70;

/// Thresholds and display settings consumed by the alert builders
#[derive(Clone, Debug, PartialEq)]
pub struct AlertConfig {
    /// Records below this premium are never alerted
    pub min_premium: f64,
    /// Ensemble scores below this are never alerted
    pub min_confidence: u8,
    /// Zone used for alert timestamps
    pub timezone: Tz,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            min_premium: DEFAULT_MIN_PREMIUM,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            timezone: chrono_tz::America::New_York,
        }
    }
}

impl AlertConfig {
    /// Wall-clock time in the display zone
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.timezone)
    }
}

/// Poll cadence per task
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleConfig {
    pub unusual_interval: Duration,
    pub flow_interval: Duration,
    pub market_status_interval: Duration,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            unusual_interval: Duration::from_secs(60),
            flow_interval: Duration::from_secs(60),
            market_status_interval: Duration::from_secs(1800),
        }
    }
}

/// Everything the binary needs to run
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub mboum_api_key: Option<String>,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub base_url: String,
    pub alerts: AlertConfig,
    pub schedule: ScheduleConfig,
    /// Per-feed cap on remembered keys; `None` keeps every key
    pub dedup_max_entries: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mboum_api_key: None,
            telegram_bot_token: None,
            telegram_chat_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            alerts: AlertConfig::default(),
            schedule: ScheduleConfig::default(),
            dedup_max_entries: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    ///
    /// Environment variables:
    /// - `MBOUM_API_KEY`, `OPTION_TRADER_BOT_TOKEN`, `OPTION_TRADER_CHAT_ID`
    /// - `MBOUM_BASE_URL` (default: https://api.mboum.com)
    /// - `MIN_PREMIUM_USD` (default: 50000)
    /// - `MIN_CONFIDENCE_SCORE` (default: 70)
    /// - `DISPLAY_TIMEZONE` (default: America/New_York)
    /// - `UNUSUAL_OPTIONS_INTERVAL_SECS` (default: 60)
    /// - `OPTIONS_FLOW_INTERVAL_SECS` (default: 60)
    /// - `MARKET_STATUS_INTERVAL_SECS` (default: 1800)
    /// - `DEDUP_MAX_ENTRIES` (default: unbounded)
    pub fn from_env() -> Result<Self, AlertError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AlertError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let timezone = match get("DISPLAY_TIMEZONE") {
            Some(name) => Tz::from_str(&name)
                .map_err(|_| AlertError::Config(format!("unknown time zone: {name}")))?,
            None => chrono_tz::America::New_York,
        };

        let min_confidence: u8 = parse_or(get("MIN_CONFIDENCE_SCORE"), "MIN_CONFIDENCE_SCORE", DEFAULT_MIN_CONFIDENCE)?;
        if min_confidence > 100 {
            return Err(AlertError::Config(format!(
                "MIN_CONFIDENCE_SCORE must be within 0..=100, got {min_confidence}"
            )));
        }

        let min_premium: f64 = parse_or(get("MIN_PREMIUM_USD"), "MIN_PREMIUM_USD", DEFAULT_MIN_PREMIUM)?;
        if !min_premium.is_finite() || min_premium < 0.0 {
            return Err(AlertError::Config(format!(
                "MIN_PREMIUM_USD must be a finite, non-negative amount, got {min_premium}"
            )));
        }

        let alerts = AlertConfig {
            min_premium,
            min_confidence,
            timezone,
        };

        let defaults = ScheduleConfig::default();
        let schedule = ScheduleConfig {
            unusual_interval: parse_secs_or(
                get("UNUSUAL_OPTIONS_INTERVAL_SECS"),
                "UNUSUAL_OPTIONS_INTERVAL_SECS",
                defaults.unusual_interval,
            )?,
            flow_interval: parse_secs_or(
                get("OPTIONS_FLOW_INTERVAL_SECS"),
                "OPTIONS_FLOW_INTERVAL_SECS",
                defaults.flow_interval,
            )?,
            market_status_interval: parse_secs_or(
                get("MARKET_STATUS_INTERVAL_SECS"),
                "MARKET_STATUS_INTERVAL_SECS",
                defaults.market_status_interval,
            )?,
        };

        let dedup_max_entries = match get("DEDUP_MAX_ENTRIES") {
            Some(raw) => match parse_value::<usize>(&raw, "DEDUP_MAX_ENTRIES")? {
                0 => return Err(AlertError::Config("DEDUP_MAX_ENTRIES must be positive".into())),
                limit => Some(limit),
            },
            None => None,
        };

        Ok(Self {
            mboum_api_key: get("MBOUM_API_KEY"),
            telegram_bot_token: get("OPTION_TRADER_BOT_TOKEN"),
            telegram_chat_id: get("OPTION_TRADER_CHAT_ID"),
            base_url: get("MBOUM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            alerts,
            schedule,
            dedup_max_entries,
        })
    }

    /// Fails on the first credential the process cannot run without
    pub fn require_credentials(&self) -> Result<(), AlertError> {
        if self.mboum_api_key.is_none() {
            return Err(AlertError::MissingCredential("MBOUM_API_KEY"));
        }
        if self.telegram_bot_token.is_none() {
            return Err(AlertError::MissingCredential("OPTION_TRADER_BOT_TOKEN"));
        }
        if self.telegram_chat_id.is_none() {
            return Err(AlertError::MissingCredential("OPTION_TRADER_CHAT_ID"));
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(raw: &str, key: &str) -> Result<T, AlertError> {
    raw.parse()
        .map_err(|_| AlertError::Config(format!("invalid value for {key}: {raw}")))
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T, AlertError> {
    match raw {
        Some(raw) => parse_value(&raw, key),
        None => Ok(default),
    }
}

fn parse_secs_or(raw: Option<String>, key: &str, default: Duration) -> Result<Duration, AlertError> {
    let secs: u64 = parse_or(raw, key, default.as_secs())?;
    if secs == 0 {
        return Err(AlertError::Config(format!("{key} must be positive")));
    }
    Ok(Duration::from_secs(secs))
}
