//! Alert builders
//!
//! Each builder turns one raw record into either a rendered Markdown alert
//! or a suppression. Builders are pure: the clock is passed in and dispatch
//! happens in the caller.

pub mod unusual;
pub mod flow;
pub mod status;

pub use status::market_status_message;

use crate::classify::{detect_whale, Direction};
use crate::config::AlertConfig;
use crate::feeds::FeedType;
use crate::record::{value_to_text, RawRecord};
use crate::scoring::{EnsemblePredictor, EnsembleResult, ScoreInputs};
use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;
use std::fmt;

/// Footer line on every message
pub const BOT_SIGNATURE: &str = "🤖 Option Trader ML v2.0";

const NOT_AVAILABLE: &str = "N/A";

/// A rendered alert ready for dispatch
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FormattedAlert {
    pub feed: FeedType,
    pub symbol: String,
    pub direction: Direction,
    pub score: u8,
    pub whale: bool,
    pub text: String,
}

impl fmt::Display for FormattedAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Why a record produced no alert
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Suppression {
    BelowPremium { premium: f64, minimum: f64 },
    BelowConfidence { score: u8, minimum: u8 },
}

impl fmt::Display for Suppression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suppression::BelowPremium { premium, minimum } => {
                write!(f, "premium {premium:.0} below {minimum:.0}")
            }
            Suppression::BelowConfidence { score, minimum } => {
                write!(f, "confidence {score} below {minimum}")
            }
        }
    }
}

/// Outcome of evaluating one record
#[derive(Clone, Debug, PartialEq)]
pub enum Evaluation {
    Alert(FormattedAlert),
    Suppressed(Suppression),
}

impl Evaluation {
    pub fn into_alert(self) -> Option<FormattedAlert> {
        match self {
            Evaluation::Alert(alert) => Some(alert),
            Evaluation::Suppressed(_) => None,
        }
    }
}

/// Normalised view of the fields both builders read
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct OptionFields {
    pub symbol: String,
    pub symbol_type: String,
    pub strike: String,
    pub expiration: String,
    pub days_to_expiration: f64,
    pub delta: f64,
    pub premium: f64,
    pub volume: f64,
    pub open_interest: f64,
    pub vol_over_oi: f64,
    pub implied_volatility: f64,
    pub order_type: String,
    pub darkpool_notional: f64,
    pub exchange: String,
    pub direction_label: String,
}

impl OptionFields {
    pub fn extract(record: &RawRecord) -> Self {
        Self {
            symbol: record.text_or(&["baseSymbol", "symbol"], NOT_AVAILABLE),
            symbol_type: record.text_or(&["symbolType"], NOT_AVAILABLE),
            strike: raw_display(record, "strikePrice"),
            expiration: raw_display(record, "expirationDate"),
            days_to_expiration: record.number("daysToExpiration", 0.0),
            delta: record.number("delta", 0.0),
            premium: record.number("premium", 0.0),
            volume: record.number("volume", 0.0),
            open_interest: record.number("openInterest", 0.0),
            vol_over_oi: record.number("volumeOpenInterestRatio", 0.0),
            implied_volatility: record.number("volatility", 0.0),
            order_type: record.text_or(&["type", "tradeType"], ""),
            darkpool_notional: record.number("darkpoolNotional", 0.0),
            exchange: record.text_or(&["exchange"], NOT_AVAILABLE),
            direction_label: record.text_or(&["direction"], ""),
        }
    }

    pub fn score_inputs(&self, direction: Direction) -> ScoreInputs {
        ScoreInputs {
            premium: self.premium,
            vol_over_oi: self.vol_over_oi,
            delta: self.delta,
            days_to_expiration: self.days_to_expiration,
            order_type: self.order_type.clone(),
            direction,
        }
    }

    pub fn order_type_display(&self) -> &str {
        if self.order_type.is_empty() {
            NOT_AVAILABLE
        } else {
            &self.order_type
        }
    }

    pub fn is_whale(&self) -> bool {
        detect_whale(self.premium, self.vol_over_oi, self.delta, &self.order_type)
    }
}

/// Field as shown to the reader; only absence or null becomes `N/A`
fn raw_display(record: &RawRecord, key: &str) -> String {
    match record.get(key) {
        Some(value) if !value.is_null() => value_to_text(value),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Applies thresholds and renders alerts for both feeds
#[derive(Clone, Debug)]
pub struct AlertBuilder {
    config: AlertConfig,
    predictor: EnsemblePredictor,
}

impl AlertBuilder {
    pub fn new(config: AlertConfig) -> Self {
        Self::with_predictor(config, EnsemblePredictor::default())
    }

    pub fn with_predictor(config: AlertConfig, predictor: EnsemblePredictor) -> Self {
        Self { config, predictor }
    }

    pub fn config(&self) -> &AlertConfig {
        &self.config
    }

    pub fn predictor(&self) -> &EnsemblePredictor {
        &self.predictor
    }

    pub fn now(&self) -> DateTime<Tz> {
        self.config.now()
    }

    /// Route a record to its feed's builder
    pub fn evaluate(&self, feed: FeedType, record: &RawRecord, now: DateTime<Tz>) -> Evaluation {
        match feed {
            FeedType::UnusualActivity => self.assess_unusual_activity(record, now),
            FeedType::OptionsFlow => self.assess_options_flow(record, now),
        }
    }

    /// Premium floor, ensemble, confidence floor. Shared by both feeds.
    fn screen(&self, fields: &OptionFields, direction: Direction) -> Result<EnsembleResult, Suppression> {
        if fields.premium < self.config.min_premium {
            return Err(Suppression::BelowPremium {
                premium: fields.premium,
                minimum: self.config.min_premium,
            });
        }

        let ensemble = self
            .predictor
            .predict(&fields.score_inputs(direction), fields.darkpool_notional);

        if ensemble.score < self.config.min_confidence {
            return Err(Suppression::BelowConfidence {
                score: ensemble.score,
                minimum: self.config.min_confidence,
            });
        }

        Ok(ensemble)
    }
}

/// Unusual-activity alert for `record` under `config`, stamped with `now`
pub fn evaluate_unusual_activity(
    record: &RawRecord,
    config: &AlertConfig,
    now: DateTime<Tz>,
) -> Option<FormattedAlert> {
    AlertBuilder::new(config.clone()).unusual_activity(record, now)
}

/// Options-flow alert for `record` under `config`, stamped with `now`
pub fn evaluate_options_flow(
    record: &RawRecord,
    config: &AlertConfig,
    now: DateTime<Tz>,
) -> Option<FormattedAlert> {
    AlertBuilder::new(config.clone()).options_flow(record, now)
}

fn timestamp_line(now: &DateTime<Tz>) -> String {
    format!("🕒 {}", now.format("%H:%M:%S %Z"))
}
