//! Direction classification and whale detection

use serde::{Deserialize, Serialize};
use std::fmt;

/// Delta at or beyond which a contract is read as directional
pub const DIRECTIONAL_DELTA: f64 = 0.3;

/// Whale trade thresholds
pub const WHALE_PREMIUM: f64 = 500_000.0;
pub const WHALE_VOL_OI: f64 = 20.0;
pub const WHALE_DELTA: f64 = 0.8;

/// Trade direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
}

impl Direction {
    /// Bullish from +0.3 delta up, bearish from -0.3 down, neutral in between
    pub fn from_delta(delta: f64) -> Self {
        if delta >= DIRECTIONAL_DELTA {
            Direction::Bullish
        } else if delta <= -DIRECTIONAL_DELTA {
            Direction::Bearish
        } else {
            Direction::Neutral
        }
    }

    /// Parse an upstream direction label, case-insensitively. Anything else,
    /// padded labels included, is neutral.
    pub fn from_label(label: &str) -> Self {
        match label.to_uppercase().as_str() {
            "BULLISH" => Direction::Bullish,
            "BEARISH" => Direction::Bearish,
            _ => Direction::Neutral,
        }
    }

    /// Whether the direction carries information
    pub fn is_known(&self) -> bool {
        !matches!(self, Direction::Neutral)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Bullish => "BULLISH",
            Direction::Bearish => "BEARISH",
            Direction::Neutral => "NEUTRAL",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Direction::Bullish => "🟢",
            Direction::Bearish => "🔴",
            Direction::Neutral => "⚪",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive keyword match on a free-text order type
pub fn order_type_contains(order_type: &str, keyword: &str) -> bool {
    order_type.to_uppercase().contains(&keyword.to_uppercase())
}

/// Whale trade: large premium, heavy vol/OI, deep delta or a block print
pub fn detect_whale(premium: f64, vol_over_oi: f64, delta: f64, order_type: &str) -> bool {
    premium >= WHALE_PREMIUM
        || vol_over_oi >= WHALE_VOL_OI
        || delta.abs() >= WHALE_DELTA
        || order_type_contains(order_type, "BLOCK")
}
