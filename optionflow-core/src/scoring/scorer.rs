//! Single-timeframe multi-factor confidence scorer

use super::tiers::{KeywordBonus, TierTable};
use crate::classify::Direction;
use serde::{Deserialize, Serialize};

/// Upper bound of every confidence score
pub const MAX_SCORE: u8 = 100;

/// Inputs to one scoring pass
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreInputs {
    pub premium: f64,
    pub vol_over_oi: f64,
    pub delta: f64,
    pub days_to_expiration: f64,
    pub order_type: String,
    pub direction: Direction,
}

/// Contribution of each factor to a score, before clamping
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub premium: u32,
    pub vol_over_oi: u32,
    pub delta: u32,
    pub days_to_expiration: u32,
    pub order_type: u32,
    pub direction: u32,
}

impl ScoreBreakdown {
    pub fn raw_total(&self) -> u32 {
        self.premium
            + self.vol_over_oi
            + self.delta
            + self.days_to_expiration
            + self.order_type
            + self.direction
    }

    pub fn score(&self) -> u8 {
        self.raw_total().min(MAX_SCORE as u32) as u8
    }
}

/// Weight tables for the scorer.
///
/// Rule table, not a fitted model: every bucket is additive and keyword
/// bonuses stack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringModel {
    pub premium: TierTable,
    pub vol_over_oi: TierTable,
    pub abs_delta: TierTable,
    pub days_to_expiration: TierTable,
    pub order_type: Vec<KeywordBonus>,
    pub direction_known: u32,
}

impl Default for ScoringModel {
    fn default() -> Self {
        Self {
            premium: TierTable::at_least(&[(1_000_000.0, 40), (250_000.0, 30), (50_000.0, 20)]),
            vol_over_oi: TierTable::at_least(&[(20.0, 30), (10.0, 20), (5.0, 10)]),
            abs_delta: TierTable::at_least(&[(0.9, 20), (0.7, 15), (0.5, 10)]),
            days_to_expiration: TierTable::at_most(&[(1.0, 20), (3.0, 10)]),
            order_type: vec![KeywordBonus::new("SWEEP", 15), KeywordBonus::new("BLOCK", 20)],
            direction_known: 10,
        }
    }
}

impl ScoringModel {
    pub fn breakdown(&self, inputs: &ScoreInputs) -> ScoreBreakdown {
        let order_type = inputs.order_type.to_uppercase();

        ScoreBreakdown {
            premium: self.premium.weight_for(inputs.premium),
            vol_over_oi: self.vol_over_oi.weight_for(inputs.vol_over_oi),
            delta: self.abs_delta.weight_for(inputs.delta.abs()),
            days_to_expiration: self.days_to_expiration.weight_for(inputs.days_to_expiration),
            order_type: self
                .order_type
                .iter()
                .map(|bonus| bonus.weight_for(&order_type))
                .sum(),
            direction: if inputs.direction.is_known() {
                self.direction_known
            } else {
                0
            },
        }
    }

    /// Score in `[0, 100]`
    pub fn score(&self, inputs: &ScoreInputs) -> u8 {
        self.breakdown(inputs).score()
    }
}
