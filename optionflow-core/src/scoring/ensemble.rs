//! Ensemble across synthetic timeframes plus the dark-pool boost

use super::scorer::{ScoreInputs, ScoringModel, MAX_SCORE};
use super::tiers::TierTable;
use crate::classify::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean timeframe score at or above which the ensemble reads bullish
pub const BULLISH_MEAN: f64 = 60.0;

/// Synthetic prediction horizons
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "60m")]
    SixtyMinutes,
    #[serde(rename = "EOD")]
    EndOfDay,
}

impl Timeframe {
    pub const ALL: [Timeframe; 5] = [
        Timeframe::FiveMinutes,
        Timeframe::FifteenMinutes,
        Timeframe::ThirtyMinutes,
        Timeframe::SixtyMinutes,
        Timeframe::EndOfDay,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::FiveMinutes => "5m",
            Timeframe::FifteenMinutes => "15m",
            Timeframe::ThirtyMinutes => "30m",
            Timeframe::SixtyMinutes => "60m",
            Timeframe::EndOfDay => "EOD",
        }
    }

    /// Multiplier applied to premium for this horizon
    pub fn premium_decay(&self) -> f64 {
        match self {
            Timeframe::FiveMinutes => 1.0,
            Timeframe::FifteenMinutes => 0.9,
            Timeframe::ThirtyMinutes => 0.85,
            Timeframe::SixtyMinutes => 0.8,
            Timeframe::EndOfDay => 0.75,
        }
    }

    /// Multiplier applied to delta for this horizon
    pub fn delta_decay(&self) -> f64 {
        match self {
            Timeframe::FiveMinutes => 1.0,
            Timeframe::FifteenMinutes => 0.95,
            Timeframe::ThirtyMinutes => 0.9,
            Timeframe::SixtyMinutes => 0.85,
            Timeframe::EndOfDay => 0.8,
        }
    }

    /// Decayed copy of `inputs` for this horizon
    pub fn decay(&self, inputs: &ScoreInputs) -> ScoreInputs {
        ScoreInputs {
            premium: inputs.premium * self.premium_decay(),
            delta: inputs.delta * self.delta_decay(),
            ..inputs.clone()
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Score per timeframe, in `Timeframe::ALL` order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeframePredictions(Vec<(Timeframe, u8)>);

impl TimeframePredictions {
    pub fn get(&self, timeframe: Timeframe) -> Option<u8> {
        self.0
            .iter()
            .find(|(tf, _)| *tf == timeframe)
            .map(|(_, score)| *score)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Timeframe, u8)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Arithmetic mean; zero when empty
    pub fn mean(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        let total: u32 = self.0.iter().map(|(_, score)| *score as u32).sum();
        total as f64 / self.0.len() as f64
    }
}

/// Aggregated direction and conviction for one record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnsembleResult {
    pub direction: Direction,
    /// Rounded mean plus dark-pool boost, capped at 100
    pub score: u8,
    /// Rounded mean before the boost
    pub base_score: u8,
    pub darkpool_boost: u8,
    pub predictions: TimeframePredictions,
}

/// Runs the scorer across every timeframe and aggregates
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnsemblePredictor {
    pub model: ScoringModel,
    pub darkpool: TierTable,
}

impl Default for EnsemblePredictor {
    fn default() -> Self {
        Self {
            model: ScoringModel::default(),
            darkpool: TierTable::at_least(&[
                (100_000_000.0, 30),
                (50_000_000.0, 20),
                (10_000_000.0, 10),
            ]),
        }
    }
}

impl EnsemblePredictor {
    pub fn new(model: ScoringModel, darkpool: TierTable) -> Self {
        Self { model, darkpool }
    }

    pub fn predict_timeframes(&self, inputs: &ScoreInputs) -> TimeframePredictions {
        TimeframePredictions(
            Timeframe::ALL
                .iter()
                .map(|tf| (*tf, self.model.score(&tf.decay(inputs))))
                .collect(),
        )
    }

    pub fn darkpool_boost(&self, notional: f64) -> u8 {
        self.darkpool.weight_for(notional).min(MAX_SCORE as u32) as u8
    }

    /// Direction from the unrounded mean; score is the rounded mean plus
    /// the dark-pool boost, applied once and capped.
    pub fn predict(&self, inputs: &ScoreInputs, darkpool_notional: f64) -> EnsembleResult {
        let predictions = self.predict_timeframes(inputs);
        let mean = predictions.mean();

        let direction = if mean >= BULLISH_MEAN {
            Direction::Bullish
        } else {
            Direction::Bearish
        };

        let base_score = mean.round_ties_even() as u8;
        let darkpool_boost = self.darkpool_boost(darkpool_notional);
        let score = base_score.saturating_add(darkpool_boost).min(MAX_SCORE);

        EnsembleResult {
            direction,
            score,
            base_score,
            darkpool_boost,
            predictions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(premium: f64, vol_over_oi: f64, delta: f64, dte: f64, order_type: &str) -> ScoreInputs {
        ScoreInputs {
            premium,
            vol_over_oi,
            delta,
            days_to_expiration: dte,
            order_type: order_type.to_string(),
            direction: Direction::from_delta(delta),
        }
    }

    #[test]
    fn test_whale_sweep_is_bullish_and_capped() {
        let predictor = EnsemblePredictor::default();
        let result = predictor.predict(&inputs(600_000.0, 25.0, 0.95, 1.0, "SWEEP"), 0.0);

        // 5m keeps every top bucket; later horizons lose delta tiers as it decays
        assert_eq!(result.predictions.get(Timeframe::FiveMinutes), Some(100));
        assert_eq!(result.predictions.get(Timeframe::FifteenMinutes), Some(100));
        assert_eq!(result.predictions.get(Timeframe::EndOfDay), Some(100));
        assert_eq!(result.direction, Direction::Bullish);
        assert_eq!(result.score, 100);
        assert_eq!(result.darkpool_boost, 0);
    }

    #[test]
    fn test_decay_crosses_tiers() {
        let predictor = EnsemblePredictor::default();
        // premium 1.05M drops below 1M from 15m on; delta 0.92 drops below 0.9 from 15m on
        let preds = predictor.predict_timeframes(&inputs(1_050_000.0, 0.0, 0.92, 30.0, ""));
        let scores: Vec<u8> = preds.iter().map(|(_, s)| *s).collect();
        assert_eq!(scores, vec![70, 55, 55, 55, 55]);
        assert_eq!(preds.mean(), 58.0);
    }

    #[test]
    fn test_low_conviction_reads_bearish() {
        let predictor = EnsemblePredictor::default();
        let result = predictor.predict(&inputs(60_000.0, 1.0, 0.1, 30.0, ""), 0.0);
        // premium 60k decays below 50k from 60m on
        assert_eq!(result.base_score, 12);
        assert_eq!(result.direction, Direction::Bearish);
        assert!(result.score < 70);
    }

    #[test]
    fn test_darkpool_boost_tiers_are_monotonic() {
        let predictor = EnsemblePredictor::default();
        let base = inputs(300_000.0, 12.0, 0.6, 2.0, "");

        let notionals = [0.0, 9_900_000.0, 10_000_000.0, 50_000_000.0, 100_000_000.0];
        let scores: Vec<u8> = notionals
            .iter()
            .map(|n| predictor.predict(&base, *n).score)
            .collect();

        for pair in scores.windows(2) {
            assert!(pair[0] <= pair[1], "boost not monotonic: {scores:?}");
        }
        assert_eq!(predictor.darkpool_boost(9_900_000.0), 0);
        assert_eq!(predictor.darkpool_boost(10_000_000.0), 10);
        assert_eq!(predictor.darkpool_boost(50_000_000.0), 20);
        assert_eq!(predictor.darkpool_boost(100_000_000.0), 30);
    }

    #[test]
    fn test_boost_applied_after_averaging_and_capped() {
        let predictor = EnsemblePredictor::default();
        let result = predictor.predict(&inputs(600_000.0, 25.0, 0.95, 1.0, "SWEEP"), 250_000_000.0);
        assert_eq!(result.base_score, 100);
        assert_eq!(result.darkpool_boost, 30);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_direction_uses_unboosted_mean() {
        let predictor = EnsemblePredictor::default();
        let result = predictor.predict(&inputs(60_000.0, 1.0, 0.1, 30.0, ""), 150_000_000.0);
        assert_eq!(result.direction, Direction::Bearish);
        assert_eq!(result.score, result.base_score + 30);
    }
}
