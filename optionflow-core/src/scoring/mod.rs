//! Confidence scoring
//!
//! A fixed rule table scores one record for one horizon; the ensemble runs
//! it across five decayed horizons and folds in dark-pool size.

pub mod tiers;
pub mod scorer;
pub mod ensemble;

pub use tiers::{Comparison, KeywordBonus, Tier, TierTable};
pub use scorer::{ScoreBreakdown, ScoreInputs, ScoringModel, MAX_SCORE};
pub use ensemble::{EnsemblePredictor, EnsembleResult, Timeframe, TimeframePredictions, BULLISH_MEAN};
