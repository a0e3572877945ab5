//! Tiered threshold tables
//!
//! A table is an ordered list of `(threshold, weight)` pairs. The first tier
//! whose threshold the input meets contributes its weight; no match
//! contributes zero.

use serde::{Deserialize, Serialize};

/// How an input is compared against tier thresholds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    /// Input must be at least the threshold
    AtLeast,
    /// Input must be at most the threshold
    AtMost,
}

impl Comparison {
    fn matches(&self, input: f64, threshold: f64) -> bool {
        match self {
            Comparison::AtLeast => input >= threshold,
            Comparison::AtMost => input <= threshold,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub threshold: f64,
    pub weight: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierTable {
    pub comparison: Comparison,
    pub tiers: Vec<Tier>,
}

impl TierTable {
    /// Descending thresholds, each requiring `input >= threshold`
    pub fn at_least(tiers: &[(f64, u32)]) -> Self {
        Self::new(Comparison::AtLeast, tiers)
    }

    /// Ascending thresholds, each requiring `input <= threshold`
    pub fn at_most(tiers: &[(f64, u32)]) -> Self {
        Self::new(Comparison::AtMost, tiers)
    }

    fn new(comparison: Comparison, tiers: &[(f64, u32)]) -> Self {
        Self {
            comparison,
            tiers: tiers
                .iter()
                .map(|&(threshold, weight)| Tier { threshold, weight })
                .collect(),
        }
    }

    /// Weight of the first matching tier. NaN never matches.
    pub fn weight_for(&self, input: f64) -> u32 {
        self.tiers
            .iter()
            .find(|tier| self.comparison.matches(input, tier.threshold))
            .map(|tier| tier.weight)
            .unwrap_or(0)
    }
}

/// Bonus added when a free-text label contains a keyword
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordBonus {
    pub keyword: String,
    pub weight: u32,
}

impl KeywordBonus {
    pub fn new(keyword: impl Into<String>, weight: u32) -> Self {
        Self {
            keyword: keyword.into().to_uppercase(),
            weight,
        }
    }

    /// `label_upper` must already be uppercased
    pub fn weight_for(&self, label_upper: &str) -> u32 {
        if label_upper.contains(&self.keyword) {
            self.weight
        } else {
            0
        }
    }
}
