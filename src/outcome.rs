//! Prediction outcomes and their running tally.

use serde::{Deserialize, Serialize};

/// How a dendrite's activation compared with the expected signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Expected a match and fired
    TruePositive,
    /// Expected a match and stayed silent
    FalseNegative,
    /// Expected no match and stayed silent
    TrueNegative,
    /// Expected no match and fired
    FalsePositive,
}

impl Outcome {
    /// Classify an `(expected, activation)` pair.
    pub fn from_prediction(expected: bool, activation: bool) -> Self {
        match (expected, activation) {
            (true, true) => Outcome::TruePositive,
            (true, false) => Outcome::FalseNegative,
            (false, false) => Outcome::TrueNegative,
            (false, true) => Outcome::FalsePositive,
        }
    }

    /// True when plasticity fires for this outcome.
    #[inline]
    pub fn is_error(self) -> bool {
        matches!(self, Outcome::FalseNegative | Outcome::FalsePositive)
    }
}

/// Running counts of outcomes for one patch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub true_positives: u64,
    pub false_negatives: u64,
    pub true_negatives: u64,
    pub false_positives: u64,
}

impl ConfusionCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::TruePositive => self.true_positives += 1,
            Outcome::FalseNegative => self.false_negatives += 1,
            Outcome::TrueNegative => self.true_negatives += 1,
            Outcome::FalsePositive => self.false_positives += 1,
        }
    }

    /// Total number of recorded cycles.
    pub fn total(&self) -> u64 {
        self.true_positives + self.false_negatives + self.true_negatives + self.false_positives
    }

    /// Cycles where plasticity fired.
    pub fn errors(&self) -> u64 {
        self.false_negatives + self.false_positives
    }

    /// Fraction of correct predictions, or 0.0 before any cycle.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.true_positives + self.true_negatives) as f64 / total as f64
    }
}
