use crate::ratios::RatioKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Thresholds, weights and calibration constants for one analysis profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub thresholds: BTreeMap<RatioKind, ThresholdPair>,
    /// Stability weights; expected to sum to 1.
    pub weights: BTreeMap<RatioKind, f64>,
    #[serde(default)]
    pub calibration: Calibration,
}

impl AnalysisConfig {
    pub fn threshold(&self, kind: RatioKind) -> Option<&ThresholdPair> {
        self.thresholds.get(&kind)
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.values().sum()
    }
}

/// Two-level threshold for a ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "direction", rename_all = "snake_case")]
pub enum ThresholdPair {
    /// Below `min` is deficient, at or above `ideal` is excellent.
    HigherIsBetter { min: f64, ideal: f64 },
    /// At or below `ideal_max` is healthy, above `concerning_max` is critical.
    LowerIsBetter { ideal_max: f64, concerning_max: f64 },
}

impl ThresholdPair {
    /// Map a raw ratio onto [0, 1] against this threshold pair.
    pub fn normalize(&self, value: f64) -> f64 {
        match *self {
            ThresholdPair::HigherIsBetter { min, ideal } => normalize_score(value, min, ideal),
            ThresholdPair::LowerIsBetter {
                ideal_max,
                concerning_max,
            } => normalize_score_reversed(value, ideal_max, concerning_max),
        }
    }
}

/// 0 below `min`, 1 at or above `ideal`, linear in between.
pub fn normalize_score(value: f64, min: f64, ideal: f64) -> f64 {
    if value.is_nan() || value < min {
        0.0
    } else if value >= ideal {
        1.0
    } else {
        (value - min) / (ideal - min)
    }
}

/// 1 at or below `ideal_max`, 0 above `concerning_max`, linear in between.
pub fn normalize_score_reversed(value: f64, ideal_max: f64, concerning_max: f64) -> f64 {
    if value.is_nan() || value > concerning_max {
        0.0
    } else if value <= ideal_max {
        1.0
    } else {
        1.0 - (value - ideal_max) / (concerning_max - ideal_max)
    }
}

/// Heuristic constants used where reports do not disclose a figure directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    /// Share of customer deposits treated as payable on demand.
    pub demand_deposit_share: f64,
    /// Share of total liabilities treated as short-term.
    pub short_term_liability_share: f64,
    /// Assumed problem-loan share of the loan book.
    pub problem_loan_share: f64,
    /// Scale applied to small unlabelled headline amounts.
    pub assumed_unit_multiplier: f64,
    /// Headline amounts at or above this are taken as already in roubles.
    pub assumed_unit_ceiling: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Calibration {
            demand_deposit_share: 0.7,
            short_term_liability_share: 0.5,
            problem_loan_share: 0.03,
            assumed_unit_multiplier: 1e9,
            assumed_unit_ceiling: 1e12,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bounds() {
        assert_eq!(normalize_score(0.05, 0.08, 0.12), 0.0);
        assert_eq!(normalize_score(0.12, 0.08, 0.12), 1.0);
        assert_eq!(normalize_score(0.5, 0.08, 0.12), 1.0);
        assert!((normalize_score(0.10, 0.08, 0.12) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_reversed_bounds() {
        assert_eq!(normalize_score_reversed(0.01, 0.02, 0.05), 1.0);
        assert_eq!(normalize_score_reversed(0.02, 0.02, 0.05), 1.0);
        assert_eq!(normalize_score_reversed(0.06, 0.02, 0.05), 0.0);
        assert!((normalize_score_reversed(0.035, 0.02, 0.05) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_nan_is_zero() {
        assert_eq!(normalize_score(f64::NAN, 0.0, 1.0), 0.0);
        assert_eq!(normalize_score_reversed(f64::NAN, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_threshold_pair_serde_tag() {
        let pair: ThresholdPair =
            serde_json::from_str(r#"{"direction": "lower_is_better", "ideal_max": 0.02, "concerning_max": 0.05}"#)
                .unwrap();
        assert_eq!(
            pair,
            ThresholdPair::LowerIsBetter {
                ideal_max: 0.02,
                concerning_max: 0.05
            }
        );
    }

    #[test]
    fn test_calibration_defaults_fill_missing_fields() {
        let c: Calibration = serde_json::from_str(r#"{"problem_loan_share": 0.05}"#).unwrap();
        assert_eq!(c.problem_loan_share, 0.05);
        assert_eq!(c.demand_deposit_share, 0.7);
        assert_eq!(c.assumed_unit_ceiling, 1e12);
    }
}
