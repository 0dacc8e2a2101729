//! Bank stability index: a weighted average of threshold-normalized ratios.

use crate::ratios::{RatioKind, RatioResult};
use crate::rules::schema::AnalysisConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StabilityBand {
    Excellent,
    Good,
    Adequate,
    Concerning,
    Critical,
}

impl StabilityBand {
    /// Lower bounds are inclusive.
    pub fn from_score(score: f64) -> StabilityBand {
        if score >= 0.8 {
            StabilityBand::Excellent
        } else if score >= 0.6 {
            StabilityBand::Good
        } else if score >= 0.4 {
            StabilityBand::Adequate
        } else if score >= 0.2 {
            StabilityBand::Concerning
        } else {
            StabilityBand::Critical
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            StabilityBand::Excellent => "Excellent",
            StabilityBand::Good => "Good",
            StabilityBand::Adequate => "Adequate",
            StabilityBand::Concerning => "Concerning",
            StabilityBand::Critical => "Critical",
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            StabilityBand::Excellent => "Continue the current strategy",
            StabilityBand::Good => "Monitor key indicators",
            StabilityBand::Adequate => "Consider measures to strengthen weak ratios",
            StabilityBand::Concerning => "Urgent measures are needed to restore stability",
            StabilityBand::Critical => "Immediate intervention required",
        }
    }

    pub fn is_at_risk(self) -> bool {
        matches!(self, StabilityBand::Concerning | StabilityBand::Critical)
    }
}

impl fmt::Display for StabilityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title().to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityScore {
    pub score: f64,
    pub band: StabilityBand,
    pub interpretation: String,
}

impl StabilityScore {
    pub fn from_score(score: f64) -> Self {
        let band = StabilityBand::from_score(score);
        StabilityScore {
            score,
            band,
            interpretation: format!("{} stability: {:.2}/1.00", band.title(), score),
        }
    }
}

/// Normalized [0, 1] reading of one ratio. Ratios that are missing,
/// not calculable or NaN count as 0.
pub fn normalized_ratio(
    kind: RatioKind,
    ratios: &BTreeMap<RatioKind, RatioResult>,
    config: &AnalysisConfig,
) -> f64 {
    let Some(result) = ratios.get(&kind) else {
        return 0.0;
    };
    if !result.interpretation.is_calculable() || result.value.is_nan() {
        return 0.0;
    }
    config
        .threshold(kind)
        .map(|pair| pair.normalize(result.value))
        .unwrap_or(0.0)
}

/// Weighted average over the configured weights, divided by their total.
pub fn compose(ratios: &BTreeMap<RatioKind, RatioResult>, config: &AnalysisConfig) -> StabilityScore {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for (kind, weight) in &config.weights {
        let normalized = normalized_ratio(*kind, ratios, config);
        tracing::trace!(ratio = kind.key(), normalized, weight, "stability component");
        weighted += weight * normalized;
        total_weight += weight;
    }

    let score = if total_weight > 0.0 {
        (weighted / total_weight).clamp(0.0, 1.0)
    } else {
        0.0
    };
    StabilityScore::from_score(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratios::RatioTier;
    use crate::rules::builtin::default_config;
    use crate::rules::schema::ThresholdPair;

    fn rated(value: f64) -> RatioResult {
        RatioResult::rated(value, RatioTier::Top, String::new())
    }

    fn at_ideal(config: &AnalysisConfig) -> BTreeMap<RatioKind, RatioResult> {
        config
            .thresholds
            .iter()
            .map(|(kind, pair)| {
                let v = match *pair {
                    ThresholdPair::HigherIsBetter { ideal, .. } => ideal,
                    ThresholdPair::LowerIsBetter { ideal_max, .. } => ideal_max,
                };
                (*kind, rated(v))
            })
            .collect()
    }

    #[test]
    fn test_all_ideal_scores_one() {
        let config = default_config().unwrap();
        let score = compose(&at_ideal(&config), &config);
        assert_eq!(score.score, 1.0);
        assert_eq!(score.band, StabilityBand::Excellent);
        assert_eq!(score.interpretation, "Excellent stability: 1.00/1.00");
    }

    #[test]
    fn test_empty_ratios_score_zero() {
        let config = default_config().unwrap();
        let score = compose(&BTreeMap::new(), &config);
        assert_eq!(score.score, 0.0);
        assert_eq!(score.band, StabilityBand::Critical);
    }

    #[test]
    fn test_not_calculable_counts_as_zero() {
        let config = default_config().unwrap();
        let mut ratios = BTreeMap::new();
        ratios.insert(
            RatioKind::ProblemLoansRatio,
            RatioResult::not_calculable("Loans to customers is zero"),
        );
        assert_eq!(normalized_ratio(RatioKind::ProblemLoansRatio, &ratios, &config), 0.0);
    }

    #[test]
    fn test_nan_counts_as_zero() {
        let config = default_config().unwrap();
        let mut ratios = BTreeMap::new();
        ratios.insert(RatioKind::Roe, rated(f64::NAN));
        assert_eq!(normalized_ratio(RatioKind::Roe, &ratios, &config), 0.0);
    }

    #[test]
    fn test_partial_score_uses_weights() {
        let config = default_config().unwrap();
        let mut ratios = BTreeMap::new();
        // capital adequacy at ideal (weight 0.20), roe halfway (weight 0.15)
        ratios.insert(RatioKind::CapitalAdequacy, rated(0.12));
        ratios.insert(RatioKind::Roe, rated(0.125));
        let score = compose(&ratios, &config);
        assert!((score.score - (0.20 + 0.15 * 0.5)).abs() < 1e-9);
        assert_eq!(score.band, StabilityBand::Concerning);
    }

    #[test]
    fn test_band_boundaries_inclusive() {
        assert_eq!(StabilityBand::from_score(0.8), StabilityBand::Excellent);
        assert_eq!(StabilityBand::from_score(0.6), StabilityBand::Good);
        assert_eq!(StabilityBand::from_score(0.4), StabilityBand::Adequate);
        assert_eq!(StabilityBand::from_score(0.2), StabilityBand::Concerning);
        assert_eq!(StabilityBand::from_score(0.1999), StabilityBand::Critical);
    }

    #[test]
    fn test_band_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&StabilityBand::Excellent).unwrap(), "\"excellent\"");
        assert_eq!(StabilityBand::Good.to_string(), "good");
    }
}
