use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a ratio relative to its threshold pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioTier {
    /// At or beyond the ideal threshold.
    Top,
    /// Between the two thresholds.
    Middle,
    /// Beyond the minimum (or concerning) threshold on the wrong side.
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Interpretation {
    Rated { tier: RatioTier, text: String },
    NotCalculable { reason: String },
}

impl Interpretation {
    pub fn is_calculable(&self) -> bool {
        matches!(self, Interpretation::Rated { .. })
    }

    pub fn tier(&self) -> Option<RatioTier> {
        match self {
            Interpretation::Rated { tier, .. } => Some(*tier),
            Interpretation::NotCalculable { .. } => None,
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interpretation::Rated { text, .. } => f.write_str(text),
            Interpretation::NotCalculable { reason } => write!(f, "Cannot calculate: {reason}"),
        }
    }
}

/// A computed ratio and its reading. A zero denominator yields value 0
/// with a [`Interpretation::NotCalculable`] reason instead of an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioResult {
    pub value: f64,
    pub interpretation: Interpretation,
}

impl RatioResult {
    pub fn rated(value: f64, tier: RatioTier, text: String) -> Self {
        RatioResult {
            value,
            interpretation: Interpretation::Rated { tier, text },
        }
    }

    pub fn not_calculable(reason: impl Into<String>) -> Self {
        RatioResult {
            value: 0.0,
            interpretation: Interpretation::NotCalculable {
                reason: reason.into(),
            },
        }
    }
}
