pub mod calculator;
pub mod outcome;

pub use calculator::RatioCalculator;
pub use outcome::{Interpretation, RatioResult, RatioTier};

use serde::{Deserialize, Serialize};
use std::fmt;

/// The prudential ratios evaluated for every bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioKind {
    CapitalAdequacy,
    InstantLiquidity,
    CurrentLiquidity,
    Roe,
    Roa,
    Nim,
    ProblemLoansRatio,
}

impl RatioKind {
    pub const ALL: &'static [RatioKind] = &[
        RatioKind::CapitalAdequacy,
        RatioKind::InstantLiquidity,
        RatioKind::CurrentLiquidity,
        RatioKind::Roe,
        RatioKind::Roa,
        RatioKind::Nim,
        RatioKind::ProblemLoansRatio,
    ];

    pub fn key(self) -> &'static str {
        match self {
            RatioKind::CapitalAdequacy => "capital_adequacy",
            RatioKind::InstantLiquidity => "instant_liquidity",
            RatioKind::CurrentLiquidity => "current_liquidity",
            RatioKind::Roe => "roe",
            RatioKind::Roa => "roa",
            RatioKind::Nim => "nim",
            RatioKind::ProblemLoansRatio => "problem_loans_ratio",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            RatioKind::CapitalAdequacy => "Capital adequacy",
            RatioKind::InstantLiquidity => "Instant liquidity",
            RatioKind::CurrentLiquidity => "Current liquidity",
            RatioKind::Roe => "ROE",
            RatioKind::Roa => "ROA",
            RatioKind::Nim => "NIM",
            RatioKind::ProblemLoansRatio => "Problem loans",
        }
    }

    /// Only the problem-loan share improves as it falls.
    pub fn lower_is_better(self) -> bool {
        self == RatioKind::ProblemLoansRatio
    }

    /// Ratios stated as a multiple rather than a share.
    pub fn is_multiple(self) -> bool {
        self == RatioKind::CurrentLiquidity
    }

    /// "12.00%" for shares, "1.50" for multiples.
    pub fn format_value(self, value: f64) -> String {
        if self.is_multiple() {
            format!("{value:.2}")
        } else {
            format!("{:.2}%", value * 100.0)
        }
    }
}

impl fmt::Display for RatioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
