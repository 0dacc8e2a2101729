use crate::indicators::Indicator;
use crate::model::FinancialRecord;
use crate::ratios::outcome::{RatioResult, RatioTier};
use crate::ratios::RatioKind;
use crate::rules::schema::{AnalysisConfig, ThresholdPair};
use std::collections::BTreeMap;

/// Computes the prudential ratios of one record against one config.
pub struct RatioCalculator<'a> {
    record: &'a FinancialRecord,
    config: &'a AnalysisConfig,
}

impl<'a> RatioCalculator<'a> {
    pub fn new(record: &'a FinancialRecord, config: &'a AnalysisConfig) -> Self {
        RatioCalculator { record, config }
    }

    fn get(&self, indicator: Indicator) -> f64 {
        self.record.get(indicator)
    }

    /// Cash and equivalents are the only liquid assets reports disclose reliably.
    pub fn liquid_assets(&self) -> f64 {
        self.get(Indicator::CashAndEquivalents)
    }

    pub fn demand_deposits(&self) -> f64 {
        self.get(Indicator::DepositsFromCustomers) * self.config.calibration.demand_deposit_share
    }

    pub fn short_term_liabilities(&self) -> f64 {
        self.get(Indicator::TotalLiabilities) * self.config.calibration.short_term_liability_share
    }

    pub fn capital_adequacy(&self) -> RatioResult {
        let assets = self.get(Indicator::TotalAssets);
        if assets == 0.0 {
            return RatioResult::not_calculable("Total assets is zero");
        }
        self.rate(RatioKind::CapitalAdequacy, self.get(Indicator::Equity) / assets)
    }

    pub fn instant_liquidity(&self) -> RatioResult {
        let demand = self.demand_deposits();
        if demand == 0.0 {
            return RatioResult::not_calculable("Demand deposits is zero");
        }
        self.rate(RatioKind::InstantLiquidity, self.liquid_assets() / demand)
    }

    pub fn current_liquidity(&self) -> RatioResult {
        let short_term = self.short_term_liabilities();
        if short_term == 0.0 {
            return RatioResult::not_calculable("Short-term liabilities is zero");
        }
        self.rate(RatioKind::CurrentLiquidity, self.liquid_assets() / short_term)
    }

    pub fn roe(&self) -> RatioResult {
        let equity = self.get(Indicator::Equity);
        if equity == 0.0 {
            return RatioResult::not_calculable("Equity is zero");
        }
        self.rate(RatioKind::Roe, self.get(Indicator::NetIncome) / equity)
    }

    pub fn roa(&self) -> RatioResult {
        let assets = self.get(Indicator::TotalAssets);
        if assets == 0.0 {
            return RatioResult::not_calculable("Total assets is zero");
        }
        self.rate(RatioKind::Roa, self.get(Indicator::NetIncome) / assets)
    }

    pub fn nim(&self) -> RatioResult {
        let assets = self.get(Indicator::TotalAssets);
        if assets == 0.0 {
            return RatioResult::not_calculable("Total assets is zero");
        }
        self.rate(RatioKind::Nim, self.get(Indicator::NetInterestIncome) / assets)
    }

    /// Problem loans are not disclosed line by line, so the configured
    /// share of the loan book stands in for them.
    pub fn problem_loans_ratio(&self) -> RatioResult {
        let loans = self.get(Indicator::LoansToCustomers);
        if loans == 0.0 {
            return RatioResult::not_calculable("Loans to customers is zero");
        }
        let problem_loans = loans * self.config.calibration.problem_loan_share;
        self.rate(RatioKind::ProblemLoansRatio, problem_loans / loans)
    }

    pub fn calculate(&self, kind: RatioKind) -> RatioResult {
        match kind {
            RatioKind::CapitalAdequacy => self.capital_adequacy(),
            RatioKind::InstantLiquidity => self.instant_liquidity(),
            RatioKind::CurrentLiquidity => self.current_liquidity(),
            RatioKind::Roe => self.roe(),
            RatioKind::Roa => self.roa(),
            RatioKind::Nim => self.nim(),
            RatioKind::ProblemLoansRatio => self.problem_loans_ratio(),
        }
    }

    pub fn calculate_all(&self) -> BTreeMap<RatioKind, RatioResult> {
        RatioKind::ALL
            .iter()
            .map(|kind| (*kind, self.calculate(*kind)))
            .collect()
    }

    fn rate(&self, kind: RatioKind, value: f64) -> RatioResult {
        let Some(pair) = self.config.threshold(kind) else {
            return RatioResult::not_calculable(format!("No threshold configured for {}", kind.key()));
        };
        let (tier, text) = interpret(kind, value, pair);
        RatioResult::rated(value, tier, text)
    }
}

fn tier_words(kind: RatioKind) -> [&'static str; 3] {
    match kind {
        RatioKind::CapitalAdequacy => ["Excellent", "Adequate", "Deficient"],
        RatioKind::InstantLiquidity | RatioKind::CurrentLiquidity => ["Strong", "Adequate", "Concerning"],
        RatioKind::Roe | RatioKind::Roa | RatioKind::Nim => ["Excellent", "Good", "Low"],
        RatioKind::ProblemLoansRatio => ["Healthy", "Concerning", "Critical"],
    }
}

/// Pick the tier and render the reading, e.g. "Good: 12.00% (meets minimum of 10.00%)".
pub fn interpret(kind: RatioKind, value: f64, pair: &ThresholdPair) -> (RatioTier, String) {
    let [top, middle, bottom] = tier_words(kind);
    let show = |v: f64| kind.format_value(v);
    match *pair {
        ThresholdPair::HigherIsBetter { min, ideal } => {
            let top_phrase = if kind == RatioKind::CapitalAdequacy {
                "above target of"
            } else {
                "exceeds target of"
            };
            if value >= ideal {
                (RatioTier::Top, format!("{top}: {} ({top_phrase} {})", show(value), show(ideal)))
            } else if value >= min {
                (RatioTier::Middle, format!("{middle}: {} (meets minimum of {})", show(value), show(min)))
            } else {
                (RatioTier::Bottom, format!("{bottom}: {} (below minimum of {})", show(value), show(min)))
            }
        }
        ThresholdPair::LowerIsBetter {
            ideal_max,
            concerning_max,
        } => {
            if value <= ideal_max {
                (RatioTier::Top, format!("{top}: {} (below target of {})", show(value), show(ideal_max)))
            } else if value <= concerning_max {
                (
                    RatioTier::Middle,
                    format!("{middle}: {} (approaching threshold of {})", show(value), show(concerning_max)),
                )
            } else {
                (
                    RatioTier::Bottom,
                    format!("{bottom}: {} (exceeds threshold of {})", show(value), show(concerning_max)),
                )
            }
        }
    }
}
