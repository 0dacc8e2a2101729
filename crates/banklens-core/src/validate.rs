//! Plausibility checks. Every check returns warnings; none of them fail.

use crate::indicators::Indicator;
use crate::model::FinancialRecord;
use crate::ratios::RatioResult;

const MAX_NET_INCOME: f64 = 1e15;
const MAX_RATIO_MAGNITUDE: f64 = 1000.0;
const MIN_TEXT_CHARS: usize = 100;
const MIN_BANKING_KEYWORDS: usize = 3;

const BANKING_KEYWORDS: &[&str] = &[
    "баланс",
    "активы",
    "обязательства",
    "капитал",
    "доходы",
    "расходы",
    "прибыль",
    "убыток",
    "кредит",
    "депозит",
    "банк",
];

pub fn validate_record(record: &FinancialRecord) -> Vec<String> {
    let mut warnings = Vec::new();

    if record.resolved_count() == 0 {
        warnings.push("No indicators were extracted".to_string());
        return warnings;
    }
    if record.get(Indicator::TotalAssets) < 0.0 {
        warnings.push("total_assets is negative".to_string());
    }
    if record.get(Indicator::Equity) < 0.0 {
        warnings.push("equity is negative".to_string());
    }
    let net_income = record.get(Indicator::NetIncome);
    if net_income.abs() > MAX_NET_INCOME {
        warnings.push(format!("net_income {net_income:e} is implausibly large"));
    }
    warnings
}

pub fn validate_ratio(result: &RatioResult) -> Vec<String> {
    if result.value.is_nan() {
        vec!["Ratio value is NaN".to_string()]
    } else if result.value.abs() > MAX_RATIO_MAGNITUDE {
        vec![format!("Ratio value {} is implausibly large", result.value)]
    } else {
        Vec::new()
    }
}

/// Check that extracted text looks like a bank report.
pub fn validate_text_content(text: &str) -> Vec<String> {
    let mut warnings = Vec::new();
    if text.trim().chars().count() < MIN_TEXT_CHARS {
        warnings.push(format!("Text is very short (under {MIN_TEXT_CHARS} characters)"));
    }

    let lower = text.to_lowercase();
    let found: Vec<&str> = BANKING_KEYWORDS
        .iter()
        .copied()
        .filter(|kw| lower.contains(kw))
        .collect();
    if found.len() < MIN_BANKING_KEYWORDS {
        warnings.push(format!(
            "Text contains few banking keywords ({}), it may not be a bank report",
            found.join(", ")
        ));
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_warns() {
        let warnings = validate_record(&FinancialRecord::new());
        assert_eq!(warnings, vec!["No indicators were extracted".to_string()]);
    }

    #[test]
    fn test_healthy_record_has_no_warnings() {
        let record = FinancialRecord::new()
            .with(Indicator::TotalAssets, 1e12)
            .with(Indicator::Equity, 1e11)
            .with(Indicator::NetIncome, 2e10);
        assert!(validate_record(&record).is_empty());
    }

    #[test]
    fn test_negative_and_oversized_values_warn() {
        let record = FinancialRecord::new()
            .with(Indicator::TotalAssets, -5.0)
            .with(Indicator::Equity, -1.0)
            .with(Indicator::NetIncome, 2e15);
        assert_eq!(validate_record(&record).len(), 3);
    }

    #[test]
    fn test_ratio_checks() {
        assert!(validate_ratio(&RatioResult::not_calculable("x")).is_empty());
        let mut result = RatioResult::not_calculable("x");
        result.value = f64::NAN;
        assert_eq!(validate_ratio(&result).len(), 1);
        result.value = 5000.0;
        assert_eq!(validate_ratio(&result).len(), 1);
    }

    #[test]
    fn test_text_content_checks() {
        assert_eq!(validate_text_content("short").len(), 2);

        let report = "Бухгалтерский баланс банка. Активы, обязательства и капитал. ".repeat(3);
        assert!(validate_text_content(&report).is_empty());
    }
}
