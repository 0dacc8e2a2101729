use crate::accounts::codes::{
    is_asset_code, is_liability_code, CASH_CODES, COMMISSION_EXPENSE, COMMISSION_INCOME,
    DEPOSIT_CODES, INTEREST_EXPENSE, INTEREST_INCOME, LOAN_CODES,
};
use crate::indicators::Indicator;
use std::collections::BTreeMap;

/// An indicator value summed from account codes, with the codes that fed it.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeTotal {
    pub indicator: Indicator,
    pub value: f64,
    pub codes: Vec<String>,
}

fn sum_where(codes: &BTreeMap<String, f64>, keep: impl Fn(&str) -> bool) -> Option<(f64, Vec<String>)> {
    let used: Vec<(&String, f64)> = codes
        .iter()
        .filter(|(code, _)| keep(code.as_str()))
        .map(|(code, amount)| (code, *amount))
        .collect();
    if used.is_empty() {
        return None;
    }
    let total = used.iter().map(|(_, amount)| amount).sum();
    Some((total, used.into_iter().map(|(code, _)| code.clone()).collect()))
}

/// Totals derived from balance sheet codes.
///
/// Codes starting with "1" are assets, "2" liabilities. Equity is assets
/// minus liabilities. Cash, loans and deposits only count their listed
/// codes. An indicator is produced only when at least one code feeds it.
pub fn summarize_balance_sheet(codes: &BTreeMap<String, f64>) -> Vec<CodeTotal> {
    let mut totals = Vec::new();

    let assets = sum_where(codes, is_asset_code);
    let liabilities = sum_where(codes, is_liability_code);

    if let Some((value, used)) = &assets {
        totals.push(CodeTotal {
            indicator: Indicator::TotalAssets,
            value: *value,
            codes: used.clone(),
        });
    }
    if let Some((value, used)) = &liabilities {
        totals.push(CodeTotal {
            indicator: Indicator::TotalLiabilities,
            value: *value,
            codes: used.clone(),
        });
    }
    if assets.is_some() || liabilities.is_some() {
        let (a, a_codes) = assets.unwrap_or_default();
        let (l, l_codes) = liabilities.unwrap_or_default();
        totals.push(CodeTotal {
            indicator: Indicator::Equity,
            value: a - l,
            codes: a_codes.into_iter().chain(l_codes).collect(),
        });
    }

    let listed = [
        (Indicator::CashAndEquivalents, CASH_CODES),
        (Indicator::LoansToCustomers, LOAN_CODES),
        (Indicator::DepositsFromCustomers, DEPOSIT_CODES),
    ];
    for (indicator, list) in listed {
        if let Some((value, used)) = sum_where(codes, |c| list.contains(&c)) {
            totals.push(CodeTotal {
                indicator,
                value,
                codes: used,
            });
        }
    }

    totals
}

/// Totals derived from income statement codes.
///
/// Net interest income is interest plus commission income less interest
/// plus commission expense. Net income is the signed sum of every amount.
pub fn summarize_income_statement(codes: &BTreeMap<String, f64>) -> Vec<CodeTotal> {
    let mut totals = Vec::new();

    let income = [INTEREST_INCOME, COMMISSION_INCOME];
    let expense = [INTEREST_EXPENSE, COMMISSION_EXPENSE];
    if let Some((_, used)) = sum_where(codes, |c| income.contains(&c) || expense.contains(&c)) {
        let earned: f64 = income.iter().filter_map(|c| codes.get(*c)).sum();
        let paid: f64 = expense.iter().filter_map(|c| codes.get(*c)).sum();
        totals.push(CodeTotal {
            indicator: Indicator::NetInterestIncome,
            value: earned - paid,
            codes: used,
        });
    }

    if let Some((value, used)) = sum_where(codes, |_| true) {
        totals.push(CodeTotal {
            indicator: Indicator::NetIncome,
            value,
            codes: used,
        });
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(c, v)| (c.to_string(), *v)).collect()
    }

    fn total(totals: &[CodeTotal], indicator: Indicator) -> Option<f64> {
        totals.iter().find(|t| t.indicator == indicator).map(|t| t.value)
    }

    #[test]
    fn test_balance_sheet_totals() {
        let totals = summarize_balance_sheet(&codes(&[
            ("10101", 1500.0),
            ("10202", 2500.0),
            ("11601", 40_000.0),
            ("20202", 30_000.0),
            ("20801", 5000.0),
        ]));
        assert_eq!(total(&totals, Indicator::TotalAssets), Some(44_000.0));
        assert_eq!(total(&totals, Indicator::TotalLiabilities), Some(35_000.0));
        assert_eq!(total(&totals, Indicator::Equity), Some(9000.0));
        assert_eq!(total(&totals, Indicator::CashAndEquivalents), Some(4000.0));
        assert_eq!(total(&totals, Indicator::LoansToCustomers), Some(40_000.0));
        assert_eq!(total(&totals, Indicator::DepositsFromCustomers), Some(30_000.0));
    }

    #[test]
    fn test_balance_sheet_omits_unfed_indicators() {
        let totals = summarize_balance_sheet(&codes(&[("11701", 800.0)]));
        assert_eq!(total(&totals, Indicator::TotalAssets), Some(800.0));
        assert_eq!(total(&totals, Indicator::TotalLiabilities), None);
        assert_eq!(total(&totals, Indicator::Equity), Some(800.0));
        assert_eq!(total(&totals, Indicator::CashAndEquivalents), None);
    }

    #[test]
    fn test_empty_codes_produce_nothing() {
        assert!(summarize_balance_sheet(&BTreeMap::new()).is_empty());
        assert!(summarize_income_statement(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn test_income_statement_totals() {
        let totals = summarize_income_statement(&codes(&[
            ("70601", 900.0),
            ("70602", -400.0),
            ("70701", 150.0),
            ("70702", -50.0),
            ("73501", -120.0),
        ]));
        assert_eq!(total(&totals, Indicator::NetInterestIncome), Some(1500.0));
        assert_eq!(total(&totals, Indicator::NetIncome), Some(480.0));
    }

    #[test]
    fn test_net_interest_income_subtracts_expenses() {
        let totals = summarize_income_statement(&codes(&[("70601", 900.0), ("70602", 400.0)]));
        assert_eq!(total(&totals, Indicator::NetInterestIncome), Some(500.0));
    }

    #[test]
    fn test_code_lists_recorded() {
        let totals = summarize_balance_sheet(&codes(&[("10101", 1.0), ("10302", 2.0)]));
        let cash = totals
            .iter()
            .find(|t| t.indicator == Indicator::CashAndEquivalents)
            .unwrap();
        assert_eq!(cash.codes, vec!["10101".to_string(), "10302".to_string()]);
    }
}
