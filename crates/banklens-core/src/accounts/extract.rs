use crate::accounts::codes::resolve_code;
use crate::indicators::{Indicator, IndicatorFamily, IndicatorRegistry};
use crate::parsing::{parse_localized_number, UnitMultiplier, UnitPatterns};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// A printed number: digits with optional space-grouped thousands and a
/// decimal part.
const NUMBER: &str = r"[+-]?\d+(?:[ \x{a0}]\d{3})*(?:[.,]\d+)?";

static NUMBER_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(NUMBER).expect("valid number regex"));

/// A 4-5 digit account code standing alone, its description, then an amount
/// on the same line.
static ACCOUNT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?m)(?:^|[ \t])(\d{{4,5}})[ \t]+([^\d\n]*?)({NUMBER})"))
        .expect("valid account-line regex")
});

const MAX_PLAIN_PERCENT: f64 = 100.0;

/// An indicator found by its label in running text.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedValue {
    pub indicator: Indicator,
    pub line: usize,
    pub label: String,
    pub raw: String,
    pub value: f64,
    pub unit: UnitMultiplier,
}

/// Everything read from one statement section.
#[derive(Debug, Clone, Default)]
pub struct SectionAccounts {
    pub named: Vec<NamedValue>,
    /// Resolved account code to amount; a repeated code keeps the last amount.
    pub codes: BTreeMap<String, f64>,
}

/// Run both passes over a section: labelled indicators, then account codes.
pub fn extract_accounts(
    section: &str,
    registry: &IndicatorRegistry,
    units: &UnitPatterns,
) -> SectionAccounts {
    SectionAccounts {
        named: extract_named_values(section, registry, units),
        codes: extract_account_codes(section),
    }
}

/// Find indicators whose label is followed by a number on the same line.
///
/// The text before the first number of a line is matched against the
/// registry. A repeated indicator keeps its last occurrence.
pub fn extract_named_values(
    text: &str,
    registry: &IndicatorRegistry,
    units: &UnitPatterns,
) -> Vec<NamedValue> {
    let mut found: Vec<NamedValue> = Vec::new();

    for (line_index, line) in text.lines().enumerate() {
        let Some(m) = NUMBER_RUN
            .find_iter(line)
            .find(|m| !is_year_reference(m.as_str(), &line[m.end()..]))
        else {
            continue;
        };

        let label = line[..m.start()]
            .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '-' | '—' | '–' | '=' | '('))
            .trim_start();
        if label.is_empty() {
            continue;
        }
        let Some(indicator) = registry.match_indicator(label) else {
            continue;
        };
        let Some(raw_value) = parse_localized_number(m.as_str()) else {
            tracing::debug!(line = line_index, raw = m.as_str(), "label matched but number unreadable");
            continue;
        };

        let unit = units
            .detect(&line[m.end()..])
            .or_else(|| units.detect(label))
            .unwrap_or_default();

        let value = match indicator.family() {
            IndicatorFamily::Amount => raw_value * unit.factor(),
            IndicatorFamily::Percentage if raw_value > MAX_PLAIN_PERCENT && !unit.is_explicit() => {
                tracing::debug!(indicator = indicator.key(), raw = raw_value, "implausible percentage dropped");
                continue;
            }
            IndicatorFamily::Percentage | IndicatorFamily::Count => raw_value,
        };

        found.retain(|v| v.indicator != indicator);
        found.push(NamedValue {
            indicator,
            line: line_index,
            label: label.to_string(),
            raw: m.as_str().to_string(),
            value,
            unit,
        });
    }

    found
}

/// Collect `code description amount` lines.
///
/// Codes are resolved against the code table (exact, then by prefix) and
/// kept verbatim when unknown.
pub fn extract_account_codes(text: &str) -> BTreeMap<String, f64> {
    let mut codes = BTreeMap::new();
    for caps in ACCOUNT_LINE.captures_iter(text) {
        let raw_code = &caps[1];
        let description = &caps[2];
        if is_year_reference(raw_code, description) {
            continue;
        }
        let Some(amount) = parse_localized_number(&caps[3]) else {
            tracing::debug!(code = raw_code, raw = &caps[3], "account amount unreadable");
            continue;
        };
        codes.insert(resolve_code(raw_code), amount);
    }
    codes
}

/// "2023 год", "2022 г." and the like.
fn is_year_reference(token: &str, after: &str) -> bool {
    token.len() == 4
        && token.parse::<u32>().is_ok_and(|y| (1990..=2100).contains(&y))
        && after.trim_start().to_lowercase().starts_with('г')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(text: &str) -> Vec<NamedValue> {
        extract_named_values(
            text,
            IndicatorRegistry::default_registry(),
            UnitPatterns::default_patterns(),
        )
    }

    fn value_of(values: &[NamedValue], indicator: Indicator) -> Option<f64> {
        values.iter().find(|v| v.indicator == indicator).map(|v| v.value)
    }

    #[test]
    fn test_named_value_with_trailing_unit() {
        let v = named("Итого активов: 1 234,5 млрд руб.\n");
        assert_eq!(value_of(&v, Indicator::TotalAssets), Some(1234.5e9));
        assert_eq!(v[0].unit, UnitMultiplier::Billion);
    }

    #[test]
    fn test_named_value_with_unit_in_label() {
        let v = named("Чистая прибыль, млн руб.   85 300\n");
        assert_eq!(value_of(&v, Indicator::NetIncome), Some(85_300e6));
    }

    #[test]
    fn test_year_is_not_taken_as_value() {
        let v = named("Чистая прибыль за 2023 год 120 млрд рублей");
        assert_eq!(value_of(&v, Indicator::NetIncome), Some(120e9));
    }

    #[test]
    fn test_last_occurrence_wins() {
        let v = named("ROE 15,2%\nROE 12,0%\n");
        assert_eq!(v.len(), 1);
        assert_eq!(value_of(&v, Indicator::Roe), Some(12.0));
        assert_eq!(v[0].line, 1);
    }

    #[test]
    fn test_unreadable_repeat_keeps_earlier_value() {
        let v = named("ROE 15,2%\nROE 250\n");
        assert_eq!(value_of(&v, Indicator::Roe), Some(15.2));
    }

    #[test]
    fn test_implausible_percentage_dropped() {
        assert!(named("ROE 250").is_empty());
    }

    #[test]
    fn test_lines_without_label_or_number_ignored() {
        let v = named("Актив\n10101 Касса 1 500\nРаздел без чисел\n");
        assert!(v.is_empty());
    }

    #[test]
    fn test_account_codes_read_with_description() {
        let text = "10101 Касса кредитной организации 1 500\n\
                    11601 Кредиты, предоставленные юридическим лицам 40 000,5\n\
                    20202 Депозиты физических лиц -300\n";
        let codes = extract_account_codes(text);
        assert_eq!(codes.len(), 3);
        assert_eq!(codes["10101"], 1500.0);
        assert_eq!(codes["11601"], 40_000.5);
        assert_eq!(codes["20202"], -300.0);
    }

    #[test]
    fn test_partial_code_resolves_by_prefix() {
        let codes = extract_account_codes("1060 Драгоценные камни 25\n");
        assert_eq!(codes["10601"], 25.0);
    }

    #[test]
    fn test_unknown_code_kept_verbatim() {
        let codes = extract_account_codes("45210 Прочее 7 000\n");
        assert_eq!(codes["45210"], 7000.0);
    }

    #[test]
    fn test_years_are_not_account_codes() {
        let codes = extract_account_codes("Отчет за 2023 год 15\n");
        assert!(codes.is_empty());
    }

    #[test]
    fn test_code_does_not_span_lines() {
        let codes = extract_account_codes("10101 Касса\n500\n");
        assert!(codes.is_empty());
    }

    #[test]
    fn test_extract_accounts_runs_both_passes() {
        let text = "Итого активов 2 000 млрд руб.\n10202 Денежные средства в Банке России 300\n";
        let section = extract_accounts(
            text,
            IndicatorRegistry::default_registry(),
            UnitPatterns::default_patterns(),
        );
        assert_eq!(value_of(&section.named, Indicator::TotalAssets), Some(2000e9));
        assert_eq!(section.codes["10202"], 300.0);
    }
}
