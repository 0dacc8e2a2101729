use crate::model::CellValue;
use crate::parsing::units::{UnitMultiplier, UnitPatterns};
use regex::Regex;
use std::sync::LazyLock;

/// Values outside this magnitude are treated as extraction noise.
const MAX_MAGNITUDE: f64 = 1e16;
const MIN_MAGNITUDE: f64 = 1e-6;

static TRAILING_SYMBOLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[₽$€%\s]+$").expect("valid trailing-symbol regex"));
static LEADING_JUNK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\d+\-.]+").expect("valid leading-junk regex"));

/// A number read from a cell together with any unit written inline with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amount {
    pub value: f64,
    pub unit: UnitMultiplier,
}

fn normalize_spaces(s: &str) -> String {
    s.replace(['\u{a0}', '\u{202f}', '\u{2009}'], " ")
}

fn is_null_sentinel(s: &str) -> bool {
    matches!(s, "" | "-" | "—" | "–" | "*")
}

/// Parse a Russian-formatted number: space or NBSP thousands separators,
/// comma decimals, optional currency or percent sign.
///
/// - "1 234,5" -> 1234.5
/// - "98,1" -> 98.1
/// - "12,5%" -> 12.5
/// - "1234,5678" -> 12345678 (four fractional digits: the comma is a separator)
/// - "—" -> None
pub fn parse_localized_number(raw: &str) -> Option<f64> {
    let s = normalize_spaces(raw);
    let s = s.trim();
    if is_null_sentinel(s) {
        return None;
    }

    let s = TRAILING_SYMBOLS.replace(s, "");
    let s = LEADING_JUNK.replace(&s, "");

    let cleaned = match s.rsplit_once(',') {
        Some((int_part, frac_part))
            if !frac_part.is_empty()
                && frac_part.len() <= 3
                && frac_part.bytes().all(|b| b.is_ascii_digit()) =>
        {
            format!("{}.{}", int_part.replace(' ', ""), frac_part)
        }
        _ => s.replace([',', ' '], ""),
    };

    let value = cleaned.parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    let magnitude = value.abs();
    if magnitude > MAX_MAGNITUDE || (value != 0.0 && magnitude < MIN_MAGNITUDE) {
        return None;
    }
    Some(value)
}

/// Parse a cell that may carry a unit annotation inline ("98,1 МЛРД РУБ").
///
/// Each unit pattern is tried in order: the matched annotation is cut out and
/// the remainder parsed. If no pattern yields a number the whole text is
/// parsed as a plain number with no unit.
pub fn parse_amount(cell: &CellValue, units: &UnitPatterns) -> Option<Amount> {
    let text = match cell {
        CellValue::Empty => return None,
        CellValue::Number(n) => {
            return n.is_finite().then_some(Amount {
                value: *n,
                unit: UnitMultiplier::One,
            })
        }
        CellValue::Text(t) => normalize_spaces(t),
    };
    let text = text.trim();
    if is_null_sentinel(text) {
        return None;
    }

    for (unit, pattern) in units.iter() {
        if let Some(m) = pattern.find(text) {
            let remainder = format!("{}{}", &text[..m.start()], &text[m.end()..]);
            if let Some(value) = parse_localized_number(&remainder) {
                return Some(Amount { value, unit });
            }
        }
    }

    parse_localized_number(text).map(|value| Amount {
        value,
        unit: UnitMultiplier::One,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(text: &str) -> Option<Amount> {
        parse_amount(
            &CellValue::Text(text.to_string()),
            UnitPatterns::default_patterns(),
        )
    }

    #[test]
    fn test_space_thousands_and_comma_decimal() {
        assert_eq!(parse_localized_number("1 234,5"), Some(1234.5));
    }

    #[test]
    fn test_nbsp_thousands() {
        assert_eq!(parse_localized_number("12\u{a0}345\u{a0}678"), Some(12_345_678.0));
    }

    #[test]
    fn test_short_comma_fraction_is_decimal() {
        assert_eq!(parse_localized_number("98,1"), Some(98.1));
        assert_eq!(parse_localized_number("0,125"), Some(0.125));
    }

    #[test]
    fn test_long_comma_fraction_is_separator() {
        assert_eq!(parse_localized_number("1234,5678"), Some(12_345_678.0));
    }

    #[test]
    fn test_currency_and_percent_stripped() {
        assert_eq!(parse_localized_number("12,5%"), Some(12.5));
        assert_eq!(parse_localized_number("1 000 ₽"), Some(1000.0));
    }

    #[test]
    fn test_leading_junk_stripped() {
        assert_eq!(parse_localized_number("~ 42"), Some(42.0));
    }

    #[test]
    fn test_negative_number() {
        assert_eq!(parse_localized_number("-1 500,25"), Some(-1500.25));
    }

    #[test]
    fn test_dot_decimal() {
        assert_eq!(parse_localized_number("15.7"), Some(15.7));
    }

    #[test]
    fn test_null_sentinels() {
        assert_eq!(parse_localized_number(""), None);
        assert_eq!(parse_localized_number("  "), None);
        assert_eq!(parse_localized_number("—"), None);
        assert_eq!(parse_localized_number("-"), None);
    }

    #[test]
    fn test_non_numeric_rejected() {
        assert_eq!(parse_localized_number("Итого активов"), None);
        assert_eq!(parse_localized_number("н/д"), None);
    }

    #[test]
    fn test_magnitude_guard() {
        assert_eq!(parse_localized_number("100000000000000000"), None);
        assert_eq!(parse_localized_number("0.0000001"), None);
        assert_eq!(parse_localized_number("0"), Some(0.0));
    }

    #[test]
    fn test_amount_with_inline_billions() {
        let a = amount("98,1 МЛРД РУБ").unwrap();
        assert_eq!(a.value, 98.1);
        assert_eq!(a.unit, UnitMultiplier::Billion);
    }

    #[test]
    fn test_amount_with_full_word_unit() {
        let a = amount("1 234,5 миллионов рублей").unwrap();
        assert_eq!(a.value, 1234.5);
        assert_eq!(a.unit, UnitMultiplier::Million);
    }

    #[test]
    fn test_amount_without_unit() {
        let a = amount("1 234,5").unwrap();
        assert_eq!(a.value, 1234.5);
        assert_eq!(a.unit, UnitMultiplier::One);
    }

    #[test]
    fn test_unit_without_number_is_none() {
        assert!(amount("млн руб.").is_none());
    }

    #[test]
    fn test_native_number_cell() {
        let a = parse_amount(&CellValue::Number(42.5), UnitPatterns::default_patterns()).unwrap();
        assert_eq!(a.value, 42.5);
        assert_eq!(a.unit, UnitMultiplier::One);
    }

    #[test]
    fn test_nan_and_empty_cells() {
        let units = UnitPatterns::default_patterns();
        assert!(parse_amount(&CellValue::Number(f64::NAN), units).is_none());
        assert!(parse_amount(&CellValue::Empty, units).is_none());
        assert!(parse_amount(&CellValue::Text("—".into()), units).is_none());
    }
}
