use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Scale factor announced by a unit annotation such as "млн руб.".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitMultiplier {
    #[default]
    One,
    Thousand,
    Million,
    Billion,
}

impl UnitMultiplier {
    pub fn factor(self) -> f64 {
        match self {
            UnitMultiplier::One => 1.0,
            UnitMultiplier::Thousand => 1e3,
            UnitMultiplier::Million => 1e6,
            UnitMultiplier::Billion => 1e9,
        }
    }

    pub fn is_explicit(self) -> bool {
        self != UnitMultiplier::One
    }
}

/// Ordered unit patterns. Larger units are listed first so that
/// "млрд руб" is never read as a bare "руб" amount.
const DEFAULT_UNIT_PATTERNS: &[(UnitMultiplier, &str)] = &[
    (UnitMultiplier::Billion, r"млрд\.?\s*руб\w*\.?"),
    (UnitMultiplier::Billion, r"млрд\.?\s*р\b\.?"),
    (UnitMultiplier::Billion, r"миллиард\w*\s*руб\w*\.?"),
    (UnitMultiplier::Billion, r"миллиард\w*"),
    (UnitMultiplier::Billion, r"млрд\.?"),
    (UnitMultiplier::Billion, r"\b(billion|bn)\b"),
    (UnitMultiplier::Million, r"млн\.?\s*руб\w*\.?"),
    (UnitMultiplier::Million, r"млн\.?\s*р\b\.?"),
    (UnitMultiplier::Million, r"миллион\w*\s*руб\w*\.?"),
    (UnitMultiplier::Million, r"миллион\w*"),
    (UnitMultiplier::Million, r"млн\.?"),
    (UnitMultiplier::Million, r"\b(million|mln|mn)\b"),
    (UnitMultiplier::Thousand, r"тыс\.?\s*руб\w*\.?"),
    (UnitMultiplier::Thousand, r"тыс\.?\s*р\b\.?"),
    (UnitMultiplier::Thousand, r"тысяч\w*\s*руб\w*\.?"),
    (UnitMultiplier::Thousand, r"тысяч\w*"),
    (UnitMultiplier::Thousand, r"тыс\.?"),
    (UnitMultiplier::Thousand, r"\b(thousand|thous)\b"),
];

static DEFAULT_UNITS: LazyLock<UnitPatterns> = LazyLock::new(|| {
    UnitPatterns::from_patterns(DEFAULT_UNIT_PATTERNS).expect("built-in unit patterns are valid")
});

/// Case-insensitive unit annotations, tried in order.
#[derive(Debug, Clone)]
pub struct UnitPatterns {
    patterns: Vec<(UnitMultiplier, Regex)>,
}

impl UnitPatterns {
    pub fn from_patterns(patterns: &[(UnitMultiplier, &str)]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|(unit, pattern)| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map(|re| (*unit, re))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(UnitPatterns { patterns })
    }

    /// The built-in Russian/English unit vocabulary.
    pub fn default_patterns() -> &'static UnitPatterns {
        &DEFAULT_UNITS
    }

    pub fn iter(&self) -> impl Iterator<Item = (UnitMultiplier, &Regex)> {
        self.patterns.iter().map(|(unit, re)| (*unit, re))
    }

    /// First unit whose pattern occurs anywhere in `text`.
    pub fn detect(&self, text: &str) -> Option<UnitMultiplier> {
        self.patterns
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(unit, _)| *unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Option<UnitMultiplier> {
        UnitPatterns::default_patterns().detect(text)
    }

    #[test]
    fn test_detect_abbreviated_units() {
        assert_eq!(detect("млрд руб."), Some(UnitMultiplier::Billion));
        assert_eq!(detect("в млн. руб."), Some(UnitMultiplier::Million));
        assert_eq!(detect("тыс. р."), Some(UnitMultiplier::Thousand));
    }

    #[test]
    fn test_detect_is_case_insensitive() {
        assert_eq!(detect("98,1 МЛРД РУБ"), Some(UnitMultiplier::Billion));
        assert_eq!(detect("RUB MILLION"), Some(UnitMultiplier::Million));
    }

    #[test]
    fn test_detect_full_words() {
        assert_eq!(detect("миллиардов рублей"), Some(UnitMultiplier::Billion));
        assert_eq!(detect("миллионов рублей"), Some(UnitMultiplier::Million));
        assert_eq!(detect("тысячах рублей"), Some(UnitMultiplier::Thousand));
    }

    #[test]
    fn test_detect_none_for_plain_text() {
        assert_eq!(detect("Итого активов"), None);
        assert_eq!(detect("1 234,5"), None);
    }

    #[test]
    fn test_english_abbreviation_requires_word_boundary() {
        assert_eq!(detect("bnk"), None);
        assert_eq!(detect("5 bn"), Some(UnitMultiplier::Billion));
    }

    #[test]
    fn test_factors() {
        assert_eq!(UnitMultiplier::One.factor(), 1.0);
        assert_eq!(UnitMultiplier::Thousand.factor(), 1e3);
        assert_eq!(UnitMultiplier::Million.factor(), 1e6);
        assert_eq!(UnitMultiplier::Billion.factor(), 1e9);
        assert!(!UnitMultiplier::One.is_explicit());
        assert!(UnitMultiplier::Million.is_explicit());
    }
}
