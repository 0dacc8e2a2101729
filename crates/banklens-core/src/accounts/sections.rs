use regex::Regex;
use std::sync::LazyLock;

/// Characters kept after the liabilities heading.
const LIABILITIES_WINDOW: usize = 2000;
/// Characters kept before and after the income statement heading.
const INCOME_LEAD: usize = 500;
const INCOME_WINDOW: usize = 2000;

static ASSETS_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)актив|assets").expect("valid assets heading regex"));
static LIABILITIES_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)пассив|liabilities").expect("valid liabilities heading regex"));
static INCOME_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)отч[её]т о прибылях и убытках|income statement|profit and loss")
        .expect("valid income heading regex")
});
static INCOME_FALLBACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)выручка|revenue|доходы|expenses|расходы").expect("valid income fallback regex")
});

/// Statement parts located in a report text. Each borrows from the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatementSections<'t> {
    pub balance_sheet: Option<&'t str>,
    pub liabilities: Option<&'t str>,
    pub income_statement: Option<&'t str>,
}

impl StatementSections<'_> {
    pub fn is_empty(&self) -> bool {
        self.balance_sheet.is_none() && self.liabilities.is_none() && self.income_statement.is_none()
    }
}

/// Locate balance sheet, liabilities and income statement text.
///
/// - balance sheet: after the first assets heading up to the next
///   liabilities heading, or to the end of the text
/// - liabilities: 2000 characters after the first liabilities heading
/// - income statement: 500 characters before to 2000 characters after the
///   first income statement heading, or the first revenue/expense word
pub fn split_statement_sections(text: &str) -> StatementSections<'_> {
    let balance_sheet = ASSETS_HEADING.find(text).map(|m| {
        let rest = &text[m.end()..];
        match LIABILITIES_HEADING.find(rest) {
            Some(end) => &rest[..end.start()],
            None => rest,
        }
    });

    let liabilities = LIABILITIES_HEADING.find(text).map(|m| {
        let end = advance_chars(text, m.end(), LIABILITIES_WINDOW);
        &text[m.end()..end]
    });

    let income_statement = INCOME_HEADING
        .find(text)
        .or_else(|| INCOME_FALLBACK.find(text))
        .map(|m| {
            let start = retreat_chars(text, m.start(), INCOME_LEAD);
            let end = advance_chars(text, m.end(), INCOME_WINDOW);
            &text[start..end]
        });

    StatementSections {
        balance_sheet,
        liabilities,
        income_statement,
    }
}

/// Byte offset `n` characters after `from`, clamped to the end.
fn advance_chars(text: &str, from: usize, n: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(n)
        .map_or(text.len(), |(i, _)| from + i)
}

/// Byte offset `n` characters before `to`, clamped to the start.
fn retreat_chars(text: &str, to: usize, n: usize) -> usize {
    if n == 0 {
        return to;
    }
    text[..to]
        .char_indices()
        .rev()
        .nth(n - 1)
        .map_or(0, |(i, _)| i)
}
