use crate::model::{DocumentMeta, Table};
use regex::Regex;
use std::sync::LazyLock;

pub const UNKNOWN_BANK: &str = "Неопределённая организация";
const MIN_REPORT_YEAR: i32 = 2010;

const BANK_NAME_PATTERNS: &[&str] = &[
    r#"(?:АО|ПАО|ООО|ЗАО)\s*[«"]([^»"]+)[»"]"#,
    r#"(?:Банк|Кредитная организация)\s*[«"]([^»"]+)[»"]"#,
    r"полное\s*наименование[:\s]*([^\n]+)",
    r"фирменное\s*наименование[:\s]*([^\n]+)",
    r"Наименование[:\s]*([^\n]+)",
    r"Кредитная\s+организация[:\s]*([^\n]+)",
    r"Организация[:\s]*([^\n]+)",
    r"Банк[:\s]*([^\n]+)",
];

const REPORT_YEAR_PATTERNS: &[&str] = &[
    r"за\s*(\d{4})\s*год",
    r"годовой\s*отч[её]т\s*(\d{4})",
    r"отч[её]тный\s*период[:\s]*(\d{4})",
    r"(\d{4})\s*года?[:\s]",
    r"(\d{4})\s*г\.",
    r"(\d{4})\s*года",
    r"отч[её]т\s+за\s+(\d{4})",
    r"годовой отч[её]т[\s:]*[^\w\d]*(\d{4})",
];

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?im){p}")).expect("valid metadata pattern"))
        .collect()
}

static BANK_NAMES: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_all(BANK_NAME_PATTERNS));
static REPORT_YEARS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_all(REPORT_YEAR_PATTERNS));
static BARE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(201[0-9]|202[0-9])\b").expect("valid year regex"));
static NAME_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[,:;()«»"“”]"#).expect("valid name split regex"));
static ROMAN_NUMERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[IVX]+$").expect("valid roman numeral regex"));
static FILE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:_tables)?\.[a-z0-9]+$").expect("valid suffix regex"));
static STEM_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[a-zа-яё]+[_\- ]?(\d{4})$").expect("valid stem year regex"));

/// Bank name and report year read from the report text, with table fallbacks.
///
/// Years later than `max_year` (normally the current year) are ignored.
pub fn extract_metadata(text: &str, tables: &[Table], max_year: i32) -> DocumentMeta {
    DocumentMeta {
        bank_name: extract_bank_name(text, tables),
        report_year: extract_report_year(text, tables, max_year),
    }
}

pub fn extract_bank_name(text: &str, tables: &[Table]) -> String {
    for re in BANK_NAMES.iter() {
        if let Some(name) = re
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .filter(|name| name.chars().count() > 2)
        {
            return name.to_string();
        }
    }

    for table in tables.iter().take(3) {
        for row in table.rows.iter().take(10) {
            for cell in row.iter().take(20).filter_map(|c| c.as_str()) {
                if let Some(name) = bank_name_from_cell(cell) {
                    return name;
                }
            }
        }
    }

    UNKNOWN_BANK.to_string()
}

fn bank_name_from_cell(cell: &str) -> Option<String> {
    let lower = cell.to_lowercase();
    let mentions_bank = ["банк", "пао", "ао", "ооо", "зао"]
        .iter()
        .any(|k| lower.contains(k));
    if !mentions_bank || cell.trim().chars().count() <= 2 {
        return None;
    }
    NAME_SPLIT
        .split(cell)
        .map(str::trim)
        .find(|part| {
            part.chars().count() > 2
                && !part.chars().all(|c| c.is_ascii_digit())
                && !ROMAN_NUMERAL.is_match(part)
        })
        .map(str::to_string)
}

pub fn extract_report_year(text: &str, tables: &[Table], max_year: i32) -> i32 {
    let plausible = |y: i32| (MIN_REPORT_YEAR..=max_year).contains(&y);

    for re in REPORT_YEARS.iter() {
        let found = re
            .captures_iter(text)
            .filter_map(|c| c.get(1)?.as_str().parse::<i32>().ok())
            .find(|y| plausible(*y));
        if let Some(year) = found {
            return year;
        }
    }

    for table in tables {
        for row in table.rows.iter().take(20) {
            for cell in row.iter().filter_map(|c| c.as_str()) {
                let found = BARE_YEAR
                    .find_iter(cell)
                    .filter_map(|m| m.as_str().parse::<i32>().ok())
                    .find(|y| plausible(*y));
                if let Some(year) = found {
                    return year;
                }
            }
        }
    }

    max_year - 1
}

/// Metadata from names like `sber2023_tables.xlsx`: the letters form a bank
/// code and the four digits before the suffix the year.
pub fn meta_from_file_name(file_name: &str, max_year: i32) -> DocumentMeta {
    let stem = FILE_SUFFIX.replace(file_name, "");

    let report_year = STEM_YEAR
        .captures(&stem)
        .and_then(|c| c[1].parse::<i32>().ok())
        .filter(|y| (MIN_REPORT_YEAR..=max_year).contains(y))
        .or_else(|| {
            BARE_YEAR
                .find_iter(&stem)
                .last()
                .and_then(|m| m.as_str().parse().ok())
        })
        .unwrap_or(max_year);

    let code: String = stem
        .trim_end_matches(|c: char| c.is_ascii_digit())
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect::<String>()
        .to_lowercase();

    DocumentMeta {
        bank_name: if code.is_empty() { "unknown".to_string() } else { code },
        report_year,
    }
}
