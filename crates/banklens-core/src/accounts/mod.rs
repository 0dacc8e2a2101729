//! Extraction from report text laid out as statements with account codes.

pub mod codes;
pub mod extract;
pub mod sections;
pub mod summarize;

pub use extract::{extract_account_codes, extract_accounts, extract_named_values, NamedValue, SectionAccounts};
pub use sections::{split_statement_sections, StatementSections};
pub use summarize::{summarize_balance_sheet, summarize_income_statement, CodeTotal};

use crate::indicators::IndicatorRegistry;
use crate::parsing::UnitPatterns;
use crate::tables::Aggregation;
use crate::trace::{TraceEntry, TraceLocation, TraceStep, TraceStepType, TraceWarning};
use std::collections::BTreeMap;

const WHOLE_TEXT: &str = "text";
const BALANCE_SHEET: &str = "balance_sheet";
const INCOME_STATEMENT: &str = "income_statement";

/// Build a record from statement text.
///
/// Labelled figures are read from the whole text first. Account codes are
/// then read per statement section and their totals replace the labelled
/// values they cover. Text without any statement heading is read as a
/// balance sheet.
pub fn analyze_statement_text(
    text: &str,
    registry: &IndicatorRegistry,
    units: &UnitPatterns,
) -> Aggregation {
    let mut aggregation = Aggregation::default();

    for named in extract_named_values(text, registry, units) {
        let mut steps = vec![
            TraceStep::new(
                TraceStepType::MatchIndicator,
                format!("Matched '{}' -> {}", named.label, named.indicator.key()),
            ),
            TraceStep::new(TraceStepType::ParseValue, format!("Parsed '{}'", named.raw)),
        ];
        if named.unit.is_explicit() && named.value != 0.0 {
            steps.push(TraceStep::new(
                TraceStepType::ApplyUnit,
                format!("Applied unit x{}", named.unit.factor()),
            ));
        }
        aggregation.record.set(named.indicator, named.value);
        aggregation.trace.entries.push(TraceEntry {
            entry_id: format!("ent_text_l{}", named.line),
            indicator: named.indicator,
            location: TraceLocation::Section {
                section: WHOLE_TEXT.to_string(),
            },
            raw_label: named.label,
            raw_value: named.raw,
            value: named.value,
            steps,
        });
    }

    let sections = split_statement_sections(text);
    let (balance_parts, income_part): (Vec<&str>, Option<&str>) = if sections.is_empty() {
        aggregation.trace.warnings.push(TraceWarning::info(
            None,
            "No statement headings found, reading the whole text as a balance sheet",
        ));
        (vec![text], None)
    } else {
        (
            [sections.balance_sheet, sections.liabilities]
                .into_iter()
                .flatten()
                .collect(),
            sections.income_statement,
        )
    };

    let mut balance_codes = BTreeMap::new();
    for part in balance_parts {
        balance_codes.extend(extract_account_codes(part));
    }
    let income_codes = income_part.map(extract_account_codes).unwrap_or_default();
    tracing::debug!(
        balance_codes = balance_codes.len(),
        income_codes = income_codes.len(),
        "account codes read"
    );

    let totals = summarize_balance_sheet(&balance_codes)
        .into_iter()
        .map(|t| (BALANCE_SHEET, t))
        .chain(
            summarize_income_statement(&income_codes)
                .into_iter()
                .map(|t| (INCOME_STATEMENT, t)),
        );
    for (section, total) in totals {
        let previous = aggregation.record.get(total.indicator);
        let mut steps = vec![TraceStep::new(
            TraceStepType::SumAccounts,
            format!("Summed accounts {}", total.codes.join(", ")),
        )];
        if previous != 0.0 && previous != total.value {
            steps.push(TraceStep::new(
                TraceStepType::SumAccounts,
                format!("Replaced labelled value {previous}"),
            ));
        }
        aggregation.record.set(total.indicator, total.value);
        aggregation.trace.entries.push(TraceEntry {
            entry_id: format!("ent_{}_{}", section, total.indicator.key()),
            indicator: total.indicator,
            location: TraceLocation::Section {
                section: section.to_string(),
            },
            raw_label: total.indicator.label().to_string(),
            raw_value: total.codes.join(" "),
            value: total.value,
            steps,
        });
    }

    aggregation
}
