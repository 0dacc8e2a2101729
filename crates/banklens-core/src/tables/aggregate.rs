use crate::indicators::IndicatorRegistry;
use crate::model::{FinancialRecord, Table};
use crate::parsing::UnitPatterns;
use crate::rules::schema::Calibration;
use crate::tables::walker::TableWalker;
use crate::trace::TraceBundle;

/// Merged result of walking every table of a document.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub record: FinancialRecord,
    pub trace: TraceBundle,
}

/// Merge per-table extractions in input order. A later table overwrites
/// earlier values for the same indicator.
pub fn aggregate_with(tables: &[Table], walker: &TableWalker<'_>) -> Aggregation {
    let mut aggregation = Aggregation::default();
    for (table_index, table) in tables.iter().enumerate() {
        let extraction = walker.walk(table, table_index);
        tracing::debug!(
            table_index,
            indicators = extraction.values.len(),
            "table walked"
        );
        aggregation.record.merge(&extraction.values);
        aggregation.trace.entries.extend(extraction.entries);
        aggregation.trace.warnings.extend(extraction.warnings);
    }
    aggregation
}

/// Aggregate with the built-in vocabulary and default calibration.
pub fn aggregate(tables: &[Table]) -> FinancialRecord {
    let calibration = Calibration::default();
    let walker = TableWalker::new(
        IndicatorRegistry::default_registry(),
        UnitPatterns::default_patterns(),
        &calibration,
    );
    aggregate_with(tables, &walker).record
}
