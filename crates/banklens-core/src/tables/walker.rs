use crate::extraction::table::is_header_row;
use crate::indicators::{Indicator, IndicatorFamily, IndicatorRegistry};
use crate::model::{CellValue, Table};
use crate::parsing::{parse_amount, UnitMultiplier, UnitPatterns};
use crate::rules::schema::Calibration;
use crate::trace::{TraceEntry, TraceLocation, TraceStep, TraceStepType, TraceWarning};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

/// Columns inspected per row for unit annotations.
const UNIT_SCAN_COLUMNS: usize = 10;
/// Cells considered when looking for the end of the row label.
const LABEL_SCAN_CELLS: usize = 3;
/// Percent values above this without an explicit unit are implausible.
const MAX_PLAIN_PERCENT: f64 = 100.0;

static NUMERIC_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s.,%-]+$").expect("valid numeric-cell regex"));

/// What one table contributed, with provenance.
#[derive(Debug, Clone, Default)]
pub struct TableExtraction {
    pub values: BTreeMap<Indicator, f64>,
    pub entries: Vec<TraceEntry>,
    pub warnings: Vec<TraceWarning>,
}

/// Row-by-row indicator extraction from one table.
#[derive(Debug, Clone, Copy)]
pub struct TableWalker<'a> {
    registry: &'a IndicatorRegistry,
    units: &'a UnitPatterns,
    calibration: &'a Calibration,
}

impl<'a> TableWalker<'a> {
    pub fn new(
        registry: &'a IndicatorRegistry,
        units: &'a UnitPatterns,
        calibration: &'a Calibration,
    ) -> Self {
        TableWalker {
            registry,
            units,
            calibration,
        }
    }

    /// Indicator values found in `table`; the last occurrence of an indicator wins.
    pub fn extract(&self, table: &Table) -> BTreeMap<Indicator, f64> {
        self.walk(table, 0).values
    }

    pub fn walk(&self, table: &Table, table_index: usize) -> TableExtraction {
        let mut out = TableExtraction::default();
        if table.column_count() < 2 {
            tracing::debug!(table_index, "skipping table with fewer than two columns");
            return out;
        }

        let mut column_units: HashMap<usize, UnitMultiplier> = HashMap::new();

        for (row_index, row) in table.rows.iter().enumerate() {
            if is_header_row(row) || row.iter().all(CellValue::is_empty) {
                continue;
            }
            self.update_column_units(row, &mut column_units);

            let candidates: Vec<(usize, String)> = row
                .iter()
                .enumerate()
                .filter_map(|(col, cell)| {
                    let text = cell.display_text()?;
                    (text.chars().count() > 1).then_some((col, text))
                })
                .collect();
            if candidates.len() < 2 {
                continue;
            }

            let (label, value_start) = self.split_label(row, &candidates);
            if label.is_empty() {
                continue;
            }

            let Some(indicator) = self.registry.match_indicator(&label) else {
                tracing::trace!(table_index, row_index, label = %label, "no indicator matched");
                continue;
            };

            for (col, text) in &candidates[value_start..] {
                let location = TraceLocation::Cell {
                    table_index,
                    row_index,
                    column: *col,
                };
                let Some(amount) = parse_amount(&row[*col], self.units) else {
                    tracing::debug!(table_index, row_index, col, raw = %text, "cell is not a number");
                    continue;
                };

                // An inline unit describes its own cell; otherwise fall back to
                // the column annotation, then to the neighbouring cells.
                let unit = if amount.unit.is_explicit() {
                    amount.unit
                } else {
                    column_units
                        .get(col)
                        .copied()
                        .unwrap_or_else(|| self.context_unit(row, *col))
                };

                match self.resolve(indicator, amount.value, unit, table.normalized) {
                    Resolved::Value { value, steps } => {
                        tracing::debug!(indicator = indicator.key(), value, table_index, row_index, "extracted");
                        let mut all_steps = vec![TraceStep::new(
                            TraceStepType::MatchIndicator,
                            format!("Matched '{}' -> {}", label, indicator.key()),
                        )];
                        all_steps.push(TraceStep::new(
                            TraceStepType::ParseValue,
                            format!("Parsed '{}' as {}", text, amount.value),
                        ));
                        all_steps.extend(steps);
                        out.values.insert(indicator, value);
                        out.entries.push(TraceEntry {
                            entry_id: format!("ent_t{}_r{}_c{}", table_index, row_index, col),
                            indicator,
                            location,
                            raw_label: label.clone(),
                            raw_value: text.clone(),
                            value,
                            steps: all_steps,
                        });
                    }
                    Resolved::Discarded(reason) => {
                        tracing::debug!(indicator = indicator.key(), raw = amount.value, "{reason}");
                        out.warnings.push(TraceWarning::info(Some(location), reason));
                    }
                }
            }
        }

        out
    }

    /// Join the leading text cells into a lowercase label. Returns the label
    /// and the index of the first candidate holding numeric data.
    fn split_label(&self, row: &[CellValue], candidates: &[(usize, String)]) -> (String, usize) {
        let mut parts: Vec<&str> = Vec::new();
        for (col, text) in candidates.iter().take(LABEL_SCAN_CELLS) {
            let carries_unit_amount = parse_amount(&row[*col], self.units)
                .is_some_and(|a| a.unit.is_explicit());
            if NUMERIC_CELL.is_match(text) || text.chars().count() < 3 || carries_unit_amount {
                break;
            }
            parts.push(text);
        }
        let value_start = parts.len();
        (parts.join(" ").to_lowercase(), value_start)
    }

    fn update_column_units(&self, row: &[CellValue], column_units: &mut HashMap<usize, UnitMultiplier>) {
        for (col, cell) in row.iter().enumerate().take(UNIT_SCAN_COLUMNS) {
            if let Some(unit) = cell.as_str().and_then(|s| self.units.detect(s)) {
                column_units.insert(col, unit);
            }
        }
    }

    /// Unit written in the cell itself, else the next cell, else the previous one.
    fn context_unit(&self, row: &[CellValue], col: usize) -> UnitMultiplier {
        let neighbours = [Some(col), col.checked_add(1), col.checked_sub(1)];
        neighbours
            .into_iter()
            .flatten()
            .filter_map(|c| row.get(c))
            .find_map(|cell| cell.as_str().and_then(|s| self.units.detect(s)))
            .unwrap_or_default()
    }

    fn resolve(&self, indicator: Indicator, raw: f64, unit: UnitMultiplier, normalized: bool) -> Resolved {
        let explicit = unit.is_explicit() || normalized;
        match indicator.family() {
            IndicatorFamily::Percentage => {
                if raw > MAX_PLAIN_PERCENT && !explicit {
                    return Resolved::Discarded(format!(
                        "Discarded {} = {} (above {} with no unit)",
                        indicator.key(),
                        raw,
                        MAX_PLAIN_PERCENT
                    ));
                }
                Resolved::Value {
                    value: raw,
                    steps: Vec::new(),
                }
            }
            IndicatorFamily::Count => Resolved::Value {
                value: raw,
                steps: Vec::new(),
            },
            IndicatorFamily::Amount => {
                let mut steps = Vec::new();
                let mut value = raw * unit.factor();
                if unit.is_explicit() {
                    steps.push(TraceStep::new(
                        TraceStepType::ApplyUnit,
                        format!("Applied unit x{}", unit.factor()),
                    ));
                }
                if indicator.assumes_billions()
                    && value < self.calibration.assumed_unit_ceiling
                    && !explicit
                    && raw > 1.0
                {
                    value *= self.calibration.assumed_unit_multiplier;
                    steps.push(TraceStep::new(
                        TraceStepType::AssumeBillions,
                        format!(
                            "No unit on a small headline amount, assumed x{}",
                            self.calibration.assumed_unit_multiplier
                        ),
                    ));
                }
                Resolved::Value { value, steps }
            }
        }
    }
}

enum Resolved {
    Value { value: f64, steps: Vec<TraceStep> },
    Discarded(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk_rows(rows: Vec<Vec<&str>>) -> BTreeMap<Indicator, f64> {
        let calibration = Calibration::default();
        let walker = TableWalker::new(
            IndicatorRegistry::default_registry(),
            UnitPatterns::default_patterns(),
            &calibration,
        );
        walker.extract(&Table::from_text_rows(rows))
    }

    #[test]
    fn test_inline_unit() {
        let v = walk_rows(vec![vec!["Итого активов", "1 234,5 МЛРД РУБ"]]);
        assert_eq!(v[&Indicator::TotalAssets], 1234.5e9);
    }

    #[test]
    fn test_column_unit_from_header_row() {
        let v = walk_rows(vec![
            vec!["Показатель", "млн руб."],
            vec!["Итого обязательств", "880 000"],
        ]);
        assert_eq!(v[&Indicator::TotalLiabilities], 880_000e6);
    }

    #[test]
    fn test_unit_in_next_cell() {
        let v = walk_rows(vec![vec!["Итого обязательств", "12,5", "млрд руб."]]);
        assert_eq!(v[&Indicator::TotalLiabilities], 12.5e9);
    }

    #[test]
    fn test_implausible_percentage_discarded() {
        let v = walk_rows(vec![vec!["ROE (%)", "120"]]);
        assert!(!v.contains_key(&Indicator::Roe));
    }

    #[test]
    fn test_plausible_percentage_kept_unscaled() {
        let v = walk_rows(vec![vec!["Рентабельность собственного капитала", "15,2%"]]);
        assert_eq!(v[&Indicator::Roe], 15.2);
    }

    #[test]
    fn test_assumed_billions_for_headline_amounts() {
        let v = walk_rows(vec![vec!["Чистая прибыль", "1 200"]]);
        assert_eq!(v[&Indicator::NetIncome], 1200e9);
    }

    #[test]
    fn test_no_assumption_above_ceiling() {
        let v = walk_rows(vec![vec!["Итого активов", "5000000000000"]]);
        assert_eq!(v[&Indicator::TotalAssets], 5e12);
    }

    #[test]
    fn test_no_assumption_outside_subset() {
        let v = walk_rows(vec![vec!["Субординированный долг", "150"]]);
        assert_eq!(v[&Indicator::SubordinatedDebt], 150.0);
    }

    #[test]
    fn test_counts_are_not_scaled() {
        let v = walk_rows(vec![vec!["Количество отделений", "1 250"]]);
        assert_eq!(v[&Indicator::NumberOfBranches], 1250.0);
    }

    #[test]
    fn test_multi_cell_label() {
        let v = walk_rows(vec![vec!["Кредиты", "и авансы клиентам", "2 500,0 млрд руб."]]);
        assert_eq!(v[&Indicator::LoansToCustomers], 2500e9);
    }

    #[test]
    fn test_last_occurrence_wins_within_table() {
        let v = walk_rows(vec![vec!["Итого активов", "100 МЛРД РУБ", "120 МЛРД РУБ"]]);
        assert_eq!(v[&Indicator::TotalAssets], 120e9);
    }

    #[test]
    fn test_header_marker_and_short_rows_skipped() {
        let v = walk_rows(vec![
            vec!["ТАБЛИЦА #1", "Итого активов", "5 МЛРД РУБ"],
            vec!["Итого активов", ""],
        ]);
        assert!(v.is_empty());
    }

    #[test]
    fn test_numeric_first_cell_has_no_label() {
        let v = walk_rows(vec![vec!["2023", "Итого активов", "5 МЛРД РУБ"]]);
        assert!(v.is_empty());
    }

    #[test]
    fn test_unparseable_values_skipped() {
        let v = walk_rows(vec![vec!["Итого активов", "нд", "7 МЛРД РУБ"]]);
        assert_eq!(v[&Indicator::TotalAssets], 7e9);
    }

    #[test]
    fn test_single_column_table_contributes_nothing() {
        let v = walk_rows(vec![vec!["Итого активов"], vec!["5"]]);
        assert!(v.is_empty());
    }

    #[test]
    fn test_walk_records_trace() {
        let calibration = Calibration::default();
        let walker = TableWalker::new(
            IndicatorRegistry::default_registry(),
            UnitPatterns::default_patterns(),
            &calibration,
        );
        let table = Table::from_text_rows([vec!["ROE", "120"], vec!["Итого активов", "10"]]);
        let result = walker.walk(&table, 3);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.warnings.len(), 1);
        let entry = &result.entries[0];
        assert_eq!(entry.indicator, Indicator::TotalAssets);
        assert_eq!(
            entry.location,
            TraceLocation::Cell {
                table_index: 3,
                row_index: 1,
                column: 1
            }
        );
        assert!(entry
            .steps
            .iter()
            .any(|s| s.step_type == TraceStepType::AssumeBillions));
    }
}
