use crate::indicators::Indicator;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Shape limits applied before a table is handed to the walker.
pub const MIN_TABLE_ROWS: usize = 3;
pub const MIN_TABLE_COLS: usize = 2;
const MIN_FILL_RATIO: f64 = 0.3;
const MIN_NUMERIC_CELLS: usize = 2;

/// A single table cell as handed over by an extractor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> CellValue {
        let s = s.into();
        if s.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Number(n) => n.is_nan(),
            CellValue::Text(s) => s.trim().is_empty(),
        }
    }

    /// Trimmed textual rendering, `None` for empty cells.
    pub fn display_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Number(n) if n.is_nan() => None,
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Text(s) => {
                let t = s.trim();
                (!t.is_empty()).then(|| t.to_string())
            }
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// True for native numbers and for text that is a plain machine number ("123", "4.5").
    pub fn is_numeric(&self) -> bool {
        match self {
            CellValue::Number(n) => n.is_finite(),
            CellValue::Text(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
            CellValue::Empty => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// A rectangular-ish grid of cells. Rows may have different lengths.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<Vec<CellValue>>,
    /// Amounts are already in rubles; the walker applies no unit guesses.
    #[serde(default)]
    pub normalized: bool,
}

impl Table {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Table {
            rows,
            normalized: false,
        }
    }

    /// Build a table from text rows; blank strings become empty cells.
    pub fn from_text_rows<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Table::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(|s| CellValue::text(s.as_ref())).collect())
                .collect(),
        )
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Copy of the table without rows or columns that are entirely empty.
    pub fn compacted(&self) -> Table {
        let width = self.column_count();
        let keep_cols: Vec<usize> = (0..width)
            .filter(|&c| self.rows.iter().any(|r| r.get(c).is_some_and(|v| !v.is_empty())))
            .collect();
        let rows = self
            .rows
            .iter()
            .filter(|r| r.iter().any(|v| !v.is_empty()))
            .map(|r| {
                keep_cols
                    .iter()
                    .map(|&c| r.get(c).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        Table {
            rows,
            normalized: self.normalized,
        }
    }

    /// Share of populated cells over the full row x column grid.
    pub fn fill_ratio(&self) -> f64 {
        let total = self.row_count() * self.column_count();
        if total == 0 {
            return 0.0;
        }
        let filled = self
            .rows
            .iter()
            .flatten()
            .filter(|c| !c.is_empty())
            .count();
        filled as f64 / total as f64
    }

    /// Whether the table looks like real data rather than layout debris.
    ///
    /// Empty rows and columns are dropped first. Narrow tables (fewer than
    /// three columns) must also hold at least two plain numeric cells.
    pub fn is_valid(&self, min_rows: usize, min_cols: usize) -> bool {
        let compact = self.compacted();
        if compact.row_count() < min_rows || compact.column_count() < min_cols {
            return false;
        }
        if compact.fill_ratio() < MIN_FILL_RATIO {
            return false;
        }
        let numeric = compact
            .rows
            .iter()
            .flatten()
            .filter(|c| c.is_numeric())
            .count();
        numeric >= MIN_NUMERIC_CELLS || compact.column_count() >= 3
    }
}

/// Fixed-shape record of every canonical indicator, 0.0 meaning "not found".
///
/// Serializes as a flat JSON object in indicator declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialRecord {
    values: [f64; Indicator::COUNT],
}

impl Default for FinancialRecord {
    fn default() -> Self {
        FinancialRecord {
            values: [0.0; Indicator::COUNT],
        }
    }
}

impl FinancialRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, indicator: Indicator) -> f64 {
        self.values[indicator.index()]
    }

    pub fn set(&mut self, indicator: Indicator, value: f64) {
        self.values[indicator.index()] = value;
    }

    pub fn with(mut self, indicator: Indicator, value: f64) -> Self {
        self.set(indicator, value);
        self
    }

    /// Overwrite with every value from `values`, later sources winning.
    pub fn merge(&mut self, values: &BTreeMap<Indicator, f64>) {
        for (indicator, value) in values {
            self.set(*indicator, *value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Indicator, f64)> + '_ {
        Indicator::ALL.iter().map(|i| (*i, self.get(*i)))
    }

    /// Indicators with a non-zero value.
    pub fn resolved(&self) -> impl Iterator<Item = (Indicator, f64)> + '_ {
        self.iter().filter(|(_, v)| *v != 0.0)
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved().count()
    }

    /// Render the resolved values back into a two-column table of
    /// canonical labels and numbers. Aggregating it yields the record again.
    pub fn to_table(&self) -> Table {
        Table {
            rows: self
                .resolved()
                .map(|(i, v)| vec![CellValue::text(i.label()), CellValue::Number(v)])
                .collect(),
            normalized: true,
        }
    }
}

impl Serialize for FinancialRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Indicator::COUNT))?;
        for (indicator, value) in self.iter() {
            map.serialize_entry(indicator.key(), &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FinancialRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
        let mut record = FinancialRecord::default();
        for (key, value) in raw {
            let indicator = Indicator::from_key(&key)
                .ok_or_else(|| de::Error::custom(format!("unknown indicator '{key}'")))?;
            record.set(indicator, value);
        }
        Ok(record)
    }
}

/// Bank name and reporting year attached to an analysed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub bank_name: String,
    pub report_year: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text_blank_is_empty() {
        assert_eq!(CellValue::text("   "), CellValue::Empty);
        assert!(CellValue::Number(f64::NAN).is_empty());
        assert!(!CellValue::text("x").is_empty());
    }

    #[test]
    fn test_display_text_trims() {
        assert_eq!(CellValue::text("  Итого  ").display_text().as_deref(), Some("Итого"));
        assert_eq!(CellValue::Number(12.5).display_text().as_deref(), Some("12.5"));
        assert_eq!(CellValue::Empty.display_text(), None);
    }

    #[test]
    fn test_is_numeric() {
        assert!(CellValue::text("123").is_numeric());
        assert!(CellValue::Number(1.0).is_numeric());
        assert!(!CellValue::text("1 234,5").is_numeric());
        assert!(!CellValue::Empty.is_numeric());
    }

    #[test]
    fn test_compacted_drops_empty_rows_and_columns() {
        let table = Table::from_text_rows([
            vec!["a", "", "1"],
            vec!["", "", ""],
            vec!["b", "", "2"],
        ]);
        let compact = table.compacted();
        assert_eq!(compact.row_count(), 2);
        assert_eq!(compact.column_count(), 2);
        assert_eq!(compact.cell(1, 1), Some(&CellValue::text("2")));
    }

    #[test]
    fn test_fill_ratio() {
        let table = Table::from_text_rows([vec!["a", ""], vec!["b", "c"]]);
        assert!((table.fill_ratio() - 0.75).abs() < 1e-12);
        assert_eq!(Table::default().fill_ratio(), 0.0);
    }

    #[test]
    fn test_is_valid_accepts_numeric_table() {
        let table = Table::from_text_rows([
            vec!["Итого активов", "100"],
            vec!["Итого обязательств", "80"],
            vec!["Итого собственных средств", "20"],
        ]);
        assert!(table.is_valid(MIN_TABLE_ROWS, MIN_TABLE_COLS));
    }

    #[test]
    fn test_is_valid_rejects_short_or_sparse_tables() {
        let short = Table::from_text_rows([vec!["a", "1"], vec!["b", "2"]]);
        assert!(!short.is_valid(MIN_TABLE_ROWS, MIN_TABLE_COLS));

        let sparse = Table::from_text_rows([
            vec!["a", "", "", "", ""],
            vec!["", "b", "", "", ""],
            vec!["", "", "c", "", ""],
            vec!["", "", "", "d", "e"],
        ]);
        assert!(!sparse.is_valid(MIN_TABLE_ROWS, MIN_TABLE_COLS));
    }

    #[test]
    fn test_is_valid_narrow_text_table_needs_numbers() {
        let prose = Table::from_text_rows([
            vec!["Раздел", "Описание"],
            vec!["Риски", "Кредитный риск"],
            vec!["Капитал", "Достаточность"],
        ]);
        assert!(!prose.is_valid(MIN_TABLE_ROWS, MIN_TABLE_COLS));
    }

    #[test]
    fn test_record_defaults_to_zero() {
        let record = FinancialRecord::new();
        assert!(record.iter().all(|(_, v)| v == 0.0));
        assert_eq!(record.iter().count(), Indicator::COUNT);
        assert_eq!(record.resolved_count(), 0);
    }

    #[test]
    fn test_record_serializes_every_key_in_order() {
        let record = FinancialRecord::new().with(Indicator::Roe, 15.2);
        let json = serde_json::to_value(&record).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), Indicator::COUNT);
        assert_eq!(obj["roe"], 15.2);
        assert_eq!(obj["total_assets"], 0.0);

        let text = serde_json::to_string(&record).unwrap();
        assert!(text.starts_with("{\"total_assets\":"));
    }

    #[test]
    fn test_record_deserializes_partial_map() {
        let record: FinancialRecord =
            serde_json::from_str(r#"{"total_assets": 1e12, "equity": 1.2e11}"#).unwrap();
        assert_eq!(record.get(Indicator::TotalAssets), 1e12);
        assert_eq!(record.get(Indicator::Equity), 1.2e11);
        assert_eq!(record.get(Indicator::Roe), 0.0);
    }

    #[test]
    fn test_record_rejects_unknown_key() {
        let result: Result<FinancialRecord, _> = serde_json::from_str(r#"{"bogus": 1.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_to_table_lists_resolved_values() {
        let record = FinancialRecord::new()
            .with(Indicator::TotalAssets, 5e12)
            .with(Indicator::Roe, 12.0);
        let table = record.to_table();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, 0), Some(&CellValue::text("Итого активов")));
        assert_eq!(table.cell(1, 1), Some(&CellValue::Number(12.0)));
        assert!(table.normalized);
        assert!(!Table::new(Vec::new()).normalized);
    }
}
