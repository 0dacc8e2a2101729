use crate::model::{CellValue, Table, MIN_TABLE_COLS, MIN_TABLE_ROWS};

/// Marker written by the table exporter above each table ("ТАБЛИЦА #3 | ...").
pub const HEADER_MARKER: &str = "таблица #";

/// Detect a row that introduces a new table rather than carrying data.
pub fn is_header_row(row: &[CellValue]) -> bool {
    row.first()
        .and_then(CellValue::as_str)
        .is_some_and(|s| s.to_lowercase().contains(HEADER_MARKER))
}

/// Keep only tables that pass [`Table::is_valid`] with the default limits.
pub fn filter_valid_tables(tables: Vec<Table>) -> Vec<Table> {
    let before = tables.len();
    let kept: Vec<Table> = tables
        .into_iter()
        .enumerate()
        .filter_map(|(i, t)| {
            if t.is_valid(MIN_TABLE_ROWS, MIN_TABLE_COLS) {
                Some(t)
            } else {
                tracing::debug!(table_index = i, rows = t.row_count(), "rejected table");
                None
            }
        })
        .collect();
    tracing::info!(accepted = kept.len(), rejected = before - kept.len(), "filtered tables");
    kept
}
