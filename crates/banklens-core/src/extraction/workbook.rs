use std::io::Cursor;

use calamine::{Reader, Xlsx};

use crate::error::BankLensError;
use crate::extraction::table::is_header_row;
use crate::model::{CellValue, Table};

/// Read the tables of an `.xlsx` written by the PDF table exporter.
///
/// The first worksheet holds every table one after another, each introduced
/// by a marker row ("ТАБЛИЦА #n"). A sheet without markers is read as a
/// single table.
pub fn read_tables_workbook(bytes: &[u8]) -> Result<Vec<Table>, BankLensError> {
    let cursor = Cursor::new(bytes);
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(cursor)
        .map_err(|e| BankLensError::Workbook(format!("failed to open xlsx: {e}")))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| BankLensError::Workbook("workbook has no sheets".into()))?;
    let sheet = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| BankLensError::Workbook(format!("sheet '{sheet_name}' unreadable: {e}")))?;

    let rows: Vec<Vec<CellValue>> = sheet
        .rows()
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    let tables = split_marked_tables(rows);
    tracing::info!(sheet = %sheet_name, tables = tables.len(), "read workbook");
    Ok(tables)
}

/// Split sheet rows into tables at marker rows. Tables keep more than
/// three non-empty rows and more than one non-empty column.
pub fn split_marked_tables(rows: Vec<Vec<CellValue>>) -> Vec<Table> {
    let markers: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, r)| is_header_row(r))
        .map(|(i, _)| i)
        .collect();

    let blocks: Vec<Vec<Vec<CellValue>>> = if markers.is_empty() {
        vec![rows]
    } else {
        let mut bounds = markers.clone();
        bounds.push(rows.len());
        bounds
            .windows(2)
            .map(|w| rows[w[0] + 1..w[1]].to_vec())
            .collect()
    };

    blocks
        .into_iter()
        .map(|block| Table::new(block).compacted())
        .filter(|t| t.row_count() > 3 && t.column_count() > 1)
        .collect()
}

fn cell_value(cell: &calamine::Data) -> CellValue {
    match cell {
        calamine::Data::String(s) => CellValue::text(s.trim()),
        calamine::Data::Float(f) => CellValue::Number(*f),
        calamine::Data::Int(i) => CellValue::Number(*i as f64),
        calamine::Data::Empty => CellValue::Empty,
        calamine::Data::DateTime(dt) => CellValue::text(dt.to_string()),
        _ => CellValue::text(format!("{cell}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<CellValue> {
        cells.iter().map(|s| CellValue::text(*s)).collect()
    }

    #[test]
    fn test_split_at_markers() {
        let rows = vec![
            row(&["ТАБЛИЦЫ ИЗ PDF"]),
            row(&["Исходный файл: report.pdf"]),
            row(&["ТАБЛИЦА #1 | Размер: 4x2"]),
            row(&["Показатель", "2023"]),
            row(&["Итого активов", "100"]),
            row(&["Итого обязательств", "80"]),
            row(&["Итого собственных средств", "20"]),
            row(&["", ""]),
            row(&["ТАБЛИЦА #2 | Размер: 1x2"]),
            row(&["ROE", "15"]),
        ];
        let tables = split_marked_tables(rows);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].row_count(), 4);
        assert_eq!(tables[0].cell(1, 0), Some(&CellValue::text("Итого активов")));
    }

    #[test]
    fn test_empty_columns_dropped() {
        let rows = vec![
            row(&["ТАБЛИЦА #1"]),
            row(&["a", "", "1"]),
            row(&["b", "", "2"]),
            row(&["c", "", "3"]),
            row(&["d", "", "4"]),
        ];
        let tables = split_marked_tables(rows);
        assert_eq!(tables[0].column_count(), 2);
    }

    #[test]
    fn test_sheet_without_markers_is_one_table() {
        let rows = vec![
            row(&["a", "1"]),
            row(&["b", "2"]),
            row(&["c", "3"]),
            row(&["d", "4"]),
        ];
        assert_eq!(split_marked_tables(rows).len(), 1);
    }

    #[test]
    fn test_cell_conversion() {
        assert_eq!(cell_value(&calamine::Data::Float(1.5)), CellValue::Number(1.5));
        assert_eq!(cell_value(&calamine::Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(cell_value(&calamine::Data::String("  x ".into())), CellValue::text("x"));
        assert_eq!(cell_value(&calamine::Data::String("   ".into())), CellValue::Empty);
        assert_eq!(cell_value(&calamine::Data::Empty), CellValue::Empty);
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let err = read_tables_workbook(b"not a workbook").unwrap_err();
        assert!(matches!(err, BankLensError::Workbook(_)));
    }
}
