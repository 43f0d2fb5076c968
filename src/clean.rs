//! Cleaning: canonical table construction
//!
//! Cleaning re-normalizes headers itself, so it works on any frame, freshly
//! ingested or lowered back out of a canonical table, and applying it twice
//! yields the same table as applying it once.

use csv::WriterBuilder;
use tracing::debug;

use crate::table::{
    coerce_number, Cell, CanonicalTable, EquipmentRow, Frame, COL_EQUIPMENT_NAME, COL_TYPE,
    NumericColumn, REQUIRED_COLUMNS,
};
use crate::{Error, Result};

/// Build the canonical five-column table from a frame.
///
/// Required columns that are absent are synthesized as entirely null, extra
/// columns are dropped, numeric columns are re-coerced, text columns are
/// trimmed, and rows where all five fields are null (empty text counting as
/// null) are removed.
#[must_use]
pub fn clean(frame: &Frame) -> CanonicalTable {
    let name_col = frame.column_index(COL_EQUIPMENT_NAME);
    let type_col = frame.column_index(COL_TYPE);
    let numeric_cols: Vec<Option<usize>> = NumericColumn::ALL
        .iter()
        .map(|c| frame.column_index(c.name()))
        .collect();

    let mut rows = Vec::with_capacity(frame.len());
    let mut dropped = 0usize;
    for cells in frame.rows() {
        let numbers: Vec<Option<f64>> = numeric_cols
            .iter()
            .map(|col| col.and_then(|i| cell_number(&cells[i])))
            .collect();
        let row = EquipmentRow {
            name: name_col.map_or_else(String::new, |i| cell_text(&cells[i])),
            equipment_type: type_col.map_or_else(String::new, |i| cell_text(&cells[i])),
            flowrate: numbers[0],
            pressure: numbers[1],
            temperature: numbers[2],
        };
        if row.is_blank() {
            dropped += 1;
        } else {
            rows.push(row);
        }
    }

    if dropped > 0 {
        debug!(dropped, "dropped all-null rows during cleaning");
    }
    CanonicalTable::from_rows(rows)
}

/// Serialize a canonical table as a delimited file with the canonical header
/// row; nulls are written as empty cells.
///
/// # Errors
///
/// Returns an error if CSV serialization fails.
pub fn to_csv(table: &CanonicalTable) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(REQUIRED_COLUMNS)?;
    for row in table.rows() {
        let mut record = vec![row.name.clone(), row.equipment_type.clone()];
        for column in NumericColumn::ALL {
            record.push(column.value_in(row).map_or_else(String::new, |v| v.to_string()));
        }
        writer.write_record(&record)?;
    }
    writer
        .into_inner()
        .map_err(|e| Error::Processing(format!("cleaned CSV write failed: {e}")))
}

fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Null => String::new(),
        Cell::Number(v) => v.to_string(),
        Cell::Text(raw) => raw.trim().to_string(),
    }
}

fn cell_number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Null => None,
        Cell::Number(v) => Some(*v),
        Cell::Text(raw) => coerce_number(raw),
    }
}
