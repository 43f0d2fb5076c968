//! Table model: the loose pre-clean frame and the canonical equipment table
//!
//! Ingestion produces a [`Frame`]: ordered columns of dynamic cells, extra
//! columns still present. Cleaning turns a frame into a [`CanonicalTable`] of
//! typed [`EquipmentRow`]s, which is the only shape the analytics engine and
//! the report renderer accept.

use serde::{Deserialize, Serialize};

/// Canonical name of the equipment-name column
pub const COL_EQUIPMENT_NAME: &str = "equipment name";
/// Canonical name of the equipment-type column
pub const COL_TYPE: &str = "type";

/// The five required columns, in canonical order
pub const REQUIRED_COLUMNS: [&str; 5] = [
    COL_EQUIPMENT_NAME,
    COL_TYPE,
    "flowrate",
    "pressure",
    "temperature",
];

/// The three numeric parameter columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericColumn {
    /// Volumetric flowrate
    Flowrate,
    /// Line pressure
    Pressure,
    /// Operating temperature
    Temperature,
}

impl NumericColumn {
    /// All numeric columns in canonical order
    pub const ALL: [Self; 3] = [Self::Flowrate, Self::Pressure, Self::Temperature];

    /// Canonical (lowercase) column name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Flowrate => "flowrate",
            Self::Pressure => "pressure",
            Self::Temperature => "temperature",
        }
    }

    /// Display label for chart captions and summaries
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Flowrate => "Flowrate",
            Self::Pressure => "Pressure",
            Self::Temperature => "Temperature",
        }
    }

    /// Read this column's value from a canonical row
    #[must_use]
    pub const fn value_in(self, row: &EquipmentRow) -> Option<f64> {
        match self {
            Self::Flowrate => row.flowrate,
            Self::Pressure => row.pressure,
            Self::Temperature => row.temperature,
        }
    }
}

/// Normalize a header cell: trim surrounding whitespace and lowercase
#[must_use]
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Coerce a raw cell to a finite float.
///
/// Returns `None` for unparseable text, empty cells, and non-finite parses
/// (`NaN`, `inf`), so coerced tables never hold a non-finite number.
#[must_use]
pub fn coerce_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// A dynamically typed cell of a pre-clean frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// Missing or failed-coercion value
    Null,
    /// A coerced (finite) number
    Number(f64),
    /// Raw text as parsed from the input
    Text(String),
}

impl Cell {
    /// True if the cell carries no value
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// An ordered table with arbitrary columns, as produced by ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Frame {
    /// Create a frame from column names and rows.
    ///
    /// Rows shorter than the header are padded with [`Cell::Null`]; longer
    /// rows are truncated to the header width.
    #[must_use]
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        for row in &mut rows {
            row.resize(width, Cell::Null);
        }
        Self { columns, rows }
    }

    /// Column names, in order
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Table rows, in original order
    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the frame has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column whose normalized name matches `name`
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| normalize_header(c) == name)
    }

    /// Rename a column in place
    pub fn rename_column(&mut self, index: usize, name: String) {
        if let Some(slot) = self.columns.get_mut(index) {
            *slot = name;
        }
    }

    /// Replace a cell in place
    pub fn set_cell(&mut self, row: usize, col: usize, cell: Cell) {
        if let Some(slot) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *slot = cell;
        }
    }
}

/// One cleaned equipment reading.
///
/// Text fields hold `""` where the source had nothing; numeric fields are
/// `None` where coercion failed. Constructed by cleaning and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRow {
    /// Equipment name, whitespace-trimmed
    pub name: String,
    /// Equipment type/category, whitespace-trimmed
    #[serde(rename = "type")]
    pub equipment_type: String,
    /// Flowrate reading
    pub flowrate: Option<f64>,
    /// Pressure reading
    pub pressure: Option<f64>,
    /// Temperature reading
    pub temperature: Option<f64>,
}

impl EquipmentRow {
    /// True if all five fields are null (empty text counts as null)
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
            && self.equipment_type.is_empty()
            && self.flowrate.is_none()
            && self.pressure.is_none()
            && self.temperature.is_none()
    }
}

/// The canonical five-column table produced by cleaning
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CanonicalTable {
    rows: Vec<EquipmentRow>,
}

impl CanonicalTable {
    /// Build a table from already-cleaned rows
    #[must_use]
    pub fn from_rows(rows: Vec<EquipmentRow>) -> Self {
        Self { rows }
    }

    /// Rows in original order
    #[must_use]
    pub fn rows(&self) -> &[EquipmentRow] {
        &self.rows
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Non-null values of a numeric column, in original row order
    #[must_use]
    pub fn numeric_values(&self, column: NumericColumn) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|row| column.value_in(row))
            .collect()
    }

    /// Lower this table back into a frame (used to re-run cleaning and by
    /// the cleaned-CSV writer)
    #[must_use]
    pub fn to_frame(&self) -> Frame {
        let columns = REQUIRED_COLUMNS.iter().map(ToString::to_string).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut cells = vec![
                    Cell::Text(row.name.clone()),
                    Cell::Text(row.equipment_type.clone()),
                ];
                for column in NumericColumn::ALL {
                    cells.push(column.value_in(row).map_or(Cell::Null, Cell::Number));
                }
                cells
            })
            .collect();
        Frame::new(columns, rows)
    }
}
