//! Ingestion & validation: raw CSV bytes into a coerced frame
//!
//! Parsing is tolerant (bad records are skipped, encoding problems are
//! replaced) but the required-column check is strict and aborts the run
//! before any downstream processing.

use std::collections::BTreeMap;

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::table::{coerce_number, normalize_header, Cell, Frame, NumericColumn, REQUIRED_COLUMNS};
use crate::{Error, Result};

/// Per-column counts of cells that ended up null after numeric coercion.
///
/// Unparseable text and empty cells both count; the pipeline treats these as
/// data warnings, never as failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoercionReport {
    counts: BTreeMap<String, usize>,
}

impl CoercionReport {
    /// Failure count for one column (0 if the column was never coerced)
    #[must_use]
    pub fn failures(&self, column: &str) -> usize {
        self.counts.get(column).copied().unwrap_or(0)
    }

    /// Total failures across all coerced columns
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Per-column counts, keyed by canonical column name
    #[must_use]
    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    fn record(&mut self, column: &str, failures: usize) {
        self.counts.insert(column.to_string(), failures);
    }
}

/// Parse, validate and coerce an uploaded delimited file.
///
/// Headers are whitespace-trimmed and matched case-insensitively against the
/// five required columns; matched columns are renamed to their canonical
/// lowercase names and extra columns are retained (cleaning drops them later).
/// The three numeric columns are coerced cell-by-cell to finite floats, with
/// failures mapped to null and counted.
///
/// # Errors
///
/// Returns [`Error::Validation`] naming the missing and found columns when any
/// required column is absent. Malformed individual records are skipped with a
/// warning rather than failing the run.
pub fn ingest(bytes: &[u8]) -> Result<(Frame, CoercionReport)> {
    let text = String::from_utf8_lossy(bytes);
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let found: Vec<String> = reader
        .headers()?
        .iter()
        .map(ToString::to_string)
        .collect();
    let normalized: Vec<String> = found.iter().map(|h| normalize_header(h)).collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !normalized.iter().any(|h| h == *required))
        .map(ToString::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(Error::Validation { missing, found });
    }

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        match record {
            Ok(record) => {
                rows.push(record.iter().map(|v| Cell::Text(v.to_string())).collect());
            }
            Err(e) => {
                warn!(row = index + 1, error = %e, "skipping malformed record");
            }
        }
    }

    let mut frame = Frame::new(found, rows);

    // Rename the first match for each required name to its canonical form
    for required in REQUIRED_COLUMNS {
        if let Some(index) = frame.column_index(required) {
            frame.rename_column(index, required.to_string());
        }
    }

    let report = coerce_numeric_columns(&mut frame);
    debug!(
        rows = frame.len(),
        coercion_failures = report.total(),
        "ingested upload"
    );

    Ok((frame, report))
}

/// Coerce every cell of the three numeric columns to a finite float or null,
/// recording per-column null counts
fn coerce_numeric_columns(frame: &mut Frame) -> CoercionReport {
    let mut report = CoercionReport::default();
    for column in NumericColumn::ALL {
        let Some(col) = frame.column_index(column.name()) else {
            continue;
        };
        let mut failures = 0;
        for row in 0..frame.len() {
            let coerced = match &frame.rows()[row][col] {
                Cell::Number(v) => Some(*v),
                Cell::Text(raw) => coerce_number(raw),
                Cell::Null => None,
            };
            match coerced {
                Some(v) => frame.set_cell(row, col, Cell::Number(v)),
                None => {
                    failures += 1;
                    frame.set_cell(row, col, Cell::Null);
                }
            }
        }
        report.record(column.name(), failures);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"Equipment Name,Type,Flowrate,Pressure,Temperature\n\
        Pump A,Pump,10,1.2,45\n\
        Valve B,Valve,5,0.8,30\n";

    #[test]
    fn test_ingest_renames_and_coerces() {
        let (frame, report) = ingest(SAMPLE).unwrap();
        assert_eq!(frame.columns(), REQUIRED_COLUMNS);
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.rows()[0][2], Cell::Number(10.0));
        assert_eq!(report.total(), 0);
    }

    #[test]
    fn test_ingest_missing_column_fails() {
        let input = b"Equipment Name,Type,Flowrate,Temperature\nPump A,Pump,10,45\n";
        let err = ingest(input).unwrap_err();
        match err {
            Error::Validation { missing, found } => {
                assert_eq!(missing, vec!["pressure".to_string()]);
                assert!(found.contains(&"Equipment Name".to_string()));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_ingest_counts_coercion_failures() {
        let input = b"equipment name,type,flowrate,pressure,temperature\n\
            Pump A,Pump,not-a-number,1.2,45\n\
            Valve B,Valve,5,,30\n";
        let (frame, report) = ingest(input).unwrap();
        assert_eq!(report.failures("flowrate"), 1);
        assert_eq!(report.failures("pressure"), 1);
        assert_eq!(report.failures("temperature"), 0);
        assert!(frame.rows()[0][2].is_null());
    }

    #[test]
    fn test_ingest_retains_extra_columns() {
        let input = b"equipment name,type,flowrate,pressure,temperature,site\n\
            Pump A,Pump,10,1.2,45,north\n";
        let (frame, _) = ingest(input).unwrap();
        assert_eq!(frame.columns().len(), 6);
        assert_eq!(frame.column_index("site"), Some(5));
    }

    #[test]
    fn test_ingest_rejects_non_finite() {
        let input = b"equipment name,type,flowrate,pressure,temperature\n\
            Pump A,Pump,NaN,inf,45\n";
        let (frame, report) = ingest(input).unwrap();
        assert!(frame.rows()[0][2].is_null());
        assert!(frame.rows()[0][3].is_null());
        assert_eq!(report.failures("flowrate"), 1);
        assert_eq!(report.failures("pressure"), 1);
    }
}
