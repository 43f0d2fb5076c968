//! Largest and smallest readings per numeric column

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::table::{CanonicalTable, NumericColumn};

/// The top and bottom readings of one numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnExtremes {
    /// Largest values, descending
    pub top: Vec<RankedValue>,
    /// Smallest values, ascending
    pub low: Vec<RankedValue>,
}

/// One ranked reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedValue {
    /// Equipment name of the row
    pub equipment_name: String,
    /// The reading
    pub value: f64,
}

/// Select the `n` largest and `n` smallest non-null values of a column.
///
/// Ties are broken by original row order, so repeated values surface the
/// earliest rows first.
#[must_use]
pub fn extremes(table: &CanonicalTable, column: NumericColumn, n: usize) -> ColumnExtremes {
    let mut indexed: Vec<(usize, f64, &str)> = table
        .rows()
        .iter()
        .enumerate()
        .filter_map(|(i, row)| column.value_in(row).map(|v| (i, v, row.name.as_str())))
        .collect();

    indexed.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    let top = ranked(indexed.iter().take(n));

    indexed.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    let low = ranked(indexed.iter().take(n));

    ColumnExtremes { top, low }
}

fn ranked<'a>(entries: impl Iterator<Item = &'a (usize, f64, &'a str)>) -> Vec<RankedValue> {
    entries
        .map(|(_, value, name)| RankedValue {
            equipment_name: (*name).to_string(),
            value: *value,
        })
        .collect()
}
