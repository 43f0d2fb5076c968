//! Outlier detection via Tukey's fences

use serde::{Deserialize, Serialize};

use super::stats::{quantile, sorted_copy};
use crate::table::{CanonicalTable, NumericColumn};

/// Outlier count and sample rows for one numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierSummary {
    /// Number of values outside the fences
    pub count: usize,
    /// Up to a configured number of outlying rows, in original row order
    pub examples: Vec<OutlierExample>,
}

impl OutlierSummary {
    /// Summary for a column with no detectable outliers
    #[must_use]
    pub const fn none() -> Self {
        Self {
            count: 0,
            examples: Vec::new(),
        }
    }
}

/// One outlying reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierExample {
    /// Equipment name of the outlying row
    pub equipment_name: String,
    /// Equipment type of the outlying row
    #[serde(rename = "type")]
    pub equipment_type: String,
    /// The outlying value
    pub value: f64,
}

/// Detect outliers in one numeric column.
///
/// Fences are `Q1 − 1.5·IQR` and `Q3 + 1.5·IQR`, with quartiles computed by
/// linear interpolation over the non-null values. Values strictly outside the
/// fences are outliers. An empty column yields a zero summary.
#[must_use]
pub fn detect(
    table: &CanonicalTable,
    column: NumericColumn,
    max_examples: usize,
) -> OutlierSummary {
    let sorted = sorted_copy(&table.numeric_values(column));
    let (Some(q1), Some(q3)) = (quantile(&sorted, 0.25), quantile(&sorted, 0.75)) else {
        return OutlierSummary::none();
    };
    let iqr = q3 - q1;
    let low = q1 - 1.5 * iqr;
    let high = q3 + 1.5 * iqr;

    let mut count = 0;
    let mut examples = Vec::new();
    for row in table.rows() {
        let Some(value) = column.value_in(row) else {
            continue;
        };
        if value < low || value > high {
            count += 1;
            if examples.len() < max_examples {
                examples.push(OutlierExample {
                    equipment_name: row.name.clone(),
                    equipment_type: row.equipment_type.clone(),
                    value,
                });
            }
        }
    }

    OutlierSummary { count, examples }
}
