//! Dataset summary record, artifact naming and retention selection
//!
//! The durable dataset entity lives outside this crate; these are the pieces
//! the pipeline populates for it and the pure helpers its owner calls.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::analytics::AnalyticsResult;
use crate::table::NumericColumn;

/// Value range of one numeric column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    /// Smallest non-null value
    pub min: f64,
    /// Largest non-null value
    pub max: f64,
}

/// Summary scalars persisted alongside the sanitized analytics blob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Row count of the cleaned canonical table
    pub total_rows: usize,
    /// Mean flowrate over non-null values
    pub avg_flowrate: Option<f64>,
    /// Mean pressure over non-null values
    pub avg_pressure: Option<f64>,
    /// Mean temperature over non-null values
    pub avg_temperature: Option<f64>,
    /// Frequency of each distinct equipment type
    pub type_distribution: BTreeMap<String, usize>,
    /// Per-column value ranges; null for an all-null column
    pub min_max: BTreeMap<String, Option<MinMax>>,
}

impl DatasetSummary {
    /// Derive the summary scalars from a computed analytics result
    #[must_use]
    pub fn from_analytics(analytics: &AnalyticsResult) -> Self {
        let stat = |column: NumericColumn| analytics.stats.get(column.name());
        let min_max = NumericColumn::ALL
            .iter()
            .map(|column| {
                let range = stat(*column).and_then(|s| match (s.min, s.max) {
                    (Some(min), Some(max)) => Some(MinMax { min, max }),
                    _ => None,
                });
                (column.name().to_string(), range)
            })
            .collect();

        Self {
            total_rows: analytics.row_count,
            avg_flowrate: stat(NumericColumn::Flowrate).and_then(|s| s.mean),
            avg_pressure: stat(NumericColumn::Pressure).and_then(|s| s.mean),
            avg_temperature: stat(NumericColumn::Temperature).and_then(|s| s.mean),
            type_distribution: analytics.type_distribution.clone(),
            min_max,
        }
    }
}

/// Relative artifact names derived from the externally assigned dataset id.
///
/// The id must already exist; this crate never mints identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactNames {
    /// Where the original upload is stored
    pub original_csv: String,
    /// Where the cleaned canonical table is stored
    pub cleaned_csv: String,
    /// Where the rendered report is stored
    pub report_pdf: String,
}

/// Compute the artifact names for a dataset id
#[must_use]
pub fn artifact_names(dataset_id: &str) -> ArtifactNames {
    ArtifactNames {
        original_csv: format!("uploads/{dataset_id}.csv"),
        cleaned_csv: format!("clean/{dataset_id}.csv"),
        report_pdf: format!("reports/{dataset_id}.pdf"),
    }
}

/// Select the dataset ids that fall outside the retention window.
///
/// `ordered_ids` must be ordered most-recent-first (the owner's upload-time
/// ordering); the first `keep` ids survive and the rest are returned for
/// deletion. Pure; the caller deletes records and files, tolerating missing
/// files without aborting the batch.
#[must_use]
pub fn select_for_deletion<S: AsRef<str>>(ordered_ids: &[S], keep: usize) -> HashSet<String> {
    ordered_ids
        .iter()
        .skip(keep)
        .map(|id| id.as_ref().to_string())
        .collect()
}
