//! Analytics engine: the full statistical result set for a canonical table
//!
//! Every sub-computation is independent and total: a degenerate or empty
//! table produces nulls and empty collections, never an error. Only ingestion
//! can fail a pipeline run.
//!
//! ## Result overview
//!
//! ```text
//! AnalyticsResult
//!   ├── row_count, missing_values
//!   ├── stats            (per numeric column: mean/median/std/min/max/count)
//!   ├── type_distribution
//!   ├── outliers         (Tukey fences, count + example rows)
//!   ├── correlation_matrix (pairwise-complete Pearson)
//!   ├── top_values       (largest / smallest readings)
//!   ├── histograms       (10 equal-width bins)
//!   └── insights         (rule-based observations)
//! ```

mod correlation;
mod extremes;
mod histogram;
mod insights;
mod outliers;
mod stats;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::table::{CanonicalTable, NumericColumn, COL_EQUIPMENT_NAME, COL_TYPE};

pub use correlation::{matrix as correlation_matrix, pearson};
pub use extremes::{ColumnExtremes, RankedValue};
pub use histogram::{histogram, Histogram};
pub use insights::{HIGH_TEMPERATURE, STRONG_CORRELATION};
pub use outliers::{OutlierExample, OutlierSummary};
pub use stats::{column_stats, mean, quantile, sample_std, ColumnStats};

/// Tunables for the analytics engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsOptions {
    /// Number of equal-width histogram bins
    pub histogram_bins: usize,
    /// How many top/low readings to keep per column
    pub extremes_per_column: usize,
    /// How many outlier example rows to keep per column
    pub outlier_examples: usize,
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self {
            histogram_bins: 10,
            extremes_per_column: 5,
            outlier_examples: 10,
        }
    }
}

impl AnalyticsOptions {
    /// Set the histogram bin count
    #[must_use]
    pub const fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = bins;
        self
    }

    /// Set how many top/low readings to keep per column
    #[must_use]
    pub const fn extremes_per_column(mut self, n: usize) -> Self {
        self.extremes_per_column = n;
        self
    }

    /// Set how many outlier example rows to keep per column
    #[must_use]
    pub const fn outlier_examples(mut self, n: usize) -> Self {
        self.outlier_examples = n;
        self
    }
}

/// The complete statistical result set for one canonical table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResult {
    /// Number of rows in the analyzed table
    pub row_count: usize,
    /// Per-column null counts (empty text counts as null)
    pub missing_values: BTreeMap<String, usize>,
    /// Descriptive statistics per numeric column
    pub stats: BTreeMap<String, ColumnStats>,
    /// Frequency of each distinct non-empty equipment type
    pub type_distribution: BTreeMap<String, usize>,
    /// Tukey outliers per numeric column
    pub outliers: BTreeMap<String, OutlierSummary>,
    /// Pairwise Pearson correlation among the numeric columns
    pub correlation_matrix: BTreeMap<String, BTreeMap<String, f64>>,
    /// Largest and smallest readings per numeric column
    pub top_values: BTreeMap<String, ColumnExtremes>,
    /// Equal-width histograms per numeric column
    pub histograms: BTreeMap<String, Histogram>,
    /// Rule-based observations, in fixed rule order
    pub insights: Vec<String>,
}

/// Analyze a canonical table with default options
#[must_use]
pub fn analyze(table: &CanonicalTable) -> AnalyticsResult {
    analyze_with(table, AnalyticsOptions::default())
}

/// Analyze a canonical table
#[must_use]
pub fn analyze_with(table: &CanonicalTable, options: AnalyticsOptions) -> AnalyticsResult {
    let correlation_matrix = correlation::matrix(table);
    let insights = insights::generate(table, &correlation_matrix);

    let mut stats = BTreeMap::new();
    let mut outliers = BTreeMap::new();
    let mut top_values = BTreeMap::new();
    let mut histograms = BTreeMap::new();
    for column in NumericColumn::ALL {
        let values = table.numeric_values(column);
        let key = column.name().to_string();
        stats.insert(key.clone(), column_stats(&values));
        outliers.insert(
            key.clone(),
            outliers::detect(table, column, options.outlier_examples),
        );
        top_values.insert(
            key.clone(),
            extremes::extremes(table, column, options.extremes_per_column),
        );
        histograms.insert(key, histogram(&values, options.histogram_bins));
    }

    debug!(rows = table.len(), insights = insights.len(), "analyzed table");

    AnalyticsResult {
        row_count: table.len(),
        missing_values: missing_values(table),
        stats,
        type_distribution: type_distribution(table),
        outliers,
        correlation_matrix,
        top_values,
        histograms,
        insights,
    }
}

/// Per-column null counts over the five canonical columns
fn missing_values(table: &CanonicalTable) -> BTreeMap<String, usize> {
    let mut missing = BTreeMap::new();
    missing.insert(
        COL_EQUIPMENT_NAME.to_string(),
        table.rows().iter().filter(|r| r.name.is_empty()).count(),
    );
    missing.insert(
        COL_TYPE.to_string(),
        table
            .rows()
            .iter()
            .filter(|r| r.equipment_type.is_empty())
            .count(),
    );
    for column in NumericColumn::ALL {
        missing.insert(
            column.name().to_string(),
            table
                .rows()
                .iter()
                .filter(|r| column.value_in(r).is_none())
                .count(),
        );
    }
    missing
}

/// Frequency count of each distinct non-empty equipment type
fn type_distribution(table: &CanonicalTable) -> BTreeMap<String, usize> {
    let mut distribution = BTreeMap::new();
    for row in table.rows() {
        if !row.equipment_type.is_empty() {
            *distribution.entry(row.equipment_type.clone()).or_insert(0) += 1;
        }
    }
    distribution
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::table::EquipmentRow;

    fn sample_table() -> CanonicalTable {
        CanonicalTable::from_rows(vec![
            EquipmentRow {
                name: "Pump A".to_string(),
                equipment_type: "Pump".to_string(),
                flowrate: Some(10.0),
                pressure: Some(1.2),
                temperature: Some(45.0),
            },
            EquipmentRow {
                name: "Valve B".to_string(),
                equipment_type: "Valve".to_string(),
                flowrate: Some(5.0),
                pressure: Some(0.8),
                temperature: Some(30.0),
            },
        ])
    }

    #[test]
    fn test_analyze_sample_vector() {
        let result = analyze(&sample_table());
        assert_eq!(result.row_count, 2);
        assert_eq!(result.stats["flowrate"].mean, Some(7.5));
        assert_eq!(result.type_distribution["Pump"], 1);
        assert_eq!(result.type_distribution["Valve"], 1);
        assert_eq!(result.missing_values["pressure"], 0);
    }

    #[test]
    fn test_analyze_empty_table() {
        let result = analyze(&CanonicalTable::from_rows(vec![]));
        assert_eq!(result.row_count, 0);
        assert_eq!(result.stats["flowrate"].count, 0);
        assert_eq!(result.stats["flowrate"].mean, None);
        assert_eq!(result.outliers["flowrate"], OutlierSummary::none());
        assert!(result.histograms["flowrate"].bins.is_empty());
        assert!(result.type_distribution.is_empty());
        assert!(result.insights.is_empty());
        assert_eq!(result.correlation_matrix["flowrate"]["flowrate"], 0.0);
    }

    #[test]
    fn test_analyze_all_null_column() {
        let table = CanonicalTable::from_rows(vec![EquipmentRow {
            name: "Pump A".to_string(),
            equipment_type: "Pump".to_string(),
            flowrate: None,
            pressure: Some(1.0),
            temperature: Some(20.0),
        }]);
        let result = analyze(&table);
        let flow = &result.stats["flowrate"];
        assert_eq!(flow.count, 0);
        assert_eq!(flow.mean, None);
        assert_eq!(flow.std, None);
        assert_eq!(result.outliers["flowrate"], OutlierSummary::none());
        assert_eq!(result.missing_values["flowrate"], 1);
    }

    #[test]
    fn test_histogram_counts_match_stats_count() {
        let result = analyze(&sample_table());
        for column in NumericColumn::ALL {
            let key = column.name();
            assert_eq!(
                result.histograms[key].total(),
                result.stats[key].count as u64
            );
        }
    }

    #[test]
    fn test_options_are_honored() {
        let options = AnalyticsOptions::default()
            .histogram_bins(4)
            .extremes_per_column(1);
        let result = analyze_with(&sample_table(), options);
        assert_eq!(result.histograms["flowrate"].counts.len(), 4);
        assert_eq!(result.top_values["flowrate"].top.len(), 1);
    }
}
