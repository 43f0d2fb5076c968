//! Descriptive statistics over the non-null values of a numeric column

use serde::{Deserialize, Serialize};

/// Per-column descriptive statistics.
///
/// `count` is always the number of non-null values; every other field is null
/// when the column is empty, and `std` (sample standard deviation) is also
/// null for a single observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    /// Arithmetic mean
    pub mean: Option<f64>,
    /// Median (linear-interpolation quantile at 0.5)
    pub median: Option<f64>,
    /// Sample standard deviation
    pub std: Option<f64>,
    /// Smallest value
    pub min: Option<f64>,
    /// Largest value
    pub max: Option<f64>,
    /// Number of non-null values
    pub count: usize,
}

/// Compute descriptive statistics for a column's non-null values
#[must_use]
pub fn column_stats(values: &[f64]) -> ColumnStats {
    let sorted = sorted_copy(values);
    ColumnStats {
        mean: mean(values),
        median: quantile(&sorted, 0.5),
        std: sample_std(values),
        min: sorted.first().copied(),
        max: sorted.last().copied(),
        count: values.len(),
    }
}

/// Arithmetic mean, or `None` for an empty slice
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n − 1 denominator), or `None` below two values
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Linear-interpolation quantile over an ascending-sorted slice.
///
/// `q` is clamped to `[0, 1]`; returns `None` for an empty slice.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    let fraction = position - lower as f64;
    Some(sorted[lower] + fraction * (sorted[upper] - sorted[lower]))
}

/// Ascending-sorted copy of a slice of finite values
#[must_use]
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}
