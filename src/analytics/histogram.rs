//! Equal-width frequency histograms

use serde::{Deserialize, Serialize};

/// Bin edges and per-bin counts for one numeric column.
///
/// A populated histogram always has `bins.len() == counts.len() + 1`; an empty
/// column yields empty vectors for both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin edges, ascending; one more entry than `counts`
    pub bins: Vec<f64>,
    /// Number of values falling in each bin; the last bin is closed on both ends
    pub counts: Vec<u64>,
}

impl Histogram {
    /// A histogram with no bins (empty column)
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            bins: Vec::new(),
            counts: Vec::new(),
        }
    }

    /// Total number of binned values
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Bin `values` into `bins` equal-width buckets spanning `[min, max]`.
///
/// A constant column widens its range by ±0.5 so the single value still lands
/// in a real bin. Every value is counted exactly once: the maximum falls into
/// the last bin.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    if values.is_empty() || bins == 0 {
        return Histogram::empty();
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut edges: Vec<f64> = (0..=bins).map(|i| lo + i as f64 * width).collect();
    edges[bins] = hi;

    let mut counts = vec![0u64; bins];
    for &value in values {
        let index = (((value - lo) / width).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }

    Histogram {
        bins: edges,
        counts,
    }
}
