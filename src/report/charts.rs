//! Chart rendering for the report
//!
//! Charts are drawn with the plotters bitmap backend into a caller-scoped
//! directory of intermediate PNG files. Every chart produces an explicit
//! outcome, an image path or a failure reason, so document assembly can
//! omit broken charts and keep going.
//!
//! The bitmaps are deliberately text-free (no font stack required); captions
//! and axis descriptions are drawn by the PDF text layer.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::analytics::{correlation_matrix, histogram, AnalyticsResult, Histogram};
use crate::table::{CanonicalTable, NumericColumn};

/// Pixel width of rendered chart images
pub const CHART_WIDTH: u32 = 640;
/// Pixel height of rendered chart images
pub const CHART_HEIGHT: u32 = 420;

const HIST_BINS: usize = 10;
const BAR_COLOR: RGBColor = RGBColor(124, 58, 237);
const POINT_COLOR: RGBColor = RGBColor(251, 113, 133);
const COOL: RGBColor = RGBColor(59, 76, 192);
const WARM: RGBColor = RGBColor(180, 4, 38);
const NEUTRAL: RGBColor = RGBColor(255, 255, 255);

/// One chart slot with its explicit outcome
#[derive(Debug, Clone)]
pub struct ChartOutcome {
    /// Chart title, drawn as the document caption
    pub title: String,
    /// Rendered image path, or the reason the chart was skipped
    pub image: Result<PathBuf, String>,
}

/// The full chart set for one report
#[derive(Debug, Clone)]
pub struct ChartSet {
    /// One frequency histogram per numeric column, in canonical column order
    pub histograms: Vec<ChartOutcome>,
    /// Correlation heatmap over the numeric columns
    pub correlation: ChartOutcome,
    /// Flowrate-vs-temperature scatter
    pub scatter: ChartOutcome,
}

impl ChartSet {
    /// Number of charts that rendered successfully
    #[must_use]
    pub fn rendered(&self) -> usize {
        self.histograms
            .iter()
            .chain([&self.correlation, &self.scatter])
            .filter(|c| c.image.is_ok())
            .count()
    }
}

/// Render every report chart into `dir`.
///
/// Histograms and the heatmap prefer precomputed analytics when supplied and
/// fall back to ad hoc computation from the raw table. This never fails as a
/// whole: individual failures are carried in the returned outcomes.
#[must_use]
pub fn render_charts(
    table: &CanonicalTable,
    analytics: Option<&AnalyticsResult>,
    dir: &Path,
) -> ChartSet {
    let histograms = NumericColumn::ALL
        .iter()
        .map(|&column| {
            let hist = histogram_source(table, analytics, column);
            let title = match (hist.bins.first(), hist.bins.last()) {
                (Some(lo), Some(hi)) => {
                    format!("{} Distribution ({lo:.1} to {hi:.1})", column.label())
                }
                _ => format!("{} Distribution", column.label()),
            };
            let path = dir.join(format!("{}_hist.png", column.name()));
            ChartOutcome {
                image: histogram_chart(&path, &hist).map(|()| path.clone()),
                title,
            }
        })
        .collect();

    let correlation = {
        let matrix = analytics.map_or_else(
            || correlation_matrix(table),
            |a| a.correlation_matrix.clone(),
        );
        let path = dir.join("correlation.png");
        ChartOutcome {
            image: heatmap_chart(&path, &matrix).map(|()| path.clone()),
            title: "Correlation Matrix (blue -1, white 0, red +1; \
                    flowrate / pressure / temperature left to right, bottom to top)"
                .to_string(),
        }
    };

    let scatter = {
        let path = dir.join("flow_vs_temp.png");
        ChartOutcome {
            image: scatter_chart(&path, table).map(|()| path.clone()),
            title: "Flowrate vs Temperature (x: temperature, y: flowrate)".to_string(),
        }
    };

    ChartSet {
        histograms,
        correlation,
        scatter,
    }
}

fn histogram_source(
    table: &CanonicalTable,
    analytics: Option<&AnalyticsResult>,
    column: NumericColumn,
) -> Histogram {
    analytics
        .and_then(|a| a.histograms.get(column.name()))
        .filter(|h| !h.counts.is_empty())
        .cloned()
        .unwrap_or_else(|| histogram(&table.numeric_values(column), HIST_BINS))
}

#[allow(clippy::cast_precision_loss)]
fn histogram_chart(path: &Path, hist: &Histogram) -> Result<(), String> {
    let (Some(&lo), Some(&hi)) = (hist.bins.first(), hist.bins.last()) else {
        return Err("no values to bin".to_string());
    };
    let y_max = hist.counts.iter().copied().max().unwrap_or(0) as f64 * 1.15 + 1.0;

    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| e.to_string())?;

    let mut chart = ChartBuilder::on(&root)
        .margin(16)
        .build_cartesian_2d(lo..hi, 0f64..y_max)
        .map_err(|e| e.to_string())?;
    chart
        .configure_mesh()
        .x_labels(0)
        .y_labels(0)
        .draw()
        .map_err(|e| e.to_string())?;

    chart
        .draw_series(hist.counts.iter().enumerate().map(|(i, &count)| {
            Rectangle::new(
                [(hist.bins[i], 0.0), (hist.bins[i + 1], count as f64)],
                BAR_COLOR.mix(0.9).filled(),
            )
        }))
        .map_err(|e| e.to_string())?;

    root.present().map_err(|e| e.to_string())
}

#[allow(clippy::cast_precision_loss)]
fn heatmap_chart(
    path: &Path,
    matrix: &BTreeMap<String, BTreeMap<String, f64>>,
) -> Result<(), String> {
    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| e.to_string())?;

    let n = NumericColumn::ALL.len() as f64;
    let mut chart = ChartBuilder::on(&root)
        .margin(16)
        .build_cartesian_2d(0f64..n, 0f64..n)
        .map_err(|e| e.to_string())?;

    for (i, col) in NumericColumn::ALL.iter().enumerate() {
        for (j, row) in NumericColumn::ALL.iter().enumerate() {
            let value = matrix
                .get(row.name())
                .and_then(|by| by.get(col.name()))
                .copied()
                .unwrap_or(0.0);
            let (x, y) = (i as f64, j as f64);
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(x + 0.02, y + 0.02), (x + 0.98, y + 0.98)],
                    heat_color(value).filled(),
                )))
                .map_err(|e| e.to_string())?;
        }
    }

    root.present().map_err(|e| e.to_string())
}

fn scatter_chart(path: &Path, table: &CanonicalTable) -> Result<(), String> {
    let points: Vec<(f64, f64)> = table
        .rows()
        .iter()
        .filter_map(|row| Some((row.temperature?, row.flowrate?)))
        .collect();
    let (x_lo, x_hi) =
        padded_range(points.iter().map(|p| p.0)).ok_or("no paired observations")?;
    let (y_lo, y_hi) =
        padded_range(points.iter().map(|p| p.1)).ok_or("no paired observations")?;

    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| e.to_string())?;

    let mut chart = ChartBuilder::on(&root)
        .margin(16)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(|e| e.to_string())?;
    chart
        .configure_mesh()
        .x_labels(0)
        .y_labels(0)
        .draw()
        .map_err(|e| e.to_string())?;

    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, POINT_COLOR.mix(0.8).filled())),
        )
        .map_err(|e| e.to_string())?;

    root.present().map_err(|e| e.to_string())
}

/// Diverging color for a correlation value in `[-1, 1]`
fn heat_color(value: f64) -> RGBColor {
    let t = ((value + 1.0) / 2.0).clamp(0.0, 1.0);
    if t < 0.5 {
        blend(COOL, NEUTRAL, t * 2.0)
    } else {
        blend(NEUTRAL, WARM, (t - 0.5) * 2.0)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend(from: RGBColor, to: RGBColor, t: f64) -> RGBColor {
    let channel = |a: u8, b: u8| -> u8 {
        (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8
    };
    RGBColor(
        channel(from.0, to.0),
        channel(from.1, to.1),
        channel(from.2, to.2),
    )
}

fn padded_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    let mut any = false;
    for v in values {
        any = true;
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !any {
        return None;
    }
    if lo == hi {
        return Some((lo - 0.5, hi + 0.5));
    }
    let pad = (hi - lo) * 0.05;
    Some((lo - pad, hi + pad))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::analyze;
    use crate::table::EquipmentRow;
    use tempfile::TempDir;

    fn sample_table() -> CanonicalTable {
        CanonicalTable::from_rows(
            (0..12)
                .map(|i| EquipmentRow {
                    name: format!("Pump {i}"),
                    equipment_type: "Pump".to_string(),
                    flowrate: Some(f64::from(i) * 1.5),
                    pressure: Some(1.0 + f64::from(i % 4) * 0.1),
                    temperature: Some(20.0 + f64::from(i) * 2.0),
                })
                .collect(),
        )
    }

    #[test]
    fn test_render_charts_with_analytics() {
        let table = sample_table();
        let analytics = analyze(&table);
        let dir = TempDir::new().unwrap();
        let set = render_charts(&table, Some(&analytics), dir.path());

        assert_eq!(set.rendered(), 5);
        for outcome in &set.histograms {
            assert!(outcome.image.as_ref().unwrap().exists());
        }
    }

    #[test]
    fn test_render_charts_ad_hoc() {
        let table = sample_table();
        let dir = TempDir::new().unwrap();
        let set = render_charts(&table, None, dir.path());
        assert_eq!(set.rendered(), 5);
    }

    #[test]
    fn test_empty_table_reports_failures_not_panics() {
        let table = CanonicalTable::from_rows(vec![]);
        let dir = TempDir::new().unwrap();
        let set = render_charts(&table, None, dir.path());

        for outcome in &set.histograms {
            assert!(outcome.image.is_err());
        }
        assert!(set.scatter.image.is_err());
        // the heatmap still renders (all-zero matrix)
        assert!(set.correlation.image.is_ok());
    }

    #[test]
    fn test_heat_color_endpoints() {
        assert_eq!(heat_color(-1.0), COOL);
        assert_eq!(heat_color(1.0), WARM);
        assert_eq!(heat_color(0.0), NEUTRAL);
    }
}
