//! Report rendering: charts plus the paginated PDF document
//!
//! One call renders the full visual report for a dataset: intermediate chart
//! bitmaps go into a temp directory scoped to the call (removed on every exit
//! path), failed charts are omitted with a warning, and the document always
//! completes; a report with zero charts is still a valid report.

mod charts;
mod pdf;

pub use charts::{render_charts, ChartOutcome, ChartSet, CHART_HEIGHT, CHART_WIDTH};
pub use pdf::{PageComposer, TextFont, MARGIN, PAGE_HEIGHT, PAGE_WIDTH};

use std::path::Path;

use chrono::{DateTime, Utc};
use tempfile::TempDir;
use tracing::{info, warn};

use crate::analytics::AnalyticsResult;
use crate::dataset::DatasetSummary;
use crate::table::CanonicalTable;
use crate::{Error, Result};

/// Title line of the report cover block
pub const REPORT_TITLE: &str = "Chemical Equipment Parameter Visualizer";

/// Cover-block metadata for one report
#[derive(Debug, Clone)]
pub struct ReportMeta {
    /// Name of the uploaded source file
    pub filename: String,
    /// Upload timestamp
    pub uploaded_at: DateTime<Utc>,
    /// Display name of the uploader, when known
    pub uploaded_by: Option<String>,
}

/// Render tunables
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// How many table rows the preview section shows
    pub preview_rows: usize,
    /// Upper bound on rendered insight bullets
    pub max_insights: usize,
    /// Chart width on the page, in points
    pub chart_width: f64,
    /// Chart height on the page, in points
    pub chart_height: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            preview_rows: 20,
            max_insights: 5,
            chart_width: 420.0,
            chart_height: 270.0,
        }
    }
}

impl RenderOptions {
    /// Set how many table rows the preview section shows
    #[must_use]
    pub const fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// Set the upper bound on rendered insight bullets
    #[must_use]
    pub const fn max_insights(mut self, n: usize) -> Self {
        self.max_insights = n;
        self
    }
}

/// Render the report and return the document bytes, with default options.
///
/// # Errors
///
/// Fails only on document assembly or IO problems; chart failures are
/// contained and merely omit the affected chart.
pub fn render(
    meta: &ReportMeta,
    summary: &DatasetSummary,
    table: &CanonicalTable,
    analytics: Option<&AnalyticsResult>,
) -> Result<Vec<u8>> {
    render_with(meta, summary, table, analytics, RenderOptions::default())
}

/// Render the report and return the document bytes.
///
/// # Errors
///
/// See [`render`].
pub fn render_with(
    meta: &ReportMeta,
    summary: &DatasetSummary,
    table: &CanonicalTable,
    analytics: Option<&AnalyticsResult>,
    options: RenderOptions,
) -> Result<Vec<u8>> {
    let scratch = TempDir::new()?;
    let charts = render_charts(table, analytics, scratch.path());
    info!(
        rendered = charts.rendered(),
        ad_hoc = analytics.is_none(),
        "report charts rendered"
    );

    let mut doc = PageComposer::new();

    // Cover block
    doc.space(40.0);
    doc.centered(REPORT_TITLE, 20.0, TextFont::Bold)?;
    doc.space(10.0);
    doc.centered(&format!("Report for: {}", meta.filename), 12.0, TextFont::Regular)?;
    doc.centered(
        &format!(
            "Uploaded at: {}",
            meta.uploaded_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        10.0,
        TextFont::Regular,
    )?;
    if let Some(uploader) = &meta.uploaded_by {
        doc.centered(&format!("Uploaded by: {uploader}"), 9.0, TextFont::Regular)?;
    }
    doc.new_page()?;

    // Executive summary
    doc.line("Summary & Key Statistics", 14.0, TextFont::Bold, 0.0)?;
    doc.space(6.0);
    doc.line(
        &format!("Total rows: {}", summary.total_rows),
        10.0,
        TextFont::Regular,
        0.0,
    )?;
    doc.line(
        &format!("Average Flowrate: {}", format_opt(summary.avg_flowrate)),
        10.0,
        TextFont::Regular,
        0.0,
    )?;
    doc.line(
        &format!("Average Pressure: {}", format_opt(summary.avg_pressure)),
        10.0,
        TextFont::Regular,
        0.0,
    )?;
    doc.line(
        &format!("Average Temperature: {}", format_opt(summary.avg_temperature)),
        10.0,
        TextFont::Regular,
        0.0,
    )?;
    doc.space(8.0);
    doc.line("Type Distribution", 12.0, TextFont::Bold, 0.0)?;
    if summary.type_distribution.is_empty() {
        doc.line("(no type values)", 9.0, TextFont::Regular, 10.0)?;
    }
    for (equipment_type, count) in &summary.type_distribution {
        doc.line(
            &format!("{equipment_type}: {count}"),
            9.0,
            TextFont::Regular,
            10.0,
        )?;
    }

    // Frequency histograms
    doc.space(12.0);
    doc.line("Parameter Distributions", 12.0, TextFont::Bold, 0.0)?;
    for outcome in &charts.histograms {
        embed_chart(&mut doc, outcome, options)?;
    }

    // Correlation heatmap and scatter
    doc.space(12.0);
    doc.line("Correlation & Scatter", 12.0, TextFont::Bold, 0.0)?;
    embed_chart(&mut doc, &charts.correlation, options)?;
    embed_chart(&mut doc, &charts.scatter, options)?;

    // Insight bullets
    let insights = analytics.map(|a| a.insights.as_slice()).unwrap_or_default();
    if !insights.is_empty() {
        doc.space(12.0);
        doc.line("Insights", 12.0, TextFont::Bold, 0.0)?;
        for insight in insights.iter().take(options.max_insights) {
            for (i, piece) in wrap_text(insight, 100).into_iter().enumerate() {
                let line = if i == 0 {
                    format!("- {piece}")
                } else {
                    format!("  {piece}")
                };
                doc.line(&line, 10.0, TextFont::Regular, 8.0)?;
            }
        }
    }

    // Row preview
    doc.space(12.0);
    doc.line(
        &format!("Row Preview (first {} rows)", options.preview_rows),
        12.0,
        TextFont::Bold,
        0.0,
    )?;
    doc.line(
        &preview_line("Equipment Name", "Type", "Flowrate", "Pressure", "Temperature"),
        8.0,
        TextFont::Mono,
        0.0,
    )?;
    for row in table.rows().iter().take(options.preview_rows) {
        doc.line(
            &preview_line(
                &row.name,
                &row.equipment_type,
                &format_cell(row.flowrate),
                &format_cell(row.pressure),
                &format_cell(row.temperature),
            ),
            8.0,
            TextFont::Mono,
            0.0,
        )?;
    }

    doc.finish()
}

/// Render the report and write it to `dest`.
///
/// The destination is only touched after the whole document has been
/// assembled, so a failed render leaves any previous report intact.
///
/// # Errors
///
/// See [`render`], plus IO errors writing `dest`.
pub fn render_to_file(
    meta: &ReportMeta,
    summary: &DatasetSummary,
    table: &CanonicalTable,
    analytics: Option<&AnalyticsResult>,
    dest: &Path,
) -> Result<()> {
    let bytes = render(meta, summary, table, analytics)?;
    std::fs::write(dest, &bytes)?;
    info!(dest = %dest.display(), size = bytes.len(), "report written");
    Ok(())
}

/// Caption plus image for one chart outcome; skips the slot on any failure
fn embed_chart(doc: &mut PageComposer, outcome: &ChartOutcome, options: RenderOptions) -> Result<()> {
    match &outcome.image {
        Ok(path) => {
            doc.ensure_space(options.chart_height + 30.0)?;
            doc.line(&outcome.title, 10.0, TextFont::Bold, 0.0)?;
            match doc.image(path, options.chart_width, options.chart_height) {
                Ok(()) => {}
                Err(Error::ChartRender(reason)) => {
                    warn!(chart = %outcome.title, %reason, "omitting chart image");
                }
                Err(other) => return Err(other),
            }
        }
        Err(reason) => {
            warn!(chart = %outcome.title, %reason, "chart skipped");
        }
    }
    Ok(())
}

fn format_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

fn format_cell(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}

fn preview_line(name: &str, kind: &str, flow: &str, pressure: &str, temp: &str) -> String {
    format!(
        "{:<28} {:<14} {:>9} {:>9} {:>12}",
        truncate(name, 28),
        truncate(kind, 14),
        truncate(flow, 9),
        truncate(pressure, 9),
        truncate(temp, 12)
    )
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Hard-wrap a line into chunks of at most `max` characters
fn wrap_text(text: &str, max: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(max.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}
