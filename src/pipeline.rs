//! Upload-path orchestration: ingest → clean → analyze → sanitize
//!
//! One call per uploaded file, synchronous and pure. Only ingestion can fail;
//! every later stage is total. Rendering is a separate call
//! ([`crate::report::render_to_file`]) so a failed report never discards the
//! analytics computed here.

use serde_json::Value;
use tracing::info;

use crate::analytics::{analyze_with, AnalyticsOptions, AnalyticsResult};
use crate::clean::{clean, to_csv};
use crate::dataset::DatasetSummary;
use crate::ingest::{ingest, CoercionReport};
use crate::sanitize::sanitize;
use crate::table::CanonicalTable;
use crate::Result;

/// Everything the persistence collaborator needs after one upload run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Summary scalars for the dataset record
    pub summary: DatasetSummary,
    /// Per-column numeric coercion failure counts (data warnings)
    pub coercion: CoercionReport,
    /// The typed analytics result
    pub analytics: AnalyticsResult,
    /// The sanitized analytics, safe for strict-JSON persistence
    pub analytics_json: Value,
    /// The cleaned canonical table (input to the report renderer)
    pub table: CanonicalTable,
    /// The cleaned table as a delimited file
    pub cleaned_csv: Vec<u8>,
}

/// Run the full upload pipeline with default analytics options.
///
/// # Errors
///
/// Returns [`crate::Error::Validation`] when required columns are missing;
/// any other error indicates an unexpected serialization failure.
pub fn run(bytes: &[u8]) -> Result<PipelineOutput> {
    run_with(bytes, AnalyticsOptions::default())
}

/// Run the full upload pipeline.
///
/// Analytics is always computed on the cleaned canonical table, so persisted
/// row counts and means describe what the cleaned CSV artifact contains.
///
/// # Errors
///
/// See [`run`].
pub fn run_with(bytes: &[u8], options: AnalyticsOptions) -> Result<PipelineOutput> {
    let (frame, coercion) = ingest(bytes)?;
    let table = clean(&frame);
    let analytics = analyze_with(&table, options);
    let analytics_json = sanitize(serde_json::to_value(&analytics)?);
    let summary = DatasetSummary::from_analytics(&analytics);
    let cleaned_csv = to_csv(&table)?;

    info!(
        rows = table.len(),
        coercion_failures = coercion.total(),
        insights = analytics.insights.len(),
        "upload pipeline complete"
    );

    Ok(PipelineOutput {
        summary,
        coercion,
        analytics,
        analytics_json,
        table,
        cleaned_csv,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::is_sanitized;

    const SAMPLE: &[u8] = b"Equipment Name,Type,Flowrate,Pressure,Temperature\n\
        Pump A,Pump,10,1.2,45\n\
        Valve B,Valve,5,0.8,30\n";

    #[test]
    fn test_run_produces_all_artifacts() {
        let output = run(SAMPLE).unwrap();
        assert_eq!(output.summary.total_rows, 2);
        assert_eq!(output.analytics.row_count, 2);
        assert_eq!(output.coercion.total(), 0);
        assert!(is_sanitized(&output.analytics_json));
        assert!(output
            .cleaned_csv
            .starts_with(b"equipment name,type,flowrate,pressure,temperature"));
    }

    #[test]
    fn test_run_rejects_missing_columns() {
        let bad = b"Equipment Name,Type,Flowrate\nPump A,Pump,10\n";
        let err = run(bad).unwrap_err();
        assert!(err.to_string().contains("pressure"));
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn test_run_tolerates_degenerate_data() {
        let degenerate = b"equipment name,type,flowrate,pressure,temperature\n\
            Lone Pump,Pump,abc,,\n";
        let output = run(degenerate).unwrap();
        assert_eq!(output.summary.total_rows, 1);
        assert_eq!(output.coercion.failures("flowrate"), 1);
        assert_eq!(output.analytics.stats["flowrate"].count, 0);
        assert!(is_sanitized(&output.analytics_json));
    }
}
