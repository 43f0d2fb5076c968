//! Error types for equiviz-core
//!
//! Only [`Error::Validation`] can abort a pipeline run before analytics exist;
//! everything downstream of validation is either contained (per-chart render
//! failures) or surfaced opaquely with detail left to the log.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// equiviz-core error types
#[derive(Error, Debug)]
pub enum Error {
    /// Required columns were absent from the uploaded header row
    #[error(
        "missing required columns: [{}]; found columns: [{}]",
        .missing.join(", "),
        .found.join(", ")
    )]
    Validation {
        /// Canonical names of the required columns that were not present
        missing: Vec<String>,
        /// Column names actually present in the input, as received
        found: Vec<String>,
    },

    /// Unexpected failure during analytics or report assembly after validation
    #[error("processing error: {0}")]
    Processing(String),

    /// A single chart failed to render (contained: the chart is omitted)
    #[error("chart render error: {0}")]
    ChartRender(String),

    /// CSV parse error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// PDF document assembly error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_columns() {
        let err = Error::Validation {
            missing: vec!["pressure".to_string()],
            found: vec!["Equipment Name".to_string(), "Type".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("pressure"));
        assert!(msg.contains("Equipment Name"));
    }
}
