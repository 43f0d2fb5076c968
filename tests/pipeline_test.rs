//! End-to-end tests for the upload pipeline
//!
//! Covers the acceptance vectors: the two-row Pump/Valve sample, insight
//! strings, degenerate all-null columns, and the validation failure for a
//! missing required header.

use equiviz_core::analytics::OutlierSummary;
use equiviz_core::dataset::{artifact_names, select_for_deletion};
use equiviz_core::pipeline;
use equiviz_core::sanitize::is_sanitized;
use equiviz_core::Error;

const SAMPLE: &[u8] = b"Equipment Name,Type,Flowrate,Pressure,Temperature\n\
    Pump A,Pump,10,1.2,45\n\
    Valve B,Valve,5,0.8,30\n";

#[test]
fn test_sample_upload_summary_and_stats() {
    let output = pipeline::run(SAMPLE).unwrap();

    assert_eq!(output.analytics.row_count, 2);
    assert_eq!(output.analytics.stats["flowrate"].mean, Some(7.5));
    assert_eq!(output.analytics.type_distribution["Pump"], 1);
    assert_eq!(output.analytics.type_distribution["Valve"], 1);

    assert_eq!(output.summary.total_rows, 2);
    assert!((output.summary.avg_pressure.unwrap() - 1.0).abs() < 1e-12);
    assert_eq!(output.summary.avg_temperature, Some(37.5));
}

#[test]
fn test_zero_flowrate_insight_string() {
    let input = b"Equipment Name,Type,Flowrate,Pressure,Temperature\n\
        Idle Pump,Pump,0,1.0,20\n\
        Valve B,Valve,5,0.8,30\n";
    let output = pipeline::run(input).unwrap();
    assert!(output
        .analytics
        .insights
        .contains(&"1 equipment items have zero flowrate".to_string()));
}

#[test]
fn test_all_null_numeric_column() {
    let input = b"Equipment Name,Type,Flowrate,Pressure,Temperature\n\
        Pump A,Pump,,1.0,20\n\
        Pump B,Pump,,1.1,25\n";
    let output = pipeline::run(input).unwrap();

    let flow = &output.analytics.stats["flowrate"];
    assert_eq!(flow.count, 0);
    assert_eq!(flow.mean, None);
    assert_eq!(flow.median, None);
    assert_eq!(flow.std, None);
    assert_eq!(flow.min, None);
    assert_eq!(flow.max, None);

    assert_eq!(output.analytics.outliers["flowrate"], OutlierSummary::none());
    assert!(output.analytics.histograms["flowrate"].bins.is_empty());
    assert_eq!(output.coercion.failures("flowrate"), 2);
}

#[test]
fn test_missing_pressure_header_fails_validation() {
    let input = b"Equipment Name,Type,Flowrate,Temperature\nPump A,Pump,10,45\n";
    let err = pipeline::run(input).unwrap_err();
    match &err {
        Error::Validation { missing, found } => {
            assert!(missing.contains(&"pressure".to_string()));
            assert!(found.contains(&"Flowrate".to_string()));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(err.to_string().contains("pressure"));
}

#[test]
fn test_correlation_matrix_is_symmetric_with_unit_diagonal() {
    let output = pipeline::run(SAMPLE).unwrap();
    let matrix = &output.analytics.correlation_matrix;
    for a in ["flowrate", "pressure", "temperature"] {
        assert!((matrix[a][a] - 1.0).abs() < f64::EPSILON);
        for b in ["flowrate", "pressure", "temperature"] {
            assert!((matrix[a][b] - matrix[b][a]).abs() < 1e-12);
        }
    }
}

#[test]
fn test_histogram_counts_cover_every_non_null_value() {
    let input = b"Equipment Name,Type,Flowrate,Pressure,Temperature\n\
        A,Pump,1,9,100\n\
        B,Pump,2,8,\n\
        C,Valve,3,bad,102\n\
        D,Valve,4,6,99\n";
    let output = pipeline::run(input).unwrap();
    for column in ["flowrate", "pressure", "temperature"] {
        let hist = &output.analytics.histograms[column];
        let stats = &output.analytics.stats[column];
        assert_eq!(hist.total(), stats.count as u64, "column {column}");
        if !hist.bins.is_empty() {
            assert_eq!(hist.bins.len(), hist.counts.len() + 1);
        }
    }
}

#[test]
fn test_persisted_analytics_is_strict_json_safe() {
    let output = pipeline::run(SAMPLE).unwrap();
    assert!(is_sanitized(&output.analytics_json));
    // the blob must round-trip through a strict JSON string
    let text = serde_json::to_string(&output.analytics_json).unwrap();
    let back: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(back["row_count"], 2);
}

#[test]
fn test_cleaned_csv_reingests_to_the_same_analytics() {
    let first = pipeline::run(SAMPLE).unwrap();
    let second = pipeline::run(&first.cleaned_csv).unwrap();
    assert_eq!(first.analytics, second.analytics);
    assert_eq!(first.table, second.table);
}

#[test]
fn test_extra_columns_are_accepted_and_dropped() {
    let input = b"Site,Equipment Name,Type,Flowrate,Pressure,Temperature,Comment\n\
        north,Pump A,Pump,10,1.2,45,ok\n";
    let output = pipeline::run(input).unwrap();
    assert_eq!(output.summary.total_rows, 1);
    assert!(output
        .cleaned_csv
        .starts_with(b"equipment name,type,flowrate,pressure,temperature"));
}

#[test]
fn test_artifact_names_and_retention_helpers() {
    let names = artifact_names("3f9d2c41");
    assert_eq!(names.original_csv, "uploads/3f9d2c41.csv");
    assert_eq!(names.cleaned_csv, "clean/3f9d2c41.csv");
    assert_eq!(names.report_pdf, "reports/3f9d2c41.pdf");

    let ordered = ["g", "f", "e", "d", "c", "b", "a"];
    let doomed = select_for_deletion(&ordered, 5);
    assert_eq!(doomed.len(), 2);
    assert!(doomed.contains("b") && doomed.contains("a"));
}
