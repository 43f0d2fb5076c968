//! End-to-end upload demo: ingest a CSV, compute analytics, write artifacts
//!
//! This demonstrates:
//! - The full upload pipeline (ingest -> clean -> analyze -> sanitize)
//! - Coercion warnings for dirty numeric cells
//! - Artifact naming and report rendering
//!
//! Run with: cargo run --example process_upload

use equiviz_core::dataset::artifact_names;
use equiviz_core::report::{render_to_file, ReportMeta};
use equiviz_core::pipeline;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let csv = b"Equipment Name,Type,Flowrate,Pressure,Temperature\n\
        Feed Pump,Pump,120.5,2.4,65\n\
        Recycle Pump,Pump,95.2,2.1,70\n\
        Relief Valve,Valve,0,1.0,40\n\
        Control Valve,Valve,15.8,n/a,45\n\
        Reboiler,Heat Exchanger,80.0,3.2,145\n\
        Condenser,Heat Exchanger,78.5,3.0,35\n";

    println!("=== Processing upload ({} bytes) ===\n", csv.len());
    let output = pipeline::run(csv)?;

    println!("Rows (cleaned): {}", output.summary.total_rows);
    println!(
        "Averages: flowrate={:?} pressure={:?} temperature={:?}",
        output.summary.avg_flowrate, output.summary.avg_pressure, output.summary.avg_temperature
    );
    println!("Type distribution: {:?}", output.summary.type_distribution);
    println!("Coercion warnings: {:?}", output.coercion.counts());

    println!("\nInsights:");
    for insight in &output.analytics.insights {
        println!("  - {insight}");
    }

    let names = artifact_names("demo-0001");
    println!("\nArtifact names: {names:?}");

    let out_dir = std::env::temp_dir().join("equiviz-demo");
    std::fs::create_dir_all(&out_dir)?;

    let cleaned_path = out_dir.join("cleaned.csv");
    std::fs::write(&cleaned_path, &output.cleaned_csv)?;
    println!("\nCleaned CSV written to {}", cleaned_path.display());

    let report_path = out_dir.join("report.pdf");
    let meta = ReportMeta {
        filename: "demo_readings.csv".to_string(),
        uploaded_at: chrono::Utc::now(),
        uploaded_by: Some("demo-user".to_string()),
    };
    render_to_file(
        &meta,
        &output.summary,
        &output.table,
        Some(&output.analytics),
        &report_path,
    )?;
    println!("Report written to {}", report_path.display());

    Ok(())
}
