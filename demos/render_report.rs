//! Report rendering demo over a synthetic dataset
//!
//! Renders the same table twice, once from precomputed analytics and once
//! with ad hoc charts, to show that both paths produce a complete document.
//!
//! Run with: cargo run --example render_report

use equiviz_core::analytics::analyze;
use equiviz_core::dataset::DatasetSummary;
use equiviz_core::report::{render, ReportMeta};
use equiviz_core::table::{CanonicalTable, EquipmentRow};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let table = CanonicalTable::from_rows(
        (0..60)
            .map(|i| EquipmentRow {
                name: format!("Unit {i:03}"),
                equipment_type: match i % 4 {
                    0 => "Pump",
                    1 => "Valve",
                    2 => "Compressor",
                    _ => "Heat Exchanger",
                }
                .to_string(),
                flowrate: Some(40.0 + f64::from(i % 13) * 7.5),
                pressure: Some(1.0 + f64::from(i % 5) * 0.4),
                temperature: Some(25.0 + f64::from(i % 13) * 9.0),
            })
            .collect(),
    );

    let analytics = analyze(&table);
    let summary = DatasetSummary::from_analytics(&analytics);
    let meta = ReportMeta {
        filename: "synthetic.csv".to_string(),
        uploaded_at: chrono::Utc::now(),
        uploaded_by: None,
    };

    let out_dir = std::env::temp_dir().join("equiviz-demo");
    std::fs::create_dir_all(&out_dir)?;

    let with_analytics = render(&meta, &summary, &table, Some(&analytics))?;
    let precomputed_path = out_dir.join("report_precomputed.pdf");
    std::fs::write(&precomputed_path, &with_analytics)?;
    println!(
        "Precomputed-analytics report: {} ({} bytes)",
        precomputed_path.display(),
        with_analytics.len()
    );

    let ad_hoc = render(&meta, &summary, &table, None)?;
    let ad_hoc_path = out_dir.join("report_ad_hoc.pdf");
    std::fs::write(&ad_hoc_path, &ad_hoc)?;
    println!(
        "Ad hoc-charts report:         {} ({} bytes)",
        ad_hoc_path.display(),
        ad_hoc.len()
    );

    Ok(())
}
