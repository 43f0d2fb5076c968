//! Rule-based insight generation
//!
//! Each rule is evaluated independently against the canonical table (or its
//! correlation matrix) and contributes one observation string; matches are
//! appended in fixed rule order.

use std::collections::BTreeMap;

use crate::table::CanonicalTable;

/// Absolute correlation above which the flowrate/temperature relationship is
/// called out
pub const STRONG_CORRELATION: f64 = 0.6;

/// Temperature above which a reading is flagged
pub const HIGH_TEMPERATURE: f64 = 100.0;

/// Evaluate all insight rules over a table and its correlation matrix
#[must_use]
pub fn generate(
    table: &CanonicalTable,
    correlation: &BTreeMap<String, BTreeMap<String, f64>>,
) -> Vec<String> {
    let mut insights = Vec::new();

    let zero_flow = table
        .rows()
        .iter()
        .filter(|row| row.flowrate == Some(0.0))
        .count();
    if zero_flow > 0 {
        insights.push(format!("{zero_flow} equipment items have zero flowrate"));
    }

    let high_temp = table
        .rows()
        .iter()
        .filter(|row| row.temperature.is_some_and(|t| t > HIGH_TEMPERATURE))
        .count();
    if high_temp > 0 {
        insights.push(format!("{high_temp} rows have temperature > 100"));
    }

    let flow_vs_temp = correlation
        .get("flowrate")
        .and_then(|by| by.get("temperature"))
        .copied()
        .unwrap_or(0.0);
    if flow_vs_temp.abs() > STRONG_CORRELATION {
        insights.push("Strong correlation detected between Flowrate and Temperature".to_string());
    }

    insights
}
