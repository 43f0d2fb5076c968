//! Pairwise Pearson correlation among the numeric columns

use std::collections::BTreeMap;

use crate::table::{CanonicalTable, NumericColumn};

/// Pearson correlation matrix over the three numeric columns.
///
/// Each pair uses pairwise-complete observations (rows where both values are
/// non-null). Pairs with fewer than two observations or with zero variance
/// default to 0 instead of producing a non-finite value. The diagonal is 1.0
/// whenever the column has at least two non-null values, else 0.
#[must_use]
pub fn matrix(table: &CanonicalTable) -> BTreeMap<String, BTreeMap<String, f64>> {
    let mut result: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    for a in NumericColumn::ALL {
        for b in NumericColumn::ALL {
            let r = if a == b {
                if table.numeric_values(a).len() >= 2 {
                    1.0
                } else {
                    0.0
                }
            } else {
                pearson(&paired_values(table, a, b))
            };
            result
                .entry(a.name().to_string())
                .or_default()
                .insert(b.name().to_string(), r);
        }
    }
    result
}

/// Rows where both columns are non-null, in original order
fn paired_values(table: &CanonicalTable, a: NumericColumn, b: NumericColumn) -> Vec<(f64, f64)> {
    table
        .rows()
        .iter()
        .filter_map(|row| Some((a.value_in(row)?, b.value_in(row)?)))
        .collect()
}

/// Pearson correlation coefficient, defaulting to 0 on degenerate input
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn pearson(pairs: &[(f64, f64)]) -> f64 {
    let n = pairs.len();
    if n < 2 {
        return 0.0;
    }
    let n_f = n as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n_f;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n_f;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x <= 0.0 || var_y <= 0.0 {
        return 0.0;
    }

    let r = covariance / (var_x * var_y).sqrt();
    if r.is_finite() {
        r.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::table::EquipmentRow;

    fn row(flowrate: Option<f64>, pressure: Option<f64>, temperature: Option<f64>) -> EquipmentRow {
        EquipmentRow {
            name: "E".to_string(),
            equipment_type: "T".to_string(),
            flowrate,
            pressure,
            temperature,
        }
    }

    #[test]
    fn test_perfect_positive_correlation() {
        let pairs: Vec<(f64, f64)> = (0..10).map(|i| (f64::from(i), f64::from(i) * 2.0)).collect();
        assert!((pearson(&pairs) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_perfect_negative_correlation() {
        let pairs: Vec<(f64, f64)> = (0..10).map(|i| (f64::from(i), -f64::from(i))).collect();
        assert!((pearson(&pairs) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_variance_defaults_to_zero() {
        let pairs: Vec<(f64, f64)> = (0..10).map(|i| (5.0, f64::from(i))).collect();
        assert_eq!(pearson(&pairs), 0.0);
    }

    #[test]
    fn test_matrix_symmetry_and_diagonal() {
        let table = CanonicalTable::from_rows(vec![
            row(Some(1.0), Some(2.0), Some(3.0)),
            row(Some(2.0), Some(1.0), Some(6.0)),
            row(Some(3.0), Some(4.0), Some(9.0)),
        ]);
        let m = matrix(&table);
        assert_eq!(m["flowrate"]["temperature"], m["temperature"]["flowrate"]);
        assert_eq!(m["flowrate"]["flowrate"], 1.0);
        assert!((m["flowrate"]["temperature"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_matrix_empty_table() {
        let table = CanonicalTable::from_rows(vec![]);
        let m = matrix(&table);
        assert_eq!(m["flowrate"]["flowrate"], 0.0);
        assert_eq!(m["flowrate"]["pressure"], 0.0);
    }

    #[test]
    fn test_matrix_uses_pairwise_complete_rows() {
        let table = CanonicalTable::from_rows(vec![
            row(Some(1.0), None, Some(2.0)),
            row(Some(2.0), Some(1.0), Some(4.0)),
            row(None, Some(2.0), Some(6.0)),
            row(Some(3.0), Some(3.0), Some(6.0)),
        ]);
        let m = matrix(&table);
        // flowrate/temperature pairs: (1,2), (2,4), (3,6) -> perfectly linear
        assert!((m["flowrate"]["temperature"] - 1.0).abs() < 1e-12);
    }
}
