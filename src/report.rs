//! Presentation-contract table built from a ResultSet.
//!
//! One row per trial with columns
//! `{symbol}_weight_pct, ..., volatility, returns, sharpe_ratio`. Weight
//! columns are percentages rounded to 2 decimals for display; the
//! underlying ResultSet keeps full-precision fractional weights.

use serde::{Deserialize, Serialize};

use crate::core::types::ResultSet;

/// Round to 2 decimal places for display columns.
#[inline]
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Column-labelled result table for the presentation collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultTable {
    /// Column labels: one `{symbol}_weight_pct` per instrument, then
    /// `volatility`, `returns`, `sharpe_ratio`.
    pub columns: Vec<String>,
    /// One row per completed trial, in trial order.
    pub rows: Vec<Vec<f64>>,
}

impl ResultTable {
    /// Build the display table for a completed run.
    pub fn from_result_set(set: &ResultSet, symbols: &[String]) -> Self {
        let mut columns: Vec<String> = symbols
            .iter()
            .map(|symbol| format!("{}_weight_pct", symbol))
            .collect();
        columns.push("volatility".to_string());
        columns.push("returns".to_string());
        columns.push("sharpe_ratio".to_string());

        let rows = set
            .iter()
            .map(|result| {
                let mut row: Vec<f64> = result
                    .weights
                    .iter()
                    .map(|w| round2(w * 100.0))
                    .collect();
                row.push(result.volatility);
                row.push(result.expected_return);
                row.push(result.sharpe_ratio);
                row
            })
            .collect();

        Self { columns, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ResultSet, SimulationResult};

    #[test]
    fn test_table_columns_and_rounding() {
        let set = ResultSet::new(
            vec![SimulationResult {
                weights: vec![0.333333, 0.666667],
                volatility: 0.21,
                expected_return: 0.14,
                sharpe_ratio: 0.6666,
            }],
            1,
        );
        let symbols = vec!["amzn".to_string(), "aapl".to_string()];
        let table = ResultTable::from_result_set(&set, &symbols);

        assert_eq!(
            table.columns,
            vec![
                "amzn_weight_pct",
                "aapl_weight_pct",
                "volatility",
                "returns",
                "sharpe_ratio"
            ]
        );
        assert_eq!(table.rows.len(), 1);
        assert!((table.rows[0][0] - 33.33).abs() < 1e-12);
        assert!((table.rows[0][1] - 66.67).abs() < 1e-12);
        // Score columns keep full precision.
        assert!((table.rows[0][4] - 0.6666).abs() < 1e-15);
    }
}
