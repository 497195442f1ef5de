//! Log-return series construction from aligned price history.

use crate::core::error::{FrontierError, Result};
use crate::core::types::PriceTable;

/// Row-major log-return matrix: one row per period transition, one entry
/// per instrument.
pub type LogReturnSeries = Vec<Vec<f64>>;

/// Build the log-return series for an aligned price table.
///
/// Entry `[t][i]` is `ln(price[t+1][i] / price[t][i])`. A non-positive
/// price poisons the cells it participates in with NaN instead of aborting
/// the batch; downstream statistics exclude those rows.
///
/// # Errors
/// * `InsufficientData` - fewer than 2 aligned observations
pub fn log_returns(table: &PriceTable) -> Result<LogReturnSeries> {
    let rows = table.num_observations();
    if rows < 2 {
        return Err(FrontierError::insufficient_data(2, rows));
    }

    let n = table.num_instruments();
    let mut series = Vec::with_capacity(rows - 1);
    for t in 0..rows - 1 {
        let mut row = Vec::with_capacity(n);
        for i in 0..n {
            let prev = table.column(i)[t];
            let next = table.column(i)[t + 1];
            if prev <= 0.0 || next <= 0.0 {
                row.push(f64::NAN);
            } else {
                row.push((next / prev).ln());
            }
        }
        series.push(row);
    }
    Ok(series)
}
