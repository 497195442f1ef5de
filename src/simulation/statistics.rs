//! Mean-return and covariance estimation over a log-return series.

use serde::{Deserialize, Serialize};

use crate::core::error::{FrontierError, Result};
use crate::simulation::returns::LogReturnSeries;

/// Per-instrument mean returns and pairwise covariances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnStatistics {
    /// Arithmetic mean of each instrument's log returns.
    pub mean: Vec<f64>,
    /// Symmetric covariance matrix; diagonal holds per-instrument variance.
    /// Sample covariance with an n-1 denominator.
    pub covariance: Vec<Vec<f64>>,
    /// Number of rows the estimates were computed from.
    pub valid_rows: usize,
}

impl ReturnStatistics {
    /// Get the number of instruments.
    #[inline]
    pub fn num_instruments(&self) -> usize {
        self.mean.len()
    }
}

/// Estimate mean vector and covariance matrix from a log-return series.
///
/// Rows containing a NaN in any column are excluded from the mean and from
/// every covariance term alike, keeping all estimates on the same sample
/// and the matrix positive semi-definite.
///
/// # Errors
/// * `InsufficientData` - fewer than 2 fully valid rows remain
pub fn estimate(returns: &LogReturnSeries) -> Result<ReturnStatistics> {
    let n = match returns.first() {
        Some(row) => row.len(),
        None => return Err(FrontierError::insufficient_data(2, 0)),
    };

    let valid: Vec<&Vec<f64>> = returns
        .iter()
        .filter(|row| row.iter().all(|v| !v.is_nan()))
        .collect();
    let m = valid.len();
    if m < 2 {
        return Err(FrontierError::insufficient_data(2, m));
    }

    let mut mean = vec![0.0; n];
    for row in &valid {
        for i in 0..n {
            mean[i] += row[i];
        }
    }
    for value in &mut mean {
        *value /= m as f64;
    }

    let mut covariance = vec![vec![0.0; n]; n];
    for row in &valid {
        for i in 0..n {
            let di = row[i] - mean[i];
            for j in i..n {
                covariance[i][j] += di * (row[j] - mean[j]);
            }
        }
    }
    let denom = (m - 1) as f64;
    for i in 0..n {
        for j in i..n {
            covariance[i][j] /= denom;
            covariance[j][i] = covariance[i][j];
        }
    }

    Ok(ReturnStatistics {
        mean,
        covariance,
        valid_rows: m,
    })
}

/// Per-instrument descriptive statistics over the valid cells of one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Summarize each instrument's return column independently.
///
/// Unlike [`estimate`], a NaN only removes the cell from its own column;
/// this feeds descriptive displays, not the covariance computation.
pub fn column_summary(returns: &LogReturnSeries) -> Vec<ColumnSummary> {
    let n = returns.first().map_or(0, |row| row.len());
    (0..n)
        .map(|i| {
            let values: Vec<f64> = returns
                .iter()
                .map(|row| row[i])
                .filter(|v| !v.is_nan())
                .collect();
            let count = values.len();
            if count == 0 {
                return ColumnSummary {
                    count: 0,
                    mean: f64::NAN,
                    std: f64::NAN,
                    min: f64::NAN,
                    max: f64::NAN,
                };
            }
            let mean = values.iter().sum::<f64>() / count as f64;
            let std = if count < 2 {
                f64::NAN
            } else {
                let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
                    / (count - 1) as f64;
                variance.sqrt()
            };
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            ColumnSummary {
                count,
                mean,
                std,
                min,
                max,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_known_values() {
        let returns = vec![vec![0.01, 0.02], vec![0.03, -0.02], vec![-0.01, 0.0]];
        let stats = estimate(&returns).unwrap();

        assert_eq!(stats.valid_rows, 3);
        assert!((stats.mean[0] - 0.01).abs() < 1e-12);
        assert!((stats.mean[1] - 0.0).abs() < 1e-12);

        // var([0.01, 0.03, -0.01]) with n-1 denominator = 0.0004
        assert!((stats.covariance[0][0] - 0.0004).abs() < 1e-12);
        // var([0.02, -0.02, 0.0]) = 0.0004
        assert!((stats.covariance[1][1] - 0.0004).abs() < 1e-12);
        // cov = (0.0*0.02 + 0.02*-0.02 + -0.02*0.0) / 2 = -0.0002
        assert!((stats.covariance[0][1] + 0.0002).abs() < 1e-12);
        assert!((stats.covariance[0][1] - stats.covariance[1][0]).abs() < 1e-15);
    }

    #[test]
    fn test_estimate_excludes_nan_rows_listwise() {
        let clean = vec![vec![0.01, 0.02], vec![0.03, -0.02], vec![-0.01, 0.0]];
        let mut poisoned = clean.clone();
        // A NaN in one column drops the whole row for every estimate.
        poisoned.insert(1, vec![f64::NAN, 0.5]);
        poisoned.push(vec![10.0, f64::NAN]);

        let a = estimate(&clean).unwrap();
        let b = estimate(&poisoned).unwrap();
        assert_eq!(b.valid_rows, 3);
        for i in 0..2 {
            assert!((a.mean[i] - b.mean[i]).abs() < 1e-15);
            for j in 0..2 {
                assert!((a.covariance[i][j] - b.covariance[i][j]).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn test_estimate_insufficient_valid_rows() {
        let returns = vec![vec![0.01], vec![f64::NAN], vec![f64::NAN]];
        let err = estimate(&returns).unwrap_err();
        assert!(matches!(
            err,
            FrontierError::InsufficientData {
                required: 2,
                available: 1
            }
        ));
    }

    #[test]
    fn test_column_summary_is_per_column() {
        let returns = vec![vec![0.01, f64::NAN], vec![0.03, 0.02], vec![-0.01, 0.04]];
        let summary = column_summary(&returns);
        assert_eq!(summary[0].count, 3);
        assert_eq!(summary[1].count, 2);
        assert!((summary[1].mean - 0.03).abs() < 1e-12);
        assert!((summary[0].min + 0.01).abs() < 1e-12);
        assert!((summary[0].max - 0.03).abs() < 1e-12);
    }
}
