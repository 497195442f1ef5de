//! PyO3 function bindings for mcfrontier.

use numpy::{PyArray1, PyArray2, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::core::types::{PriceTable, ResultSet, SimulationConfig, SimulationResult};
use crate::report::ResultTable;
use crate::simulation::engine::SimulationEngine;
use crate::simulation::returns::log_returns;
use crate::simulation::statistics::column_summary;

use super::numpy_bridge::*;

// ============================================================================
// Configuration Classes
// ============================================================================

/// Python-exposed simulation configuration.
#[pyclass]
#[derive(Debug, Clone)]
pub struct PySimulationConfig {
    #[pyo3(get, set)]
    pub n_trials: usize,
    #[pyo3(get, set)]
    pub seed: u64,
    #[pyo3(get, set)]
    pub periods_per_year: f64,
}

#[pymethods]
impl PySimulationConfig {
    #[new]
    #[pyo3(signature = (n_trials=10000, seed=101, periods_per_year=252.0))]
    fn new(n_trials: usize, seed: u64, periods_per_year: f64) -> Self {
        Self {
            n_trials,
            seed,
            periods_per_year,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "SimulationConfig(n_trials={}, seed={}, periods_per_year={})",
            self.n_trials, self.seed, self.periods_per_year
        )
    }
}

impl From<&PySimulationConfig> for SimulationConfig {
    fn from(py_config: &PySimulationConfig) -> Self {
        SimulationConfig {
            n_trials: py_config.n_trials,
            seed: py_config.seed,
            periods_per_year: py_config.periods_per_year,
        }
    }
}

// ============================================================================
// Result Classes
// ============================================================================

/// Python-exposed scored allocation.
#[pyclass]
#[derive(Debug, Clone)]
pub struct PySimulationResult {
    #[pyo3(get)]
    pub volatility: f64,
    #[pyo3(get)]
    pub expected_return: f64,
    #[pyo3(get)]
    pub sharpe_ratio: f64,
    weights: Vec<f64>,
}

#[pymethods]
impl PySimulationResult {
    /// Get full-precision fractional weights as a numpy array.
    fn weights<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        vec_to_numpy_f64(py, self.weights.clone())
    }

    fn __repr__(&self) -> String {
        format!(
            "SimulationResult(return={:.4}, vol={:.4}, sharpe={:.4})",
            self.expected_return, self.volatility, self.sharpe_ratio
        )
    }
}

impl From<&SimulationResult> for PySimulationResult {
    fn from(result: &SimulationResult) -> Self {
        Self {
            volatility: result.volatility,
            expected_return: result.expected_return,
            sharpe_ratio: result.sharpe_ratio,
            weights: result.weights.clone(),
        }
    }
}

/// Python-exposed result set for one simulation run.
#[pyclass]
#[derive(Debug, Clone)]
pub struct PyResultSet {
    symbols: Vec<String>,
    inner: ResultSet,
}

#[pymethods]
impl PyResultSet {
    fn __len__(&self) -> usize {
        self.inner.len()
    }

    /// Number of trials the run was asked for.
    fn requested(&self) -> usize {
        self.inner.requested()
    }

    /// Whether the run was cancelled before completing all trials.
    fn is_truncated(&self) -> bool {
        self.inner.is_truncated()
    }

    /// Get per-trial volatility as a numpy array.
    fn volatility<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        vec_to_numpy_f64(py, self.inner.iter().map(|r| r.volatility).collect())
    }

    /// Get per-trial expected returns as a numpy array.
    fn returns<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        vec_to_numpy_f64(py, self.inner.iter().map(|r| r.expected_return).collect())
    }

    /// Get per-trial Sharpe ratios as a numpy array (NaN sentinel rows kept).
    fn sharpe_ratio<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        vec_to_numpy_f64(py, self.inner.iter().map(|r| r.sharpe_ratio).collect())
    }

    /// Get full-precision weights as a (trials x instruments) numpy array.
    fn weights<'py>(&self, py: Python<'py>) -> PyResult<&'py PyArray2<f64>> {
        let rows: Vec<Vec<f64>> = self.inner.iter().map(|r| r.weights.clone()).collect();
        PyArray2::from_vec2(py, &rows)
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
    }

    /// Get the display-table column labels.
    fn columns(&self) -> Vec<String> {
        ResultTable::from_result_set(&self.inner, &self.symbols).columns
    }

    /// Convert to a dictionary of display columns: weight percentages
    /// rounded to 2 decimals, score columns at full precision.
    fn to_dict(&self, py: Python) -> PyResult<PyObject> {
        let table = ResultTable::from_result_set(&self.inner, &self.symbols);
        let dict = PyDict::new(py);
        for (index, name) in table.columns.iter().enumerate() {
            let column: Vec<f64> = table.rows.iter().map(|row| row[index]).collect();
            dict.set_item(name, column)?;
        }
        Ok(dict.into())
    }

    /// The allocation with the highest Sharpe ratio, if any row has one.
    fn best_sharpe(&self) -> Option<PySimulationResult> {
        self.inner.best_sharpe().map(PySimulationResult::from)
    }

    /// The allocation with the lowest volatility.
    fn min_volatility(&self) -> Option<PySimulationResult> {
        self.inner.min_volatility().map(PySimulationResult::from)
    }

    fn __repr__(&self) -> String {
        format!(
            "ResultSet(trials={}, requested={}, truncated={})",
            self.inner.len(),
            self.inner.requested(),
            self.inner.is_truncated()
        )
    }
}

// ============================================================================
// Simulation Functions
// ============================================================================

fn build_price_table(
    symbols: Vec<String>,
    prices: &PyReadonlyArray2<f64>,
    timestamps: Option<PyReadonlyArray1<i64>>,
) -> PyResult<PriceTable> {
    let columns = array2_to_columns(prices);
    let rows = prices.as_array().dim().0;
    let index = match timestamps {
        Some(arr) => numpy_to_vec_i64(arr),
        None => (0..rows as i64).collect(),
    };
    Ok(PriceTable::new(symbols, index, columns)?)
}

/// Run the Monte Carlo allocation simulation over an aligned price table.
///
/// `prices` is a (rows x instruments) array; column order matches
/// `symbols`. `progress`, when given, is called with `(completed, total)`
/// after each trial. The GIL is released for the duration of the run.
#[pyfunction]
#[pyo3(signature = (symbols, prices, timestamps=None, config=None, progress=None, parallel=false))]
pub fn run_monte_carlo(
    py: Python<'_>,
    symbols: Vec<String>,
    prices: PyReadonlyArray2<f64>,
    timestamps: Option<PyReadonlyArray1<i64>>,
    config: Option<&PySimulationConfig>,
    progress: Option<PyObject>,
    parallel: bool,
) -> PyResult<PyResultSet> {
    let table = build_price_table(symbols.clone(), &prices, timestamps)?;
    let rust_config = config.map(SimulationConfig::from).unwrap_or_default();
    let mut engine = SimulationEngine::new(rust_config)?;

    let callback = progress.map(|obj| {
        move |done: usize, total: usize| {
            Python::with_gil(|py| {
                let _ = obj.call1(py, (done, total));
            });
        }
    });

    let result = py.allow_threads(|| {
        let report: Option<&(dyn Fn(usize, usize) + Sync)> = callback
            .as_ref()
            .map(|f| f as &(dyn Fn(usize, usize) + Sync));
        if parallel {
            engine.run_parallel_with(&table, report, None)
        } else {
            engine.run_with(&table, report, None)
        }
    })?;

    Ok(PyResultSet {
        symbols,
        inner: result,
    })
}

/// Describe each instrument's log-return column: count, mean, std, min, max.
#[pyfunction]
#[pyo3(signature = (symbols, prices, timestamps=None))]
pub fn summarize_returns(
    py: Python<'_>,
    symbols: Vec<String>,
    prices: PyReadonlyArray2<f64>,
    timestamps: Option<PyReadonlyArray1<i64>>,
) -> PyResult<PyObject> {
    let table = build_price_table(symbols.clone(), &prices, timestamps)?;
    let returns = log_returns(&table)?;
    let summaries = column_summary(&returns);

    let dict = PyDict::new(py);
    for (symbol, summary) in symbols.iter().zip(summaries.iter()) {
        let entry = PyDict::new(py);
        entry.set_item("count", summary.count)?;
        entry.set_item("mean", summary.mean)?;
        entry.set_item("std", summary.std)?;
        entry.set_item("min", summary.min)?;
        entry.set_item("max", summary.max)?;
        dict.set_item(symbol, entry)?;
    }
    Ok(dict.into())
}

/// Rebase each price column to its first observation, for comparison charts.
#[pyfunction]
pub fn normalize_prices<'py>(
    py: Python<'py>,
    prices: PyReadonlyArray2<f64>,
) -> PyResult<&'py PyArray2<f64>> {
    let view = prices.as_array();
    let (rows, cols) = view.dim();
    let normalized: Vec<Vec<f64>> = (0..rows)
        .map(|r| (0..cols).map(|c| view[[r, c]] / view[[0, c]]).collect())
        .collect();
    PyArray2::from_vec2(py, &normalized)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}
