// Suppress warning from PyO3 macro expansion (fixed in newer PyO3 versions)
#![allow(non_local_definitions)]

//! mcfrontier - Monte Carlo portfolio allocation engine.
//!
//! This crate estimates a risk/return trade-off surface for a basket of
//! instruments by repeatedly sampling random long-only allocations and
//! scoring each one:
//! - Log-return series construction from aligned price history
//! - Mean-return vector and covariance matrix estimation
//! - Deterministic, seedable weight sampling over the simplex
//! - Annualized return / volatility / Sharpe scoring per allocation
//! - Serial and parallel simulation runs with progress and cancellation
//!
//! Data retrieval and rendering live in external collaborators; the Python
//! bindings are the seam to both.

use pyo3::prelude::*;

pub mod core;
pub mod python;
pub mod report;
pub mod simulation;

/// Python module entry point
#[pymodule]
fn _mcfrontier(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    // Register config classes
    m.add_class::<python::bindings::PySimulationConfig>()?;

    // Register result classes
    m.add_class::<python::bindings::PySimulationResult>()?;
    m.add_class::<python::bindings::PyResultSet>()?;

    // Register simulation functions
    m.add_function(wrap_pyfunction!(python::bindings::run_monte_carlo, m)?)?;
    m.add_function(wrap_pyfunction!(python::bindings::summarize_returns, m)?)?;
    m.add_function(wrap_pyfunction!(python::bindings::normalize_prices, m)?)?;

    Ok(())
}
