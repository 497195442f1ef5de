//! Core data types for mcfrontier.

use serde::{Deserialize, Serialize};

use super::error::{FrontierError, Result};

/// Type alias for price values.
pub type Price = f64;

/// Type alias for timestamp values (nanoseconds since epoch).
pub type Timestamp = i64;

/// Aligned price history for a basket of instruments.
///
/// All instruments share one strictly increasing timestamp index; prices are
/// stored column-major, one column per instrument. Misaligned input is an
/// error at construction, never silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTable {
    symbols: Vec<String>,
    timestamps: Vec<Timestamp>,
    columns: Vec<Vec<Price>>,
}

impl PriceTable {
    /// Create a new price table from per-instrument columns.
    ///
    /// # Errors
    /// * `InvalidParameter` - empty symbol set or non-increasing index
    /// * `LengthMismatch` - column count or column length disagrees with
    ///   the symbol set / timestamp index
    pub fn new(
        symbols: Vec<String>,
        timestamps: Vec<Timestamp>,
        columns: Vec<Vec<Price>>,
    ) -> Result<Self> {
        if symbols.is_empty() {
            return Err(FrontierError::invalid_parameter("empty instrument set"));
        }
        if columns.len() != symbols.len() {
            return Err(FrontierError::length_mismatch(symbols.len(), columns.len()));
        }
        for column in &columns {
            if column.len() != timestamps.len() {
                return Err(FrontierError::length_mismatch(
                    timestamps.len(),
                    column.len(),
                ));
            }
        }
        if timestamps.windows(2).any(|w| w[1] <= w[0]) {
            return Err(FrontierError::invalid_parameter(
                "timestamp index must be strictly increasing",
            ));
        }
        Ok(Self {
            symbols,
            timestamps,
            columns,
        })
    }

    /// Get the number of instruments.
    #[inline]
    pub fn num_instruments(&self) -> usize {
        self.symbols.len()
    }

    /// Get the number of aligned observations.
    #[inline]
    pub fn num_observations(&self) -> usize {
        self.timestamps.len()
    }

    /// Get the instrument identifiers.
    #[inline]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Get the shared timestamp index.
    #[inline]
    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    /// Get the price column for one instrument.
    #[inline]
    pub fn column(&self, index: usize) -> &[Price] {
        &self.columns[index]
    }

    /// Rebase every column to its first observation.
    ///
    /// Used by presentation layers to chart relative performance across
    /// instruments with different price levels.
    pub fn normalized(&self) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|column| {
                let base = column.first().copied().unwrap_or(f64::NAN);
                column.iter().map(|p| p / base).collect()
            })
            .collect();
        Self {
            symbols: self.symbols.clone(),
            timestamps: self.timestamps.clone(),
            columns,
        }
    }
}

/// Simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of random allocations to score.
    pub n_trials: usize,
    /// Base seed for the deterministic random stream.
    pub seed: u64,
    /// Return-observation periods per year (252 for daily data).
    pub periods_per_year: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            n_trials: 10_000,
            seed: 101,
            periods_per_year: 252.0,
        }
    }
}

/// One scored allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Allocation weights, non-negative, summing to 1.
    pub weights: Vec<f64>,
    /// Annualized portfolio volatility.
    pub volatility: f64,
    /// Annualized expected portfolio return.
    pub expected_return: f64,
    /// Risk-adjusted return; NaN when volatility is zero.
    pub sharpe_ratio: f64,
}

/// Ordered collection of scored allocations from one run.
///
/// Rows are ordered by trial index regardless of execution schedule, and the
/// set is immutable once the run returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSet {
    results: Vec<SimulationResult>,
    requested: usize,
}

impl ResultSet {
    pub(crate) fn new(results: Vec<SimulationResult>, requested: usize) -> Self {
        Self { results, requested }
    }

    /// Number of completed trials.
    #[inline]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if no trials completed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of trials the run was asked for.
    #[inline]
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Whether the run was cancelled before all trials completed.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.results.len() < self.requested
    }

    /// Get one result row.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&SimulationResult> {
        self.results.get(index)
    }

    /// All result rows in trial order.
    #[inline]
    pub fn results(&self) -> &[SimulationResult] {
        &self.results
    }

    /// Iterator over result rows.
    pub fn iter(&self) -> impl Iterator<Item = &SimulationResult> {
        self.results.iter()
    }

    /// The row with the highest Sharpe ratio, ignoring NaN sentinels.
    pub fn best_sharpe(&self) -> Option<&SimulationResult> {
        self.results
            .iter()
            .filter(|r| !r.sharpe_ratio.is_nan())
            .max_by(|a, b| {
                a.sharpe_ratio
                    .partial_cmp(&b.sharpe_ratio)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// The row with the lowest volatility.
    pub fn min_volatility(&self) -> Option<&SimulationResult> {
        self.results
            .iter()
            .filter(|r| !r.volatility.is_nan())
            .min_by(|a, b| {
                a.volatility
                    .partial_cmp(&b.volatility)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}
