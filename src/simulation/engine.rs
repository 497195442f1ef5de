//! Simulation engine: repeated sampling and scoring of random allocations.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::core::error::{FrontierError, Result};
use crate::core::types::{PriceTable, ResultSet, SimulationConfig, SimulationResult};
use crate::simulation::returns::log_returns;
use crate::simulation::rng::Xoshiro256;
use crate::simulation::sampler::sample_weights;
use crate::simulation::scorer::score;
use crate::simulation::statistics::{estimate, ReturnStatistics};

/// Upper bound on the accepted trial count.
pub const MAX_TRIALS: usize = 100_000;

/// Progress sink invoked with `(completed, total)` after each trial.
pub type ProgressFn<'a> = &'a (dyn Fn(usize, usize) + Sync);

/// Shareable cancellation flag.
///
/// Cancelling stops the run after the in-flight trial; completed trials are
/// kept and the ResultSet carries a truncation marker.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Engine lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Configuration accepted, no run started.
    Configured,
    /// A run is in flight.
    Running,
    /// The last run returned a ResultSet.
    Completed,
    /// The last run failed on upstream data before the loop started.
    Failed,
}

/// Monte Carlo allocation engine.
///
/// Owns the deterministic random stream: trial `i` always draws from the
/// substream derived from `(seed, i)`, so identical `(data, seed,
/// n_trials)` inputs yield identical ResultSets, serial or parallel.
#[derive(Debug)]
pub struct SimulationEngine {
    config: SimulationConfig,
    state: EngineState,
}

impl SimulationEngine {
    /// Create an engine, validating the configuration.
    ///
    /// # Errors
    /// * `InvalidParameter` - trial count outside [1, 100000] or a
    ///   non-positive annualization factor
    pub fn new(config: SimulationConfig) -> Result<Self> {
        if config.n_trials == 0 || config.n_trials > MAX_TRIALS {
            return Err(FrontierError::invalid_parameter(format!(
                "n_trials must be in [1, {}], got {}",
                MAX_TRIALS, config.n_trials
            )));
        }
        if !(config.periods_per_year > 0.0) || !config.periods_per_year.is_finite() {
            return Err(FrontierError::invalid_parameter(format!(
                "periods_per_year must be positive and finite, got {}",
                config.periods_per_year
            )));
        }
        Ok(Self {
            config,
            state: EngineState::Configured,
        })
    }

    /// Get the engine configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Get the engine lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    fn prepare(&mut self, table: &PriceTable) -> Result<ReturnStatistics> {
        self.state = EngineState::Running;
        let stats = log_returns(table).and_then(|returns| estimate(&returns));
        if stats.is_err() {
            self.state = EngineState::Failed;
        }
        stats
    }

    fn trial(&self, stats: &ReturnStatistics, index: usize) -> SimulationResult {
        let mut rng = Xoshiro256::for_trial(self.config.seed, index as u64);
        let weights = sample_weights(stats.num_instruments(), &mut rng);
        let s = score(&weights, stats, self.config.periods_per_year);
        SimulationResult {
            weights,
            volatility: s.volatility,
            expected_return: s.expected_return,
            sharpe_ratio: s.sharpe_ratio,
        }
    }

    /// Run all trials serially.
    pub fn run(&mut self, table: &PriceTable) -> Result<ResultSet> {
        self.run_with(table, None, None)
    }

    /// Run all trials serially with progress reporting and cancellation.
    ///
    /// The progress callback fires synchronously after each trial with
    /// `(completed, total)`; it observes results, never alters them.
    pub fn run_with(
        &mut self,
        table: &PriceTable,
        progress: Option<ProgressFn>,
        cancel: Option<&CancelToken>,
    ) -> Result<ResultSet> {
        let stats = self.prepare(table)?;
        let total = self.config.n_trials;

        let mut results = Vec::with_capacity(total);
        for index in 0..total {
            if cancel.map_or(false, |c| c.is_cancelled()) {
                break;
            }
            results.push(self.trial(&stats, index));
            if let Some(report) = progress {
                report(results.len(), total);
            }
        }

        self.state = EngineState::Completed;
        Ok(ResultSet::new(results, total))
    }

    /// Run all trials on the rayon thread pool.
    ///
    /// Produces the same ResultSet as [`run`](Self::run): every trial owns
    /// an index-derived substream and rows are ordered by trial index, not
    /// completion time.
    pub fn run_parallel(&mut self, table: &PriceTable) -> Result<ResultSet> {
        self.run_parallel_with(table, None, None)
    }

    /// Parallel run with progress reporting and cancellation.
    ///
    /// Progress events carry the completed-trial count at the moment the
    /// reporting worker finished; counts arrive monotonically but
    /// interleaved across workers.
    pub fn run_parallel_with(
        &mut self,
        table: &PriceTable,
        progress: Option<ProgressFn>,
        cancel: Option<&CancelToken>,
    ) -> Result<ResultSet> {
        let stats = self.prepare(table)?;
        let total = self.config.n_trials;
        let completed = AtomicUsize::new(0);

        let mut indexed: Vec<(usize, SimulationResult)> = (0..total)
            .into_par_iter()
            .filter_map(|index| {
                if cancel.map_or(false, |c| c.is_cancelled()) {
                    return None;
                }
                let result = self.trial(&stats, index);
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(report) = progress {
                    report(done, total);
                }
                Some((index, result))
            })
            .collect();
        indexed.sort_by_key(|(index, _)| *index);

        self.state = EngineState::Completed;
        let results = indexed.into_iter().map(|(_, result)| result).collect();
        Ok(ResultSet::new(results, total))
    }
}

/// One-shot convenience: validate, run serially, return the ResultSet.
pub fn simulate(table: &PriceTable, config: SimulationConfig) -> Result<ResultSet> {
    SimulationEngine::new(config)?.run(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PriceTable;

    fn sample_table(n_instruments: usize, n_obs: usize) -> PriceTable {
        let symbols = (0..n_instruments).map(|i| format!("S{}", i)).collect();
        let columns = (0..n_instruments)
            .map(|i| {
                let mut prices = vec![100.0 + 10.0 * i as f64];
                for t in 1..n_obs {
                    let drift = 0.0005 * (i as f64 + 1.0);
                    let wiggle = ((t * (i + 2)) as f64 * 0.7).sin() * 0.01;
                    let prev = prices[t - 1];
                    prices.push(prev * (drift + wiggle).exp());
                }
                prices
            })
            .collect();
        PriceTable::new(symbols, (0..n_obs as i64).collect(), columns).unwrap()
    }

    fn config(n_trials: usize, seed: u64) -> SimulationConfig {
        SimulationConfig {
            n_trials,
            seed,
            ..Default::default()
        }
    }

    #[test]
    fn test_rejects_zero_trials() {
        let err = SimulationEngine::new(config(0, 1)).unwrap_err();
        assert!(matches!(err, FrontierError::InvalidParameter { .. }));
    }

    #[test]
    fn test_rejects_excessive_trials() {
        let err = SimulationEngine::new(config(MAX_TRIALS + 1, 1)).unwrap_err();
        assert!(matches!(err, FrontierError::InvalidParameter { .. }));
    }

    #[test]
    fn test_state_transitions() {
        let table = sample_table(2, 30);
        let mut engine = SimulationEngine::new(config(10, 42)).unwrap();
        assert_eq!(engine.state(), EngineState::Configured);
        engine.run(&table).unwrap();
        assert_eq!(engine.state(), EngineState::Completed);
    }

    #[test]
    fn test_failed_state_on_short_history() {
        let table = sample_table(2, 1);
        let mut engine = SimulationEngine::new(config(10, 42)).unwrap();
        let err = engine.run(&table).unwrap_err();
        assert!(matches!(err, FrontierError::InsufficientData { .. }));
        assert_eq!(engine.state(), EngineState::Failed);
    }

    #[test]
    fn test_parallel_matches_serial_bitwise() {
        let table = sample_table(4, 60);
        let serial = SimulationEngine::new(config(200, 9)).unwrap().run(&table).unwrap();
        let parallel = SimulationEngine::new(config(200, 9))
            .unwrap()
            .run_parallel(&table)
            .unwrap();

        assert_eq!(serial.len(), parallel.len());
        for (a, b) in serial.iter().zip(parallel.iter()) {
            assert_eq!(a.volatility.to_bits(), b.volatility.to_bits());
            assert_eq!(a.expected_return.to_bits(), b.expected_return.to_bits());
            assert_eq!(a.sharpe_ratio.to_bits(), b.sharpe_ratio.to_bits());
            for (x, y) in a.weights.iter().zip(b.weights.iter()) {
                assert_eq!(x.to_bits(), y.to_bits());
            }
        }
    }

    #[test]
    fn test_progress_counts_every_trial() {
        use std::sync::Mutex;

        let table = sample_table(2, 30);
        let events = Mutex::new(Vec::new());
        let progress = |done: usize, total: usize| {
            events.lock().unwrap().push((done, total));
        };

        let mut engine = SimulationEngine::new(config(25, 3)).unwrap();
        engine.run_with(&table, Some(&progress), None).unwrap();

        let events = events.into_inner().unwrap();
        assert_eq!(events.len(), 25);
        assert_eq!(events[0], (1, 25));
        assert_eq!(events[24], (25, 25));
    }

    #[test]
    fn test_cancellation_keeps_completed_prefix() {
        let table = sample_table(3, 40);
        let token = CancelToken::new();
        let cancel_at = 5;
        let progress = |done: usize, _total: usize| {
            if done == cancel_at {
                token.cancel();
            }
        };

        let mut engine = SimulationEngine::new(config(100, 11)).unwrap();
        let partial = engine
            .run_with(&table, Some(&progress), Some(&token))
            .unwrap();

        assert_eq!(partial.len(), cancel_at);
        assert_eq!(partial.requested(), 100);
        assert!(partial.is_truncated());

        // Completed rows are the same values a full run produces.
        let full = SimulationEngine::new(config(100, 11)).unwrap().run(&table).unwrap();
        for (a, b) in partial.iter().zip(full.iter()) {
            assert_eq!(a.expected_return.to_bits(), b.expected_return.to_bits());
        }
    }

    #[test]
    fn test_pre_cancelled_run_returns_empty() {
        let table = sample_table(2, 30);
        let token = CancelToken::new();
        token.cancel();
        let mut engine = SimulationEngine::new(config(50, 1)).unwrap();
        let set = engine.run_with(&table, None, Some(&token)).unwrap();
        assert!(set.is_empty());
        assert!(set.is_truncated());
    }
}
