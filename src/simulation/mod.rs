//! Monte Carlo portfolio simulation pipeline.
//!
//! Price history -> log returns -> mean/covariance statistics -> repeated
//! (sample weights, score allocation) trials -> ResultSet.

pub mod engine;
pub mod returns;
pub mod rng;
pub mod sampler;
pub mod scorer;
pub mod statistics;

pub use engine::{simulate, CancelToken, EngineState, SimulationEngine, MAX_TRIALS};
pub use returns::{log_returns, LogReturnSeries};
pub use rng::Xoshiro256;
pub use sampler::sample_weights;
pub use scorer::{score, TrialScore};
pub use statistics::{column_summary, estimate, ColumnSummary, ReturnStatistics};
