//! Random long-only allocation sampling.

use crate::simulation::rng::Xoshiro256;

/// Draw one allocation: `n` independent uniform draws in [0, 1), normalized
/// by their sum. Entries are non-negative and sum to 1 within 1e-9.
///
/// Normalizing uniform draws concentrates mass toward the interior of the
/// simplex rather than sampling it uniformly. That shape is part of the
/// engine's contract; consumers of the result cloud rely on it.
///
/// The all-zero draw (probability effectively zero) is resampled rather
/// than divided by.
pub fn sample_weights(n: usize, rng: &mut Xoshiro256) -> Vec<f64> {
    debug_assert!(n >= 1);
    loop {
        let draws: Vec<f64> = (0..n).map(|_| rng.next_f64()).collect();
        let total: f64 = draws.iter().sum();
        if total > 0.0 {
            return draws.into_iter().map(|d| d / total).collect();
        }
    }
}
