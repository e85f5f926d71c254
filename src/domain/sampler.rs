//! Random candidate allocation sampling.
//!
//! Candidates are drawn by the normalised-uniform trick: n independent
//! uniform [0,1) draws divided by their sum. This is not an exactly uniform
//! distribution over the weight simplex, but every instrument can land at any
//! weight in [0,1], components are non-negative, and they sum to one.
//!
//! The random source is an explicit argument, so a seeded `StdRng` reproduces
//! a population bit for bit. There is no process-wide random state.

use rand::Rng;

/// Draw one candidate weight vector of length `instrument_count`.
pub fn sample_weights<R: Rng>(instrument_count: usize, rng: &mut R) -> Vec<f64> {
    loop {
        let draws: Vec<f64> = (0..instrument_count).map(|_| rng.r#gen::<f64>()).collect();
        let total: f64 = draws.iter().sum();
        if total > 0.0 {
            return draws.into_iter().map(|d| d / total).collect();
        }
    }
}

/// Draw `sample_count` independent candidates, in generation order.
pub fn sample_population<R: Rng>(
    instrument_count: usize,
    sample_count: usize,
    rng: &mut R,
) -> Vec<Vec<f64>> {
    (0..sample_count)
        .map(|_| sample_weights(instrument_count, rng))
        .collect()
}
