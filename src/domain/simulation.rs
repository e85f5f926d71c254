//! Portfolio scoring, selection, and the simulation entry point.

use crate::domain::error::PortoptError;
use crate::domain::price_series::ClosePoint;
use crate::domain::sampler::sample_population;
use crate::domain::statistics::{build_statistics, ReturnStatistics};
use rand::Rng;
use std::collections::HashMap;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
pub const DEFAULT_SAMPLE_COUNT: usize = 2000;

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of random candidate allocations to draw.
    pub sample_count: usize,
    /// Periods per year used to annualize returns and volatility.
    pub annualization_factor: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            annualization_factor: TRADING_DAYS_PER_YEAR,
        }
    }
}

/// A sampled allocation with its annualized metrics.
///
/// `quality_score` is `None` when volatility is exactly zero; such a
/// candidate stays in the population (the scatter plot still shows it) but
/// never wins selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub weights: Vec<f64>,
    pub expected_return: f64,
    pub volatility: f64,
    pub quality_score: Option<f64>,
}

/// The full scored population, in generation order, plus the winner's index.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub candidates: Vec<ScoredCandidate>,
    pub best_index: usize,
}

impl SimulationResult {
    pub fn best(&self) -> &ScoredCandidate {
        &self.candidates[self.best_index]
    }
}

/// Statistics, configuration, and scored population of one run; the whole
/// artifact the report layer consumes.
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub statistics: ReturnStatistics,
    pub config: SimulationConfig,
    pub result: SimulationResult,
}

/// Score one weight vector against the return statistics.
///
/// expected = mean · w, annualized; volatility = sqrt(wᵀ (cov × factor) w).
pub fn score_candidate(
    weights: Vec<f64>,
    mean_returns: &[f64],
    covariance: &[Vec<f64>],
    annualization_factor: f64,
) -> ScoredCandidate {
    let expected_return: f64 = mean_returns
        .iter()
        .zip(&weights)
        .map(|(mean, w)| mean * w)
        .sum::<f64>()
        * annualization_factor;

    let mut quadratic = 0.0;
    for (i, wi) in weights.iter().enumerate() {
        for (j, wj) in weights.iter().enumerate() {
            quadratic += wi * covariance[i][j] * annualization_factor * wj;
        }
    }
    let volatility = quadratic.max(0.0).sqrt();

    let quality_score = if volatility > 0.0 {
        Some(expected_return / volatility)
    } else {
        None
    };

    ScoredCandidate {
        weights,
        expected_return,
        volatility,
        quality_score,
    }
}

/// Score a sampled population and pick the candidate with the highest
/// quality score. Ties go to the earliest draw.
pub fn run_simulation<R: Rng>(
    statistics: &ReturnStatistics,
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<SimulationResult, PortoptError> {
    if config.sample_count == 0 {
        return Err(PortoptError::EmptyPopulation);
    }

    let population = sample_population(statistics.instrument_count(), config.sample_count, rng);

    let candidates: Vec<ScoredCandidate> = population
        .into_iter()
        .map(|weights| {
            score_candidate(
                weights,
                &statistics.mean_returns,
                &statistics.covariance,
                config.annualization_factor,
            )
        })
        .collect();

    let mut best: Option<(usize, f64)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let Some(score) = candidate.quality_score else {
            continue;
        };
        // Strict comparison keeps the earliest draw on ties.
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }

    match best {
        Some((best_index, _)) => Ok(SimulationResult {
            candidates,
            best_index,
        }),
        None => Err(PortoptError::NoViableCandidate),
    }
}

/// One-call entry point: raw price table in, statistics plus scored
/// population out.
pub fn simulate<R: Rng>(
    prices: &HashMap<String, Vec<ClosePoint>>,
    requested: &[String],
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<SimulationRun, PortoptError> {
    let statistics = build_statistics(prices, requested)?;
    let result = run_simulation(&statistics, config, rng)?;
    Ok(SimulationRun {
        statistics,
        config: config.clone(),
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn two_asset_statistics() -> ReturnStatistics {
        // A's returns [0.01, -0.02, 0.03], B's [0.02, 0.01, -0.01].
        let returns = vec![
            vec![0.01, 0.02],
            vec![-0.02, 0.01],
            vec![0.03, -0.01],
        ];
        statistics_from_returns(vec!["A".into(), "B".into()], returns)
    }

    fn statistics_from_returns(symbols: Vec<String>, returns: Vec<Vec<f64>>) -> ReturnStatistics {
        let n = symbols.len();
        let m = returns.len();
        let mean_returns: Vec<f64> = (0..n)
            .map(|col| returns.iter().map(|row| row[col]).sum::<f64>() / m as f64)
            .collect();
        let covariance: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        if m < 2 {
                            return 0.0;
                        }
                        returns
                            .iter()
                            .map(|row| (row[i] - mean_returns[i]) * (row[j] - mean_returns[j]))
                            .sum::<f64>()
                            / (m - 1) as f64
                    })
                    .collect()
            })
            .collect();
        let dates: Vec<NaiveDate> = (1..=(m as u32 + 1))
            .map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
            .collect();
        let prices = vec![vec![100.0; n]; m + 1];
        ReturnStatistics {
            symbols,
            dates,
            prices,
            returns,
            mean_returns,
            covariance,
            dropped: Vec::new(),
        }
    }

    #[test]
    fn score_equal_weights_known_values() {
        let stats = two_asset_statistics();
        let candidate =
            score_candidate(vec![0.5, 0.5], &stats.mean_returns, &stats.covariance, 252.0);

        // Portfolio per-period mean is (mean_A + mean_B) / 2 = 0.00667.
        assert_abs_diff_eq!(candidate.expected_return, 0.02 / 3.0 * 252.0, epsilon = 1e-9);

        let var: f64 = 0.25 * (6.333333e-4 + 2.333333e-4 + 2.0 * -2.166667e-4) * 252.0;
        assert_abs_diff_eq!(candidate.volatility, var.sqrt(), epsilon = 1e-6);
        assert_abs_diff_eq!(
            candidate.quality_score.unwrap(),
            candidate.expected_return / candidate.volatility,
            epsilon = 1e-12
        );
    }

    #[test]
    fn scoring_does_not_alter_weights() {
        let stats = two_asset_statistics();
        let candidate =
            score_candidate(vec![0.3, 0.7], &stats.mean_returns, &stats.covariance, 252.0);
        assert_eq!(candidate.weights, vec![0.3, 0.7]);
    }

    #[test]
    fn zero_volatility_has_no_quality_score() {
        let stats = statistics_from_returns(
            vec!["A".into(), "B".into()],
            vec![vec![0.01, 0.01]],
        );
        let candidate =
            score_candidate(vec![0.5, 0.5], &stats.mean_returns, &stats.covariance, 252.0);
        assert!((candidate.volatility - 0.0).abs() < f64::EPSILON);
        assert_eq!(candidate.quality_score, None);
    }

    #[test]
    fn population_size_matches_sample_count() {
        let stats = two_asset_statistics();
        let config = SimulationConfig {
            sample_count: 1000,
            annualization_factor: 252.0,
        };
        let mut rng = StdRng::seed_from_u64(11);
        let result = run_simulation(&stats, &config, &mut rng).unwrap();
        assert_eq!(result.candidates.len(), 1000);
    }

    #[test]
    fn best_candidate_dominates_population() {
        let stats = two_asset_statistics();
        let config = SimulationConfig {
            sample_count: 1000,
            annualization_factor: 252.0,
        };
        let mut rng = StdRng::seed_from_u64(11);
        let result = run_simulation(&stats, &config, &mut rng).unwrap();

        let best_score = result.best().quality_score.unwrap();
        for candidate in &result.candidates {
            if let Some(score) = candidate.quality_score {
                assert!(best_score >= score);
            }
        }
    }

    #[test]
    fn ties_resolve_to_earliest_draw() {
        let stats = two_asset_statistics();
        let config = SimulationConfig {
            sample_count: 50,
            annualization_factor: 252.0,
        };
        let mut rng = StdRng::seed_from_u64(3);
        let result = run_simulation(&stats, &config, &mut rng).unwrap();

        let best_score = result.best().quality_score.unwrap();
        let first_max = result
            .candidates
            .iter()
            .position(|c| c.quality_score == Some(best_score))
            .unwrap();
        assert_eq!(result.best_index, first_max);
    }

    #[test]
    fn zero_sample_count_is_empty_population() {
        let stats = two_asset_statistics();
        let config = SimulationConfig {
            sample_count: 0,
            annualization_factor: 252.0,
        };
        let mut rng = StdRng::seed_from_u64(11);
        let result = run_simulation(&stats, &config, &mut rng);
        assert!(matches!(result, Err(PortoptError::EmptyPopulation)));
    }

    #[test]
    fn all_degenerate_candidates_fail_selection() {
        // One return period: the covariance matrix is all zeros, so every
        // candidate has zero volatility.
        let stats = statistics_from_returns(
            vec!["A".into(), "B".into()],
            vec![vec![0.10, 0.05]],
        );
        let config = SimulationConfig {
            sample_count: 100,
            annualization_factor: 252.0,
        };
        let mut rng = StdRng::seed_from_u64(11);
        let result = run_simulation(&stats, &config, &mut rng);
        assert!(matches!(result, Err(PortoptError::NoViableCandidate)));
    }

    #[test]
    fn seeded_runs_are_identical() {
        let stats = two_asset_statistics();
        let config = SimulationConfig {
            sample_count: 200,
            annualization_factor: 252.0,
        };
        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);

        let a = run_simulation(&stats, &config, &mut rng_a).unwrap();
        let b = run_simulation(&stats, &config, &mut rng_b).unwrap();

        assert_eq!(a.best_index, b.best_index);
        assert_eq!(a.candidates, b.candidates);
    }

    #[test]
    fn example_scenario_end_to_end() {
        let stats = two_asset_statistics();
        assert_abs_diff_eq!(stats.mean_returns[0], 0.00667, epsilon = 1e-4);
        assert_abs_diff_eq!(stats.mean_returns[1], 0.00667, epsilon = 1e-4);

        let config = SimulationConfig {
            sample_count: 1000,
            annualization_factor: 252.0,
        };
        let mut rng = StdRng::seed_from_u64(2024);
        let result = run_simulation(&stats, &config, &mut rng).unwrap();

        assert_eq!(result.candidates.len(), 1000);
        let best = result.best();
        assert!(best.quality_score.is_some());
        for candidate in &result.candidates {
            if let Some(score) = candidate.quality_score {
                assert!(best.quality_score.unwrap() >= score);
            }
        }
    }
}
