//! Return statistics: aligned price table, per-period returns, mean vector,
//! covariance matrix.
//!
//! Alignment is a strict inner join on dates: only dates where every
//! surviving instrument has a close are kept, and returns are taken between
//! consecutive kept dates. No forward or backward fill.

use crate::domain::error::PortoptError;
use crate::domain::price_series::ClosePoint;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub const MIN_INSTRUMENTS: usize = 2;

/// Everything the simulation and the report layer need about the input data:
/// the surviving instrument list, the aligned raw price table (the report
/// rebases it to base 100), the return matrix and its summary statistics,
/// and the symbols that were dropped for having no data at all.
#[derive(Debug, Clone)]
pub struct ReturnStatistics {
    pub symbols: Vec<String>,
    pub dates: Vec<NaiveDate>,
    /// One row per aligned date, one column per symbol.
    pub prices: Vec<Vec<f64>>,
    /// One row per period (`dates.len() - 1`), one column per symbol.
    pub returns: Vec<Vec<f64>>,
    pub mean_returns: Vec<f64>,
    /// Sample covariance (N-1 denominator); the zero matrix when only one
    /// return period survives alignment.
    pub covariance: Vec<Vec<f64>>,
    pub dropped: Vec<String>,
}

impl ReturnStatistics {
    pub fn instrument_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn period_count(&self) -> usize {
        self.returns.len()
    }

    /// Standalone per-instrument annualized volatility:
    /// sample standard deviation of the return column times sqrt(factor).
    pub fn annualized_volatility(&self, annualization_factor: f64) -> Vec<f64> {
        let m = self.returns.len();
        (0..self.symbols.len())
            .map(|col| {
                if m < 2 {
                    return 0.0;
                }
                let mean = self.mean_returns[col];
                let variance = self
                    .returns
                    .iter()
                    .map(|row| (row[col] - mean).powi(2))
                    .sum::<f64>()
                    / (m - 1) as f64;
                variance.sqrt() * annualization_factor.sqrt()
            })
            .collect()
    }
}

/// Build return statistics from the raw collaborator price table.
///
/// `requested` keeps its order; repeated symbols are the same instrument and
/// count once. Symbols with an absent or empty series are dropped and
/// reported back in `dropped` so the caller can tell the user.
pub fn build_statistics(
    prices: &HashMap<String, Vec<ClosePoint>>,
    requested: &[String],
) -> Result<ReturnStatistics, PortoptError> {
    let mut symbols = Vec::new();
    let mut dropped = Vec::new();
    let mut seen = BTreeSet::new();

    for symbol in requested {
        if !seen.insert(symbol.clone()) {
            continue;
        }
        match prices.get(symbol) {
            Some(series) if !series.is_empty() => symbols.push(symbol.clone()),
            _ => dropped.push(symbol.clone()),
        }
    }

    if symbols.len() < MIN_INSTRUMENTS {
        return Err(PortoptError::InsufficientData {
            usable: symbols.len(),
            minimum: MIN_INSTRUMENTS,
        });
    }

    let by_date: Vec<BTreeMap<NaiveDate, f64>> = symbols
        .iter()
        .map(|symbol| {
            prices[symbol]
                .iter()
                .map(|p| (p.date, p.close))
                .collect()
        })
        .collect();

    let mut common: BTreeSet<NaiveDate> = by_date[0].keys().copied().collect();
    for series in &by_date[1..] {
        common.retain(|date| series.contains_key(date));
    }
    let dates: Vec<NaiveDate> = common.into_iter().collect();

    if dates.len() < 2 {
        return Err(PortoptError::NoAlignedReturns);
    }

    let price_rows: Vec<Vec<f64>> = dates
        .iter()
        .map(|date| by_date.iter().map(|series| series[date]).collect())
        .collect();

    let returns: Vec<Vec<f64>> = price_rows
        .windows(2)
        .map(|w| {
            w[0].iter()
                .zip(&w[1])
                .map(|(prev, curr)| (curr - prev) / prev)
                .collect()
        })
        .collect();

    let n = symbols.len();
    let m = returns.len();

    let mean_returns: Vec<f64> = (0..n)
        .map(|col| returns.iter().map(|row| row[col]).sum::<f64>() / m as f64)
        .collect();

    let covariance = if m < 2 {
        vec![vec![0.0; n]; n]
    } else {
        (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        returns
                            .iter()
                            .map(|row| (row[i] - mean_returns[i]) * (row[j] - mean_returns[j]))
                            .sum::<f64>()
                            / (m - 1) as f64
                    })
                    .collect()
            })
            .collect()
    };

    Ok(ReturnStatistics {
        symbols,
        dates,
        prices: price_rows,
        returns,
        mean_returns,
        covariance,
        dropped,
    })
}
