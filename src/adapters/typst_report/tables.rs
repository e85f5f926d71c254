//! Typst table markup for report sections.

use crate::domain::simulation::{ScoredCandidate, SimulationRun};
use crate::domain::statistics::ReturnStatistics;

pub fn render_run_summary(run: &SimulationRun) -> String {
    let stats = &run.statistics;
    let mut output = String::from("#table(\n  columns: (auto, auto),\n");
    output.push_str(&format!(
        "  [Instruments], [{}],\n",
        stats.symbols.join(", ")
    ));
    output.push_str(&format!(
        "  [Date range], [{} to {}],\n",
        stats.dates.first().map(|d| d.to_string()).unwrap_or_default(),
        stats.dates.last().map(|d| d.to_string()).unwrap_or_default(),
    ));
    output.push_str(&format!(
        "  [Aligned periods], [{}],\n",
        stats.period_count()
    ));
    output.push_str(&format!(
        "  [Sampled portfolios], [{}],\n",
        run.result.candidates.len()
    ));
    output.push_str(&format!(
        "  [Annualization factor], [{:.0}],\n",
        run.config.annualization_factor
    ));
    output.push_str(")\n");
    output
}

/// The headline allocation: one row per instrument, weight in percent.
pub fn render_allocation_table(symbols: &[String], best: &ScoredCandidate) -> String {
    let mut output = String::from("#table(\n  columns: (auto, auto),\n  [Instrument], [Weight],\n");
    for (symbol, weight) in symbols.iter().zip(&best.weights) {
        output.push_str(&format!("  [{}], [{:.1}%],\n", symbol, weight * 100.0));
    }
    output.push_str(")\n");
    output
}

pub fn render_performance_table(best: &ScoredCandidate) -> String {
    let quality = best
        .quality_score
        .map(|q| format!("{:.2}", q))
        .unwrap_or_else(|| "n/a".to_string());
    let mut output = String::from("#table(\n  columns: (auto, auto),\n");
    output.push_str(&format!(
        "  [Expected annual return], [{:.1}%],\n",
        best.expected_return * 100.0
    ));
    output.push_str(&format!(
        "  [Annualized volatility], [{:.1}%],\n",
        best.volatility * 100.0
    ));
    output.push_str(&format!("  [Quality score], [{}],\n", quality));
    output.push_str(")\n");
    output
}

pub fn render_volatility_table(statistics: &ReturnStatistics, annualization_factor: f64) -> String {
    let volatilities = statistics.annualized_volatility(annualization_factor);
    let mut output =
        String::from("#table(\n  columns: (auto, auto),\n  [Instrument], [Volatility],\n");
    for (symbol, vol) in statistics.symbols.iter().zip(&volatilities) {
        output.push_str(&format!("  [{}], [{:.1}%],\n", symbol, vol * 100.0));
    }
    output.push_str(")\n");
    output
}

/// A note listing symbols dropped for lack of data; empty when none were.
pub fn render_dropped_note(statistics: &ReturnStatistics) -> String {
    if statistics.dropped.is_empty() {
        return String::new();
    }
    format!(
        "_No usable price data for: {}. These symbols were excluded from the simulation._\n",
        statistics.dropped.join(", ")
    )
}
