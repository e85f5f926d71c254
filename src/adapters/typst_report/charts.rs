//! SVG chart rendering for reports.
//!
//! Hand-built SVG strings; the report wraps them in Typst `#image.decode`.

use crate::domain::simulation::SimulationResult;
use crate::domain::statistics::ReturnStatistics;

const WIDTH: f64 = 500.0;
const HEIGHT: f64 = 240.0;
const PADDING: f64 = 40.0;

const SERIES_COLORS: [&str; 6] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b",
];

fn svg_open() -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}"><rect width="{:.0}" height="{:.0}" fill="white"/><line x1="{:.0}" y1="{:.0}" x2="{:.0}" y2="{:.0}" stroke="black"/><line x1="{:.0}" y1="{:.0}" x2="{:.0}" y2="{:.0}" stroke="black"/>"#,
        WIDTH,
        HEIGHT,
        WIDTH,
        HEIGHT,
        WIDTH,
        HEIGHT,
        PADDING,
        PADDING,
        PADDING,
        HEIGHT - PADDING,
        PADDING,
        HEIGHT - PADDING,
        WIDTH - PADDING,
        HEIGHT - PADDING,
    )
}

/// Normalized price curves, every instrument rebased to 100 at the first
/// aligned date.
pub fn generate_price_svg(statistics: &ReturnStatistics) -> String {
    if statistics.prices.is_empty() {
        return String::new();
    }

    let normalized: Vec<Vec<f64>> = (0..statistics.symbols.len())
        .map(|col| {
            let base = statistics.prices[0][col];
            statistics
                .prices
                .iter()
                .map(|row| row[col] / base * 100.0)
                .collect()
        })
        .collect();

    let min = normalized
        .iter()
        .flatten()
        .copied()
        .fold(f64::INFINITY, f64::min);
    let max = normalized
        .iter()
        .flatten()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;
    let range = max - min;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let rows = statistics.prices.len();
    let scale_x = if rows > 1 {
        plot_width / (rows - 1) as f64
    } else {
        0.0
    };

    let mut svg = svg_open();
    for (col, series) in normalized.iter().enumerate() {
        let points: Vec<String> = series
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let x = PADDING + i as f64 * scale_x;
                let y = HEIGHT - PADDING - (value - min) * scale_y;
                format!("{:.1},{:.1}", x, y)
            })
            .collect();
        svg.push_str(&format!(
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="1.5"/>"#,
            points.join(" "),
            SERIES_COLORS[col % SERIES_COLORS.len()],
        ));
    }
    svg.push_str("</svg>");
    svg
}

/// Per-instrument annualized volatility bars.
pub fn generate_volatility_svg(symbols: &[String], volatilities: &[f64]) -> String {
    if symbols.is_empty() {
        return String::new();
    }

    let max = volatilities.iter().copied().fold(0.0_f64, f64::max);
    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;
    let scale_y = if max > 0.0 { plot_height / max } else { 0.0 };
    let slot = plot_width / symbols.len() as f64;
    let bar_width = slot * 0.6;

    let mut svg = svg_open();
    for (i, (symbol, &vol)) in symbols.iter().zip(volatilities).enumerate() {
        let bar_height = vol * scale_y;
        let x = PADDING + i as f64 * slot + (slot - bar_width) / 2.0;
        let y = HEIGHT - PADDING - bar_height;
        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            x,
            y,
            bar_width,
            bar_height,
            SERIES_COLORS[i % SERIES_COLORS.len()],
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="10" text-anchor="middle">{}</text>"#,
            x + bar_width / 2.0,
            HEIGHT - PADDING + 14.0,
            symbol,
        ));
    }
    svg.push_str("</svg>");
    svg
}

/// Risk/return scatter of the whole candidate population, best candidate
/// highlighted in red.
pub fn generate_scatter_svg(result: &SimulationResult) -> String {
    if result.candidates.is_empty() {
        return String::new();
    }

    let min_vol = result
        .candidates
        .iter()
        .map(|c| c.volatility)
        .fold(f64::INFINITY, f64::min);
    let max_vol = result
        .candidates
        .iter()
        .map(|c| c.volatility)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_ret = result
        .candidates
        .iter()
        .map(|c| c.expected_return)
        .fold(f64::INFINITY, f64::min);
    let max_ret = result
        .candidates
        .iter()
        .map(|c| c.expected_return)
        .fold(f64::NEG_INFINITY, f64::max);

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;
    let vol_range = max_vol - min_vol;
    let ret_range = max_ret - min_ret;
    let scale_x = if vol_range > 0.0 {
        plot_width / vol_range
    } else {
        0.0
    };
    let scale_y = if ret_range > 0.0 {
        plot_height / ret_range
    } else {
        0.0
    };

    let mut svg = svg_open();
    for candidate in &result.candidates {
        let x = PADDING + (candidate.volatility - min_vol) * scale_x;
        let y = HEIGHT - PADDING - (candidate.expected_return - min_ret) * scale_y;
        svg.push_str(&format!(
            r##"<circle cx="{:.1}" cy="{:.1}" r="1.5" fill="#1f77b4" fill-opacity="0.5"/>"##,
            x, y,
        ));
    }

    let best = result.best();
    let x = PADDING + (best.volatility - min_vol) * scale_x;
    let y = HEIGHT - PADDING - (best.expected_return - min_ret) * scale_y;
    svg.push_str(&format!(
        r##"<circle cx="{:.1}" cy="{:.1}" r="4" fill="#d62728"/>"##,
        x, y,
    ));

    svg.push_str("</svg>");
    svg
}
