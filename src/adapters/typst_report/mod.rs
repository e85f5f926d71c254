//! Typst report generation.
//!
//! Orchestrates placeholder resolution: reads a Typst template (either the
//! built-in default or a custom file via `template_path`), resolves all
//! `{{PLACEHOLDER}}` markers by calling helpers from `charts` and `tables`,
//! and writes the final `.typ` file.

pub mod charts;
pub mod default_template;
pub mod tables;

use std::fs;

use crate::domain::error::PortoptError;
use crate::domain::simulation::SimulationRun;
use crate::ports::report_port::ReportPort;

fn embed_svg(svg: &str, fallback: &str) -> String {
    if svg.is_empty() {
        return fallback.to_string();
    }
    format!(
        "#image.decode(\n\"{}\",\n  width: 100%,\n)",
        svg.replace('\\', "\\\\").replace('"', "\\\"")
    )
}

/// Resolve all `{{PLACEHOLDER}}`s in the given template string and return
/// the final Typst markup ready to be written to a `.typ` file.
pub fn resolve(template: &str, run: &SimulationRun) -> String {
    let stats = &run.statistics;
    let best = run.result.best();
    let factor = run.config.annualization_factor;

    let mut output = template.to_string();

    output = output.replace("{{RUN_SUMMARY}}", &tables::render_run_summary(run));
    output = output.replace("{{DROPPED_SYMBOLS}}", &tables::render_dropped_note(stats));
    output = output.replace(
        "{{PRICE_CHART_SVG}}",
        &embed_svg(&charts::generate_price_svg(stats), "_No price data._"),
    );
    output = output.replace(
        "{{VOLATILITY_TABLE}}",
        &tables::render_volatility_table(stats, factor),
    );
    output = output.replace(
        "{{VOLATILITY_CHART_SVG}}",
        &embed_svg(
            &charts::generate_volatility_svg(&stats.symbols, &stats.annualized_volatility(factor)),
            "_No volatility data._",
        ),
    );
    output = output.replace(
        "{{SCATTER_CHART_SVG}}",
        &embed_svg(
            &charts::generate_scatter_svg(&run.result),
            "_No candidate population._",
        ),
    );
    output = output.replace(
        "{{ALLOCATION_TABLE}}",
        &tables::render_allocation_table(&stats.symbols, best),
    );
    output = output.replace(
        "{{PERFORMANCE_TABLE}}",
        &tables::render_performance_table(best),
    );

    output
}

/// Writes a Typst report; a custom template overrides the built-in one.
pub struct TypstReportAdapter {
    template: Option<String>,
}

impl TypstReportAdapter {
    pub fn new() -> Self {
        Self { template: None }
    }

    pub fn with_template(template: String) -> Self {
        Self {
            template: Some(template),
        }
    }
}

impl Default for TypstReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for TypstReportAdapter {
    fn write(&self, run: &SimulationRun, output_path: &str) -> Result<(), PortoptError> {
        let template = self
            .template
            .as_deref()
            .unwrap_or_else(|| default_template::template());
        let content = resolve(template, run);
        fs::write(output_path, content)?;
        Ok(())
    }
}
