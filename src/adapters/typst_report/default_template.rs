//! Built-in Typst report template with `{{PLACEHOLDER}}` markers.

pub fn template() -> &'static str {
    r#"#set page(paper: "a4", margin: 2cm)
#set text(font: "New Computer Modern", size: 10pt)

= Portfolio Allocation Report

== Simulation Summary

{{RUN_SUMMARY}}

{{DROPPED_SYMBOLS}}

== Price Evolution (Base 100)

{{PRICE_CHART_SVG}}

== Per-Instrument Volatility

{{VOLATILITY_TABLE}}

{{VOLATILITY_CHART_SVG}}

== Simulated Portfolios

{{SCATTER_CHART_SVG}}

== Best Allocation

{{ALLOCATION_TABLE}}

== Expected Performance

{{PERFORMANCE_TABLE}}
"#
}
