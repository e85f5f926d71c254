//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::typst_report::TypstReportAdapter;
use crate::domain::error::PortoptError;
use crate::domain::price_series::{parse_symbols, ClosePoint};
use crate::domain::simulation::{
    simulate, SimulationConfig, DEFAULT_SAMPLE_COUNT, TRADING_DAYS_PER_YEAR,
};
use crate::domain::statistics::MIN_INSTRUMENTS;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "portopt", about = "Monte Carlo portfolio allocation optimizer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a portfolio simulation
    Simulate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Comma-separated ticker list, overriding the config
        #[arg(long)]
        symbols: Option<String>,
        /// Number of candidate portfolios to draw, overriding the config
        #[arg(long)]
        samples: Option<usize>,
        /// RNG seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List symbols available in the price data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Simulate {
            config,
            output,
            symbols,
            samples,
            seed,
        } => run_simulate(&config, output.as_ref(), symbols.as_deref(), samples, seed),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = PortoptError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_simulation_config(
    adapter: &dyn ConfigPort,
    samples_override: Option<usize>,
) -> Result<SimulationConfig, PortoptError> {
    let sample_count = match samples_override {
        Some(count) => count,
        None => {
            let raw = adapter.get_int("simulation", "sample_count", DEFAULT_SAMPLE_COUNT as i64);
            if raw < 0 {
                return Err(PortoptError::ConfigInvalid {
                    section: "simulation".into(),
                    key: "sample_count".into(),
                    reason: "must not be negative".into(),
                });
            }
            raw as usize
        }
    };

    let annualization_factor =
        adapter.get_double("simulation", "annualization_factor", TRADING_DAYS_PER_YEAR);
    if annualization_factor <= 0.0 {
        return Err(PortoptError::ConfigInvalid {
            section: "simulation".into(),
            key: "annualization_factor".into(),
            reason: "must be positive".into(),
        });
    }

    Ok(SimulationConfig {
        sample_count,
        annualization_factor,
    })
}

pub fn build_date_range(adapter: &dyn ConfigPort) -> Result<(NaiveDate, NaiveDate), PortoptError> {
    let start_str = adapter
        .get_string("data", "start_date")
        .ok_or_else(|| PortoptError::ConfigMissing {
            section: "data".into(),
            key: "start_date".into(),
        })?;
    let start_date = NaiveDate::parse_from_str(&start_str, "%Y-%m-%d").map_err(|_| {
        PortoptError::ConfigInvalid {
            section: "data".into(),
            key: "start_date".into(),
            reason: "invalid date format (expected YYYY-MM-DD)".into(),
        }
    })?;

    let end_date = match adapter.get_string("data", "end_date") {
        Some(end_str) => NaiveDate::parse_from_str(&end_str, "%Y-%m-%d").map_err(|_| {
            PortoptError::ConfigInvalid {
                section: "data".into(),
                key: "end_date".into(),
                reason: "invalid date format (expected YYYY-MM-DD)".into(),
            }
        })?,
        None => chrono::Local::now().date_naive(),
    };

    if end_date < start_date {
        return Err(PortoptError::ConfigInvalid {
            section: "data".into(),
            key: "end_date".into(),
            reason: "end_date is before start_date".into(),
        });
    }

    Ok((start_date, end_date))
}

pub fn resolve_symbols(
    symbols_override: Option<&str>,
    adapter: &dyn ConfigPort,
) -> Result<Vec<String>, PortoptError> {
    let raw = match symbols_override {
        Some(s) => s.to_string(),
        None => {
            adapter
                .get_string("data", "symbols")
                .ok_or_else(|| PortoptError::ConfigMissing {
                    section: "data".into(),
                    key: "symbols".into(),
                })?
        }
    };

    let symbols = parse_symbols(&raw).map_err(|e| PortoptError::ConfigInvalid {
        section: "data".into(),
        key: "symbols".into(),
        reason: e.to_string(),
    })?;

    if symbols.len() < MIN_INSTRUMENTS {
        return Err(PortoptError::InsufficientData {
            usable: symbols.len(),
            minimum: MIN_INSTRUMENTS,
        });
    }

    Ok(symbols)
}

fn resolve_seed(
    seed_override: Option<u64>,
    adapter: &dyn ConfigPort,
) -> Result<Option<u64>, PortoptError> {
    if seed_override.is_some() {
        return Ok(seed_override);
    }
    match adapter.get_string("simulation", "seed") {
        Some(raw) => {
            let seed = raw.parse::<u64>().map_err(|_| PortoptError::ConfigInvalid {
                section: "simulation".into(),
                key: "seed".into(),
                reason: "must be a non-negative integer".into(),
            })?;
            Ok(Some(seed))
        }
        None => Ok(None),
    }
}

fn data_path(adapter: &dyn ConfigPort) -> Result<PathBuf, PortoptError> {
    adapter
        .get_string("data", "path")
        .map(PathBuf::from)
        .ok_or_else(|| PortoptError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })
}

/// Fetch closes for every requested symbol. A symbol whose fetch fails is
/// left out of the table with a warning; the statistics builder reports it
/// as dropped.
pub fn fetch_price_table(
    data_port: &dyn DataPort,
    symbols: &[String],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> HashMap<String, Vec<ClosePoint>> {
    let mut table = HashMap::new();

    for symbol in symbols {
        match data_port.fetch_closes(symbol, start_date, end_date) {
            Ok(points) => {
                if points.is_empty() {
                    eprintln!("warning: no data for {}", symbol);
                } else {
                    eprintln!("  {}: {} closes [OK]", symbol, points.len());
                }
                table.insert(symbol.clone(), points);
            }
            Err(e) => {
                eprintln!("warning: skipping {} ({})", symbol, e);
            }
        }
    }

    table
}

fn run_simulate(
    config_path: &PathBuf,
    output_path: Option<&PathBuf>,
    symbols_override: Option<&str>,
    samples_override: Option<usize>,
    seed_override: Option<u64>,
) -> ExitCode {
    // Stage 1: Load config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Build simulation config, date range, symbol list
    let sim_config = match build_simulation_config(&adapter, samples_override) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let (start_date, end_date) = match build_date_range(&adapter) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let symbols = match resolve_symbols(symbols_override, &adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let seed = match resolve_seed(seed_override, &adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 3: Fetch price data
    let base_path = match data_path(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let data_port = CsvAdapter::new(base_path);

    eprintln!(
        "Fetching {} symbols, {} to {}...",
        symbols.len(),
        start_date,
        end_date
    );
    let prices = fetch_price_table(&data_port, &symbols, start_date, end_date);

    // Stage 4: Simulate
    eprintln!(
        "Simulating {} candidate portfolios...",
        sim_config.sample_count
    );
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let run = match simulate(&prices, &symbols, &sim_config, &mut rng) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 5: Console summary
    if !run.statistics.dropped.is_empty() {
        eprintln!(
            "warning: no usable data for {}; simulated {} of {} symbols",
            run.statistics.dropped.join(", "),
            run.statistics.symbols.len(),
            symbols.len(),
        );
    }

    let best = run.result.best();
    eprintln!("\n=== Best Allocation ===");
    for (symbol, weight) in run.statistics.symbols.iter().zip(&best.weights) {
        eprintln!("  {}: {:.1}%", symbol, weight * 100.0);
    }

    eprintln!("\n=== Expected Performance ===");
    eprintln!("Annual Return:    {:.1}%", best.expected_return * 100.0);
    eprintln!("Volatility:       {:.1}%", best.volatility * 100.0);
    if let Some(quality) = best.quality_score {
        eprintln!("Quality Score:    {:.2}", quality);
    }

    // Stage 6: Write report
    let output = output_path
        .cloned()
        .unwrap_or_else(|| PathBuf::from("report.typ"));

    let report = match adapter.get_string("report", "template_path") {
        Some(path) => match fs::read_to_string(&path) {
            Ok(template) => TypstReportAdapter::with_template(template),
            Err(e) => {
                eprintln!("error: failed to read template {}: {}", path, e);
                return ExitCode::from(1);
            }
        },
        None => TypstReportAdapter::new(),
    };

    match report.write(&run, &output.display().to_string()) {
        Ok(()) => {
            eprintln!("\nReport written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write report: {e}");
            ExitCode::from(1)
        }
    }
}

fn run_list_symbols(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let base_path = match data_path(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_port = CsvAdapter::new(base_path);
    let symbols = match data_port.list_symbols() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let sim_config = match build_simulation_config(&adapter, None) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let (start_date, end_date) = match build_date_range(&adapter) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let symbols = match resolve_symbols(None, &adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nSymbols:    {}", symbols.join(", "));
    eprintln!("Date range: {} to {}", start_date, end_date);
    eprintln!("Samples:    {}", sim_config.sample_count);
    eprintln!("Factor:     {:.0}", sim_config.annualization_factor);

    eprintln!("\nConfig validated successfully");
    ExitCode::SUCCESS
}
