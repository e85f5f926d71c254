use clap::Parser;
use portopt::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
