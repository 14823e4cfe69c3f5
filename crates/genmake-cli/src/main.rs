//! arduino-genmakefile CLI
//!
//! Generates a Makefile, and optionally a qmake project, for an Arduino
//! sketch from layered YAML configuration files.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use genmake_core::GeneratedHeader;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir()?;
    let header = GeneratedHeader::from_args(std::env::args());
    commands::run_generate(&cwd, &cli, &header)
}

/// Library warnings are reported by the command itself, so logging stays
/// quiet unless asked for with `--verbose` or `RUST_LOG`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
    tracing::debug!("Verbose mode enabled");
}
