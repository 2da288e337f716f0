//! # spectab CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use spectab_cli::build::{run_build, BuildArgs};
use spectab_cli::config::DEFAULT_CONFIG_FILE;
use spectab_cli::nearest::{run_nearest, NearestArgs};
use spectab_cli::query::{run_query, QueryArgs};
use spectab_cli::stitch::{run_stitch, StitchArgs};

/// spectab: radio spectrum allocation tables
///
/// Builds per-jurisdiction and composite allocation tables from scraped table
/// cells and footnote rules, then answers range, nearest-match and stitch
/// queries against them.
#[derive(Parser, Debug)]
#[command(name = "spectab", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the pipeline configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the database and summarise every table and view.
    Build(BuildArgs),

    /// Bands at a frequency or in a range.
    Query(QueryArgs),

    /// Closest matching band above or below a frequency.
    Nearest(NearestArgs),

    /// Contiguous runs of matching bands, combined.
    Stitch(StitchArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = match cli.config {
        Some(path) => path,
        None => match find_config() {
            Some(path) => path,
            None => {
                tracing::error!("no --config given and no {DEFAULT_CONFIG_FILE} found");
                return ExitCode::from(2);
            }
        },
    };

    tracing::debug!(config = %config.display(), "resolved pipeline configuration");

    let result = match cli.command {
        Commands::Build(args) => run_build(&args, &config),
        Commands::Query(args) => run_query(&args, &config),
        Commands::Nearest(args) => run_nearest(&args, &config),
        Commands::Stitch(args) => run_stitch(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

/// Walk up from the current directory looking for the default config file.
fn find_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut dir = cwd.as_path();
    loop {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}
