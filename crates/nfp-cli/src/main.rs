//! # nfp CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nfp_cli::help::{run_help, HelpArgs};
use nfp_cli::load_config;
use nfp_cli::summary::{run_summary, SummaryArgs};
use nfp_cli::validate::{run_validate, ValidateArgs};

/// Pipeline parameter toolkit.
///
/// Validates pipeline parameters against `nextflow_schema.json`, renders
/// grouped parameter help, and summarises parameters that differ from their
/// defaults.
#[derive(Parser, Debug)]
#[command(name = "nfp", version, about, long_about = None, disable_help_subcommand = true)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Path to a validator configuration file (YAML or JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate parameters against the pipeline schema.
    Validate(ValidateArgs),

    /// Print grouped parameter help.
    Help(HelpArgs),

    /// Print the parameters that differ from the pipeline defaults.
    Summary(SummaryArgs),
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

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!("nfp CLI starting");

    let result = load_config(cli.config.as_deref()).and_then(|config| match &cli.command {
        Commands::Validate(args) => run_validate(args, &config),
        Commands::Help(args) => run_help(args, &config),
        Commands::Summary(args) => run_summary(args, &config),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
