//! # Summary Subcommand
//!
//! Prints the parameters that differ from the pipeline defaults. The run
//! context comes from `--context` when given, otherwise it is derived from
//! the current process with the pipeline directory as project directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use nfp_core::{RunContext, ValidatorConfig};
use nfp_render::params_summary_log;

use crate::PipelineArgs;

/// Arguments for the `nfp summary` subcommand.
#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// YAML or JSON run context (runName, workDir, projectDir, ...).
    #[arg(long, value_name = "FILE")]
    pub context: Option<PathBuf>,
}

/// Execute the summary subcommand.
pub fn run_summary(args: &SummaryArgs, config: &ValidatorConfig) -> Result<u8> {
    let params = args.pipeline.load_params()?;
    let ctx = match &args.context {
        Some(path) => RunContext::from_file(path)
            .with_context(|| format!("failed to load run context from {}", path.display()))?,
        None => RunContext::current(args.pipeline.base_dir.clone()),
    };
    println!(
        "{}",
        params_summary_log(&params, &args.pipeline.schema_path(), &ctx, config)
    );
    Ok(0)
}
