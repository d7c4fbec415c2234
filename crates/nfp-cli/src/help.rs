//! # Help Subcommand

use anyhow::Result;
use clap::Args;
use nfp_core::ValidatorConfig;
use nfp_render::params_help;

use crate::PipelineArgs;

/// Invocation shown under "Typical pipeline command:" when none is given.
pub const DEFAULT_COMMAND: &str = "nextflow run <pipeline> --input samplesheet.csv --outdir <OUTDIR> -profile docker";

/// Arguments for the `nfp help` subcommand.
#[derive(Args, Debug)]
pub struct HelpArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Typical command line printed above the parameter list.
    #[arg(long, default_value = DEFAULT_COMMAND)]
    pub command: String,
}

/// Execute the help subcommand. Always exits 0; an unreadable schema
/// renders an empty parameter list.
pub fn run_help(args: &HelpArgs, config: &ValidatorConfig) -> Result<u8> {
    let params = args.pipeline.load_params()?;
    println!(
        "{}",
        params_help(&args.pipeline.schema_path(), &params, &args.command, config)
    );
    Ok(0)
}
