//! # nfp-cli — Pipeline Parameter Command-Line Interface
//!
//! Provides the `nfp` binary over the validation and rendering crates.
//!
//! ## Subcommands
//!
//! - `nfp validate` — Validate parameters against the pipeline schema.
//! - `nfp help` — Render grouped parameter help.
//! - `nfp summary` — Summarise parameters that differ from their defaults.
//!
//! Parameters come from a YAML/JSON params file and repeatable `--set`
//! overrides, applied in that order:
//!
//! ```bash
//! nfp validate --base-dir pipelines/demo --params-file params.yaml --set max_cpus=8
//! nfp help --base-dir pipelines/demo --set validationShowHiddenParams=true
//! nfp summary --base-dir pipelines/demo --params-file params.yaml --context run.yaml
//! ```
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handlers delegate to the domain crates and return an exit code.

pub mod help;
pub mod summary;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use nfp_core::{ParameterSet, ValidatorConfig};
use nfp_schema::{resolve_schema_path, DEFAULT_SCHEMA_FILENAME};

/// Pipeline location and parameter sources shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct PipelineArgs {
    /// Pipeline directory; a relative schema path is resolved against it.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub base_dir: PathBuf,

    /// Pipeline schema file.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_SCHEMA_FILENAME)]
    pub schema: PathBuf,

    /// YAML or JSON file of pipeline parameters.
    #[arg(long, value_name = "FILE")]
    pub params_file: Option<PathBuf>,

    /// Parameter override. Repeatable; applied after the params file.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,
}

impl PipelineArgs {
    /// The schema location after resolution against the pipeline directory.
    pub fn schema_path(&self) -> PathBuf {
        resolve_schema_path(&self.base_dir, &self.schema)
    }

    /// Assemble the live parameter set.
    pub fn load_params(&self) -> Result<ParameterSet> {
        let mut params = match &self.params_file {
            Some(path) => ParameterSet::from_file(path)
                .with_context(|| format!("failed to load parameters from {}", path.display()))?,
            None => ParameterSet::new(),
        };
        for raw in &self.overrides {
            params
                .apply_override(raw)
                .with_context(|| format!("invalid --set value {raw:?}"))?;
        }
        tracing::debug!(count = params.len(), "assembled parameter set");
        Ok(params)
    }
}

/// Load the validator configuration, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<ValidatorConfig> {
    match path {
        Some(path) => ValidatorConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => Ok(ValidatorConfig::default()),
    }
}
