//! # Validate Subcommand
//!
//! Validates the assembled parameter set against the pipeline schema.
//! Diagnostics are logged by the validator; `--json` additionally prints
//! them as a JSON document on stdout for scripting.

use anyhow::{Context, Result};
use clap::Args;
use nfp_core::ValidatorConfig;
use nfp_schema::ParameterValidator;

use crate::PipelineArgs;

/// Arguments for the `nfp validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Print errors and warnings as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when the parameters are valid (warnings allowed),
/// 1 when any error was reported.
pub fn run_validate(args: &ValidateArgs, config: &ValidatorConfig) -> Result<u8> {
    let params = args.pipeline.load_params()?;
    let schema_path = args.pipeline.schema_path();

    let result = ParameterValidator::new(config.clone())
        .validate_parameters(&params, &schema_path)
        .with_context(|| format!("failed to validate against {}", schema_path.display()))?;

    if args.json {
        let report = serde_json::json!({
            "valid": result.is_valid(),
            "errors": result.errors,
            "warnings": result.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if result.is_valid() {
        println!(
            "Parameters valid: {} supplied, {} warning(s)",
            params.len(),
            result.warnings.len()
        );
    }

    Ok(if result.is_valid() { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    const SCHEMA: &str = r##"{
        "definitions": {
            "io": {
                "title": "Input/output options",
                "required": ["input"],
                "properties": {
                    "input": {"type": "string"},
                    "max_cpus": {"type": "integer"}
                }
            }
        },
        "allOf": [{"$ref": "#/definitions/io"}]
    }"##;

    fn args(base_dir: &Path, overrides: &[&str]) -> ValidateArgs {
        ValidateArgs {
            pipeline: PipelineArgs {
                base_dir: base_dir.to_path_buf(),
                schema: PathBuf::from("nextflow_schema.json"),
                params_file: None,
                overrides: overrides.iter().map(|s| s.to_string()).collect(),
            },
            json: false,
        }
    }

    #[test]
    fn test_valid_parameters_exit_zero() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("nextflow_schema.json"), SCHEMA).unwrap();
        let code = run_validate(&args(dir.path(), &["input=a.csv", "max_cpus=4"]), &ValidatorConfig::default()).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_warnings_alone_exit_zero() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("nextflow_schema.json"), SCHEMA).unwrap();
        let code = run_validate(&args(dir.path(), &["input=a.csv", "inptu=b.csv"]), &ValidatorConfig::default()).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_invalid_parameters_exit_one() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("nextflow_schema.json"), SCHEMA).unwrap();
        let code = run_validate(&args(dir.path(), &["max_cpus=many"]), &ValidatorConfig::default()).unwrap();
        assert_eq!(code, 1);

        let strict = ValidatorConfig {
            fail_unrecognised_params: true,
            ..ValidatorConfig::default()
        };
        let code = run_validate(&args(dir.path(), &["input=a.csv", "inptu=b.csv"]), &strict).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn test_missing_schema_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_validate(&args(dir.path(), &[]), &ValidatorConfig::default()).unwrap_err();
        assert!(err.to_string().contains("failed to validate against"));
    }
}
