//! # Control Parameters and Validator Configuration
//!
//! The validator's behaviour is steered by reserved keys carried in the
//! parameter set itself, layered over an optional configuration file:
//!
//! | Key | Effect |
//! |---|---|
//! | `validationSchemaIgnoreParams` | comma-separated names excluded from checking |
//! | `validationFailUnrecognisedParams` | unrecognized names become errors instead of warnings |
//! | `validationLenientMode` | tolerate primitive type mismatches (`"4"` for an integer) |
//! | `validationShowHiddenParams` | include `hidden` parameters in help output |
//! | `monochrome_logs` | disable ANSI colours in rendered output |
//!
//! The host tool's own command-line options are listed in
//! [`NEXTFLOW_OPTIONS`]. Supplying one of them as a double-dash pipeline
//! parameter is always an error.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

use crate::document::read_structured;
use crate::error::ParamError;
use crate::value::ParameterSet;

/// Comma-separated list of parameter names to exclude from validation.
pub const IGNORE_PARAMS_KEY: &str = "validationSchemaIgnoreParams";
/// Route unrecognized parameters to errors instead of warnings.
pub const FAIL_UNRECOGNISED_KEY: &str = "validationFailUnrecognisedParams";
/// Select lenient primitive type matching.
pub const LENIENT_MODE_KEY: &str = "validationLenientMode";
/// Show hidden parameters in help output.
pub const SHOW_HIDDEN_KEY: &str = "validationShowHiddenParams";
/// Disable ANSI colours.
pub const MONOCHROME_KEY: &str = "monochrome_logs";

/// Every reserved control key. The classifier treats these as expected, so
/// steering the validator never triggers a warning, but a schema that
/// declares one still has its type checked.
pub const CONTROL_PARAMS: [&str; 5] = [
    IGNORE_PARAMS_KEY,
    FAIL_UNRECOGNISED_KEY,
    LENIENT_MODE_KEY,
    SHOW_HIDDEN_KEY,
    MONOCHROME_KEY,
];

/// Parameter names that are always expected, whether or not the schema
/// declares them.
pub const BUILTIN_EXPECTED_PARAMS: [&str; 2] = ["help", "nf_test_output"];

/// Short and long option spellings of the host workflow tool.
pub const NEXTFLOW_OPTIONS: &[&str] = &[
    // Options for the base command
    "bg",
    "c",
    "C",
    "config",
    "d",
    "D",
    "dockerize",
    "h",
    "log",
    "q",
    "quiet",
    "syslog",
    "v",
    // Options for the `run` command
    "ansi",
    "ansi-log",
    "bucket-dir",
    "cache",
    "dsl2",
    "dump-channels",
    "dump-hashes",
    "E",
    "entry",
    "latest",
    "lib",
    "main-script",
    "N",
    "name",
    "offline",
    "params-file",
    "pi",
    "plugins",
    "poll-interval",
    "pool-size",
    "profile",
    "ps",
    "qs",
    "queue-size",
    "r",
    "resume",
    "revision",
    "stdin",
    "stub",
    "stub-run",
    "test",
    "w",
    "with-charliecloud",
    "with-conda",
    "with-dag",
    "with-docker",
    "with-mpi",
    "with-notification",
    "with-podman",
    "with-report",
    "with-singularity",
    "with-timeline",
    "with-tower",
    "with-trace",
    "with-weblog",
    "without-docker",
    "without-podman",
    "work-dir",
];

/// Returns true if `name` is an option of the host workflow tool.
pub fn is_reserved_option(name: &str) -> bool {
    NEXTFLOW_OPTIONS.contains(&name)
}

/// Primitive type matching strategy handed to the structural validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Exact JSON type matching.
    #[default]
    Strict,
    /// Accept values convertible to the declared primitive type.
    Lenient,
}

/// Validator and renderer configuration.
///
/// Every field has a default, so an empty configuration file is valid.
/// Control parameters in the parameter set take precedence; see
/// [`ValidatorConfig::with_control_params`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Explicitly ignored parameter names.
    pub ignore_params: Vec<String>,
    /// Report unrecognized parameters as errors.
    pub fail_unrecognised_params: bool,
    /// Use lenient primitive type matching.
    pub lenient_mode: bool,
    /// Show hidden parameters in help output.
    pub show_hidden_params: bool,
    /// Disable ANSI colours.
    pub monochrome_logs: bool,
    /// Maximum enum choices listed in an invalid-choice message.
    pub enum_display_limit: usize,
    /// Total help line width used for description wrapping.
    pub help_line_width: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            ignore_params: Vec::new(),
            fail_unrecognised_params: false,
            lenient_mode: false,
            show_hidden_params: false,
            monochrome_logs: false,
            enum_display_limit: 5,
            help_line_width: 160,
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from a YAML or JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ParamError> {
        read_structured(path).map_err(|reason| ParamError::ConfigLoad {
            path: path.display().to_string(),
            reason,
        })
    }

    /// Overlay the reserved control parameters found in `params`.
    ///
    /// A control key that is present replaces the configured value; an
    /// absent key leaves it unchanged.
    pub fn with_control_params(mut self, params: &ParameterSet) -> Self {
        if let Some(value) = params.get(IGNORE_PARAMS_KEY) {
            self.ignore_params = if value.is_truthy() {
                split_list(&value.to_string())
            } else {
                Vec::new()
            };
        }
        if params.contains(FAIL_UNRECOGNISED_KEY) {
            self.fail_unrecognised_params = control_flag(params, FAIL_UNRECOGNISED_KEY);
        }
        if params.contains(LENIENT_MODE_KEY) {
            self.lenient_mode = control_flag(params, LENIENT_MODE_KEY);
        }
        if params.contains(SHOW_HIDDEN_KEY) {
            self.show_hidden_params = control_flag(params, SHOW_HIDDEN_KEY);
        }
        if params.contains(MONOCHROME_KEY) {
            self.monochrome_logs = control_flag(params, MONOCHROME_KEY);
        }
        self
    }

    /// The selected validation strategy.
    pub fn mode(&self) -> ValidationMode {
        if self.lenient_mode {
            ValidationMode::Lenient
        } else {
            ValidationMode::Strict
        }
    }

    /// Explicit ignores plus the ignore-list key itself.
    pub fn ignored_params(&self) -> BTreeSet<String> {
        self.ignore_params
            .iter()
            .cloned()
            .chain(std::iter::once(IGNORE_PARAMS_KEY.to_string()))
            .collect()
    }
}

/// A control toggle is set when its value is truthy and not the literal
/// string `"false"`.
fn control_flag(params: &ParameterSet, key: &str) -> bool {
    params
        .get(key)
        .is_some_and(|v| v.is_truthy() && !v.as_str().is_some_and(|s| s.eq_ignore_ascii_case("false")))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reserved_options() {
        assert!(is_reserved_option("resume"));
        assert!(is_reserved_option("profile"));
        assert!(is_reserved_option("with-docker"));
        assert!(!is_reserved_option("outdir"));
        assert!(!is_reserved_option("Resume"));
    }

    #[test]
    fn test_defaults() {
        let cfg = ValidatorConfig::default();
        assert_eq!(cfg.enum_display_limit, 5);
        assert_eq!(cfg.help_line_width, 160);
        assert_eq!(cfg.mode(), ValidationMode::Strict);
    }

    #[test]
    fn test_control_params_override_config() {
        let mut params = ParameterSet::new();
        params.insert(IGNORE_PARAMS_KEY, "genomes, igenomes_base,");
        params.insert(FAIL_UNRECOGNISED_KEY, true);
        params.insert(LENIENT_MODE_KEY, "true");
        params.insert(MONOCHROME_KEY, "false");

        let cfg = ValidatorConfig {
            monochrome_logs: true,
            ..ValidatorConfig::default()
        }
        .with_control_params(&params);

        assert_eq!(cfg.ignore_params, vec!["genomes", "igenomes_base"]);
        assert!(cfg.fail_unrecognised_params);
        assert_eq!(cfg.mode(), ValidationMode::Lenient);
        assert!(!cfg.monochrome_logs);
        assert!(!cfg.show_hidden_params);
    }

    #[test]
    fn test_absent_control_params_keep_config() {
        let cfg = ValidatorConfig {
            show_hidden_params: true,
            ignore_params: vec!["genomes".into()],
            ..ValidatorConfig::default()
        }
        .with_control_params(&ParameterSet::new());
        assert!(cfg.show_hidden_params);
        assert_eq!(cfg.ignore_params, vec!["genomes"]);
    }

    #[test]
    fn test_ignored_params_add_only_the_ignore_key() {
        let cfg = ValidatorConfig {
            ignore_params: vec!["genomes".into()],
            ..ValidatorConfig::default()
        };
        let ignored = cfg.ignored_params();
        assert_eq!(
            ignored.into_iter().collect::<Vec<_>>(),
            vec!["genomes".to_string(), IGNORE_PARAMS_KEY.to_string()]
        );
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "fail_unrecognised_params: true\nenum_display_limit: 3").unwrap();
        let cfg = ValidatorConfig::from_file(file.path()).unwrap();
        assert!(cfg.fail_unrecognised_params);
        assert_eq!(cfg.enum_display_limit, 3);
        assert_eq!(cfg.help_line_width, 160);
    }

    #[test]
    fn test_from_file_rejects_unknown_keys() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "lenient: true").unwrap();
        let err = ValidatorConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ParamError::ConfigLoad { .. }));
    }
}
