//! # Error Types
//!
//! Errors raised while assembling inputs: parameter files, command-line
//! overrides, configuration files and run-context files.
//!
//! Problems with the *contents* of a parameter set (unknown names, wrong
//! types, missing required values) are never errors at this level. They are
//! reported as diagnostics by the validator.

use thiserror::Error;

/// Error while loading or assembling validation inputs.
#[derive(Error, Debug)]
pub enum ParamError {
    /// A parameter file could not be read or parsed.
    #[error("failed to load parameters from {path}: {reason}")]
    ParamsLoad {
        /// Path to the parameter file.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// A parameter document parsed, but its top level is not a mapping.
    #[error("parameters in {path} must be a mapping of name to value")]
    NotAMapping {
        /// Path to the offending document.
        path: String,
    },

    /// A `key=value` override was malformed.
    #[error("invalid parameter override '{0}': expected KEY=VALUE")]
    InvalidOverride(String),

    /// A configuration or run-context file could not be read or parsed.
    #[error("failed to load configuration from {path}: {reason}")]
    ConfigLoad {
        /// Path to the configuration file.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },
}
