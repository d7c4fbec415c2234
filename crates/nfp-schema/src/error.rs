//! # Schema Errors
//!
//! Configuration errors: the schema document itself is unusable. These are
//! the only failures that abort a validation call. Problems with the
//! supplied parameters are reported as diagnostics instead.

use thiserror::Error;

/// Error loading or compiling a parameter schema.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema file could not be read or is not valid JSON.
    #[error("failed to load schema {path}: {reason}")]
    SchemaLoadError {
        /// Path to the schema file.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// The schema parsed, but its top level is not a JSON object.
    #[error("schema {path} must be a JSON object")]
    NotAnObject {
        /// Path to the schema file.
        path: String,
    },

    /// The structural validator rejected the schema itself.
    #[error("failed to compile schema: {reason}")]
    SchemaCompileError {
        /// Human-readable reason.
        reason: String,
    },
}
