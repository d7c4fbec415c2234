//! # nfp-schema — Pipeline Parameter Validation
//!
//! Validates a pipeline's supplied parameters against its
//! `nextflow_schema.json` and reports the problems as flat,
//! parameter-scoped messages.
//!
//! ## Validation (`validate`)
//!
//! [`ParameterValidator::validate_parameters`] is the entry point. It runs
//! the [`classify`] pass (reserved host options, unrecognised names), prunes
//! ignored parameters from the schema, hands the cleaned parameter document
//! to the [`engine`], and translates the resulting violation tree with
//! [`translate`]. All diagnostics come back in a [`ValidationResult`].
//!
//! ## Schema Model (`model`)
//!
//! [`SchemaModel`] is the read-only view of the schema used for lookups:
//! parameter groups in declaration order, per-parameter type, description,
//! default, enum choices and hidden flag. The help and summary renderers
//! consume the same model.
//!
//! ## Crate Policy
//!
//! - Depends only on `nfp-core` internally.
//! - Validation never mutates the caller's parameter set or schema.
//! - `$ref` resolution is local: schemas must not reach the network.

pub mod classify;
pub mod document;
pub mod engine;
pub mod error;
pub mod model;
pub mod result;
pub mod translate;
pub mod validate;
pub mod violation;

pub use classify::{Classification, ParameterClassifier};
pub use document::{load_schema_document, prune_ignored, resolve_schema_path, DEFAULT_SCHEMA_FILENAME};
pub use engine::{JsonSchemaEngine, StructuralValidator, ValidationOutcome};
pub use error::SchemaError;
pub use model::{ParamGroup, PropertySpec, SchemaModel};
pub use result::ValidationResult;
pub use translate::ViolationTranslator;
pub use validate::ParameterValidator;
pub use violation::{Violation, ViolationTree};
