//! # Parameter Validation
//!
//! The validation entry point. One call processes one parameter set to
//! completion:
//!
//! 1. Overlay the control parameters onto the configuration.
//! 2. Classify every supplied name (reserved options, unrecognised names).
//! 3. Prune ignored parameters from the schema and clean the parameter set.
//! 4. Run the structural validator with the selected strategy.
//! 5. Translate any violation tree into parameter-scoped errors.
//!
//! Diagnostics are returned as a [`ValidationResult`]; nothing is retained
//! between calls, so one [`ParameterValidator`] can check any number of
//! independent parameter sets. The call only fails when the schema itself
//! is unusable.

use std::path::Path;

use nfp_core::{ParameterSet, ValidatorConfig};
use serde_json::Value;

use crate::classify::ParameterClassifier;
use crate::document::{load_schema_document, prune_ignored};
use crate::engine::{JsonSchemaEngine, StructuralValidator, ValidationOutcome};
use crate::error::SchemaError;
use crate::model::SchemaModel;
use crate::result::ValidationResult;
use crate::translate::ViolationTranslator;

/// Validates parameter sets against a pipeline schema.
#[derive(Debug, Clone, Default)]
pub struct ParameterValidator<E = JsonSchemaEngine> {
    engine: E,
    config: ValidatorConfig,
}

impl ParameterValidator<JsonSchemaEngine> {
    /// Create a validator backed by the `jsonschema` engine.
    pub fn new(config: ValidatorConfig) -> Self {
        Self::with_engine(JsonSchemaEngine, config)
    }
}

impl<E: StructuralValidator> ParameterValidator<E> {
    /// Create a validator backed by a custom structural engine.
    pub fn with_engine(engine: E, config: ValidatorConfig) -> Self {
        Self { engine, config }
    }

    /// The base configuration, before control parameters are applied.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate `params` against the schema file at `schema_path`.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the schema cannot be loaded or
    /// compiled. Invalid or unrecognised parameters are never errors; they
    /// are reported in the returned [`ValidationResult`].
    pub fn validate_parameters(
        &self,
        params: &ParameterSet,
        schema_path: &Path,
    ) -> Result<ValidationResult, SchemaError> {
        let schema = load_schema_document(schema_path)?;
        tracing::debug!(schema = %schema_path.display(), params = params.len(), "validating pipeline parameters");
        self.validate_against(params, &schema)
    }

    /// Validate `params` against an already parsed schema document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::SchemaCompileError`] if the structural
    /// validator rejects the schema.
    pub fn validate_against(
        &self,
        params: &ParameterSet,
        schema: &Value,
    ) -> Result<ValidationResult, SchemaError> {
        let config = self.config.clone().with_control_params(params);
        let model = SchemaModel::from_document(schema);
        let ignored = config.ignored_params();

        let mut result = ParameterClassifier::new(&model, ignored.clone(), config.fail_unrecognised_params)
            .check(params);

        if result.has_warnings() {
            tracing::warn!("{}", result.warnings_report());
        }

        let pruned = prune_ignored(schema, &ignored);
        let document = Value::Object(params.cleaned());

        match self.engine.validate(&pruned, &document, config.mode())? {
            ValidationOutcome::Valid => {
                tracing::debug!("parameters conform to the schema");
            }
            ValidationOutcome::Invalid(tree) => {
                let enums = model.enums();
                let translator =
                    ViolationTranslator::new(&document, &enums).with_limit(config.enum_display_limit);
                result.merge(ValidationResult {
                    errors: translator.translate(&tree),
                    warnings: Vec::new(),
                });
            }
        }

        if result.has_errors() {
            tracing::error!("{}", result.errors_report());
        }

        Ok(result)
    }
}
