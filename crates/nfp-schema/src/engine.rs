//! # Structural Validation Engine
//!
//! The boundary to the structural JSON Schema validator. The rest of the
//! crate only chooses the validation strategy and consumes the violation
//! tree; type, format and `$ref` semantics belong to the engine.
//!
//! [`JsonSchemaEngine`] is backed by the `jsonschema` crate. It compiles
//! the (already pruned) schema as Draft 7, which is the draft pipeline
//! schemas are written against, and folds the flat error list into a
//! [`Violation`] tree:
//!
//! - no errors: [`ValidationOutcome::Valid`];
//! - one error: that leaf is the whole tree;
//! - several errors: a `#` root summarising them, with errors raised under
//!   the same `allOf` branch (one parameter group) grouped beneath an
//!   intermediate summary node.
//!
//! Missing required properties are reported as
//! `required key [NAME] not found` at the root pointer.
//!
//! ## Lenient mode
//!
//! `jsonschema` has no lenient primitive strategy, so lenient mode is a
//! coercion pass over the document before validation: strings parseable as
//! a declared `integer`, `number` or `boolean` are converted, and numbers
//! or booleans declared `string` are rendered as text.

use std::borrow::Cow;

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, Retrieve, Uri, ValidationError};
use nfp_core::value::display_json;
use nfp_core::ValidationMode;
use serde_json::{Map, Number, Value};

use crate::error::SchemaError;
use crate::model::SchemaModel;
use crate::violation::{Violation, ROOT_POINTER};

/// Result of a structural validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The document conforms to the schema.
    Valid,
    /// The document violates the schema.
    Invalid(Violation),
}

/// A structural JSON Schema validator.
pub trait StructuralValidator {
    /// Validate `document` against `schema` using the given strategy.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::SchemaCompileError`] if the schema itself is
    /// unusable. A non-conforming document is not an error.
    fn validate(
        &self,
        schema: &Value,
        document: &Value,
        mode: ValidationMode,
    ) -> Result<ValidationOutcome, SchemaError>;
}

/// Refuses every external `$ref`. Pipeline schemas reference only their
/// own `definitions`, and validation must never reach the network.
struct LocalOnlyRetriever;

impl Retrieve for LocalOnlyRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("external schema reference not supported: {}", uri.as_str()).into())
    }
}

/// [`StructuralValidator`] backed by the `jsonschema` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaEngine;

impl StructuralValidator for JsonSchemaEngine {
    fn validate(
        &self,
        schema: &Value,
        document: &Value,
        mode: ValidationMode,
    ) -> Result<ValidationOutcome, SchemaError> {
        // The draft is fixed; a `$schema` URI must not trigger a lookup.
        let schema = match schema.get("$schema") {
            Some(_) => {
                let mut owned = schema.clone();
                if let Some(map) = owned.as_object_mut() {
                    map.remove("$schema");
                }
                Cow::Owned(owned)
            }
            None => Cow::Borrowed(schema),
        };

        let validator = jsonschema::options()
            .with_draft(Draft::Draft7)
            .with_retriever(LocalOnlyRetriever)
            .build(&schema)
            .map_err(|e| SchemaError::SchemaCompileError {
                reason: e.to_string(),
            })?;

        let document = match mode {
            ValidationMode::Strict => Cow::Borrowed(document),
            ValidationMode::Lenient => Cow::Owned(coerce_primitives(&SchemaModel::from_document(&schema), document)),
        };

        let errors: Vec<(Option<String>, Violation)> = validator
            .iter_errors(&document)
            .map(|err| (branch_of(&err.schema_path.to_string()), leaf_from_error(&err)))
            .collect();

        tracing::debug!(violations = errors.len(), ?mode, "structural validation finished");

        Ok(match fold_into_tree(errors) {
            Some(tree) => ValidationOutcome::Invalid(tree),
            None => ValidationOutcome::Valid,
        })
    }
}

fn leaf_from_error(err: &ValidationError<'_>) -> Violation {
    let pointer = format!("{ROOT_POINTER}{}", err.instance_path);
    let message = match &err.kind {
        ValidationErrorKind::Required { property } => {
            format!("required key [{}] not found", display_json(property))
        }
        _ => err.to_string(),
    };
    Violation::leaf(pointer, message)
}

/// The schema branch an error was raised under: `allOf/<i>` for a group
/// referenced from `allOf`, `definitions/<key>` when the engine reports the
/// resolved location.
fn branch_of(schema_path: &str) -> Option<String> {
    let mut segments = schema_path.trim_start_matches('/').split('/');
    match (segments.next(), segments.next()) {
        (Some(kind @ ("allOf" | "definitions" | "$defs")), Some(key)) => Some(format!("{kind}/{key}")),
        _ => None,
    }
}

fn fold_into_tree(errors: Vec<(Option<String>, Violation)>) -> Option<Violation> {
    let mut branches: Vec<(Option<String>, Vec<Violation>)> = Vec::new();
    for (branch, leaf) in errors {
        let existing = branch
            .as_ref()
            .and_then(|b| branches.iter().position(|(k, _)| k.as_ref() == Some(b)));
        match existing {
            Some(i) => branches[i].1.push(leaf),
            None => branches.push((branch, vec![leaf])),
        }
    }

    match branches.len() {
        0 => None,
        1 => {
            let (_, mut leaves) = branches.remove(0);
            if leaves.len() == 1 {
                leaves.pop()
            } else {
                Some(Violation::summary(leaves))
            }
        }
        _ => Some(Violation::summary(
            branches
                .into_iter()
                .map(|(_, mut leaves)| match leaves.len() {
                    1 => leaves.remove(0),
                    _ => Violation::summary(leaves),
                })
                .collect(),
        )),
    }
}

/// Convert top-level values towards their declared primitive type.
fn coerce_primitives(model: &SchemaModel, document: &Value) -> Value {
    let Value::Object(map) = document else {
        return document.clone();
    };
    let coerced: Map<String, Value> = map
        .iter()
        .map(|(name, value)| {
            let value = match model.property(name) {
                Some(spec) => coerce_value(&spec.param_type, value),
                None => value.clone(),
            };
            (name.clone(), value)
        })
        .collect();
    Value::Object(coerced)
}

fn coerce_value(declared: &str, value: &Value) -> Value {
    let converted = match (declared, value) {
        ("integer", Value::String(s)) => s.trim().parse::<i64>().ok().map(Value::from),
        ("number", Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .map(Value::from)
                .or_else(|| s.parse::<f64>().ok().and_then(Number::from_f64).map(Value::Number))
        }
        ("boolean", Value::String(s)) if s.eq_ignore_ascii_case("true") => Some(Value::Bool(true)),
        ("boolean", Value::String(s)) if s.eq_ignore_ascii_case("false") => Some(Value::Bool(false)),
        ("string", Value::Number(n)) => Some(Value::String(n.to_string())),
        ("string", Value::Bool(b)) => Some(Value::String(b.to_string())),
        _ => None,
    };
    converted.unwrap_or_else(|| value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::ViolationTree;
    use serde_json::json;

    fn grouped_schema() -> Value {
        json!({
            "$schema": "http://json-schema.org/draft-07/schema",
            "type": "object",
            "definitions": {
                "input_output_options": {
                    "title": "Input/output options",
                    "type": "object",
                    "required": ["input"],
                    "properties": {
                        "input": {"type": "string"},
                        "threads": {"type": "integer"}
                    }
                },
                "alignment_options": {
                    "title": "Alignment options",
                    "type": "object",
                    "properties": {
                        "aligner": {"type": "string", "enum": ["bwa", "bowtie2", "star"]},
                        "skip_qc": {"type": "boolean"},
                        "min_score": {"type": "number"},
                        "genome": {"type": "string"}
                    }
                }
            },
            "allOf": [
                {"$ref": "#/definitions/input_output_options"},
                {"$ref": "#/definitions/alignment_options"}
            ]
        })
    }

    fn validate(document: Value, mode: ValidationMode) -> ValidationOutcome {
        JsonSchemaEngine.validate(&grouped_schema(), &document, mode).unwrap()
    }

    #[test]
    fn test_valid_document() {
        let outcome = validate(json!({"input": "samples.csv", "threads": 4}), ValidationMode::Strict);
        assert_eq!(outcome, ValidationOutcome::Valid);
    }

    #[test]
    fn test_single_missing_required_is_root_leaf() {
        let ValidationOutcome::Invalid(tree) = validate(json!({}), ValidationMode::Strict) else {
            panic!("expected a violation");
        };
        assert!(tree.is_leaf());
        assert_eq!(tree.pointer(), "#");
        assert_eq!(tree.message(), "required key [input] not found");
    }

    #[test]
    fn test_single_type_error_points_at_parameter() {
        let ValidationOutcome::Invalid(tree) =
            validate(json!({"input": "samples.csv", "threads": "four"}), ValidationMode::Strict)
        else {
            panic!("expected a violation");
        };
        assert!(tree.is_leaf());
        assert_eq!(tree.pointer(), "#/threads");
    }

    #[test]
    fn test_multiple_errors_fold_under_root() {
        let ValidationOutcome::Invalid(tree) =
            validate(json!({"threads": "four", "aligner": "hisat"}), ValidationMode::Strict)
        else {
            panic!("expected a violation");
        };
        assert_eq!(tree.pointer(), "#");
        assert_eq!(tree.message(), "#: 3 schema violations found");
        assert_eq!(tree.leaf_count(), 3);

        let mut pointers = Vec::new();
        collect_leaf_pointers(&tree, &mut pointers);
        pointers.sort();
        assert_eq!(pointers, vec!["#", "#/aligner", "#/threads"]);
    }

    fn collect_leaf_pointers(node: &Violation, out: &mut Vec<String>) {
        if node.is_leaf() {
            out.push(node.pointer().to_string());
        }
        for child in node.causes() {
            collect_leaf_pointers(child, out);
        }
    }

    #[test]
    fn test_lenient_mode_accepts_convertible_strings() {
        let document = json!({
            "input": "samples.csv",
            "threads": "8",
            "skip_qc": "TRUE",
            "min_score": "0.5",
            "genome": 38
        });
        assert!(matches!(validate(document.clone(), ValidationMode::Strict), ValidationOutcome::Invalid(_)));
        assert_eq!(validate(document, ValidationMode::Lenient), ValidationOutcome::Valid);
    }

    #[test]
    fn test_lenient_mode_still_rejects_garbage() {
        let outcome = validate(json!({"input": "samples.csv", "threads": "eight"}), ValidationMode::Lenient);
        assert!(matches!(outcome, ValidationOutcome::Invalid(_)));
    }

    #[test]
    fn test_invalid_schema_is_compile_error() {
        let err = JsonSchemaEngine
            .validate(&json!({"type": 12}), &json!({}), ValidationMode::Strict)
            .unwrap_err();
        assert!(matches!(err, SchemaError::SchemaCompileError { .. }));
    }

    #[test]
    fn test_external_ref_is_refused() {
        let schema = json!({"$ref": "https://example.org/remote.schema.json"});
        let result = JsonSchemaEngine.validate(&schema, &json!({}), ValidationMode::Strict);
        assert!(matches!(result, Err(SchemaError::SchemaCompileError { .. })));
    }

    #[test]
    fn test_branch_of() {
        assert_eq!(branch_of("/allOf/0/$ref/required"), Some("allOf/0".to_string()));
        assert_eq!(branch_of("/definitions/io/properties/x/type"), Some("definitions/io".to_string()));
        assert_eq!(branch_of("/properties/x/type"), None);
        assert_eq!(branch_of(""), None);
    }

    #[test]
    fn test_fold_groups_by_branch() {
        let errors = vec![
            (Some("allOf/0".to_string()), Violation::leaf("#", "required key [input] not found")),
            (Some("allOf/1".to_string()), Violation::leaf("#/aligner", "bad")),
            (Some("allOf/0".to_string()), Violation::leaf("#/threads", "bad")),
            (None, Violation::leaf("#", "extra")),
        ];
        let tree = fold_into_tree(errors).unwrap();
        assert_eq!(tree.causes().len(), 3);
        assert_eq!(tree.causes()[0].message(), "#: 2 schema violations found");
        assert_eq!(tree.causes()[0].causes()[1].pointer(), "#/threads");
        assert!(tree.causes()[1].is_leaf());
        assert_eq!(tree.leaf_count(), 4);
    }

    #[test]
    fn test_fold_empty_is_none() {
        assert!(fold_into_tree(Vec::new()).is_none());
    }

    #[test]
    fn test_coerce_value() {
        assert_eq!(coerce_value("integer", &json!("42")), json!(42));
        assert_eq!(coerce_value("integer", &json!("4.2")), json!("4.2"));
        assert_eq!(coerce_value("number", &json!("4.5")), json!(4.5));
        assert_eq!(coerce_value("boolean", &json!("False")), json!(false));
        assert_eq!(coerce_value("boolean", &json!("yes")), json!("yes"));
        assert_eq!(coerce_value("string", &json!(38)), json!("38"));
        assert_eq!(coerce_value("string", &json!(true)), json!("true"));
        assert_eq!(coerce_value("integer", &json!(3)), json!(3));
    }
}
