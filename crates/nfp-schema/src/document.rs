//! # Schema Documents
//!
//! Locating and reading the raw schema document, and producing the pruned
//! copy handed to the structural validator.
//!
//! The document layout is the grouped pipeline schema:
//!
//! ```text
//! definitions
//!   <group key>
//!     title
//!     required: [name, ...]
//!     properties
//!       <name>: { type, description, default, enum, hidden }
//! properties                     <- ungrouped parameters, same shape
//! required: [name, ...]
//! allOf: [{ "$ref": "#/definitions/<group key>" }, ...]
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::SchemaError;

/// Schema filename looked up in the pipeline directory when none is given.
pub const DEFAULT_SCHEMA_FILENAME: &str = "nextflow_schema.json";

/// Resolve a schema location: absolute paths are used as given, relative
/// ones are taken from the pipeline base directory.
pub fn resolve_schema_path(base_dir: &Path, schema: &Path) -> PathBuf {
    if schema.is_absolute() {
        schema.to_path_buf()
    } else {
        base_dir.join(schema)
    }
}

/// Read a schema document and check that it is a JSON object.
///
/// # Errors
///
/// Returns [`SchemaError::SchemaLoadError`] if the file cannot be read or
/// parsed, and [`SchemaError::NotAnObject`] if its top level is not an
/// object.
pub fn load_schema_document(path: &Path) -> Result<Value, SchemaError> {
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::SchemaLoadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let schema: Value = serde_json::from_str(&content).map_err(|e| SchemaError::SchemaLoadError {
        path: path.display().to_string(),
        reason: format!("invalid JSON: {e}"),
    })?;

    if !schema.is_object() {
        return Err(SchemaError::NotAnObject {
            path: path.display().to_string(),
        });
    }
    Ok(schema)
}

/// Copy `schema` with every ignored parameter removed.
///
/// Ignored names are dropped from each group's `properties` and
/// `required`, and from the top-level `properties` and `required`. A
/// `required` list left empty is removed entirely.
pub fn prune_ignored(schema: &Value, ignored: &BTreeSet<String>) -> Value {
    let mut pruned = schema.clone();
    if ignored.is_empty() {
        return pruned;
    }

    if let Some(groups) = pruned.get_mut("definitions").and_then(Value::as_object_mut) {
        for group in groups.values_mut() {
            prune_section(group, ignored);
        }
    }
    prune_section(&mut pruned, ignored);
    pruned
}

fn prune_section(section: &mut Value, ignored: &BTreeSet<String>) {
    let Some(section) = section.as_object_mut() else {
        return;
    };

    if let Some(properties) = section.get_mut("properties").and_then(Value::as_object_mut) {
        properties.retain(|name, _| !ignored.contains(name));
    }

    let emptied = match section.get_mut("required").and_then(Value::as_array_mut) {
        Some(required) => {
            required.retain(|name| !name.as_str().is_some_and(|n| ignored.contains(n)));
            required.is_empty()
        }
        None => false,
    };
    if emptied {
        section.remove("required");
    }
}
