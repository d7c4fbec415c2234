//! # Structured Document Loading
//!
//! Parameter files, configuration files and run-context files may be
//! written in YAML or JSON. The format is chosen from the file extension:
//! `.json` is parsed as JSON, anything else as YAML (a JSON superset for
//! the documents this crate reads).

use std::path::Path;

use serde::de::DeserializeOwned;

/// Read and deserialize a YAML or JSON document.
///
/// Returns a human-readable reason on failure; callers wrap it into the
/// error variant appropriate to the document's role.
pub fn read_structured<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("cannot read file: {e}"))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        "json" => serde_json::from_str(&content).map_err(|e| format!("invalid JSON: {e}")),
        _ => serde_yaml::from_str(&content).map_err(|e| format!("invalid YAML: {e}")),
    }
}
