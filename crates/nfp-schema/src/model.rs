//! # Schema Model
//!
//! A structured, read-only view of a pipeline schema document: parameter
//! groups in declaration order, each mapping parameter names to their
//! [`PropertySpec`], plus the ungrouped top-level parameters.
//!
//! The model is the validation vocabulary. A parameter name belongs to at
//! most one group or to the ungrouped set; a name declared twice keeps its
//! first declaration.
//!
//! Loading never fails hard. A document that cannot be read yields an empty
//! model and a logged warning, which degrades help and summary output but
//! leaves validation to report the underlying configuration error.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use indexmap::IndexMap;
use nfp_core::value::display_json;
use serde_json::Value;

use crate::document::load_schema_document;

/// Display title for parameters declared outside any group.
pub const UNGROUPED_TITLE: &str = "Other parameters";

/// Declared metadata of a single parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySpec {
    /// Declared JSON type (`string`, `integer`, ...). Multiple types are
    /// joined with commas; an undeclared type is empty.
    pub param_type: String,
    /// Human-readable description.
    pub description: String,
    /// Declared default, rendered as text.
    pub default: Option<String>,
    /// Declared enum choices, rendered as text, in declaration order.
    pub enum_values: Option<Vec<String>>,
    /// Hidden from help output unless explicitly requested.
    pub hidden: bool,
}

impl PropertySpec {
    fn from_value(value: &Value) -> Self {
        let param_type = match value.get("type") {
            Some(Value::String(t)) => t.clone(),
            Some(Value::Array(types)) => types
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(","),
            _ => String::new(),
        };

        Self {
            param_type,
            description: value
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            default: value.get("default").filter(|v| !v.is_null()).map(display_json),
            enum_values: value
                .get("enum")
                .and_then(Value::as_array)
                .map(|choices| choices.iter().map(display_json).collect()),
            hidden: value.get("hidden").and_then(Value::as_bool).unwrap_or(false),
        }
    }
}

/// A named group of parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamGroup {
    /// Key of the group under `definitions`.
    pub key: String,
    /// Display title; falls back to the key.
    pub title: String,
    /// Parameters in declaration order.
    pub properties: IndexMap<String, PropertySpec>,
    /// Names the group declares as required.
    pub required: Vec<String>,
}

/// Structured view of a schema document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaModel {
    groups: Vec<ParamGroup>,
    ungrouped: IndexMap<String, PropertySpec>,
}

impl SchemaModel {
    /// Build the model from a parsed schema document.
    ///
    /// Anything that is not shaped like a grouped parameter schema is
    /// skipped rather than rejected.
    pub fn from_document(document: &Value) -> Self {
        let mut seen = HashSet::new();
        let mut groups = Vec::new();

        if let Some(definitions) = document.get("definitions").and_then(Value::as_object) {
            for (key, group) in definitions {
                let title = group
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or(key.as_str())
                    .to_string();
                let required = group
                    .get("required")
                    .and_then(Value::as_array)
                    .map(|names| names.iter().filter_map(Value::as_str).map(str::to_string).collect())
                    .unwrap_or_default();

                groups.push(ParamGroup {
                    key: key.clone(),
                    title,
                    properties: collect_properties(group.get("properties"), &mut seen),
                    required,
                });
            }
        }

        let ungrouped = collect_properties(document.get("properties"), &mut seen);

        Self { groups, ungrouped }
    }

    /// Load the model from a schema file, degrading to an empty model when
    /// the file cannot be used.
    pub fn load(path: &Path) -> Self {
        match load_schema_document(path) {
            Ok(document) => Self::from_document(&document),
            Err(e) => {
                tracing::warn!(error = %e, "could not read parameter settings from schema; using an empty model");
                Self::default()
            }
        }
    }

    /// Parameter groups in declaration order.
    pub fn groups(&self) -> &[ParamGroup] {
        &self.groups
    }

    /// Parameters declared outside any group.
    pub fn ungrouped(&self) -> &IndexMap<String, PropertySpec> {
        &self.ungrouped
    }

    /// Look up a parameter by name, grouped or not.
    pub fn property(&self, name: &str) -> Option<&PropertySpec> {
        self.groups
            .iter()
            .find_map(|g| g.properties.get(name))
            .or_else(|| self.ungrouped.get(name))
    }

    /// All declared parameter names, grouped first, in declaration order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|g| g.properties.keys())
            .chain(self.ungrouped.keys())
            .map(String::as_str)
    }

    /// Declared enum choices keyed by parameter name.
    pub fn enums(&self) -> HashMap<String, Vec<String>> {
        self.groups
            .iter()
            .flat_map(|g| g.properties.iter())
            .chain(self.ungrouped.iter())
            .filter_map(|(name, spec)| spec.enum_values.clone().map(|choices| (name.clone(), choices)))
            .collect()
    }

    /// Groups as displayed by help and summary output: declared groups by
    /// title, then the ungrouped parameters under [`UNGROUPED_TITLE`].
    pub fn display_groups(&self) -> Vec<(&str, &IndexMap<String, PropertySpec>)> {
        let mut out: Vec<_> = self
            .groups
            .iter()
            .map(|g| (g.title.as_str(), &g.properties))
            .collect();
        if !self.ungrouped.is_empty() {
            out.push((UNGROUPED_TITLE, &self.ungrouped));
        }
        out
    }

    /// Total number of declared parameters.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.properties.len()).sum::<usize>() + self.ungrouped.len()
    }

    /// Returns true if the schema declares no parameters.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn collect_properties(properties: Option<&Value>, seen: &mut HashSet<String>) -> IndexMap<String, PropertySpec> {
    let mut out = IndexMap::new();
    let Some(properties) = properties.and_then(Value::as_object) else {
        return out;
    };
    for (name, spec) in properties {
        if !seen.insert(name.clone()) {
            tracing::warn!(param = %name, "parameter declared more than once in schema; keeping the first declaration");
            continue;
        }
        out.insert(name.clone(), PropertySpec::from_value(spec));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_schema() -> Value {
        json!({
            "definitions": {
                "input_output_options": {
                    "title": "Input/output options",
                    "required": ["input"],
                    "properties": {
                        "input": {"type": "string", "description": "Path to samplesheet."},
                        "outdir": {"type": "string", "default": "./results"}
                    }
                },
                "alignment_options": {
                    "properties": {
                        "aligner": {"type": "string", "enum": ["bwa", "bowtie2", "star"], "default": "star"},
                        "min_mapq": {"type": "integer", "default": 20, "hidden": true}
                    }
                }
            },
            "properties": {
                "email": {"type": ["string", "null"]},
                "outdir": {"type": "integer"}
            }
        })
    }

    #[test]
    fn test_groups_preserve_declaration_order() {
        let model = SchemaModel::from_document(&sample_schema());
        let titles: Vec<&str> = model.groups().iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["Input/output options", "alignment_options"]);
        assert_eq!(model.groups()[0].required, vec!["input"]);
    }

    #[test]
    fn test_property_spec_fields() {
        let model = SchemaModel::from_document(&sample_schema());
        let aligner = model.property("aligner").unwrap();
        assert_eq!(aligner.param_type, "string");
        assert_eq!(aligner.default.as_deref(), Some("star"));
        assert_eq!(aligner.enum_values.as_deref(), Some(&["bwa".to_string(), "bowtie2".into(), "star".into()][..]));

        let mapq = model.property("min_mapq").unwrap();
        assert_eq!(mapq.default.as_deref(), Some("20"));
        assert!(mapq.hidden);

        assert_eq!(model.property("email").unwrap().param_type, "string,null");
    }

    #[test]
    fn test_duplicate_name_keeps_first_declaration() {
        let model = SchemaModel::from_document(&sample_schema());
        assert_eq!(model.property("outdir").unwrap().param_type, "string");
        assert_eq!(model.ungrouped().len(), 1);
        assert_eq!(model.len(), 5);
    }

    #[test]
    fn test_property_names_and_enums() {
        let model = SchemaModel::from_document(&sample_schema());
        let names: Vec<&str> = model.property_names().collect();
        assert_eq!(names, vec!["input", "outdir", "aligner", "min_mapq", "email"]);
        let enums = model.enums();
        assert_eq!(enums.len(), 1);
        assert_eq!(enums["aligner"].len(), 3);
    }

    #[test]
    fn test_display_groups_append_ungrouped() {
        let model = SchemaModel::from_document(&sample_schema());
        let titles: Vec<&str> = model.display_groups().iter().map(|(t, _)| *t).collect();
        assert_eq!(titles, vec!["Input/output options", "alignment_options", UNGROUPED_TITLE]);
    }

    #[test]
    fn test_malformed_document_yields_empty_model() {
        let model = SchemaModel::from_document(&json!({"definitions": [1, 2]}));
        assert!(model.is_empty());
        assert!(model.display_groups().is_empty());
    }

    #[test]
    fn test_load_missing_file_degrades() {
        let model = SchemaModel::load(Path::new("/nonexistent/nextflow_schema.json"));
        assert!(model.is_empty());
    }
}
