//! # Violation Translation
//!
//! Turns a violation tree into flat, parameter-scoped messages. Only leaves
//! produce a message; an inner node defers entirely to its children. Each
//! leaf is resolved by the first matching rule:
//!
//! 1. `required key [NAME] not found` becomes
//!    `* Missing required parameter: --NAME`.
//! 2. A failure at the root pointer `#` is reported verbatim as
//!    `* MESSAGE`.
//! 3. A failure at `#/NAME` for a parameter with declared choices becomes
//!    `* --NAME: 'VALUE' is not a valid choice (Available choices: a, b, c)`,
//!    listing at most the display limit and annotating truncation with the
//!    true count.
//! 4. Any other parameter failure becomes `* --NAME: MESSAGE (VALUE)`.
//!
//! Messages come out in tree pre-order. Nothing is deduplicated: two
//! structurally distinct branches reporting the same problem yield the same
//! message twice.

use std::collections::HashMap;

use nfp_core::value::display_json;
use serde_json::Value;

use crate::violation::{ViolationTree, ROOT_POINTER};

/// Default number of enum choices listed in an invalid-choice message.
pub const DEFAULT_ENUM_DISPLAY_LIMIT: usize = 5;

/// Translates violation trees for one validated document.
#[derive(Debug, Clone)]
pub struct ViolationTranslator<'a> {
    document: &'a Value,
    enums: &'a HashMap<String, Vec<String>>,
    limit: usize,
}

impl<'a> ViolationTranslator<'a> {
    /// Create a translator over the document that was validated and the
    /// schema's declared enum choices.
    pub fn new(document: &'a Value, enums: &'a HashMap<String, Vec<String>>) -> Self {
        Self {
            document,
            enums,
            limit: DEFAULT_ENUM_DISPLAY_LIMIT,
        }
    }

    /// Set the maximum number of enum choices listed per message.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Translate a tree into messages, in pre-order.
    pub fn translate<T: ViolationTree>(&self, node: &T) -> Vec<String> {
        let mut messages = Vec::new();
        if node.is_leaf() {
            messages.push(self.leaf_message(node));
        }
        for cause in node.causes() {
            messages.extend(self.translate(cause));
        }
        messages
    }

    fn leaf_message<T: ViolationTree>(&self, leaf: &T) -> String {
        let message = leaf.message();
        if let Some(name) = missing_required_key(message) {
            return format!("* Missing required parameter: --{name}");
        }

        let pointer = leaf.pointer();
        if pointer == ROOT_POINTER {
            return format!("* {message}");
        }

        let param = pointer.strip_prefix("#/").unwrap_or(pointer);
        let value = self
            .document
            .get(param)
            .map(display_json)
            .unwrap_or_else(|| "null".to_string());

        match self.enums.get(param) {
            Some(choices) => self.invalid_choice(param, &value, choices),
            None => format!("* --{param}: {message} ({value})"),
        }
    }

    fn invalid_choice(&self, param: &str, value: &str, choices: &[String]) -> String {
        let head = format!("* --{param}: '{value}' is not a valid choice (Available choices");
        if choices.len() > self.limit {
            format!(
                "{head} ({} of {}): {}, ... )",
                self.limit,
                choices.len(),
                choices[..self.limit].join(", ")
            )
        } else {
            format!("{head}: {})", choices.join(", "))
        }
    }
}

/// Extract NAME from a message that is exactly `required key [NAME] not found`.
fn missing_required_key(message: &str) -> Option<&str> {
    message
        .strip_prefix("required key [")?
        .strip_suffix("] not found")
        .filter(|name| !name.is_empty() && !name.contains(']'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::Violation;
    use serde_json::json;

    fn no_enums() -> HashMap<String, Vec<String>> {
        HashMap::new()
    }

    #[test]
    fn test_missing_required_root_leaf() {
        let doc = json!({});
        let enums = no_enums();
        let tree = Violation::leaf("#", "required key [threads] not found");
        assert_eq!(
            ViolationTranslator::new(&doc, &enums).translate(&tree),
            vec!["* Missing required parameter: --threads"]
        );
    }

    #[test]
    fn test_missing_required_must_match_whole_message() {
        let doc = json!({});
        let enums = no_enums();
        let tree = Violation::leaf("#", "#: required key [threads] not found");
        assert_eq!(
            ViolationTranslator::new(&doc, &enums).translate(&tree),
            vec!["* #: required key [threads] not found"]
        );
    }

    #[test]
    fn test_root_failure_verbatim() {
        let doc = json!({});
        let enums = no_enums();
        let tree = Violation::leaf("#", "Additional properties are not allowed ('foo' was unexpected)");
        assert_eq!(
            ViolationTranslator::new(&doc, &enums).translate(&tree),
            vec!["* Additional properties are not allowed ('foo' was unexpected)"]
        );
    }

    #[test]
    fn test_enum_within_limit_lists_all_choices() {
        let doc = json!({"aligner": "hisat"});
        let enums: HashMap<String, Vec<String>> =
            [("aligner".to_string(), vec!["bwa".into(), "bowtie2".into(), "star".into()])].into();
        let tree = Violation::leaf("#/aligner", r#""hisat" is not one of ["bwa","bowtie2","star"]"#);
        let messages = ViolationTranslator::new(&doc, &enums).translate(&tree);
        assert_eq!(
            messages,
            vec!["* --aligner: 'hisat' is not a valid choice (Available choices: bwa, bowtie2, star)"]
        );
        assert!(messages[0].contains("'hisat' is not a valid choice"));
    }

    #[test]
    fn test_enum_over_limit_is_truncated() {
        let doc = json!({"tool": "x"});
        let choices: Vec<String> = (1..=8).map(|i| format!("t{i}")).collect();
        let enums: HashMap<String, Vec<String>> = [("tool".to_string(), choices)].into();
        let tree = Violation::leaf("#/tool", "not one of");
        let messages = ViolationTranslator::new(&doc, &enums).translate(&tree);
        assert_eq!(
            messages,
            vec!["* --tool: 'x' is not a valid choice (Available choices (5 of 8): t1, t2, t3, t4, t5, ... )"]
        );
    }

    #[test]
    fn test_enum_limit_is_configurable() {
        let doc = json!({"tool": "x"});
        let enums: HashMap<String, Vec<String>> =
            [("tool".to_string(), vec!["a".into(), "b".into(), "c".into()])].into();
        let tree = Violation::leaf("#/tool", "not one of");
        let messages = ViolationTranslator::new(&doc, &enums).with_limit(2).translate(&tree);
        assert_eq!(messages, vec!["* --tool: 'x' is not a valid choice (Available choices (2 of 3): a, b, ... )"]);
    }

    #[test]
    fn test_generic_parameter_failure_includes_value() {
        let doc = json!({"threads": "four", "max_cpus": 3});
        let enums = no_enums();
        let translator = ViolationTranslator::new(&doc, &enums);
        assert_eq!(
            translator.translate(&Violation::leaf("#/threads", r#""four" is not of type "integer""#)),
            vec![r#"* --threads: "four" is not of type "integer" (four)"#]
        );
        assert_eq!(
            translator.translate(&Violation::leaf("#/max_cpus", "3 is less than the minimum of 4")),
            vec!["* --max_cpus: 3 is less than the minimum of 4 (3)"]
        );
        assert_eq!(
            translator.translate(&Violation::leaf("#/absent", "bad")),
            vec!["* --absent: bad (null)"]
        );
    }

    #[test]
    fn test_inner_nodes_are_silent_and_order_is_preorder() {
        let doc = json!({"threads": "four"});
        let enums = no_enums();
        let tree = Violation::summary(vec![
            Violation::summary(vec![
                Violation::leaf("#", "required key [input] not found"),
                Violation::leaf("#/threads", "wrong type"),
            ]),
            Violation::leaf("#", "required key [outdir] not found"),
        ]);
        assert_eq!(
            ViolationTranslator::new(&doc, &enums).translate(&tree),
            vec![
                "* Missing required parameter: --input",
                "* --threads: wrong type (four)",
                "* Missing required parameter: --outdir",
            ]
        );
    }

    #[test]
    fn test_duplicates_are_preserved() {
        let doc = json!({});
        let enums = no_enums();
        let tree = Violation::summary(vec![
            Violation::leaf("#", "required key [input] not found"),
            Violation::leaf("#", "required key [input] not found"),
        ]);
        let messages = ViolationTranslator::new(&doc, &enums).translate(&tree);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], messages[1]);
    }

    #[test]
    fn test_missing_required_key_parser() {
        assert_eq!(missing_required_key("required key [a-b] not found"), Some("a-b"));
        assert_eq!(missing_required_key("required key [] not found"), None);
        assert_eq!(missing_required_key("required key [a] [b] not found"), None);
        assert_eq!(missing_required_key("required key [a] not found!"), None);
    }
}
