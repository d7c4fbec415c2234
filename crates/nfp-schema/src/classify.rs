//! # Parameter Classification
//!
//! Sorts every supplied parameter name into one of five classes:
//!
//! 1. **Reserved option**: the name is an option of the host tool supplied
//!    with two hyphens. Always an error.
//! 2. **Expected**: declared by the schema, a built-in name, or a reserved
//!    control key.
//! 3. **Ignored**: explicitly opted out, or the ignore-list key itself.
//! 4. **Case-folded**: a hyphenated/camel-cased spelling of an expected
//!    name. The host registers `--my-param` under both `my-param` and
//!    `myParam`, so one of the two spellings is never declared.
//! 5. **Unrecognised**: everything else. A warning, or an error when the
//!    fail-on-unrecognised toggle is set.
//!
//! Folding removes hyphens and lower-cases. A folded match only counts when
//! the supplied name is hyphenated, or when it is exactly the camel-cased
//! form of a hyphenated expected name (`my-param` -> `myParam`). Other case
//! differences (`Outdir`, `MYPARAM`) are still reported.

use std::collections::{BTreeSet, HashSet};

use nfp_core::control::{BUILTIN_EXPECTED_PARAMS, CONTROL_PARAMS};
use nfp_core::{is_reserved_option, ParameterSet};

use crate::model::SchemaModel;
use crate::result::ValidationResult;

const SEPARATOR: char = '-';

/// Class of a supplied parameter name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Collides with a host tool option.
    ReservedOption,
    /// Declared by the schema or built in.
    Expected,
    /// Excluded from checking.
    Ignored,
    /// Separator/case variant of an expected name.
    CaseFolded,
    /// Not known in any form.
    Unrecognised,
}

/// Fold a parameter name: drop separators and lower-case.
pub fn fold_name(name: &str) -> String {
    name.chars()
        .filter(|&c| c != SEPARATOR)
        .flat_map(char::to_lowercase)
        .collect()
}

/// Camel-case a hyphenated name the way the host registers it:
/// `max-memory-gb` -> `maxMemoryGb`.
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == SEPARATOR {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Classifies supplied parameter names against a schema vocabulary.
#[derive(Debug, Clone)]
pub struct ParameterClassifier {
    expected: HashSet<String>,
    folded: HashSet<String>,
    /// Camel-cased spellings of the hyphenated expected names.
    camel: HashSet<String>,
    ignored: BTreeSet<String>,
    fail_unrecognised: bool,
}

impl ParameterClassifier {
    /// Build a classifier from the schema's declared names plus the
    /// built-in names and control keys.
    pub fn new(model: &SchemaModel, ignored: BTreeSet<String>, fail_unrecognised: bool) -> Self {
        let expected: HashSet<String> = model
            .property_names()
            .map(str::to_string)
            .chain(BUILTIN_EXPECTED_PARAMS.iter().map(|name| name.to_string()))
            .chain(CONTROL_PARAMS.iter().map(|name| name.to_string()))
            .collect();

        let folded = expected.iter().map(|name| fold_name(name)).collect();
        let camel = expected
            .iter()
            .filter(|name| name.contains(SEPARATOR))
            .map(|name| camel_case(name))
            .collect();

        Self {
            expected,
            folded,
            camel,
            ignored,
            fail_unrecognised,
        }
    }

    /// Classify a single supplied name.
    pub fn classify(&self, name: &str) -> Classification {
        if is_reserved_option(name) {
            return Classification::ReservedOption;
        }
        if self.expected.contains(name) {
            return Classification::Expected;
        }
        if self.ignored.contains(name) {
            return Classification::Ignored;
        }
        let hyphen_variant = name.contains(SEPARATOR) && self.folded.contains(&fold_name(name));
        if hyphen_variant || self.camel.contains(name) {
            Classification::CaseFolded
        } else {
            Classification::Unrecognised
        }
    }

    /// Classify every supplied parameter and record the diagnostics.
    pub fn check(&self, params: &ParameterSet) -> ValidationResult {
        let mut result = ValidationResult::default();
        for (name, value) in params.iter() {
            let class = self.classify(name);
            tracing::debug!(param = name, ?class, "classified parameter");
            match class {
                Classification::ReservedOption => result.errors.push(format!(
                    "You used a core Nextflow option with two hyphens: '--{name}'. Please resubmit with '-{name}'"
                )),
                Classification::Unrecognised => {
                    let message = format!("* --{name}: {value}");
                    if self.fail_unrecognised {
                        result.errors.push(message);
                    } else {
                        result.warnings.push(message);
                    }
                }
                Classification::Expected | Classification::Ignored | Classification::CaseFolded => {}
            }
        }
        result
    }
}
