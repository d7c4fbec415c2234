//! # Violation Trees
//!
//! The structural validator reports failure as a tree of causes. The root
//! carries the pointer `#`; a node pointing at a specific parameter carries
//! `#/<name>`. Leaves are nodes without causes, and only leaves describe a
//! concrete problem: an inner node merely groups its children.
//!
//! [`ViolationTree`] is the read-only interface the translator walks, so
//! any validator output can be translated once it exposes message, pointer
//! and causes. [`Violation`] is the owned implementation, which also
//! deserializes from the common JSON shape
//! `{"message", "pointerToViolation", "causingExceptions"}`.

use serde::{Deserialize, Serialize};

/// Pointer of the document root.
pub const ROOT_POINTER: &str = "#";

/// Read-only access to a violation tree node.
pub trait ViolationTree {
    /// Human-readable description of this node.
    fn message(&self) -> &str;

    /// JSON-pointer-like location of the violation (`#`, `#/name`).
    fn pointer(&self) -> &str;

    /// Sub-causes, in report order.
    fn causes(&self) -> &[Self]
    where
        Self: Sized;

    /// Returns true if this node has no sub-causes.
    fn is_leaf(&self) -> bool
    where
        Self: Sized,
    {
        self.causes().is_empty()
    }
}

/// An owned violation tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    message: String,
    #[serde(default = "root_pointer")]
    pointer_to_violation: String,
    #[serde(default)]
    causing_exceptions: Vec<Violation>,
}

fn root_pointer() -> String {
    ROOT_POINTER.to_string()
}

impl Violation {
    /// A leaf violation.
    pub fn leaf(pointer: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            pointer_to_violation: pointer.into(),
            causing_exceptions: Vec::new(),
        }
    }

    /// An inner node grouping `causes`.
    pub fn node(pointer: impl Into<String>, message: impl Into<String>, causes: Vec<Violation>) -> Self {
        Self {
            message: message.into(),
            pointer_to_violation: pointer.into(),
            causing_exceptions: causes,
        }
    }

    /// A root node summarising `causes`, in the form
    /// `#: N schema violations found`.
    pub fn summary(causes: Vec<Violation>) -> Self {
        let count: usize = causes.iter().map(Violation::leaf_count).sum();
        Self::node(ROOT_POINTER, format!("{ROOT_POINTER}: {count} schema violations found"), causes)
    }

    /// Number of leaves beneath (or including) this node.
    pub fn leaf_count(&self) -> usize {
        if self.causing_exceptions.is_empty() {
            1
        } else {
            self.causing_exceptions.iter().map(Violation::leaf_count).sum()
        }
    }
}

impl ViolationTree for Violation {
    fn message(&self) -> &str {
        &self.message
    }

    fn pointer(&self) -> &str {
        &self.pointer_to_violation
    }

    fn causes(&self) -> &[Self] {
        &self.causing_exceptions
    }
}
