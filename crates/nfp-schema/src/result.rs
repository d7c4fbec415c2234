//! # Validation Result
//!
//! Diagnostics of one validation call, returned by value. Classification
//! messages precede schema-violation messages; there is no other ordering
//! guarantee between the two kinds.

/// Errors and warnings produced by one validation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// Problems that should stop the run.
    pub errors: Vec<String>,
    /// Problems worth reporting that do not stop the run.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if any error was recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns true if any warning was recorded.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns true if no error was recorded. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// Append another result's diagnostics after this one's.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Human-readable block listing the warnings.
    pub fn warnings_report(&self) -> String {
        format!(
            "The following invalid input values have been detected:\n\n{}\n",
            self.warnings.join("\n").trim()
        )
    }

    /// Human-readable block listing the errors.
    pub fn errors_report(&self) -> String {
        format!(
            "Validation of pipeline parameters failed!\n\nThe following invalid input values have been detected:\n\n{}\n",
            self.errors.join("\n").trim()
        )
    }
}
