//! Validation results.

use std::fmt;

/// How serious a validation issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Makes the document invalid.
    Error,
    /// Reported, but never affects validity.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// One finding of a validation pass.
///
/// `path` is the dotted location of the offending value (empty for
/// document-level findings); `message` is the complete human-readable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Error or warning.
    pub severity: Severity,
    /// Dotted path of the offending value.
    pub path: String,
    /// Human-readable description.
    pub message: String,
}

impl ValidationIssue {
    /// Creates an error issue.
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a warning issue.
    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            path: path.into(),
            message: message.into(),
        }
    }

    /// True for warnings.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// The outcome of validating one document.
///
/// Errors and warnings keep the order in which they were found.
///
/// # Examples
///
/// ```
/// use heimdall_config::config::{ValidationIssue, ValidationReport};
///
/// let mut report = ValidationReport::default();
/// assert!(report.is_valid());
///
/// report.push(ValidationIssue::warning("system.paths.config", "system.paths.config is empty"));
/// assert!(report.is_valid());
///
/// report.push(ValidationIssue::error("bar.height", "bar.height must be a positive number"));
/// assert!(!report.is_valid());
/// assert!(report.render().contains("Summary: 1 errors, 1 warnings"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Issues that make the document invalid.
    pub errors: Vec<ValidationIssue>,
    /// Issues that are only reported.
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// True if no errors were found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Files an issue under errors or warnings by its severity.
    pub fn push(&mut self, issue: ValidationIssue) {
        match issue.severity {
            Severity::Error => self.errors.push(issue),
            Severity::Warning => self.warnings.push(issue),
        }
    }

    /// Human-readable report: banner, errors, warnings, then a summary line.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();

        if self.errors.is_empty() {
            out.push_str("Validation PASSED\n");
        } else {
            out.push_str("Validation FAILED\n\nErrors:\n");
            for error in &self.errors {
                out.push_str(&format!("  - {error}\n"));
            }
        }

        if !self.warnings.is_empty() {
            out.push_str("\nWarnings:\n");
            for warning in &self.warnings {
                out.push_str(&format!("  ! {warning}\n"));
            }
        }

        out.push_str(&format!(
            "\nSummary: {} errors, {} warnings\n",
            self.errors.len(),
            self.warnings.len()
        ));
        out
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
