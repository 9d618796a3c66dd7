//! Error types for claim model construction.
//!
//! Validation uses a collect-all pattern: every rule is evaluated and each
//! violation is recorded as a [`FieldIssue`] carrying the JSON path of the
//! offending field, so the caller sees the whole list at once.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Category of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A required field is absent or blank.
    Missing,
    /// A field is present but does not match its format.
    InvalidFormat,
    /// A numeric field is outside its allowed range.
    OutOfRange,
    /// Two or more fields contradict each other.
    Inconsistent,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::Missing => "missing",
            IssueKind::InvalidFormat => "invalid format",
            IssueKind::OutOfRange => "out of range",
            IssueKind::Inconsistent => "inconsistent",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rule violation located by its input field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    /// Dotted JSON path, e.g. `claimInformation.serviceLines[0].serviceDate`.
    pub path: String,
    pub kind: IssueKind,
    pub message: String,
}

impl FieldIssue {
    pub fn new(path: impl Into<String>, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn missing(path: impl Into<String>) -> Self {
        Self::new(path, IssueKind::Missing, "is required")
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every violation found while building a [`crate::ClaimModel`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{} validation issue(s): {}", .issues.len(), summarize(.issues))]
pub struct ValidationError {
    issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn new(issues: Vec<FieldIssue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<FieldIssue> {
        self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns true if any issue is reported against `path`.
    pub fn has_path(&self, path: &str) -> bool {
        self.issues.iter().any(|issue| issue.path == path)
    }
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised while turning raw input into a claim model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The input is not a well-formed claim document.
    #[error("malformed claim input: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The document parsed but violates one or more field rules.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_lists_every_issue() {
        let error = ValidationError::new(vec![
            FieldIssue::missing("billing.npi"),
            FieldIssue::new(
                "subscriber.gender",
                IssueKind::InvalidFormat,
                "expected M, F or U",
            ),
        ]);
        let text = error.to_string();
        assert!(text.starts_with("2 validation issue(s)"));
        assert!(text.contains("billing.npi: is required"));
        assert!(text.contains("subscriber.gender: expected M, F or U"));
        assert!(error.has_path("billing.npi"));
        assert!(!error.has_path("billing"));
    }
}
