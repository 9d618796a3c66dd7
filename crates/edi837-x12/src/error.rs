//! Error types for segment encoding.

use thiserror::Error;

/// Errors that can occur while encoding a claim into an X12 document.
///
/// Any error aborts the whole document; no partial output is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EncodingError {
    /// A value the segment needs is absent from the model.
    #[error("{segment} requires a value for {path}")]
    MissingField { segment: &'static str, path: String },

    /// A free-text field contains one of the configured delimiters.
    #[error("field {path} contains the delimiter '{delimiter}'")]
    DelimiterInField { path: String, delimiter: char },

    /// A loop or envelope level would be emitted fewer times than allowed.
    #[error("{structure} requires at least {minimum} occurrence(s), found {actual}")]
    MinimumOccurrence {
        structure: &'static str,
        minimum: usize,
        actual: usize,
    },

    /// A trailer count disagrees with what was actually written.
    #[error("{segment} declares {declared} but {actual} were written")]
    CountMismatch {
        segment: &'static str,
        declared: usize,
        actual: usize,
    },

    /// The envelope configuration cannot produce a valid interchange.
    #[error("invalid envelope configuration: {message}")]
    InvalidConfig { message: String },
}

/// Result type alias for encoding operations.
pub type Result<T> = std::result::Result<T, EncodingError>;

impl EncodingError {
    /// Create a MissingField error.
    pub fn missing_field(segment: &'static str, path: impl Into<String>) -> Self {
        Self::MissingField {
            segment,
            path: path.into(),
        }
    }

    /// Create a DelimiterInField error.
    pub fn delimiter_in_field(path: impl Into<String>, delimiter: char) -> Self {
        Self::DelimiterInField {
            path: path.into(),
            delimiter,
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether this error indicates a defect in the encoder rather than bad
    /// input or configuration.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. } | Self::CountMismatch { .. }
        )
    }
}
