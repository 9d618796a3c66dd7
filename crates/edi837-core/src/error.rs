//! Error type for a whole conversion.

use std::path::PathBuf;

use edi837_model::{ModelError, ValidationError};
use edi837_x12::EncodingError;
use thiserror::Error;

/// Everything that can stop a conversion, grouped by who has to act on it.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed claim input: {0}")]
    MalformedInput(#[source] serde_json::Error),

    #[error(transparent)]
    Validation(ValidationError),

    #[error("encoding failed: {0}")]
    Encoding(#[source] EncodingError),

    /// A validated model that still could not be encoded consistently.
    #[error("internal encoder error: {0}")]
    Internal(#[source] EncodingError),
}

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Validation issues, when the input was well formed but invalid.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<ModelError> for ConvertError {
    fn from(error: ModelError) -> Self {
        match error {
            ModelError::Malformed(error) => Self::MalformedInput(error),
            ModelError::Validation(error) => Self::Validation(error),
        }
    }
}

impl From<ValidationError> for ConvertError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error)
    }
}

impl From<EncodingError> for ConvertError {
    fn from(error: EncodingError) -> Self {
        if error.is_internal() {
            Self::Internal(error)
        } else {
            Self::Encoding(error)
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_mismatch_is_internal() {
        let error = ConvertError::from(EncodingError::CountMismatch {
            segment: "SE",
            declared: 4,
            actual: 3,
        });
        assert!(matches!(error, ConvertError::Internal(_)));
    }

    #[test]
    fn delimiter_conflict_is_encoding() {
        let error = ConvertError::from(EncodingError::delimiter_in_field("payer.payerId", '*'));
        assert!(matches!(error, ConvertError::Encoding(_)));
        assert!(error.to_string().contains("payer.payerId"));
    }

    #[test]
    fn malformed_json_maps_to_malformed_input() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = ConvertError::from(ModelError::Malformed(source));
        assert!(matches!(error, ConvertError::MalformedInput(_)));
        assert!(!error.is_validation());
    }
}
