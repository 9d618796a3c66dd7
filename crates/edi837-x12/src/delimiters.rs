//! Separator characters declared in ISA11 and ISA16.

use serde::Deserialize;

use crate::error::{EncodingError, Result};

/// The four separators used throughout one interchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Delimiters {
    /// Separates elements within a segment (default `*`).
    pub element: char,
    /// Terminates a segment (default `~`).
    pub segment: char,
    /// Separates components of a composite element (default `:`).
    pub component: char,
    /// Separates repeated elements, declared in ISA11 (default `^`).
    pub repetition: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            element: '*',
            segment: '~',
            component: ':',
            repetition: '^',
        }
    }
}

impl Delimiters {
    #[must_use]
    pub fn with_element(mut self, element: char) -> Self {
        self.element = element;
        self
    }

    #[must_use]
    pub fn with_segment(mut self, segment: char) -> Self {
        self.segment = segment;
        self
    }

    #[must_use]
    pub fn with_component(mut self, component: char) -> Self {
        self.component = component;
        self
    }

    #[must_use]
    pub fn with_repetition(mut self, repetition: char) -> Self {
        self.repetition = repetition;
        self
    }

    /// All four separators in ISA order of appearance.
    pub fn all(&self) -> [char; 4] {
        [self.element, self.repetition, self.component, self.segment]
    }

    /// First separator found in `value`, if any.
    pub fn find_in(&self, value: &str) -> Option<char> {
        let all = self.all();
        value.chars().find(|c| all.contains(c))
    }

    /// Separators must be distinct, visible, and outside the alphanumeric
    /// set so that coded values can never collide with them.
    pub fn validate(&self) -> Result<()> {
        let all = self.all();
        for (index, delimiter) in all.iter().enumerate() {
            if delimiter.is_alphanumeric() || delimiter.is_whitespace() {
                return Err(EncodingError::invalid_config(format!(
                    "delimiter '{delimiter}' must not be alphanumeric or whitespace"
                )));
            }
            if all[index + 1..].contains(delimiter) {
                return Err(EncodingError::invalid_config(format!(
                    "delimiter '{delimiter}' is used for more than one role"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let delimiters = Delimiters::default();
        assert!(delimiters.validate().is_ok());
        assert_eq!(delimiters.all(), ['*', '^', ':', '~']);
    }

    #[test]
    fn duplicate_delimiters_rejected() {
        let delimiters = Delimiters::default().with_component('*');
        assert!(matches!(
            delimiters.validate(),
            Err(EncodingError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn alphanumeric_delimiter_rejected() {
        let delimiters = Delimiters::default().with_segment('X');
        assert!(delimiters.validate().is_err());
    }

    #[test]
    fn find_in_reports_first_conflict() {
        let delimiters = Delimiters::default();
        assert_eq!(delimiters.find_in("SMITH~JONES"), Some('~'));
        assert_eq!(delimiters.find_in("A:B*C"), Some(':'));
        assert_eq!(delimiters.find_in("PLAIN TEXT"), None);
    }
}
