//! Envelope configuration: identities, control numbers, separators.

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::delimiters::Delimiters;
use crate::error::{EncodingError, Result};

/// ISA15: whether the interchange carries test or production data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageIndicator {
    #[default]
    Test,
    Production,
}

impl UsageIndicator {
    pub fn code(&self) -> &'static str {
        match self {
            UsageIndicator::Test => "T",
            UsageIndicator::Production => "P",
        }
    }
}

/// Control numbers for the three envelope levels.
///
/// Each value is written into both the opening and closing segment of its
/// level (ISA13/IEA02, GS06/GE02, ST02/SE02).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ControlNumbers {
    pub interchange: u32,
    pub group: u32,
    pub transaction_set: u32,
}

impl Default for ControlNumbers {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

impl ControlNumbers {
    /// Largest value that fits the 9-digit ISA13 field.
    pub const MAX: u32 = 999_999_999;

    pub fn new(interchange: u32, group: u32, transaction_set: u32) -> Self {
        Self {
            interchange,
            group,
            transaction_set,
        }
    }

    /// Derive all three numbers from one per-call seed (a timestamp, a
    /// database sequence value, ...). The result is always in range.
    pub fn from_seed(seed: u64) -> Self {
        let value = (seed % u64::from(Self::MAX)) as u32 + 1;
        Self::new(value, value, value)
    }

    pub fn validate(&self) -> Result<()> {
        for (level, value) in [
            ("interchange", self.interchange),
            ("group", self.group),
            ("transaction set", self.transaction_set),
        ] {
            if value == 0 || value > Self::MAX {
                return Err(EncodingError::invalid_config(format!(
                    "{level} control number {value} must be between 1 and {}",
                    Self::MAX
                )));
            }
        }
        Ok(())
    }

    /// ISA13 / IEA02: nine digits, zero padded.
    pub fn interchange_text(&self) -> String {
        format!("{:09}", self.interchange)
    }

    /// GS06 / GE02.
    pub fn group_text(&self) -> String {
        self.group.to_string()
    }

    /// ST02 / SE02: at least four digits, zero padded.
    pub fn transaction_set_text(&self) -> String {
        format!("{:04}", self.transaction_set)
    }
}

fn default_qualifier() -> String {
    "ZZ".to_string()
}

fn default_true() -> bool {
    true
}

/// Everything the encoder needs besides the claim itself.
///
/// The creation timestamp is mandatory so that encoding never reads the
/// clock: the same model and configuration always produce the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnvelopeConfig {
    /// ISA05 (default `ZZ`, mutually defined).
    #[serde(default = "default_qualifier")]
    pub sender_qualifier: String,
    /// ISA06, at most 15 characters.
    pub sender_id: String,
    /// ISA07 (default `ZZ`).
    #[serde(default = "default_qualifier")]
    pub receiver_qualifier: String,
    /// ISA08, at most 15 characters.
    pub receiver_id: String,
    /// Loop 1000A name when the claim has no submitter.
    #[serde(default)]
    pub sender_name: Option<String>,
    /// Loop 1000B name when the claim has no receiver.
    #[serde(default)]
    pub receiver_name: Option<String>,
    /// GS02 (defaults to the sender ID).
    #[serde(default)]
    pub application_sender: Option<String>,
    /// GS03 (defaults to the receiver ID).
    #[serde(default)]
    pub application_receiver: Option<String>,
    /// Date and time written into ISA, GS and BHT.
    pub created: NaiveDateTime,
    #[serde(default)]
    pub usage: UsageIndicator,
    /// ISA14.
    #[serde(default)]
    pub acknowledgment_requested: bool,
    #[serde(default)]
    pub control_numbers: ControlNumbers,
    #[serde(default)]
    pub delimiters: Delimiters,
    /// Emit a newline after every segment terminator.
    #[serde(default = "default_true")]
    pub line_break: bool,
}

impl EnvelopeConfig {
    /// Configuration with defaults for everything but the two identities
    /// and the creation time.
    pub fn new(
        sender_id: impl Into<String>,
        receiver_id: impl Into<String>,
        created: NaiveDateTime,
    ) -> Self {
        Self {
            sender_qualifier: default_qualifier(),
            sender_id: sender_id.into(),
            receiver_qualifier: default_qualifier(),
            receiver_id: receiver_id.into(),
            sender_name: None,
            receiver_name: None,
            application_sender: None,
            application_receiver: None,
            created,
            usage: UsageIndicator::default(),
            acknowledgment_requested: false,
            control_numbers: ControlNumbers::default(),
            delimiters: Delimiters::default(),
            line_break: true,
        }
    }

    #[must_use]
    pub fn with_sender_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.sender_qualifier = qualifier.into();
        self
    }

    #[must_use]
    pub fn with_receiver_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.receiver_qualifier = qualifier.into();
        self
    }

    #[must_use]
    pub fn with_sender_name(mut self, name: impl Into<String>) -> Self {
        self.sender_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_receiver_name(mut self, name: impl Into<String>) -> Self {
        self.receiver_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_application_codes(
        mut self,
        sender: impl Into<String>,
        receiver: impl Into<String>,
    ) -> Self {
        self.application_sender = Some(sender.into());
        self.application_receiver = Some(receiver.into());
        self
    }

    #[must_use]
    pub fn with_usage(mut self, usage: UsageIndicator) -> Self {
        self.usage = usage;
        self
    }

    /// Mark the interchange as production data.
    #[must_use]
    pub fn production(self) -> Self {
        self.with_usage(UsageIndicator::Production)
    }

    #[must_use]
    pub fn with_acknowledgment_requested(mut self, requested: bool) -> Self {
        self.acknowledgment_requested = requested;
        self
    }

    #[must_use]
    pub fn with_control_numbers(mut self, control_numbers: ControlNumbers) -> Self {
        self.control_numbers = control_numbers;
        self
    }

    #[must_use]
    pub fn with_delimiters(mut self, delimiters: Delimiters) -> Self {
        self.delimiters = delimiters;
        self
    }

    #[must_use]
    pub fn with_line_break(mut self, line_break: bool) -> Self {
        self.line_break = line_break;
        self
    }

    /// GS02 value.
    pub fn application_sender(&self) -> &str {
        self.application_sender.as_deref().unwrap_or(&self.sender_id)
    }

    /// GS03 value.
    pub fn application_receiver(&self) -> &str {
        self.application_receiver
            .as_deref()
            .unwrap_or(&self.receiver_id)
    }

    /// Check every value that lands in a fixed envelope position.
    pub fn validate(&self) -> Result<()> {
        self.delimiters.validate()?;
        self.control_numbers.validate()?;
        for (name, qualifier) in [
            ("sender qualifier", &self.sender_qualifier),
            ("receiver qualifier", &self.receiver_qualifier),
        ] {
            if qualifier.chars().count() != 2 {
                return Err(EncodingError::invalid_config(format!(
                    "{name} '{qualifier}' must be exactly 2 characters"
                )));
            }
            self.check_delimiters(name, qualifier)?;
        }
        for (name, id) in [
            ("sender ID", self.sender_id.as_str()),
            ("receiver ID", self.receiver_id.as_str()),
        ] {
            let length = id.trim().chars().count();
            if length == 0 || length > 15 {
                return Err(EncodingError::invalid_config(format!(
                    "{name} '{id}' must be 1 to 15 characters"
                )));
            }
            self.check_delimiters(name, id)?;
        }
        for (name, code) in [
            ("application sender code", self.application_sender()),
            ("application receiver code", self.application_receiver()),
        ] {
            let length = code.trim().chars().count();
            if !(2..=15).contains(&length) {
                return Err(EncodingError::invalid_config(format!(
                    "{name} '{code}' must be 2 to 15 characters"
                )));
            }
            self.check_delimiters(name, code)?;
        }
        Ok(())
    }

    fn check_delimiters(&self, name: &str, value: &str) -> Result<()> {
        match self.delimiters.find_in(value) {
            Some(delimiter) => Err(EncodingError::invalid_config(format!(
                "{name} '{value}' contains the delimiter '{delimiter}'"
            ))),
            None => Ok(()),
        }
    }
}
