//! Command implementations, separated from printing so they can be tested.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use edi837_core::{
    ClaimModel, ControlNumbers, Conversion, ConvertError, EnvelopeConfig, FieldIssue, check,
    convert_file,
};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::cli::{CheckArgs, ConvertArgs, EnvelopeArgs};
use crate::logging::redact_value;

/// Result of `convert`.
#[derive(Debug)]
pub struct ConvertOutcome {
    pub conversion: Conversion,
    /// Where the document was written; `None` means stdout.
    pub output: Option<PathBuf>,
}

/// Result of `check`: either a valid model or the issues that prevent one.
#[derive(Debug)]
pub enum CheckOutcome {
    Valid(Box<ClaimModel>),
    Invalid(Vec<FieldIssue>),
}

/// Build the envelope configuration from `--envelope` and the flags.
///
/// `now` fills the creation timestamp when the settings file has none and
/// seeds the control numbers when neither the flags nor the file set them.
pub fn envelope_config(args: &EnvelopeArgs, now: NaiveDateTime) -> Result<EnvelopeConfig> {
    let mut value = match &args.envelope {
        Some(path) => read_envelope_settings(path)?,
        None => Value::Object(Map::new()),
    };
    let Some(settings) = value.as_object_mut() else {
        bail!("envelope settings must be a JSON object");
    };

    settings
        .entry("created")
        .or_insert_with(|| Value::String(now.format("%Y-%m-%dT%H:%M:%S").to_string()));
    for (key, flag) in [
        ("sender_id", &args.sender_id),
        ("receiver_id", &args.receiver_id),
        ("sender_qualifier", &args.sender_qualifier),
        ("receiver_qualifier", &args.receiver_qualifier),
    ] {
        if let Some(flag) = flag {
            settings.insert(key.to_string(), Value::String(flag.clone()));
        }
    }
    for (key, flag) in [("sender_id", "--sender-id"), ("receiver_id", "--receiver-id")] {
        if !settings.contains_key(key) {
            bail!("{flag} is required (or set {key} in the --envelope file)");
        }
    }
    let has_control_numbers = settings.contains_key("control_numbers");

    let mut config: EnvelopeConfig =
        serde_json::from_value(value).context("invalid envelope settings")?;
    if let Some(number) = args.control_number {
        config = config.with_control_numbers(ControlNumbers::new(number, number, number));
    } else if !has_control_numbers {
        let seed = now.and_utc().timestamp().unsigned_abs();
        config = config.with_control_numbers(ControlNumbers::from_seed(seed));
    }
    if args.production {
        config = config.production();
    }
    if args.compact {
        config = config.with_line_break(false);
    }
    Ok(config)
}

fn read_envelope_settings(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read envelope settings {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parse envelope settings {}", path.display()))
}

pub fn run_convert(args: &ConvertArgs, now: NaiveDateTime) -> Result<ConvertOutcome> {
    let config = envelope_config(&args.envelope, now)?;
    let conversion = convert_file(&args.input, &config)
        .with_context(|| format!("convert {}", args.input.display()))?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, conversion.text())
                .with_context(|| format!("write {}", path.display()))?;
            info!(
                claim = redact_value(&conversion.claim_number),
                output = %path.display(),
                "document written"
            );
        }
        None => print!("{}", conversion.text()),
    }
    Ok(ConvertOutcome {
        conversion,
        output: args.output.clone(),
    })
}

pub fn run_check(args: &CheckArgs) -> Result<CheckOutcome> {
    match check(&args.input) {
        Ok(model) => {
            info!(
                claim = redact_value(&model.claim().claim_number),
                "claim is valid"
            );
            Ok(CheckOutcome::Valid(Box::new(model)))
        }
        Err(ConvertError::Validation(error)) => {
            warn!(issues = error.len(), "claim failed validation");
            Ok(CheckOutcome::Invalid(error.into_issues()))
        }
        Err(error) => Err(error).with_context(|| format!("check {}", args.input.display())),
    }
}

/// Validation issues behind a failed command, if that is why it failed.
pub fn validation_issues(error: &anyhow::Error) -> Option<&[FieldIssue]> {
    error
        .downcast_ref::<ConvertError>()
        .and_then(ConvertError::validation)
        .map(|error| error.issues())
}
