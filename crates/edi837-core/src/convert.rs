//! Conversion entry points: JSON claim in, 837P text out.
//!
//! Each call runs three stages in order and stops at the first failure:
//! 1. **Read**: load the input file (path-based entry points only)
//! 2. **Parse**: deserialize and validate into a [`ClaimModel`]
//! 3. **Encode**: build and render the interchange
//!
//! Nothing is written anywhere; callers decide what to do with the text.

use std::path::Path;
use std::time::{Duration, Instant};

use edi837_model::ClaimModel;
use edi837_x12::{ClaimEncoder, Document, EnvelopeConfig};
use tracing::{debug, info, info_span};

use crate::error::{ConvertError, Result};

/// Result of one successful conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub document: Document,
    /// Patient control number of the encoded claim.
    pub claim_number: String,
    pub service_lines: usize,
    pub elapsed: Duration,
}

impl Conversion {
    pub fn text(&self) -> &str {
        self.document.text()
    }

    pub fn into_text(self) -> String {
        self.document.into_text()
    }
}

/// Read a claim file into memory.
pub fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ConvertError::io(path, source))
}

/// Deserialize and validate a claim without encoding it.
pub fn parse_claim(json: &str) -> Result<ClaimModel> {
    let model = ClaimModel::from_json(json)?;
    debug!(
        service_lines = model.service_lines().len(),
        dependent = model.has_dependent_patient(),
        "claim validated"
    );
    Ok(model)
}

/// Validate the claim file at `path`.
pub fn check(path: &Path) -> Result<ClaimModel> {
    let span = info_span!("check", path = %path.display());
    let _guard = span.enter();
    parse_claim(&read_input(path)?)
}

/// Encode an already validated model.
pub fn encode_model(model: &ClaimModel, config: &EnvelopeConfig) -> Result<Conversion> {
    let start = Instant::now();
    let document = ClaimEncoder::new(config)?.encode_document(model)?;
    let elapsed = start.elapsed();
    info!(
        segments = document.segment_count(),
        transaction_set_segments = document.transaction_set_segments(),
        service_lines = model.service_lines().len(),
        duration_ms = elapsed.as_millis(),
        "claim encoded"
    );
    Ok(Conversion {
        document,
        claim_number: model.claim().claim_number.clone(),
        service_lines: model.service_lines().len(),
        elapsed,
    })
}

/// Parse, validate and encode one JSON claim.
pub fn convert_document(json: &str, config: &EnvelopeConfig) -> Result<Conversion> {
    let model = parse_claim(json)?;
    encode_model(&model, config)
}

/// Convert a JSON claim held in memory.
pub fn convert_str(json: &str, config: &EnvelopeConfig) -> Result<String> {
    convert_document(json, config).map(Conversion::into_text)
}

/// Convert the claim file at `path`.
pub fn convert_file(path: &Path, config: &EnvelopeConfig) -> Result<Conversion> {
    let span = info_span!("convert", path = %path.display());
    let _guard = span.enter();
    convert_document(&read_input(path)?, config)
}

/// Convert the claim file at `path` into 837P text.
pub fn convert(path: impl AsRef<Path>, config: &EnvelopeConfig) -> Result<String> {
    convert_file(path.as_ref(), config).map(Conversion::into_text)
}
