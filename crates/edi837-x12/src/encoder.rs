//! Claim encoder: model plus envelope configuration in, document text out.

use edi837_model::ClaimModel;
use tracing::debug;

use crate::config::EnvelopeConfig;
use crate::envelope::{FunctionalGroup, Interchange, TransactionSet};
use crate::error::Result;
use crate::professional::write_claim;
use crate::render::render;
use crate::segment::Segment;

/// A rendered interchange with the counts it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
    segment_count: usize,
    transaction_set_segments: usize,
}

impl Document {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Every segment in the interchange, ISA through IEA.
    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    /// The SE01 value: segments from ST through SE.
    pub fn transaction_set_segments(&self) -> usize {
        self.transaction_set_segments
    }
}

/// Encodes validated claims under one envelope configuration.
///
/// The configuration is validated once, on construction.
#[derive(Debug, Clone, Copy)]
pub struct ClaimEncoder<'a> {
    config: &'a EnvelopeConfig,
}

impl<'a> ClaimEncoder<'a> {
    pub fn new(config: &'a EnvelopeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EnvelopeConfig {
        self.config
    }

    /// Build the envelope structure without rendering it.
    pub fn build(&self, model: &ClaimModel) -> Result<Interchange> {
        let mut transaction_set =
            TransactionSet::new(self.config.control_numbers.transaction_set_text());
        write_claim(&mut transaction_set, model, self.config)?;

        let mut group = FunctionalGroup::new(self.config);
        group.push(transaction_set);
        let mut interchange = Interchange::new(self.config);
        interchange.push(group);
        Ok(interchange)
    }

    /// Flattened ISA..IEA segment sequence.
    pub fn segments(&self, model: &ClaimModel) -> Result<Vec<Segment>> {
        self.build(model)?.into_segments()
    }

    pub fn encode_document(&self, model: &ClaimModel) -> Result<Document> {
        let segments = self.segments(model)?;
        let text = render(
            &segments,
            &self.config.delimiters,
            self.config.line_break,
        )?;
        let start = segments.iter().position(|s| s.id() == "ST");
        let end = segments.iter().position(|s| s.id() == "SE");
        let transaction_set_segments = match (start, end) {
            (Some(start), Some(end)) => end - start + 1,
            _ => 0,
        };
        debug!(
            segments = segments.len(),
            transaction_set_segments,
            bytes = text.len(),
            "interchange rendered"
        );
        Ok(Document {
            text,
            segment_count: segments.len(),
            transaction_set_segments,
        })
    }

    pub fn encode(&self, model: &ClaimModel) -> Result<String> {
        self.encode_document(model).map(Document::into_text)
    }
}

/// Encode one claim as a complete 837P interchange.
///
/// This is a convenience function that validates the configuration and
/// encodes in one call.
pub fn encode(model: &ClaimModel, config: &EnvelopeConfig) -> Result<String> {
    ClaimEncoder::new(config)?.encode(model)
}
