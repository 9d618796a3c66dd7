//! Ordered envelope builders.
//!
//! Each level owns the segments (or child levels) pushed into it and writes
//! its own header and trailer when flattened. Trailer counts are taken from
//! what the builder holds at that moment, so they cannot drift from the
//! emitted content.

use crate::config::EnvelopeConfig;
use crate::error::{EncodingError, Result};
use crate::segment::Segment;
use crate::text::{format_date, format_short_date, format_time, pad_right};

/// Transaction set identifier for a health care claim.
pub const TRANSACTION_SET_ID: &str = "837";
/// Implementation convention reference for the professional claim.
pub const IMPLEMENTATION_REFERENCE: &str = "005010X222A1";
/// ISA12 interchange control version.
pub const INTERCHANGE_VERSION: &str = "00501";
/// GS01 functional identifier for health care claims.
pub const FUNCTIONAL_ID: &str = "HC";
/// GS07 responsible agency (Accredited Standards Committee X12).
pub const RESPONSIBLE_AGENCY: &str = "X";

/// One ST..SE transaction set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSet {
    control_number: String,
    body: Vec<Segment>,
}

impl TransactionSet {
    pub fn new(control_number: impl Into<String>) -> Self {
        Self {
            control_number: control_number.into(),
            body: Vec::new(),
        }
    }

    pub fn control_number(&self) -> &str {
        &self.control_number
    }

    pub fn push(&mut self, segment: Segment) {
        self.body.push(segment);
    }

    pub fn body(&self) -> &[Segment] {
        &self.body
    }

    /// Segments from ST through SE inclusive.
    pub fn len(&self) -> usize {
        self.body.len() + 2
    }

    /// True when nothing has been pushed between ST and SE.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn into_segments(self) -> Result<Vec<Segment>> {
        if self.body.is_empty() {
            return Err(EncodingError::MinimumOccurrence {
                structure: "transaction set body",
                minimum: 1,
                actual: 0,
            });
        }
        let count = self.len();
        let mut segments = Vec::with_capacity(count);
        segments.push(
            Segment::new("ST")
                .element(TRANSACTION_SET_ID)
                .element(self.control_number.as_str())
                .element(IMPLEMENTATION_REFERENCE),
        );
        segments.extend(self.body);
        segments.push(
            Segment::new("SE")
                .element(count.to_string())
                .element(self.control_number),
        );
        Ok(segments)
    }
}

/// One GS..GE functional group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionalGroup {
    header: Segment,
    control_number: String,
    transaction_sets: Vec<TransactionSet>,
}

impl FunctionalGroup {
    pub fn new(config: &EnvelopeConfig) -> Self {
        let control_number = config.control_numbers.group_text();
        let header = Segment::new("GS")
            .element(FUNCTIONAL_ID)
            .element(config.application_sender().trim())
            .element(config.application_receiver().trim())
            .element(format_date(config.created.date()))
            .element(format_time(config.created))
            .element(control_number.as_str())
            .element(RESPONSIBLE_AGENCY)
            .element(IMPLEMENTATION_REFERENCE);
        Self {
            header,
            control_number,
            transaction_sets: Vec::new(),
        }
    }

    pub fn push(&mut self, transaction_set: TransactionSet) {
        self.transaction_sets.push(transaction_set);
    }

    pub fn len(&self) -> usize {
        self.transaction_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_sets.is_empty()
    }

    pub fn into_segments(self) -> Result<Vec<Segment>> {
        if self.transaction_sets.is_empty() {
            return Err(EncodingError::MinimumOccurrence {
                structure: "functional group",
                minimum: 1,
                actual: 0,
            });
        }
        let count = self.transaction_sets.len();
        let mut segments = vec![self.header];
        for transaction_set in self.transaction_sets {
            segments.extend(transaction_set.into_segments()?);
        }
        segments.push(
            Segment::new("GE")
                .element(count.to_string())
                .element(self.control_number),
        );
        Ok(segments)
    }
}

/// One ISA..IEA interchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interchange {
    header: Segment,
    control_number: String,
    groups: Vec<FunctionalGroup>,
}

impl Interchange {
    pub fn new(config: &EnvelopeConfig) -> Self {
        let control_number = config.control_numbers.interchange_text();
        let header = Segment::fixed("ISA")
            .element("00")
            .element(pad_right("", 10))
            .element("00")
            .element(pad_right("", 10))
            .element(config.sender_qualifier.as_str())
            .element(pad_right(config.sender_id.trim(), 15))
            .element(config.receiver_qualifier.as_str())
            .element(pad_right(config.receiver_id.trim(), 15))
            .element(format_short_date(config.created))
            .element(format_time(config.created))
            .element(config.delimiters.repetition.to_string())
            .element(INTERCHANGE_VERSION)
            .element(control_number.as_str())
            .element(if config.acknowledgment_requested { "1" } else { "0" })
            .element(config.usage.code())
            .element(config.delimiters.component.to_string());
        Self {
            header,
            control_number,
            groups: Vec::new(),
        }
    }

    pub fn push(&mut self, group: FunctionalGroup) {
        self.groups.push(group);
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Flatten into the full ISA..IEA segment sequence.
    pub fn into_segments(self) -> Result<Vec<Segment>> {
        if self.groups.is_empty() {
            return Err(EncodingError::MinimumOccurrence {
                structure: "interchange",
                minimum: 1,
                actual: 0,
            });
        }
        let count = self.groups.len();
        let mut segments = vec![self.header];
        for group in self.groups {
            segments.extend(group.into_segments()?);
        }
        segments.push(
            Segment::new("IEA")
                .element(count.to_string())
                .element(self.control_number),
        );
        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::config::ControlNumbers;
    use crate::delimiters::Delimiters;

    fn config() -> EnvelopeConfig {
        let created = NaiveDate::from_ymd_opt(2024, 7, 2)
            .unwrap()
            .and_hms_opt(15, 31, 0)
            .unwrap();
        EnvelopeConfig::new("SENDER", "RECEIVER", created)
            .with_control_numbers(ControlNumbers::new(42, 7, 3))
    }

    fn rendered(segments: &[Segment]) -> Vec<String> {
        let delimiters = Delimiters::default();
        segments.iter().map(|s| s.render(&delimiters)).collect()
    }

    #[test]
    fn transaction_set_counts_header_and_trailer() {
        let mut set = TransactionSet::new("0003");
        set.push(Segment::new("BHT").element("0019"));
        set.push(Segment::new("HL").element("1"));
        assert_eq!(set.len(), 4);

        let lines = rendered(&set.into_segments().unwrap());
        assert_eq!(lines.first().unwrap(), "ST*837*0003*005010X222A1");
        assert_eq!(lines.last().unwrap(), "SE*4*0003");
    }

    #[test]
    fn empty_levels_are_rejected() {
        assert!(matches!(
            TransactionSet::new("0001").into_segments(),
            Err(EncodingError::MinimumOccurrence { .. })
        ));
        assert!(FunctionalGroup::new(&config()).into_segments().is_err());
        assert!(Interchange::new(&config()).into_segments().is_err());
    }

    #[test]
    fn nested_trailers_count_children() {
        let config = config();
        let mut group = FunctionalGroup::new(&config);
        for _ in 0..2 {
            let mut set = TransactionSet::new(config.control_numbers.transaction_set_text());
            set.push(Segment::new("BHT").element("0019"));
            group.push(set);
        }
        let mut interchange = Interchange::new(&config);
        interchange.push(group);

        let lines = rendered(&interchange.into_segments().unwrap());
        assert_eq!(
            lines[1],
            "GS*HC*SENDER*RECEIVER*20240702*1531*7*X*005010X222A1"
        );
        assert_eq!(lines[lines.len() - 2], "GE*2*7");
        assert_eq!(lines[lines.len() - 1], "IEA*1*000000042");
    }

    #[test]
    fn isa_is_fixed_width() {
        let isa = Interchange::new(&config()).header.render(&Delimiters::default());
        assert_eq!(isa.len(), 105);
        assert_eq!(
            isa,
            "ISA*00*          *00*          *ZZ*SENDER         *ZZ*RECEIVER       \
             *240702*1531*^*00501*000000042*0*T*:"
        );
    }
}
