//! Element value formatting: free text, money, dates.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::delimiters::Delimiters;
use crate::error::{EncodingError, Result};

/// Element maximum lengths from the 005010X222A1 guide.
pub mod max_len {
    /// NM103 last or organization name.
    pub const NAME_LAST: usize = 60;
    /// NM104 first name.
    pub const NAME_FIRST: usize = 35;
    /// NM105 middle name.
    pub const NAME_MIDDLE: usize = 25;
    /// NM109 identification code.
    pub const ID_CODE: usize = 80;
    /// N301 / N302 address line.
    pub const ADDRESS: usize = 55;
    /// N401 city.
    pub const CITY: usize = 30;
    /// CLM01 patient control number.
    pub const CLAIM_NUMBER: usize = 38;
    /// REF02 reference identification.
    pub const REFERENCE: usize = 50;
    /// SBR03 group number.
    pub const GROUP_NUMBER: usize = 50;
    /// PER02 contact name.
    pub const CONTACT_NAME: usize = 60;
    /// PER04 communication number.
    pub const PHONE: usize = 256;
}

/// Applies the free-text rules to caller-supplied values.
///
/// A value containing any configured delimiter is rejected with the field's
/// input path; otherwise it is trimmed, uppercased and cut to `max` chars with no
/// trailing space.
#[derive(Debug, Clone, Copy)]
pub struct TextRules<'a> {
    delimiters: &'a Delimiters,
}

impl<'a> TextRules<'a> {
    pub fn new(delimiters: &'a Delimiters) -> Self {
        Self { delimiters }
    }

    pub fn clean(&self, path: &str, value: &str, max: usize) -> Result<String> {
        if let Some(delimiter) = self.delimiters.find_in(value) {
            return Err(EncodingError::delimiter_in_field(path, delimiter));
        }
        Ok(truncate(&value.trim().to_uppercase(), max))
    }

    pub fn clean_optional(
        &self,
        path: &str,
        value: Option<&str>,
        max: usize,
    ) -> Result<Option<String>> {
        value.map(|value| self.clean(path, value, max)).transpose()
    }
}

/// Cut to `max` chars, then drop any space the cut left at the end.
fn truncate(value: &str, max: usize) -> String {
    let cut: String = value.chars().take(max).collect();
    cut.trim_end().to_string()
}

/// Money with exactly two decimals, no symbols or separators.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// CCYYMMDD.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// YYMMDD, used only by ISA09.
pub fn format_short_date(datetime: NaiveDateTime) -> String {
    datetime.format("%y%m%d").to_string()
}

/// HHMM.
pub fn format_time(datetime: NaiveDateTime) -> String {
    datetime.format("%H%M").to_string()
}

/// Left-justify and space-pad to a fixed width (ISA06 / ISA08).
pub fn pad_right(value: &str, width: usize) -> String {
    format!("{value:<width$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_uppercases_and_truncates() {
        let delimiters = Delimiters::default();
        let rules = TextRules::new(&delimiters);
        assert_eq!(rules.clean("a", "  Riverside Clinic ", 60).unwrap(), "RIVERSIDE CLINIC");
        assert_eq!(rules.clean("a", "abcdef", 3).unwrap(), "ABC");
    }

    #[test]
    fn truncation_never_ends_on_a_space() {
        let delimiters = Delimiters::default();
        let rules = TextRules::new(&delimiters);
        assert_eq!(rules.clean("a", "Riverside Clinic", 10).unwrap(), "RIVERSIDE");
        assert_eq!(rules.clean("a", "Ann  Lee", 5).unwrap(), "ANN");
        assert_eq!(rules.clean("a", "Riverside Clinic", 11).unwrap(), "RIVERSIDE C");
    }

    #[test]
    fn clean_rejects_every_delimiter() {
        let delimiters = Delimiters::default();
        let rules = TextRules::new(&delimiters);
        for (value, expected) in [("A*B", '*'), ("A~B", '~'), ("A:B", ':'), ("A^B", '^')] {
            assert_eq!(
                rules.clean("billing.organizationName", value, 60),
                Err(EncodingError::DelimiterInField {
                    path: "billing.organizationName".to_string(),
                    delimiter: expected,
                })
            );
        }
    }

    #[test]
    fn amounts_have_two_decimals() {
        assert_eq!(format_amount(Decimal::new(150, 0)), "150.00");
        assert_eq!(format_amount(Decimal::new(955, 1)), "95.50");
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
    }

    #[test]
    fn dates_and_times() {
        let created = NaiveDate::from_ymd_opt(2024, 7, 2)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        assert_eq!(format_date(created.date()), "20240702");
        assert_eq!(format_short_date(created), "240702");
        assert_eq!(format_time(created), "0905");
        assert_eq!(pad_right("ABC", 6), "ABC   ");
    }
}
