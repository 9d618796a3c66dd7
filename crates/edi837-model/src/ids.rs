//! Fixed-format identifiers.
//!
//! Each newtype can only be built through [`FromStr`], which enforces the
//! length and character class of the underlying code.

use std::fmt;
use std::str::FromStr;

fn all_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

fn all_alphanumeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_alphanumeric())
}

macro_rules! string_newtype {
    ($name:ident) => {
        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

/// National Provider Identifier: exactly 10 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Npi(String);
string_newtype!(Npi);

impl FromStr for Npi {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.len() != 10 || !all_digits(value) {
            return Err("must be exactly 10 digits".to_string());
        }
        Ok(Self(value.to_string()))
    }
}

/// Employer identification number: exactly 9 digits, no separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaxId(String);
string_newtype!(TaxId);

impl FromStr for TaxId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.len() != 9 || !all_digits(value) {
            return Err("must be exactly 9 digits".to_string());
        }
        Ok(Self(value.to_string()))
    }
}

/// US postal code: 5 or 9 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZipCode(String);
string_newtype!(ZipCode);

impl FromStr for ZipCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if !matches!(value.len(), 5 | 9) || !all_digits(value) {
            return Err("must be 5 or 9 digits".to_string());
        }
        Ok(Self(value.to_string()))
    }
}

/// Two-letter state or province code, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateCode(String);
string_newtype!(StateCode);

impl FromStr for StateCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.len() != 2 || !value.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err("must be a 2-letter state code".to_string());
        }
        Ok(Self(value.to_ascii_uppercase()))
    }
}

/// CMS place-of-service code, 01 through 99.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaceOfService(u8);

impl PlaceOfService {
    pub fn value(self) -> u8 {
        self.0
    }
}

impl FromStr for PlaceOfService {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if !matches!(value.len(), 1 | 2) || !all_digits(value) {
            return Err("must be a 2-digit place of service code".to_string());
        }
        match value.parse::<u8>() {
            Ok(code @ 1..=99) => Ok(Self(code)),
            _ => Err("must be between 01 and 99".to_string()),
        }
    }
}

impl fmt::Display for PlaceOfService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// CPT or HCPCS level II procedure code: 5 alphanumerics, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcedureCode(String);
string_newtype!(ProcedureCode);

impl FromStr for ProcedureCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.len() != 5 || !all_alphanumeric(value) {
            return Err("must be 5 alphanumeric characters".to_string());
        }
        Ok(Self(value.to_ascii_uppercase()))
    }
}

/// Procedure modifier: 2 alphanumerics, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Modifier(String);
string_newtype!(Modifier);

impl FromStr for Modifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.len() != 2 || !all_alphanumeric(value) {
            return Err("must be 2 alphanumeric characters".to_string());
        }
        Ok(Self(value.to_ascii_uppercase()))
    }
}

/// ICD-10-CM diagnosis code without the decimal point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiagnosisCode(String);
string_newtype!(DiagnosisCode);

impl FromStr for DiagnosisCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: String = s.trim().chars().filter(|c| *c != '.').collect();
        if !(3..=7).contains(&value.len()) || !all_alphanumeric(&value) {
            return Err("must be a diagnosis code of 3 to 7 characters".to_string());
        }
        Ok(Self(value.to_ascii_uppercase()))
    }
}

impl DiagnosisCode {
    /// ICD-10-CM codes always open with a letter; ICD-9 codes mostly do not.
    pub fn is_icd10_shaped(&self) -> bool {
        self.0.bytes().next().is_some_and(|b| b.is_ascii_alphabetic())
    }
}

/// Healthcare provider taxonomy code: 10 alphanumerics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaxonomyCode(String);
string_newtype!(TaxonomyCode);

impl FromStr for TaxonomyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.len() != 10 || !all_alphanumeric(value) {
            return Err("must be 10 alphanumeric characters".to_string());
        }
        Ok(Self(value.to_ascii_uppercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn npi_requires_ten_digits() {
        assert_eq!("1234567893".parse::<Npi>().unwrap().as_str(), "1234567893");
        assert!("123456789".parse::<Npi>().is_err());
        assert!("12345678AB".parse::<Npi>().is_err());
        assert!("".parse::<Npi>().is_err());
    }

    #[test]
    fn tax_id_rejects_hyphenated_form() {
        assert!("123456789".parse::<TaxId>().is_ok());
        assert!("12-3456789".parse::<TaxId>().is_err());
    }

    #[test]
    fn zip_accepts_five_or_nine_digits() {
        assert!("78701".parse::<ZipCode>().is_ok());
        assert!("787011234".parse::<ZipCode>().is_ok());
        assert!("7870".parse::<ZipCode>().is_err());
        assert!("78701-1234".parse::<ZipCode>().is_err());
    }

    #[test]
    fn place_of_service_is_zero_padded() {
        let pos: PlaceOfService = "2".parse().unwrap();
        assert_eq!(pos.to_string(), "02");
        assert_eq!("11".parse::<PlaceOfService>().unwrap().value(), 11);
        assert!("00".parse::<PlaceOfService>().is_err());
        assert!("100".parse::<PlaceOfService>().is_err());
        assert!("1a".parse::<PlaceOfService>().is_err());
    }

    #[test]
    fn procedure_and_modifier_are_uppercased() {
        assert_eq!("j1100".parse::<ProcedureCode>().unwrap().as_str(), "J1100");
        assert!("9921".parse::<ProcedureCode>().is_err());
        assert_eq!("lt".parse::<Modifier>().unwrap().as_str(), "LT");
        assert!("2".parse::<Modifier>().is_err());
    }

    #[test]
    fn diagnosis_code_strips_decimal_point() {
        assert_eq!("J20.9".parse::<DiagnosisCode>().unwrap().as_str(), "J209");
        assert!("J2".parse::<DiagnosisCode>().is_err());
        assert!("J20-9".parse::<DiagnosisCode>().is_err());

        let icd9 = "466.0".parse::<DiagnosisCode>().unwrap();
        assert_eq!(icd9.as_str(), "4660");
        assert!(!icd9.is_icd10_shaped());
        assert!("V70.0".parse::<DiagnosisCode>().unwrap().is_icd10_shaped());
    }

    #[test]
    fn state_code_is_two_letters() {
        assert_eq!("tx".parse::<StateCode>().unwrap().as_str(), "TX");
        assert!("T1".parse::<StateCode>().is_err());
    }
}
