//! Code sets used by the claim model.
//!
//! Every enum carries the X12 code it renders to (`code()`) and accepts
//! either that code or a readable alias when parsed (case-insensitive).

use std::fmt;
use std::str::FromStr;

/// Administrative gender (DMG03).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Unknown => "U",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "M" | "MALE" => Ok(Gender::Male),
            "F" | "FEMALE" => Ok(Gender::Female),
            "U" | "UNKNOWN" => Ok(Gender::Unknown),
            _ => Err("expected M, F or U".to_string()),
        }
    }
}

/// Individual relationship code (SBR02 / PAT01).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipCode {
    /// 18: the patient is the subscriber.
    SelfCode,
    /// 01
    Spouse,
    /// 19
    Child,
    /// 20
    Employee,
    /// 21
    Unknown,
    /// 39
    OrganDonor,
    /// 40
    CadaverDonor,
    /// 53
    LifePartner,
    /// G8
    Other,
}

impl RelationshipCode {
    pub fn code(&self) -> &'static str {
        match self {
            RelationshipCode::SelfCode => "18",
            RelationshipCode::Spouse => "01",
            RelationshipCode::Child => "19",
            RelationshipCode::Employee => "20",
            RelationshipCode::Unknown => "21",
            RelationshipCode::OrganDonor => "39",
            RelationshipCode::CadaverDonor => "40",
            RelationshipCode::LifePartner => "53",
            RelationshipCode::Other => "G8",
        }
    }

    pub fn is_self(&self) -> bool {
        matches!(self, RelationshipCode::SelfCode)
    }
}

impl FromStr for RelationshipCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "18" | "SELF" => Ok(RelationshipCode::SelfCode),
            "01" | "SPOUSE" => Ok(RelationshipCode::Spouse),
            "19" | "CHILD" => Ok(RelationshipCode::Child),
            "20" | "EMPLOYEE" => Ok(RelationshipCode::Employee),
            "21" | "UNKNOWN" => Ok(RelationshipCode::Unknown),
            "39" | "ORGAN DONOR" => Ok(RelationshipCode::OrganDonor),
            "40" | "CADAVER DONOR" => Ok(RelationshipCode::CadaverDonor),
            "53" | "LIFE PARTNER" => Ok(RelationshipCode::LifePartner),
            "G8" | "OTHER" => Ok(RelationshipCode::Other),
            _ => Err(format!("unknown relationship code '{}'", s.trim())),
        }
    }
}

impl fmt::Display for RelationshipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Payer responsibility sequence (SBR01).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaymentResponsibility {
    #[default]
    Primary,
    Secondary,
    Tertiary,
}

impl PaymentResponsibility {
    pub fn code(&self) -> &'static str {
        match self {
            PaymentResponsibility::Primary => "P",
            PaymentResponsibility::Secondary => "S",
            PaymentResponsibility::Tertiary => "T",
        }
    }
}

impl FromStr for PaymentResponsibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "P" | "PRIMARY" => Ok(PaymentResponsibility::Primary),
            "S" | "SECONDARY" => Ok(PaymentResponsibility::Secondary),
            "T" | "TERTIARY" => Ok(PaymentResponsibility::Tertiary),
            _ => Err("expected P, S or T".to_string()),
        }
    }
}

/// Claim filing indicator (SBR09).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClaimFilingCode {
    BlueCrossBlueShield,
    Medicaid,
    MedicarePartB,
    Commercial,
    #[default]
    MutuallyDefined,
}

impl ClaimFilingCode {
    pub fn code(&self) -> &'static str {
        match self {
            ClaimFilingCode::BlueCrossBlueShield => "BL",
            ClaimFilingCode::Medicaid => "MC",
            ClaimFilingCode::MedicarePartB => "MB",
            ClaimFilingCode::Commercial => "CI",
            ClaimFilingCode::MutuallyDefined => "ZZ",
        }
    }
}

impl FromStr for ClaimFilingCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BL" => Ok(ClaimFilingCode::BlueCrossBlueShield),
            "MC" => Ok(ClaimFilingCode::Medicaid),
            "MB" => Ok(ClaimFilingCode::MedicarePartB),
            "CI" => Ok(ClaimFilingCode::Commercial),
            "ZZ" => Ok(ClaimFilingCode::MutuallyDefined),
            _ => Err("expected BL, MC, MB, CI or ZZ".to_string()),
        }
    }
}

/// Claim frequency type (CLM05-3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClaimFrequency {
    #[default]
    Original,
    Replacement,
    Void,
}

impl ClaimFrequency {
    pub fn code(&self) -> &'static str {
        match self {
            ClaimFrequency::Original => "1",
            ClaimFrequency::Replacement => "7",
            ClaimFrequency::Void => "8",
        }
    }
}

impl FromStr for ClaimFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(ClaimFrequency::Original),
            "7" => Ok(ClaimFrequency::Replacement),
            "8" => Ok(ClaimFrequency::Void),
            _ => Err("expected 1, 7 or 8".to_string()),
        }
    }
}

/// Y/N indicator (CLM06, CLM08).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn code(&self) -> &'static str {
        match self {
            YesNo::Yes => "Y",
            YesNo::No => "N",
        }
    }
}

impl FromStr for YesNo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "Y" | "YES" => Ok(YesNo::Yes),
            "N" | "NO" => Ok(YesNo::No),
            _ => Err("expected Y or N".to_string()),
        }
    }
}

/// Provider accept-assignment code (CLM07).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlanParticipation {
    #[default]
    Assigned,
    AssignedLabServicesOnly,
    NotAssigned,
}

impl PlanParticipation {
    pub fn code(&self) -> &'static str {
        match self {
            PlanParticipation::Assigned => "A",
            PlanParticipation::AssignedLabServicesOnly => "B",
            PlanParticipation::NotAssigned => "C",
        }
    }
}

impl FromStr for PlanParticipation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(PlanParticipation::Assigned),
            "B" => Ok(PlanParticipation::AssignedLabServicesOnly),
            "C" => Ok(PlanParticipation::NotAssigned),
            _ => Err("expected A, B or C".to_string()),
        }
    }
}

/// Release of information code (CLM09).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReleaseOfInformation {
    #[default]
    Yes,
    Informed,
}

impl ReleaseOfInformation {
    pub fn code(&self) -> &'static str {
        match self {
            ReleaseOfInformation::Yes => "Y",
            ReleaseOfInformation::Informed => "I",
        }
    }
}

impl FromStr for ReleaseOfInformation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "Y" => Ok(ReleaseOfInformation::Yes),
            "I" => Ok(ReleaseOfInformation::Informed),
            _ => Err("expected Y or I".to_string()),
        }
    }
}

/// HI01-1 code list qualifier for a diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosisQualifier {
    /// ABK: ICD-10-CM principal diagnosis.
    Icd10Principal,
    /// ABF: ICD-10-CM diagnosis.
    Icd10,
    /// BK: ICD-9-CM principal diagnosis.
    Icd9Principal,
    /// BF: ICD-9-CM diagnosis.
    Icd9,
}

impl DiagnosisQualifier {
    /// `ABK` for the first diagnosis, `ABF` for the rest.
    pub fn for_position(index: usize) -> Self {
        if index == 0 {
            DiagnosisQualifier::Icd10Principal
        } else {
            DiagnosisQualifier::Icd10
        }
    }

    pub fn is_icd10(&self) -> bool {
        matches!(
            self,
            DiagnosisQualifier::Icd10Principal | DiagnosisQualifier::Icd10
        )
    }

    pub fn code(&self) -> &'static str {
        match self {
            DiagnosisQualifier::Icd10Principal => "ABK",
            DiagnosisQualifier::Icd10 => "ABF",
            DiagnosisQualifier::Icd9Principal => "BK",
            DiagnosisQualifier::Icd9 => "BF",
        }
    }
}

impl FromStr for DiagnosisQualifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ABK" => Ok(DiagnosisQualifier::Icd10Principal),
            "ABF" => Ok(DiagnosisQualifier::Icd10),
            "BK" => Ok(DiagnosisQualifier::Icd9Principal),
            "BF" => Ok(DiagnosisQualifier::Icd9),
            _ => Err("expected ABK, ABF, BK or BF".to_string()),
        }
    }
}
