//! Raw claim document as it arrives on the wire.
//!
//! Every field is optional so that a missing value surfaces as a
//! [`crate::FieldIssue`] with its path instead of a serde failure. Only
//! genuine type mismatches (an object where a string belongs, a boolean
//! amount) make deserialization itself fail.

use serde::Deserialize;

/// A scalar that may arrive as a JSON string or a JSON number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Text(String),
    Number(serde_json::Number),
}

impl RawScalar {
    pub fn to_text(&self) -> String {
        match self {
            RawScalar::Text(text) => text.trim().to_string(),
            RawScalar::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimInput {
    pub submitter: Option<PartyInput>,
    pub receiver: Option<PartyInput>,
    pub billing: Option<BillingInput>,
    pub subscriber: Option<SubscriberInput>,
    pub dependent: Option<DependentInput>,
    pub payer: Option<PayerInput>,
    pub rendering: Option<RenderingInput>,
    pub claim_information: Option<ClaimInformationInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    pub name: Option<String>,
    pub phone_number: Option<String>,
}

/// Submitter (1000A) or receiver (1000B).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyInput {
    pub organization_name: Option<String>,
    pub id: Option<String>,
    pub contact_information: Option<ContactInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingInput {
    pub npi: Option<String>,
    pub employer_id: Option<String>,
    pub taxonomy_code: Option<String>,
    pub organization_name: Option<String>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub address: Option<AddressInput>,
    pub contact_information: Option<ContactInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberInput {
    pub member_id: Option<String>,
    pub group_number: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub address: Option<AddressInput>,
    pub payment_responsibility_level_code: Option<String>,
    pub relationship_to_subscriber_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependentInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub address: Option<AddressInput>,
    pub relationship_to_subscriber_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayerInput {
    pub organization_name: Option<String>,
    pub payer_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderingInput {
    pub npi: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub taxonomy_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimInformationInput {
    pub patient_control_number: Option<String>,
    pub claim_charge_amount: Option<RawScalar>,
    pub place_of_service_code: Option<RawScalar>,
    pub claim_frequency_code: Option<RawScalar>,
    pub claim_filing_code: Option<String>,
    pub signature_indicator: Option<String>,
    pub plan_participation_code: Option<String>,
    pub release_information_code: Option<String>,
    pub benefits_assignment_certification_indicator: Option<String>,
    #[serde(default)]
    pub health_care_code_information: Vec<DiagnosisInput>,
    pub claim_supplemental_information: Option<SupplementalInput>,
    pub service_facility_location: Option<FacilityInput>,
    #[serde(default)]
    pub service_lines: Vec<ServiceLineInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisInput {
    /// `ABK`/`ABF` (ICD-10) or `BK`/`BF` (ICD-9); defaults by position.
    pub diagnosis_type_code: Option<String>,
    pub diagnosis_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplementalInput {
    pub prior_authorization_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityInput {
    pub organization_name: Option<String>,
    pub npi: Option<String>,
    pub address: Option<AddressInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLineInput {
    pub service_date: Option<String>,
    pub professional_service: Option<ProfessionalServiceInput>,
    pub rendering_provider: Option<RenderingInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalServiceInput {
    pub procedure_code: Option<String>,
    #[serde(default)]
    pub procedure_modifiers: Vec<String>,
    pub line_item_charge_amount: Option<RawScalar>,
    pub service_unit_count: Option<RawScalar>,
    pub place_of_service_code: Option<RawScalar>,
}

impl ClaimInput {
    /// Deserialize a claim document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_accept_strings_and_numbers() {
        let line: ProfessionalServiceInput = serde_json::from_str(
            r#"{"procedureCode":"99213","lineItemChargeAmount":150.5,"serviceUnitCount":"2"}"#,
        )
        .unwrap();
        assert_eq!(line.line_item_charge_amount.unwrap().to_text(), "150.5");
        assert_eq!(line.service_unit_count.unwrap().to_text(), "2");
        assert!(line.procedure_modifiers.is_empty());
    }

    #[test]
    fn boolean_amount_is_a_type_mismatch() {
        let result: Result<ProfessionalServiceInput, _> =
            serde_json::from_str(r#"{"lineItemChargeAmount":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let input = ClaimInput::from_json(r#"{"billing":{"npi":"1234567893","extra":1}}"#).unwrap();
        assert_eq!(input.billing.unwrap().npi.as_deref(), Some("1234567893"));
    }
}
