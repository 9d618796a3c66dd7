//! Validated claim entities.
//!
//! A [`ClaimModel`] can only be obtained from [`ClaimModel::parse`] (or the
//! JSON convenience wrapper), so holding one means every field rule has
//! already passed.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::enums::{
    ClaimFilingCode, ClaimFrequency, DiagnosisQualifier, Gender, PaymentResponsibility, PlanParticipation,
    RelationshipCode, ReleaseOfInformation, YesNo,
};
use crate::ids::{
    DiagnosisCode, Modifier, Npi, PlaceOfService, ProcedureCode, StateCode, TaxId, TaxonomyCode,
    ZipCode,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName {
    pub last: String,
    pub first: Option<String>,
    pub middle: Option<String>,
}

/// NM102 entity type: person (1) or non-person (2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityName {
    Organization(String),
    Person(PersonName),
}

impl EntityName {
    pub fn entity_type_qualifier(&self) -> &'static str {
        match self {
            EntityName::Person(_) => "1",
            EntityName::Organization(_) => "2",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: StateCode,
    pub zip: ZipCode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub phone: String,
}

/// Submitter or receiver named in the 1000 loops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
    pub name: String,
    pub id: String,
    pub contact: Option<Contact>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingProvider {
    pub name: EntityName,
    pub npi: Npi,
    pub tax_id: TaxId,
    pub taxonomy: Option<TaxonomyCode>,
    pub address: Address,
    pub contact: Option<Contact>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependent {
    pub name: PersonName,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub address: Address,
    pub relationship: RelationshipCode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    pub name: PersonName,
    pub member_id: String,
    pub group_number: Option<String>,
    pub address: Address,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Gender,
    pub responsibility: PaymentResponsibility,
    pub dependent: Option<Dependent>,
}

/// The person who received care: the subscriber or their dependent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patient<'a> {
    Subscriber(&'a Subscriber),
    Dependent(&'a Dependent),
}

impl<'a> Patient<'a> {
    pub fn name(&self) -> &'a PersonName {
        match self {
            Patient::Subscriber(subscriber) => &subscriber.name,
            Patient::Dependent(dependent) => &dependent.name,
        }
    }

    pub fn date_of_birth(&self) -> Option<NaiveDate> {
        match self {
            Patient::Subscriber(subscriber) => subscriber.date_of_birth,
            Patient::Dependent(dependent) => Some(dependent.date_of_birth),
        }
    }

    pub fn gender(&self) -> Gender {
        match self {
            Patient::Subscriber(subscriber) => subscriber.gender,
            Patient::Dependent(dependent) => dependent.gender,
        }
    }

    pub fn address(&self) -> &'a Address {
        match self {
            Patient::Subscriber(subscriber) => &subscriber.address,
            Patient::Dependent(dependent) => &dependent.address,
        }
    }

    pub fn relationship(&self) -> RelationshipCode {
        match self {
            Patient::Subscriber(_) => RelationshipCode::SelfCode,
            Patient::Dependent(dependent) => dependent.relationship,
        }
    }

    pub fn is_subscriber(&self) -> bool {
        matches!(self, Patient::Subscriber(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payer {
    pub name: String,
    pub payer_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderingProvider {
    pub name: PersonName,
    pub npi: Npi,
    pub taxonomy: Option<TaxonomyCode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFacility {
    pub name: String,
    pub npi: Option<Npi>,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnosis {
    pub qualifier: DiagnosisQualifier,
    pub code: DiagnosisCode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorAuthorization {
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceLine {
    /// 1-based position in the caller's input.
    pub line_number: u32,
    pub procedure: ProcedureCode,
    pub modifiers: Vec<Modifier>,
    pub charge: Decimal,
    pub units: u32,
    pub service_date: NaiveDate,
    pub place_of_service: Option<PlaceOfService>,
    /// Loop 2420A, when this line was rendered by someone other than the
    /// claim-level rendering provider.
    pub rendering_provider: Option<RenderingProvider>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub claim_number: String,
    pub total_charge: Decimal,
    pub place_of_service: PlaceOfService,
    pub frequency: ClaimFrequency,
    pub filing: ClaimFilingCode,
    pub signature_on_file: YesNo,
    pub participation: PlanParticipation,
    pub release_of_information: ReleaseOfInformation,
    pub benefits_assigned: YesNo,
    /// First entry is the principal diagnosis.
    pub diagnoses: Vec<Diagnosis>,
    pub prior_authorization: Option<PriorAuthorization>,
    pub rendering_provider: Option<RenderingProvider>,
    pub service_facility: Option<ServiceFacility>,
    pub service_lines: Vec<ServiceLine>,
}

/// One complete, validated professional claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimModel {
    pub(crate) submitter: Option<Party>,
    pub(crate) receiver: Option<Party>,
    pub(crate) billing_provider: BillingProvider,
    pub(crate) subscriber: Subscriber,
    pub(crate) payer: Payer,
    pub(crate) claim: Claim,
}

impl ClaimModel {
    pub fn submitter(&self) -> Option<&Party> {
        self.submitter.as_ref()
    }

    pub fn receiver(&self) -> Option<&Party> {
        self.receiver.as_ref()
    }

    pub fn billing_provider(&self) -> &BillingProvider {
        &self.billing_provider
    }

    pub fn subscriber(&self) -> &Subscriber {
        &self.subscriber
    }

    pub fn payer(&self) -> &Payer {
        &self.payer
    }

    pub fn claim(&self) -> &Claim {
        &self.claim
    }

    pub fn service_lines(&self) -> &[ServiceLine] {
        &self.claim.service_lines
    }

    /// The patient: the linked dependent if present, otherwise the subscriber.
    pub fn patient(&self) -> Patient<'_> {
        match &self.subscriber.dependent {
            Some(dependent) => Patient::Dependent(dependent),
            None => Patient::Subscriber(&self.subscriber),
        }
    }

    pub fn has_dependent_patient(&self) -> bool {
        self.subscriber.dependent.is_some()
    }
}
