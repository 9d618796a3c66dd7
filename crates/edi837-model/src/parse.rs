//! Validating construction of a [`ClaimModel`] from a raw [`ClaimInput`].
//!
//! Every entity builder evaluates all of its fields before combining them,
//! so one bad field never hides another. Builders return `None` when any of
//! their fields failed; the issue itself is already in the [`Collector`].

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use crate::claim::{
    Address, BillingProvider, Claim, ClaimModel, Contact, Dependent, Diagnosis, EntityName, Party, Payer,
    PersonName, PriorAuthorization, RenderingProvider, ServiceFacility, ServiceLine, Subscriber,
};
use crate::enums::{
    ClaimFilingCode, ClaimFrequency, DiagnosisQualifier, Gender, PaymentResponsibility, PlanParticipation,
    RelationshipCode, ReleaseOfInformation, YesNo,
};
use crate::error::{FieldIssue, IssueKind, ValidationError};
use crate::ids::DiagnosisCode;
use crate::input::{
    AddressInput, BillingInput, ClaimInformationInput, ClaimInput, ContactInput, DependentInput,
    FacilityInput, PartyInput, PayerInput, RawScalar, RenderingInput, ServiceLineInput,
    SubscriberInput,
};

/// Diagnosis codes a professional claim can carry in one `HI` segment.
pub const MAX_DIAGNOSES: usize = 12;

/// Procedure modifiers allowed on one service line.
pub const MAX_MODIFIERS: usize = 4;

/// Largest amount an X12 `R` element of 18 digits holds with two decimals.
// 9_999_999_999_999_999.99 == Decimal::new(999_999_999_999_999_999, 2); `new` is not const.
const MAX_AMOUNT: Decimal = Decimal::from_parts(2_808_348_671, 232_830_643, 0, false, 2);

impl ClaimModel {
    /// Validate a raw claim document.
    ///
    /// Returns every violation found, each located by its JSON field path.
    /// No partially built model is ever returned.
    pub fn parse(input: ClaimInput) -> Result<Self, ValidationError> {
        let mut c = Collector::default();

        let submitter = optional_entity(&mut c, input.submitter.as_ref(), |c, party| {
            build_party(c, "submitter", party)
        });
        let receiver = optional_entity(&mut c, input.receiver.as_ref(), |c, party| {
            build_party(c, "receiver", party)
        });
        let billing = c
            .require("billing", input.billing.as_ref())
            .and_then(|billing| build_billing(&mut c, billing));
        let subscriber = c
            .require("subscriber", input.subscriber.as_ref())
            .and_then(|subscriber| build_subscriber(&mut c, subscriber, input.dependent.as_ref()));
        let payer = c
            .require("payer", input.payer.as_ref())
            .and_then(|payer| build_payer(&mut c, payer));
        let rendering = optional_entity(&mut c, input.rendering.as_ref(), |c, rendering| {
            build_rendering(c, "rendering", rendering)
        });
        let claim = c
            .require("claimInformation", input.claim_information.as_ref())
            .and_then(|info| build_claim(&mut c, info));

        match (submitter, receiver, billing, subscriber, payer, rendering, claim) {
            (
                Some(submitter),
                Some(receiver),
                Some(billing_provider),
                Some(subscriber),
                Some(payer),
                Some(rendering_provider),
                Some(mut claim),
            ) if c.is_empty() => {
                claim.rendering_provider = rendering_provider;
                debug!(
                    service_lines = claim.service_lines.len(),
                    dependent = subscriber.dependent.is_some(),
                    "claim validated"
                );
                Ok(ClaimModel {
                    submitter,
                    receiver,
                    billing_provider,
                    subscriber,
                    payer,
                    claim,
                })
            }
            _ => {
                let error = c.finish();
                debug!(issues = error.len(), "claim rejected");
                Err(error)
            }
        }
    }

    /// Deserialize and validate a claim document in one step.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        let input = ClaimInput::from_json(text)?;
        Ok(Self::parse(input)?)
    }
}

#[derive(Debug, Default)]
struct Collector {
    issues: Vec<FieldIssue>,
}

impl Collector {
    fn push(&mut self, issue: FieldIssue) {
        self.issues.push(issue);
    }

    fn report(&mut self, path: &str, kind: IssueKind, message: impl Into<String>) {
        self.push(FieldIssue::new(path, kind, message));
    }

    fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    fn finish(mut self) -> ValidationError {
        if self.issues.is_empty() {
            self.report("", IssueKind::Inconsistent, "claim could not be assembled");
        }
        ValidationError::new(self.issues)
    }

    fn require<'a, T>(&mut self, path: &str, value: Option<&'a T>) -> Option<&'a T> {
        if value.is_none() {
            self.push(FieldIssue::missing(path));
        }
        value
    }

    /// Trimmed, non-blank text or a `Missing` issue.
    fn required<'a>(&mut self, path: &str, value: Option<&'a str>) -> Option<&'a str> {
        let present = non_blank(value);
        if present.is_none() {
            self.push(FieldIssue::missing(path));
        }
        present
    }

    fn text(&mut self, path: &str, value: Option<&str>) -> Option<String> {
        self.required(path, value).map(str::to_string)
    }

    fn convert<T>(&mut self, path: &str, raw: &str) -> Option<T>
    where
        T: FromStr<Err = String>,
    {
        match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(message) => {
                self.report(path, IssueKind::InvalidFormat, message);
                None
            }
        }
    }

    fn parsed<T>(&mut self, path: &str, value: Option<&str>) -> Option<T>
    where
        T: FromStr<Err = String>,
    {
        let raw = self.required(path, value)?;
        self.convert(path, raw)
    }

    /// Absent is fine (`Some(None)`); present but invalid yields `None`.
    fn optional<T>(&mut self, path: &str, value: Option<&str>) -> Option<Option<T>>
    where
        T: FromStr<Err = String>,
    {
        match non_blank(value) {
            None => Some(None),
            Some(raw) => self.convert(path, raw).map(Some),
        }
    }

    fn or_default<T>(&mut self, path: &str, value: Option<&str>, default: T) -> Option<T>
    where
        T: FromStr<Err = String>,
    {
        self.optional(path, value).map(|parsed| parsed.unwrap_or(default))
    }

    fn date(&mut self, path: &str, value: Option<&str>) -> Option<NaiveDate> {
        let raw = self.required(path, value)?;
        self.checked_date(path, raw)
    }

    fn optional_date(&mut self, path: &str, value: Option<&str>) -> Option<Option<NaiveDate>> {
        match non_blank(value) {
            None => Some(None),
            Some(raw) => self.checked_date(path, raw).map(Some),
        }
    }

    fn checked_date(&mut self, path: &str, raw: &str) -> Option<NaiveDate> {
        match parse_date(raw) {
            Ok(date) => Some(date),
            Err(message) => {
                self.report(path, IssueKind::InvalidFormat, message);
                None
            }
        }
    }

    fn amount(&mut self, path: &str, value: Option<&RawScalar>) -> Option<Decimal> {
        let text = value.map(RawScalar::to_text);
        let raw = self.required(path, text.as_deref())?;
        match parse_amount(raw) {
            Ok(amount) => Some(amount),
            Err((kind, message)) => {
                self.report(path, kind, message);
                None
            }
        }
    }

    fn units(&mut self, path: &str, value: Option<&RawScalar>) -> Option<u32> {
        let text = value.map(RawScalar::to_text);
        let raw = self.required(path, text.as_deref())?;
        match parse_units(raw) {
            Ok(units) => Some(units),
            Err((kind, message)) => {
                self.report(path, kind, message);
                None
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

fn optional_text(value: Option<&str>) -> Option<String> {
    non_blank(value).map(str::to_string)
}

fn field(prefix: &str, name: &str) -> String {
    format!("{prefix}.{name}")
}

/// Runs `build` only when the entity is present. `Some(None)` means absent.
fn optional_entity<I, T>(
    c: &mut Collector,
    input: Option<&I>,
    build: impl FnOnce(&mut Collector, &I) -> Option<T>,
) -> Option<Option<T>> {
    match input {
        None => Some(None),
        Some(input) => build(c, input).map(Some),
    }
}

/// Accepts `YYYY-MM-DD` or `YYYYMMDD`.
pub fn parse_date(text: &str) -> Result<NaiveDate, String> {
    let text = text.trim();
    let bytes = text.as_bytes();
    let digits = match bytes.len() {
        10 if bytes[4] == b'-' && bytes[7] == b'-' => text.replace('-', ""),
        8 => text.to_string(),
        _ => return Err(format!("'{text}' must be YYYY-MM-DD or YYYYMMDD")),
    };
    if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{text}' must be YYYY-MM-DD or YYYYMMDD"));
    }
    let not_a_date = || format!("'{text}' is not a calendar date");
    let year: i32 = digits[0..4].parse().map_err(|_| not_a_date())?;
    let month: u32 = digits[4..6].parse().map_err(|_| not_a_date())?;
    let day: u32 = digits[6..8].parse().map_err(|_| not_a_date())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(not_a_date)
}

fn parse_amount(text: &str) -> Result<Decimal, (IssueKind, String)> {
    let amount = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| {
            (
                IssueKind::InvalidFormat,
                format!("'{text}' is not a decimal amount"),
            )
        })?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err((IssueKind::OutOfRange, "must not be negative".to_string()));
    }
    if amount.normalize().scale() > 2 {
        return Err((
            IssueKind::InvalidFormat,
            "must have at most 2 decimal places".to_string(),
        ));
    }
    if amount.abs() > MAX_AMOUNT {
        return Err((
            IssueKind::OutOfRange,
            format!("must not exceed {MAX_AMOUNT}"),
        ));
    }
    Ok(amount.abs())
}

fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |sum, amount| sum.checked_add(amount))
}

fn parse_units(text: &str) -> Result<u32, (IssueKind, String)> {
    let invalid = || (IssueKind::InvalidFormat, format!("'{text}' is not a whole number"));
    let value = Decimal::from_str(text).map_err(|_| invalid())?;
    if !value.fract().is_zero() {
        return Err(invalid());
    }
    if value < Decimal::ONE {
        return Err((IssueKind::OutOfRange, "must be at least 1".to_string()));
    }
    value
        .to_u32()
        .ok_or_else(|| (IssueKind::OutOfRange, "is too large".to_string()))
}

fn build_address(c: &mut Collector, prefix: &str, input: &AddressInput) -> Option<Address> {
    let line1 = c.text(&field(prefix, "address1"), input.address1.as_deref());
    let city = c.text(&field(prefix, "city"), input.city.as_deref());
    let state = c.parsed(&field(prefix, "state"), input.state.as_deref());
    let zip = c.parsed(&field(prefix, "postalCode"), input.postal_code.as_deref());
    let (Some(line1), Some(city), Some(state), Some(zip)) = (line1, city, state, zip) else {
        return None;
    };
    Some(Address {
        line1,
        line2: optional_text(input.address2.as_deref()),
        city,
        state,
        zip,
    })
}

fn required_address(
    c: &mut Collector,
    prefix: &str,
    input: Option<&AddressInput>,
) -> Option<Address> {
    let path = field(prefix, "address");
    c.require(&path, input)
        .and_then(|address| build_address(c, &path, address))
}

fn build_contact(c: &mut Collector, prefix: &str, input: &ContactInput) -> Option<Contact> {
    let name = c.text(&field(prefix, "name"), input.name.as_deref());
    let phone = c.text(&field(prefix, "phoneNumber"), input.phone_number.as_deref());
    Some(Contact {
        name: name?,
        phone: phone?,
    })
}

fn optional_contact(
    c: &mut Collector,
    prefix: &str,
    input: Option<&ContactInput>,
) -> Option<Option<Contact>> {
    let path = field(prefix, "contactInformation");
    optional_entity(c, input, |c, contact| build_contact(c, &path, contact))
}

fn build_person_name(
    c: &mut Collector,
    prefix: &str,
    last: Option<&str>,
    first: Option<&str>,
    middle: Option<&str>,
) -> Option<PersonName> {
    let last = c.text(&field(prefix, "lastName"), last);
    let first = c.text(&field(prefix, "firstName"), first);
    Some(PersonName {
        last: last?,
        first: Some(first?),
        middle: optional_text(middle),
    })
}

fn build_party(c: &mut Collector, prefix: &str, input: &PartyInput) -> Option<Party> {
    let name = c.text(&field(prefix, "organizationName"), input.organization_name.as_deref());
    let id = c.text(&field(prefix, "id"), input.id.as_deref());
    let contact = optional_contact(c, prefix, input.contact_information.as_ref());
    let (Some(name), Some(id), Some(contact)) = (name, id, contact) else {
        return None;
    };
    Some(Party { name, id, contact })
}

fn build_billing(c: &mut Collector, input: &BillingInput) -> Option<BillingProvider> {
    const PREFIX: &str = "billing";
    let name = match optional_text(input.organization_name.as_deref()) {
        Some(organization) => Some(EntityName::Organization(organization)),
        None => {
            let last = c.text(&field(PREFIX, "lastName"), input.last_name.as_deref());
            let first = optional_text(input.first_name.as_deref());
            if last.is_none() {
                c.report(
                    &field(PREFIX, "organizationName"),
                    IssueKind::Missing,
                    "is required unless lastName is given",
                );
            }
            last.map(|last| {
                EntityName::Person(PersonName {
                    last,
                    first,
                    middle: None,
                })
            })
        }
    };
    let npi = c.parsed(&field(PREFIX, "npi"), input.npi.as_deref());
    let tax_id = c.parsed(&field(PREFIX, "employerId"), input.employer_id.as_deref());
    let taxonomy = c.optional(&field(PREFIX, "taxonomyCode"), input.taxonomy_code.as_deref());
    let address = required_address(c, PREFIX, input.address.as_ref());
    let contact = optional_contact(c, PREFIX, input.contact_information.as_ref());

    let (Some(name), Some(npi), Some(tax_id), Some(taxonomy), Some(address), Some(contact)) =
        (name, npi, tax_id, taxonomy, address, contact)
    else {
        return None;
    };
    Some(BillingProvider {
        name,
        npi,
        tax_id,
        taxonomy,
        address,
        contact,
    })
}

fn build_subscriber(
    c: &mut Collector,
    input: &SubscriberInput,
    dependent: Option<&DependentInput>,
) -> Option<Subscriber> {
    const PREFIX: &str = "subscriber";
    let name = build_person_name(
        c,
        PREFIX,
        input.last_name.as_deref(),
        input.first_name.as_deref(),
        input.middle_name.as_deref(),
    );
    let member_id = c.text(&field(PREFIX, "memberId"), input.member_id.as_deref());
    let address = required_address(c, PREFIX, input.address.as_ref());
    let gender = c.or_default(&field(PREFIX, "gender"), input.gender.as_deref(), Gender::default());
    let responsibility = c.or_default(
        &field(PREFIX, "paymentResponsibilityLevelCode"),
        input.payment_responsibility_level_code.as_deref(),
        PaymentResponsibility::default(),
    );

    let relationship_path = field(PREFIX, "relationshipToSubscriberCode");
    let relationship = c.optional::<RelationshipCode>(
        &relationship_path,
        input.relationship_to_subscriber_code.as_deref(),
    );
    let dob_path = field(PREFIX, "dateOfBirth");
    let date_of_birth = match dependent {
        Some(_) => c.optional_date(&dob_path, input.date_of_birth.as_deref()),
        None => {
            if let Some(Some(code)) = relationship
                && !code.is_self()
            {
                c.report(
                    &relationship_path,
                    IssueKind::Inconsistent,
                    format!("must be 18 (self) when no dependent is present, got {code}"),
                );
            }
            c.date(&dob_path, input.date_of_birth.as_deref()).map(Some)
        }
    };
    let dependent = optional_entity(c, dependent, build_dependent);

    let (
        Some(name),
        Some(member_id),
        Some(address),
        Some(gender),
        Some(responsibility),
        Some(date_of_birth),
        Some(dependent),
        Some(_),
    ) = (
        name,
        member_id,
        address,
        gender,
        responsibility,
        date_of_birth,
        dependent,
        relationship,
    )
    else {
        return None;
    };
    Some(Subscriber {
        name,
        member_id,
        group_number: optional_text(input.group_number.as_deref()),
        address,
        date_of_birth,
        gender,
        responsibility,
        dependent,
    })
}

fn build_dependent(c: &mut Collector, input: &DependentInput) -> Option<Dependent> {
    const PREFIX: &str = "dependent";
    let name = build_person_name(
        c,
        PREFIX,
        input.last_name.as_deref(),
        input.first_name.as_deref(),
        input.middle_name.as_deref(),
    );
    let date_of_birth = c.date(&field(PREFIX, "dateOfBirth"), input.date_of_birth.as_deref());
    let gender = c.or_default(&field(PREFIX, "gender"), input.gender.as_deref(), Gender::default());
    let address = required_address(c, PREFIX, input.address.as_ref());

    let relationship_path = field(PREFIX, "relationshipToSubscriberCode");
    let relationship = match c.parsed::<RelationshipCode>(
        &relationship_path,
        input.relationship_to_subscriber_code.as_deref(),
    ) {
        Some(code) if code.is_self() => {
            c.report(
                &relationship_path,
                IssueKind::Inconsistent,
                "must not be 18 (self) for a dependent patient",
            );
            None
        }
        other => other,
    };

    let (Some(name), Some(date_of_birth), Some(gender), Some(address), Some(relationship)) =
        (name, date_of_birth, gender, address, relationship)
    else {
        return None;
    };
    Some(Dependent {
        name,
        date_of_birth,
        gender,
        address,
        relationship,
    })
}

fn build_payer(c: &mut Collector, input: &PayerInput) -> Option<Payer> {
    let name = c.text("payer.organizationName", input.organization_name.as_deref());
    let payer_id = c.text("payer.payerId", input.payer_id.as_deref());
    Some(Payer {
        name: name?,
        payer_id: payer_id?,
    })
}

fn build_rendering(
    c: &mut Collector,
    prefix: &str,
    input: &RenderingInput,
) -> Option<RenderingProvider> {
    let last = c.text(&field(prefix, "lastName"), input.last_name.as_deref());
    let npi = c.parsed(&field(prefix, "npi"), input.npi.as_deref());
    let taxonomy = c.optional(&field(prefix, "taxonomyCode"), input.taxonomy_code.as_deref());
    let (Some(last), Some(npi), Some(taxonomy)) = (last, npi, taxonomy) else {
        return None;
    };
    Some(RenderingProvider {
        name: PersonName {
            last,
            first: optional_text(input.first_name.as_deref()),
            middle: None,
        },
        npi,
        taxonomy,
    })
}

fn build_facility(c: &mut Collector, input: &FacilityInput) -> Option<ServiceFacility> {
    const PREFIX: &str = "claimInformation.serviceFacilityLocation";
    let name = c.text(&field(PREFIX, "organizationName"), input.organization_name.as_deref());
    let npi = c.optional(&field(PREFIX, "npi"), input.npi.as_deref());
    let address = required_address(c, PREFIX, input.address.as_ref());
    let (Some(name), Some(npi), Some(address)) = (name, npi, address) else {
        return None;
    };
    Some(ServiceFacility { name, npi, address })
}

fn build_service_line(
    c: &mut Collector,
    index: usize,
    input: &ServiceLineInput,
) -> Option<ServiceLine> {
    let prefix = format!("claimInformation.serviceLines[{index}]");
    let service_date = c.date(&field(&prefix, "serviceDate"), input.service_date.as_deref());

    let service_path = field(&prefix, "professionalService");
    let service = c.require(&service_path, input.professional_service.as_ref())?;
    let procedure = c.parsed(
        &field(&service_path, "procedureCode"),
        service.procedure_code.as_deref(),
    );

    let modifiers_path = field(&service_path, "procedureModifiers");
    if service.procedure_modifiers.len() > MAX_MODIFIERS {
        c.report(
            &modifiers_path,
            IssueKind::OutOfRange,
            format!(
                "has {} modifiers, at most {MAX_MODIFIERS} are allowed",
                service.procedure_modifiers.len()
            ),
        );
    }
    let modifiers: Vec<_> = service
        .procedure_modifiers
        .iter()
        .enumerate()
        .map(|(position, modifier)| {
            c.parsed(&format!("{modifiers_path}[{position}]"), Some(modifier.as_str()))
        })
        .collect();
    let modifiers: Option<Vec<_>> = modifiers.into_iter().collect();

    let charge = c.amount(
        &field(&service_path, "lineItemChargeAmount"),
        service.line_item_charge_amount.as_ref(),
    );
    let units = c.units(
        &field(&service_path, "serviceUnitCount"),
        service.service_unit_count.as_ref(),
    );
    let pos_text = service.place_of_service_code.as_ref().map(RawScalar::to_text);
    let place_of_service = c.optional(&field(&service_path, "placeOfServiceCode"), pos_text.as_deref());
    let rendering_path = field(&prefix, "renderingProvider");
    let rendering_provider = optional_entity(c, input.rendering_provider.as_ref(), |c, rendering| {
        build_rendering(c, &rendering_path, rendering)
    });

    let (
        Some(service_date),
        Some(procedure),
        Some(modifiers),
        Some(charge),
        Some(units),
        Some(place_of_service),
        Some(rendering_provider),
    ) = (
        service_date,
        procedure,
        modifiers,
        charge,
        units,
        place_of_service,
        rendering_provider,
    )
    else {
        return None;
    };
    if modifiers.len() > MAX_MODIFIERS {
        return None;
    }
    Some(ServiceLine {
        line_number: u32::try_from(index + 1).unwrap_or(u32::MAX),
        procedure,
        modifiers,
        charge,
        units,
        service_date,
        place_of_service,
        rendering_provider,
    })
}

fn build_claim(c: &mut Collector, input: &ClaimInformationInput) -> Option<Claim> {
    const PREFIX: &str = "claimInformation";
    let claim_number = c.text(
        &field(PREFIX, "patientControlNumber"),
        input.patient_control_number.as_deref(),
    );
    let total_path = field(PREFIX, "claimChargeAmount");
    let total_charge = c.amount(&total_path, input.claim_charge_amount.as_ref());

    let pos_text = input.place_of_service_code.as_ref().map(RawScalar::to_text);
    let place_of_service = c.parsed(&field(PREFIX, "placeOfServiceCode"), pos_text.as_deref());
    let frequency_text = input.claim_frequency_code.as_ref().map(RawScalar::to_text);
    let frequency = c.or_default(
        &field(PREFIX, "claimFrequencyCode"),
        frequency_text.as_deref(),
        ClaimFrequency::default(),
    );
    let filing = c.or_default(
        &field(PREFIX, "claimFilingCode"),
        input.claim_filing_code.as_deref(),
        ClaimFilingCode::default(),
    );
    let signature_on_file = c.or_default(
        &field(PREFIX, "signatureIndicator"),
        input.signature_indicator.as_deref(),
        YesNo::Yes,
    );
    let participation = c.or_default(
        &field(PREFIX, "planParticipationCode"),
        input.plan_participation_code.as_deref(),
        PlanParticipation::default(),
    );
    let release_of_information = c.or_default(
        &field(PREFIX, "releaseInformationCode"),
        input.release_information_code.as_deref(),
        ReleaseOfInformation::default(),
    );
    let benefits_assigned = c.or_default(
        &field(PREFIX, "benefitsAssignmentCertificationIndicator"),
        input.benefits_assignment_certification_indicator.as_deref(),
        YesNo::Yes,
    );

    let diagnoses_path = field(PREFIX, "healthCareCodeInformation");
    if input.health_care_code_information.len() > MAX_DIAGNOSES {
        c.report(
            &diagnoses_path,
            IssueKind::OutOfRange,
            format!(
                "has {} diagnosis codes, at most {MAX_DIAGNOSES} are allowed",
                input.health_care_code_information.len()
            ),
        );
    }
    let diagnoses: Vec<_> = input
        .health_care_code_information
        .iter()
        .enumerate()
        .map(|(index, diagnosis)| {
            let path = format!("{diagnoses_path}[{index}]");
            let code_path = field(&path, "diagnosisCode");
            let code: Option<DiagnosisCode> =
                c.parsed(&code_path, diagnosis.diagnosis_code.as_deref());
            let qualifier = c.or_default(
                &field(&path, "diagnosisTypeCode"),
                diagnosis.diagnosis_type_code.as_deref(),
                DiagnosisQualifier::for_position(index),
            );
            let (code, qualifier) = (code?, qualifier?);
            if qualifier.is_icd10() && !code.is_icd10_shaped() {
                c.report(
                    &code_path,
                    IssueKind::InvalidFormat,
                    format!(
                        "'{code}' is not an ICD-10 code; use diagnosisTypeCode BK or BF for ICD-9"
                    ),
                );
                return None;
            }
            Some(Diagnosis { qualifier, code })
        })
        .collect();
    let diagnoses: Option<Vec<_>> = diagnoses.into_iter().collect();

    let prior_authorization = input
        .claim_supplemental_information
        .as_ref()
        .and_then(|supplemental| optional_text(supplemental.prior_authorization_number.as_deref()))
        .map(|number| PriorAuthorization { number });
    let service_facility =
        optional_entity(c, input.service_facility_location.as_ref(), build_facility);

    let lines_path = field(PREFIX, "serviceLines");
    if input.service_lines.is_empty() {
        c.report(
            &lines_path,
            IssueKind::Missing,
            "must contain at least one service line",
        );
    }
    let lines: Vec<_> = input
        .service_lines
        .iter()
        .enumerate()
        .map(|(index, line)| build_service_line(c, index, line))
        .collect();
    let service_lines: Option<Vec<_>> = lines.into_iter().collect();

    if let (Some(total), Some(lines)) = (total_charge, service_lines.as_ref())
        && !lines.is_empty()
    {
        match checked_sum(lines.iter().map(|line| line.charge)) {
            Some(sum) if sum != total => c.report(
                &total_path,
                IssueKind::Inconsistent,
                format!("{total:.2} does not equal the sum of service line charges {sum:.2}"),
            ),
            Some(_) => {}
            None => c.report(
                &total_path,
                IssueKind::OutOfRange,
                "the sum of service line charges is too large",
            ),
        }
    }

    let (
        Some(claim_number),
        Some(total_charge),
        Some(place_of_service),
        Some(frequency),
        Some(filing),
        Some(signature_on_file),
        Some(participation),
        Some(release_of_information),
        Some(benefits_assigned),
        Some(diagnoses),
        Some(service_facility),
        Some(service_lines),
    ) = (
        claim_number,
        total_charge,
        place_of_service,
        frequency,
        filing,
        signature_on_file,
        participation,
        release_of_information,
        benefits_assigned,
        diagnoses,
        service_facility,
        service_lines,
    )
    else {
        return None;
    };
    if diagnoses.len() > MAX_DIAGNOSES || service_lines.is_empty() {
        return None;
    }
    Some(Claim {
        claim_number,
        total_charge,
        place_of_service,
        frequency,
        filing,
        signature_on_file,
        participation,
        release_of_information,
        benefits_assigned,
        diagnoses,
        prior_authorization,
        rendering_provider: None,
        service_facility,
        service_lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_accept_both_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        assert_eq!(parse_date("2024-07-01").unwrap(), expected);
        assert_eq!(parse_date("20240701").unwrap(), expected);
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("07/01/2024").is_err());
        assert!(parse_date("2024-7-1").is_err());
    }

    #[test]
    fn amounts_are_non_negative_with_cents() {
        assert_eq!(parse_amount("150.5").unwrap(), Decimal::new(1505, 1));
        assert_eq!(parse_amount("0").unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount("-1.00").unwrap_err().0, IssueKind::OutOfRange);
        assert_eq!(parse_amount("1.005").unwrap_err().0, IssueKind::InvalidFormat);
        assert_eq!(parse_amount("abc").unwrap_err().0, IssueKind::InvalidFormat);
    }

    #[test]
    fn amounts_fit_an_eighteen_digit_element() {
        assert_eq!(parse_amount("9999999999999999.99").unwrap(), MAX_AMOUNT);
        assert_eq!(
            parse_amount("10000000000000000").unwrap_err().0,
            IssueKind::OutOfRange
        );
        assert_eq!(
            parse_amount("79228162514264337593543950335").unwrap_err().0,
            IssueKind::OutOfRange
        );
    }

    #[test]
    fn charge_sum_reports_overflow() {
        assert_eq!(
            checked_sum([Decimal::new(15000, 2), Decimal::new(7500, 2)]),
            Some(Decimal::new(22500, 2))
        );
        assert_eq!(checked_sum([Decimal::MAX, Decimal::MAX]), None);
        assert_eq!(checked_sum(std::iter::empty()), Some(Decimal::ZERO));
    }

    #[test]
    fn units_must_be_whole_and_positive() {
        assert_eq!(parse_units("2").unwrap(), 2);
        assert_eq!(parse_units("1.0").unwrap(), 1);
        assert_eq!(parse_units("0").unwrap_err().0, IssueKind::OutOfRange);
        assert_eq!(parse_units("1.5").unwrap_err().0, IssueKind::InvalidFormat);
    }

    #[test]
    fn collector_keeps_every_issue() {
        let mut c = Collector::default();
        assert!(c.text("a", None).is_none());
        assert!(c.parsed::<Gender>("b", Some("Q")).is_none());
        assert_eq!(c.or_default("c", Some("  "), Gender::Unknown), Some(Gender::Unknown));
        let error = c.finish();
        assert_eq!(error.len(), 2);
        assert!(error.has_path("a"));
        assert!(error.has_path("b"));
    }
}
