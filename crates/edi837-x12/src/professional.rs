//! Loops of the 837P transaction set body, in emission order.
//!
//! Field paths passed to [`TextRules::clean`] are the JSON input paths, so
//! a delimiter conflict points the caller at the exact field to fix.

use edi837_model::{
    Address, ClaimModel, Contact, EntityName, Patient, PersonName, RenderingProvider, ServiceLine,
};
use tracing::debug;

use crate::config::EnvelopeConfig;
use crate::envelope::TransactionSet;
use crate::error::{EncodingError, Result};
use crate::segment::Segment;
use crate::text::{TextRules, format_amount, format_date, format_time, max_len};

/// BHT01: information source, subscriber, dependent.
const HIERARCHICAL_STRUCTURE: &str = "0019";
/// BHT02: original transmission.
const TRANSACTION_PURPOSE: &str = "00";
/// BHT06: chargeable claim.
const CLAIM_IDENTIFIER: &str = "CH";
/// NM108 for submitter and receiver: electronic transmitter ID.
const ETIN_QUALIFIER: &str = "46";
/// NM108 for providers: NPI.
const NPI_QUALIFIER: &str = "XX";
/// PRV03 qualifier: provider taxonomy code.
const TAXONOMY_QUALIFIER: &str = "PXC";
/// PER03: telephone.
const PHONE_QUALIFIER: &str = "TE";
/// DMG01 / DTP02: date expressed as CCYYMMDD.
const DATE_FORMAT: &str = "D8";
/// DTP01: date of service.
const SERVICE_DATE_QUALIFIER: &str = "472";
/// CLM05-2: facility code qualifier for place of service.
const PLACE_OF_SERVICE_QUALIFIER: &str = "B";
/// SV101-1: HCPCS/CPT procedure code.
const PROCEDURE_QUALIFIER: &str = "HC";
/// SV103: unit of measure.
const UNIT_BASIS: &str = "UN";

/// Write the body of one professional claim transaction set.
pub(crate) fn write_claim(
    set: &mut TransactionSet,
    model: &ClaimModel,
    config: &EnvelopeConfig,
) -> Result<()> {
    let line_count = model.service_lines().len();
    if line_count == 0 {
        return Err(EncodingError::MinimumOccurrence {
            structure: "2400 service line loop",
            minimum: 1,
            actual: 0,
        });
    }

    let writer = LoopWriter {
        model,
        config,
        text: TextRules::new(&config.delimiters),
    };
    writer.header(set);
    writer.submitter(set)?;
    writer.receiver(set)?;
    writer.billing_provider(set)?;
    writer.subscriber(set)?;
    writer.payer(set)?;
    if let Patient::Dependent(_) = model.patient() {
        writer.patient(set)?;
    }
    writer.claim(set)?;
    for line in model.service_lines() {
        writer.service_line(set, line)?;
    }
    debug!(
        segments = set.len(),
        service_lines = line_count,
        "transaction set body written"
    );
    Ok(())
}

struct LoopWriter<'a> {
    model: &'a ClaimModel,
    config: &'a EnvelopeConfig,
    text: TextRules<'a>,
}

impl LoopWriter<'_> {
    fn header(&self, set: &mut TransactionSet) {
        let reference = set.control_number().to_string();
        set.push(
            Segment::new("BHT")
                .element(HIERARCHICAL_STRUCTURE)
                .element(TRANSACTION_PURPOSE)
                .element(reference)
                .element(format_date(self.config.created.date()))
                .element(format_time(self.config.created))
                .element(CLAIM_IDENTIFIER),
        );
    }

    /// Loop 1000A.
    fn submitter(&self, set: &mut TransactionSet) -> Result<()> {
        let (name, id, contact) = match self.model.submitter() {
            Some(party) => (
                self.text
                    .clean("submitter.organizationName", &party.name, max_len::NAME_LAST)?,
                self.text.clean("submitter.id", &party.id, max_len::ID_CODE)?,
                party.contact.as_ref(),
            ),
            None => (
                self.envelope_name(
                    "sender_name",
                    self.config.sender_name.as_deref(),
                    &self.config.sender_id,
                )?,
                self.config.sender_id.trim().to_string(),
                None,
            ),
        };
        set.push(organization("41", name).element(ETIN_QUALIFIER).element(id));
        if let Some(contact) = contact {
            set.push(self.contact(contact, "submitter.contactInformation")?);
        }
        debug!(loop_id = "1000A", "submitter written");
        Ok(())
    }

    /// Loop 1000B.
    fn receiver(&self, set: &mut TransactionSet) -> Result<()> {
        let (name, id) = match self.model.receiver() {
            Some(party) => (
                self.text
                    .clean("receiver.organizationName", &party.name, max_len::NAME_LAST)?,
                self.text.clean("receiver.id", &party.id, max_len::ID_CODE)?,
            ),
            None => (
                self.envelope_name(
                    "receiver_name",
                    self.config.receiver_name.as_deref(),
                    &self.config.receiver_id,
                )?,
                self.config.receiver_id.trim().to_string(),
            ),
        };
        set.push(organization("40", name).element(ETIN_QUALIFIER).element(id));
        debug!(loop_id = "1000B", "receiver written");
        Ok(())
    }

    /// Loops 2000A and 2010AA.
    fn billing_provider(&self, set: &mut TransactionSet) -> Result<()> {
        let provider = self.model.billing_provider();
        set.push(hierarchy("1", None, "20", true));
        if let Some(taxonomy) = &provider.taxonomy {
            set.push(
                Segment::new("PRV")
                    .element("BI")
                    .element(TAXONOMY_QUALIFIER)
                    .element(taxonomy.as_str()),
            );
        }
        set.push(
            self.entity_name("85", &provider.name, "billing")?
                .element(NPI_QUALIFIER)
                .element(provider.npi.as_str()),
        );
        self.address(set, &provider.address, "billing.address")?;
        set.push(
            Segment::new("REF")
                .element("EI")
                .element(provider.tax_id.as_str()),
        );
        if let Some(contact) = &provider.contact {
            set.push(self.contact(contact, "billing.contactInformation")?);
        }
        debug!(loop_id = "2000A", "billing provider written");
        Ok(())
    }

    /// Loops 2000B and 2010BA.
    fn subscriber(&self, set: &mut TransactionSet) -> Result<()> {
        let subscriber = self.model.subscriber();
        let claim = self.model.claim();
        let patient = self.model.patient();

        set.push(hierarchy("2", Some("1"), "22", !patient.is_subscriber()));
        let group_number = self.text.clean_optional(
            "subscriber.groupNumber",
            subscriber.group_number.as_deref(),
            max_len::GROUP_NUMBER,
        )?;
        set.push(
            Segment::new("SBR")
                .element(subscriber.responsibility.code())
                .optional(
                    patient
                        .is_subscriber()
                        .then(|| patient.relationship().code()),
                )
                .optional(group_number)
                .empty(5)
                .element(claim.filing.code()),
        );
        let member_id =
            self.text
                .clean("subscriber.memberId", &subscriber.member_id, max_len::ID_CODE)?;
        set.push(
            self.person("IL", &subscriber.name, "subscriber")?
                .element("MI")
                .element(member_id),
        );
        self.address(set, &subscriber.address, "subscriber.address")?;
        if patient.is_subscriber() {
            set.push(demographics(patient, "subscriber.dateOfBirth")?);
        }
        debug!(loop_id = "2000B", "subscriber written");
        Ok(())
    }

    /// Loop 2010BB.
    fn payer(&self, set: &mut TransactionSet) -> Result<()> {
        let payer = self.model.payer();
        let name = self
            .text
            .clean("payer.organizationName", &payer.name, max_len::NAME_LAST)?;
        let id = self
            .text
            .clean("payer.payerId", &payer.payer_id, max_len::ID_CODE)?;
        set.push(organization("PR", name).element("PI").element(id));
        debug!(loop_id = "2010BB", "payer written");
        Ok(())
    }

    /// Loops 2000C and 2010CA; only emitted for a dependent patient.
    fn patient(&self, set: &mut TransactionSet) -> Result<()> {
        let patient = self.model.patient();
        set.push(hierarchy("3", Some("2"), "23", false));
        set.push(Segment::new("PAT").element(patient.relationship().code()));
        set.push(self.person("QC", patient.name(), "dependent")?);
        self.address(set, patient.address(), "dependent.address")?;
        set.push(demographics(patient, "dependent.dateOfBirth")?);
        debug!(loop_id = "2000C", "patient written");
        Ok(())
    }

    /// Loop 2300 with its 2310B and 2310C children.
    fn claim(&self, set: &mut TransactionSet) -> Result<()> {
        let claim = self.model.claim();
        let claim_number = self.text.clean(
            "claimInformation.patientControlNumber",
            &claim.claim_number,
            max_len::CLAIM_NUMBER,
        )?;
        set.push(
            Segment::new("CLM")
                .element(claim_number)
                .element(format_amount(claim.total_charge))
                .empty(2)
                .composite([
                    claim.place_of_service.to_string(),
                    PLACE_OF_SERVICE_QUALIFIER.to_string(),
                    claim.frequency.code().to_string(),
                ])
                .element(claim.signature_on_file.code())
                .element(claim.participation.code())
                .element(claim.benefits_assigned.code())
                .element(claim.release_of_information.code()),
        );

        if let Some(authorization) = &claim.prior_authorization {
            let number = self.text.clean(
                "claimInformation.claimSupplementalInformation.priorAuthorizationNumber",
                &authorization.number,
                max_len::REFERENCE,
            )?;
            set.push(Segment::new("REF").element("G1").element(number));
        }

        if !claim.diagnoses.is_empty() {
            let mut segment = Segment::new("HI");
            for diagnosis in &claim.diagnoses {
                segment = segment.composite([diagnosis.qualifier.code(), diagnosis.code.as_str()]);
            }
            set.push(segment);
        }

        if let Some(rendering) = &claim.rendering_provider {
            self.rendering_provider(set, rendering, "rendering")?;
        }

        if let Some(facility) = &claim.service_facility {
            const PATH: &str = "claimInformation.serviceFacilityLocation";
            let name = self.text.clean(
                &format!("{PATH}.organizationName"),
                &facility.name,
                max_len::NAME_LAST,
            )?;
            let segment = organization("77", name);
            set.push(match &facility.npi {
                Some(npi) => segment.element(NPI_QUALIFIER).element(npi.as_str()),
                None => segment,
            });
            self.address(set, &facility.address, &format!("{PATH}.address"))?;
        }
        debug!(loop_id = "2300", diagnoses = claim.diagnoses.len(), "claim written");
        Ok(())
    }

    /// Loop 2400.
    fn service_line(&self, set: &mut TransactionSet, line: &ServiceLine) -> Result<()> {
        let claim = self.model.claim();
        let procedure = std::iter::once(PROCEDURE_QUALIFIER.to_string())
            .chain(std::iter::once(line.procedure.as_str().to_string()))
            .chain(line.modifiers.iter().map(|modifier| modifier.as_str().to_string()));
        let place_override = line
            .place_of_service
            .filter(|pos| *pos != claim.place_of_service)
            .map(|pos| pos.to_string());
        let pointer = (!claim.diagnoses.is_empty()).then_some("1");

        set.push(Segment::new("LX").element(line.line_number.to_string()));
        set.push(
            Segment::new("SV1")
                .composite(procedure)
                .element(format_amount(line.charge))
                .element(UNIT_BASIS)
                .element(line.units.to_string())
                .optional(place_override)
                .empty(1)
                .optional(pointer),
        );
        set.push(
            Segment::new("DTP")
                .element(SERVICE_DATE_QUALIFIER)
                .element(DATE_FORMAT)
                .element(format_date(line.service_date)),
        );
        if let Some(rendering) = &line.rendering_provider {
            let path = format!(
                "claimInformation.serviceLines[{}].renderingProvider",
                line.line_number - 1
            );
            self.rendering_provider(set, rendering, &path)?;
        }
        debug!(
            loop_id = "2400",
            line = line.line_number,
            line_rendering = line.rendering_provider.is_some(),
            "service line written"
        );
        Ok(())
    }

    /// Loop 2310B or 2420A: NM1*82 and the optional PRV.
    fn rendering_provider(
        &self,
        set: &mut TransactionSet,
        rendering: &RenderingProvider,
        path: &str,
    ) -> Result<()> {
        set.push(
            self.person("82", &rendering.name, path)?
                .element(NPI_QUALIFIER)
                .element(rendering.npi.as_str()),
        );
        if let Some(taxonomy) = &rendering.taxonomy {
            set.push(
                Segment::new("PRV")
                    .element("PE")
                    .element(TAXONOMY_QUALIFIER)
                    .element(taxonomy.as_str()),
            );
        }
        Ok(())
    }

    /// NM1 with entity code, type qualifier and NM103..NM107.
    fn entity_name(&self, entity: &'static str, name: &EntityName, path: &str) -> Result<Segment> {
        match name {
            EntityName::Organization(organization_name) => {
                let name = self.text.clean(
                    &format!("{path}.organizationName"),
                    organization_name,
                    max_len::NAME_LAST,
                )?;
                Ok(organization(entity, name))
            }
            EntityName::Person(person) => self.person(entity, person, path),
        }
    }

    fn person(&self, entity: &'static str, person: &PersonName, path: &str) -> Result<Segment> {
        let last = self
            .text
            .clean(&format!("{path}.lastName"), &person.last, max_len::NAME_LAST)?;
        let first = self.text.clean_optional(
            &format!("{path}.firstName"),
            person.first.as_deref(),
            max_len::NAME_FIRST,
        )?;
        let middle = self.text.clean_optional(
            &format!("{path}.middleName"),
            person.middle.as_deref(),
            max_len::NAME_MIDDLE,
        )?;
        Ok(Segment::new("NM1")
            .element(entity)
            .element("1")
            .element(last)
            .optional(first)
            .optional(middle)
            .empty(2))
    }

    fn address(&self, set: &mut TransactionSet, address: &Address, path: &str) -> Result<()> {
        let line1 = self
            .text
            .clean(&format!("{path}.address1"), &address.line1, max_len::ADDRESS)?;
        let line2 = self.text.clean_optional(
            &format!("{path}.address2"),
            address.line2.as_deref(),
            max_len::ADDRESS,
        )?;
        let city = self
            .text
            .clean(&format!("{path}.city"), &address.city, max_len::CITY)?;
        set.push(Segment::new("N3").element(line1).optional(line2));
        set.push(
            Segment::new("N4")
                .element(city)
                .element(address.state.as_str())
                .element(address.zip.as_str()),
        );
        Ok(())
    }

    fn contact(&self, contact: &Contact, path: &str) -> Result<Segment> {
        let name = self
            .text
            .clean(&format!("{path}.name"), &contact.name, max_len::CONTACT_NAME)?;
        let phone = self.text.clean(
            &format!("{path}.phoneNumber"),
            &contact.phone,
            max_len::PHONE,
        )?;
        Ok(Segment::new("PER")
            .element("IC")
            .element(name)
            .element(PHONE_QUALIFIER)
            .element(phone))
    }

    /// Submitter or receiver name from the envelope when the claim omits it.
    fn envelope_name(&self, field: &str, name: Option<&str>, id: &str) -> Result<String> {
        let path = format!("envelope.{field}");
        self.text
            .clean(&path, name.unwrap_or(id), max_len::NAME_LAST)
    }
}

/// NM1 for a non-person entity, through NM107.
fn organization(entity: &'static str, name: String) -> Segment {
    Segment::new("NM1")
        .element(entity)
        .element("2")
        .element(name)
        .empty(4)
}

fn hierarchy(id: &str, parent: Option<&str>, level: &str, has_children: bool) -> Segment {
    Segment::new("HL")
        .element(id)
        .optional(parent)
        .element(level)
        .element(if has_children { "1" } else { "0" })
}

fn demographics(patient: Patient<'_>, path: &str) -> Result<Segment> {
    let date_of_birth = patient
        .date_of_birth()
        .ok_or_else(|| EncodingError::missing_field("DMG", path))?;
    Ok(Segment::new("DMG")
        .element(DATE_FORMAT)
        .element(format_date(date_of_birth))
        .element(patient.gender().code()))
}
