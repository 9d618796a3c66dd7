//! Typed, validated model of one professional (837P) claim.
//!
//! Raw JSON is deserialized into [`ClaimInput`], whose fields are all
//! optional, and then validated into an immutable [`ClaimModel`]. Validation
//! collects every violation as a [`FieldIssue`] located by its JSON path.
//!
//! # Example
//!
//! ```no_run
//! use edi837_model::ClaimModel;
//!
//! let json = std::fs::read_to_string("claim.json").unwrap();
//! match ClaimModel::from_json(&json) {
//!     Ok(model) => println!("{} service line(s)", model.service_lines().len()),
//!     Err(error) => eprintln!("{error}"),
//! }
//! ```

mod claim;
pub mod enums;
mod error;
pub mod ids;
pub mod input;
mod parse;

pub use claim::{
    Address, BillingProvider, Claim, ClaimModel, Contact, Dependent, Diagnosis, EntityName, Party,
    Patient, Payer, PersonName, PriorAuthorization, RenderingProvider, ServiceFacility,
    ServiceLine, Subscriber,
};
pub use enums::{
    ClaimFilingCode, ClaimFrequency, DiagnosisQualifier, Gender, PaymentResponsibility,
    PlanParticipation, RelationshipCode, ReleaseOfInformation, YesNo,
};
pub use error::{FieldIssue, IssueKind, ModelError, Result, ValidationError};
pub use ids::{
    DiagnosisCode, Modifier, Npi, PlaceOfService, ProcedureCode, StateCode, TaxId, TaxonomyCode,
    ZipCode,
};
pub use input::ClaimInput;
pub use parse::{MAX_DIAGNOSES, MAX_MODIFIERS, parse_date};
