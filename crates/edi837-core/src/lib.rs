//! JSON to X12 837P conversion.
//!
//! Ties the claim model and the encoder together behind a small call
//! surface with one error type.
//!
//! ```no_run
//! use chrono::Local;
//! use edi837_core::{ControlNumbers, EnvelopeConfig, convert};
//!
//! let now = Local::now().naive_local();
//! let config = EnvelopeConfig::new("SUBMITTER01", "RECEIVER01", now)
//!     .with_control_numbers(ControlNumbers::from_seed(now.and_utc().timestamp() as u64));
//! let document = convert("claim.json", &config).unwrap();
//! print!("{document}");
//! ```

mod convert;
mod error;

pub use convert::{
    Conversion, check, convert, convert_document, convert_file, convert_str, encode_model,
    parse_claim, read_input,
};
pub use error::{ConvertError, Result};

pub use edi837_model::{ClaimModel, FieldIssue, IssueKind, ValidationError};
pub use edi837_x12::{ControlNumbers, Delimiters, Document, EnvelopeConfig, UsageIndicator};
