//! X12 837P (005010X222A1) encoder.
//!
//! Turns a validated [`ClaimModel`](edi837_model::ClaimModel) into a complete
//! interchange: ISA/GS/ST envelope, the billing provider, subscriber, patient,
//! claim and service line loops, and SE/GE/IEA trailers.
//!
//! # Counts and control numbers
//!
//! Segments are pushed into ordered builders ([`TransactionSet`],
//! [`FunctionalGroup`], [`Interchange`]); every trailer count is taken from
//! the builder at close time, and the renderer recounts while writing.
//! Control numbers come from [`ControlNumbers`] in the [`EnvelopeConfig`],
//! either explicit or derived per call with [`ControlNumbers::from_seed`].
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use edi837_model::ClaimModel;
//! use edi837_x12::{ControlNumbers, EnvelopeConfig, encode};
//!
//! let model = ClaimModel::from_json(&std::fs::read_to_string("claim.json").unwrap()).unwrap();
//! let created = NaiveDate::from_ymd_opt(2024, 7, 2)
//!     .unwrap()
//!     .and_hms_opt(15, 31, 0)
//!     .unwrap();
//! let config = EnvelopeConfig::new("SUBMITTER01", "RECEIVER01", created)
//!     .with_control_numbers(ControlNumbers::from_seed(415_133_923));
//!
//! let document = encode(&model, &config).unwrap();
//! print!("{document}");
//! ```

mod config;
mod delimiters;
mod encoder;
pub mod envelope;
mod error;
mod professional;
mod render;
pub mod segment;
pub mod text;

pub use config::{ControlNumbers, EnvelopeConfig, UsageIndicator};
pub use delimiters::Delimiters;
pub use encoder::{ClaimEncoder, Document, encode};
pub use envelope::{FunctionalGroup, Interchange, TransactionSet};
pub use error::{EncodingError, Result};
pub use render::render;
pub use segment::{Element, Segment};
