//! Intake - normalization of webhook submissions
//!
//! This crate provides:
//! - Typed accessors over loosely typed JSON submissions
//! - Currency, date, yes/no flag and roster normalization
//! - Guardianship and conservatorship case records with documented defaults
//!
//! Missing optional data never fails; only a body that is not a JSON object
//! is rejected.
//!
//! # Example
//!
//! ```ignore
//! use intake::{ConservatorshipRecord, RawSubmission};
//!
//! let raw = RawSubmission::from_slice(body)?;
//! let record = ConservatorshipRecord::from_submission(&raw, today);
//! let binding_root = serde_json::to_value(&record)?;
//! ```

mod common;
pub mod conservatorship;
pub mod defaults;
pub mod format;
pub mod guardianship;
mod roster;
mod submission;

pub use common::{Attorney, Court, Fees, Hearing};
pub use conservatorship::ConservatorshipRecord;
pub use guardianship::GuardianshipRecord;
pub use roster::{parse_roster, Minor};
pub use submission::RawSubmission;

use thiserror::Error;

/// Errors that can occur while reading a submission
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Invalid JSON payload: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Submission must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Result type for intake operations
pub type Result<T> = std::result::Result<T, IntakeError>;
