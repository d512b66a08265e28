//! Forms - declarative field mapping for court form templates
//!
//! This crate provides:
//! - Mapping table schema types (text entries, checkbox predicates)
//! - Table parsing and validation
//! - Data binding via JSONPath-like expressions
//! - Fill planning and filling with an aggregated warnings report
//! - The embedded tables for GC-210 through GC-350
//!
//! # Example
//!
//! ```ignore
//! use forms::{FormFiller, FormId};
//!
//! let schema = FormId::Gc310.schema()?;
//! let data = serde_json::to_value(&record)?;
//! let filled = FormFiller::new().fill(schema, &template_bytes, &data)?;
//! for warning in &filled.report.warnings {
//!     println!("{}: {}", warning.field, warning.reason);
//! }
//! ```

mod catalog;
mod filler;
pub mod parser;
mod plan;
mod schema;

pub use catalog::FormId;
pub use filler::{FieldWarning, FillReport, FilledForm, FormFiller};
pub use parser::parse_schema;
pub use plan::{plan, FieldValue, FieldWrite, FillPlan};
pub use schema::*;

use thiserror::Error;

/// Errors that can occur while mapping data onto a form
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Invalid mapping table: {0}")]
    SchemaError(String),

    #[error("Unknown form: {0}")]
    UnknownForm(String),

    #[error("{form}: {count} field(s) could not be written: {fields}")]
    MissingFields {
        form: String,
        count: usize,
        fields: String,
    },

    #[error("PDF error: {0}")]
    PdfError(#[from] pdf_core::PdfError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for form operations
pub type Result<T> = std::result::Result<T, FormError>;
