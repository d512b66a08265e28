//! PDF Core - Low-level PDF manipulation
//!
//! This crate provides functionality for:
//! - Opening and saving PDF documents
//! - Looking up AcroForm fields by fully qualified name
//! - Setting text fields and checking/unchecking checkboxes
//! - Concatenating the pages of several documents into one
//! - Drawing simple standard-font text on new pages
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::PdfDocument;
//!
//! let mut doc = PdfDocument::open_from_bytes(&template_bytes)?;
//! doc.set_text_field("topmostSubform[0].Page1[0].FillText156[0]", "JANE DOE")?;
//! doc.set_checkbox("topmostSubform[0].Page1[0].CheckBox9[0]", true)?;
//! let bytes = doc.to_bytes()?;
//! ```

mod document;
mod form;
mod merge;
mod text;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use document::{Color, PdfDocument};
pub use form::{FieldKind, FormField};
pub use merge::merge_documents;
pub use text::{generate_text_operators, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to open PDF: {0}")]
    OpenError(String),

    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Document has no AcroForm")]
    MissingAcroForm,

    #[error("No form field named {0}")]
    FieldNotFound(String),

    #[error("Field {name} is a {found} field, expected {expected}")]
    FieldTypeMismatch {
        name: String,
        expected: FieldKind,
        found: FieldKind,
    },

    #[error("PDF parsing error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

impl PdfError {
    /// Whether the error concerns a single field rather than the whole document
    pub fn is_field_error(&self) -> bool {
        matches!(
            self,
            PdfError::FieldNotFound(_) | PdfError::FieldTypeMismatch { .. }
        )
    }
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Standard page sizes in points
pub mod page_size {
    /// A4 width
    pub const A4_WIDTH: f64 = 595.28;
    /// A4 height
    pub const A4_HEIGHT: f64 = 841.89;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_are_classified() {
        assert!(PdfError::FieldNotFound("x".into()).is_field_error());
        assert!(PdfError::FieldTypeMismatch {
            name: "x".into(),
            expected: FieldKind::Text,
            found: FieldKind::Checkbox,
        }
        .is_field_error());
        assert!(!PdfError::MissingAcroForm.is_field_error());
    }

    #[test]
    fn test_mismatch_message() {
        let err = PdfError::FieldTypeMismatch {
            name: "Box[0]".into(),
            expected: FieldKind::Checkbox,
            found: FieldKind::Text,
        };
        assert_eq!(err.to_string(), "Field Box[0] is a text field, expected checkbox");
    }
}
