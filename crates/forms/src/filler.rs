//! Applying fill plans to template documents

use crate::plan::{plan, FieldValue, FillPlan};
use crate::schema::FormSchema;
use crate::{FormError, Result};
use log::{debug, info, warn};
use pdf_core::{FieldKind, PdfDocument};
use serde::Serialize;
use std::collections::HashMap;

/// A field that could not be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldWarning {
    pub field: String,
    pub reason: String,
}

/// Outcome of filling one form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FillReport {
    pub form: String,
    pub fields_written: usize,
    pub warnings: Vec<FieldWarning>,
}

/// A filled document together with its report
#[derive(Debug)]
pub struct FilledForm {
    pub document: PdfDocument,
    pub report: FillReport,
}

/// Writes mapping tables into template documents
///
/// By default a missing or mistyped destination field is logged, skipped and
/// reported. In strict mode any such field fails the whole form.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormFiller {
    strict: bool,
}

impl FormFiller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Load `template` and fill it from `data`
    pub fn fill(
        &self,
        schema: &FormSchema,
        template: &[u8],
        data: &serde_json::Value,
    ) -> Result<FilledForm> {
        let mut document = PdfDocument::open_from_bytes(template)?;
        let report = self.apply(&plan(schema, data), &mut document)?;
        Ok(FilledForm { document, report })
    }

    /// Apply a resolved plan to an open document
    pub fn apply(&self, plan: &FillPlan, document: &mut PdfDocument) -> Result<FillReport> {
        let kinds: HashMap<String, FieldKind> = document
            .form_fields()?
            .into_iter()
            .map(|f| (f.name, f.kind))
            .collect();
        info!(
            "{}: template has {} fields, {} planned writes",
            plan.form,
            kinds.len(),
            plan.writes.len()
        );

        let mut report = FillReport {
            form: plan.form.clone(),
            ..FillReport::default()
        };

        for write in &plan.writes {
            let expected = match write.value {
                FieldValue::Text(_) => FieldKind::Text,
                FieldValue::Checkbox(_) => FieldKind::Checkbox,
            };
            let reason = match kinds.get(&write.field) {
                None => Some("field not found in template".to_string()),
                Some(found) if *found != expected => {
                    Some(format!("expected a {expected} field, found {found}"))
                }
                Some(_) => None,
            };
            if let Some(reason) = reason {
                warn!("{}: could not set {}: {}", plan.form, write.field, reason);
                report.warnings.push(FieldWarning {
                    field: write.field.clone(),
                    reason,
                });
                continue;
            }

            let outcome = match &write.value {
                FieldValue::Text(text) => document.set_text_field(&write.field, text),
                FieldValue::Checkbox(checked) => document.set_checkbox(&write.field, *checked),
            };
            match outcome {
                Ok(()) => {
                    debug!("{}: set {} to {:?}", plan.form, write.field, write.value);
                    report.fields_written += 1;
                }
                Err(e) if e.is_field_error() => {
                    warn!("{}: could not set {}: {}", plan.form, write.field, e);
                    report.warnings.push(FieldWarning {
                        field: write.field.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }

        if self.strict && !report.warnings.is_empty() {
            let fields: Vec<&str> = report.warnings.iter().map(|w| w.field.as_str()).collect();
            return Err(FormError::MissingFields {
                form: plan.form.clone(),
                count: fields.len(),
                fields: fields.join(", "),
            });
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_schema;
    use pdf_core::fixtures::FormFixture;
    use serde_json::json;

    fn schema() -> FormSchema {
        parse_schema(
            r#"{
                "form": "GC-999",
                "title": "Test",
                "template": "GC-999.pdf",
                "groups": [{
                    "name": "all",
                    "text": [
                        { "field": "F[0].Page1[0].Name[0]", "bind": "$.name" },
                        { "field": "F[0].Page1[0].Gone[0]", "text": "x" }
                    ],
                    "checkboxes": [
                        { "field": "F[0].Page1[0].Yes_cb[0]", "when": "$.flag" },
                        { "field": "F[0].Page1[0].Name2[0]", "when": true }
                    ]
                }]
            }"#,
        )
        .unwrap()
    }

    fn template() -> Vec<u8> {
        FormFixture::new()
            .text_field("F[0].Page1[0].Name[0]")
            .text_field("F[0].Page1[0].Name2[0]")
            .checkbox("F[0].Page1[0].Yes_cb[0]")
            .build()
    }

    #[test]
    fn test_fill_collects_warnings() {
        let filled = FormFiller::new()
            .fill(&schema(), &template(), &json!({ "name": "Ann", "flag": true }))
            .unwrap();

        assert_eq!(filled.report.fields_written, 2);
        let fields: Vec<&str> = filled.report.warnings.iter().map(|w| w.field.as_str()).collect();
        assert_eq!(fields, vec!["F[0].Page1[0].Gone[0]", "F[0].Page1[0].Name2[0]"]);
        assert_eq!(
            filled.report.warnings[1].reason,
            "expected a checkbox field, found text"
        );
        assert_eq!(
            filled.document.text_field_value("F[0].Page1[0].Name[0]").unwrap().as_deref(),
            Some("Ann")
        );
        assert!(filled.document.is_checked("F[0].Page1[0].Yes_cb[0]").unwrap());
    }

    #[test]
    fn test_strict_mode_fails_the_form() {
        let err = FormFiller::new()
            .strict(true)
            .fill(&schema(), &template(), &json!({}))
            .unwrap_err();
        match err {
            FormError::MissingFields { form, count, .. } => {
                assert_eq!(form, "GC-999");
                assert_eq!(count, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_garbage_template_is_an_error() {
        assert!(FormFiller::new()
            .fill(&schema(), b"not a pdf", &json!({}))
            .is_err());
    }
}
