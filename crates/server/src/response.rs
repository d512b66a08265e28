//! Processor response bodies

use crate::assembler::{merge, FormOutcome, FormResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use forms::FieldWarning;
use pdf_core::PdfError;
use serde::Serialize;
use std::collections::BTreeMap;

/// How the filled forms are returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Individual,
    Merged,
}

impl OutputMode {
    /// Merged unless the caller sent a literal `true`
    pub fn merged_unless_true(flag: Option<bool>) -> Self {
        if flag == Some(true) {
            OutputMode::Individual
        } else {
            OutputMode::Merged
        }
    }

    /// Individual unless the caller sent a literal `false`
    pub fn individual_unless_false(flag: Option<bool>) -> Self {
        if flag == Some(false) {
            OutputMode::Merged
        } else {
            OutputMode::Individual
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Output {
    Individual {
        pdfs: BTreeMap<String, String>,
    },
    Merged {
        filename: String,
        pdf: String,
    },
}

#[derive(Debug, Serialize)]
pub struct ProcessResponse<M: Serialize> {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
    pub metadata: M,
    /// Fields skipped per form
    pub warnings: BTreeMap<String, Vec<FieldWarning>>,
    /// Why each failed form failed
    pub errors: BTreeMap<String, String>,
    #[serde(flatten)]
    pub output: Output,
}

/// Form codes of the usable documents, in batch order
pub fn forms_generated(results: &[FormResult]) -> Vec<String> {
    results
        .iter()
        .filter(|r| r.is_document())
        .map(|r| r.form.code().to_string())
        .collect()
}

/// Merged document file name stamped in UTC, e.g. `Guardianship_Jane_Doe_2025-03-14T09-30-00.pdf`
pub fn merged_filename(kind: &str, party: &str, now: DateTime<Utc>) -> String {
    let party: String = if party.is_empty() {
        "Unknown".to_string()
    } else {
        party
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    };
    format!("{}_{}_{}.pdf", kind, party, now.format("%Y-%m-%dT%H-%M-%S"))
}

/// Shape a batch into a response body
///
/// `kind` names the case type in messages and file names.
pub fn build<M: Serialize>(
    kind: &str,
    party: &str,
    metadata: M,
    results: &[FormResult],
    mode: OutputMode,
    now: DateTime<Utc>,
) -> Result<ProcessResponse<M>, PdfError> {
    let mut warnings = BTreeMap::new();
    let mut errors = BTreeMap::new();
    let mut pdfs = BTreeMap::new();

    for result in results {
        let code = result.form.code().to_string();
        match &result.outcome {
            FormOutcome::Filled { bytes, report } => {
                if !report.warnings.is_empty() {
                    warnings.insert(code.clone(), report.warnings.clone());
                }
                pdfs.insert(code, STANDARD.encode(bytes));
            }
            FormOutcome::Failed { error, .. } => {
                errors.insert(code, error.clone());
            }
        }
    }

    let output = match mode {
        OutputMode::Individual => Output::Individual { pdfs },
        OutputMode::Merged => Output::Merged {
            filename: merged_filename(&kind_title(kind), party, now),
            pdf: STANDARD.encode(merge(results)?),
        },
    };

    let generated = results.iter().filter(|r| r.is_document()).count();
    Ok(ProcessResponse {
        success: true,
        message: format!("Generated {} {} forms successfully", generated, kind),
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        metadata,
        warnings,
        errors,
        output,
    })
}

fn kind_title(kind: &str) -> String {
    let mut chars = kind.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use forms::{FillReport, FormId};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_output_mode_defaults() {
        assert_eq!(OutputMode::merged_unless_true(None), OutputMode::Merged);
        assert_eq!(OutputMode::merged_unless_true(Some(true)), OutputMode::Individual);
        assert_eq!(OutputMode::individual_unless_false(None), OutputMode::Individual);
        assert_eq!(OutputMode::individual_unless_false(Some(false)), OutputMode::Merged);
    }

    #[test]
    fn test_merged_filename() {
        assert_eq!(
            merged_filename("Guardianship", "Jane O'Doe", now()),
            "Guardianship_Jane_O_Doe_2025-03-14T09-30-00.pdf"
        );
        assert_eq!(
            merged_filename("Conservatorship", "", now()),
            "Conservatorship_Unknown_2025-03-14T09-30-00.pdf"
        );
    }

    #[test]
    fn test_individual_body() {
        let results = vec![
            FormResult {
                form: FormId::Gc310,
                outcome: FormOutcome::Filled {
                    bytes: vec![b'x'; 200],
                    report: FillReport {
                        form: "GC-310".into(),
                        fields_written: 3,
                        warnings: vec![FieldWarning {
                            field: "Gone[0]".into(),
                            reason: "No form field named Gone[0]".into(),
                        }],
                    },
                },
            },
            FormResult {
                form: FormId::Gc312,
                outcome: FormOutcome::Failed {
                    placeholder: b"Error processing GC-312".to_vec(),
                    error: "template GC-312.pdf not found".into(),
                },
            },
        ];

        let body = build(
            "conservatorship",
            "Robert Chen",
            serde_json::json!({}),
            &results,
            OutputMode::Individual,
            now(),
        )
        .unwrap();
        let body = serde_json::to_value(body).unwrap();

        assert_eq!(body["message"], "Generated 1 conservatorship forms successfully");
        assert_eq!(body["timestamp"], "2025-03-14T09:30:00.000Z");
        assert_eq!(body["pdfs"].as_object().unwrap().len(), 1);
        assert!(body["pdfs"]["GC-310"].is_string());
        assert_eq!(body["errors"]["GC-312"], "template GC-312.pdf not found");
        assert_eq!(body["warnings"]["GC-310"][0]["field"], "Gone[0]");
        assert!(body.get("pdf").is_none());
    }
}
