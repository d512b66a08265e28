//! Fetching, filling and merging a batch of forms

use crate::store::{StoreError, TemplateSet, TemplateStore};
use forms::{FillReport, FormError, FormFiller, FormId};
use log::{error, info};
use pdf_core::{merge_documents, PdfDocument, PdfError};
use thiserror::Error;

/// Documents at or below this size are error placeholders, not PDFs
pub const MIN_DOCUMENT_BYTES: usize = 100;

#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("template unavailable: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Pdf(#[from] PdfError),
}

#[derive(Debug)]
pub enum FormOutcome {
    Filled { bytes: Vec<u8>, report: FillReport },
    Failed { placeholder: Vec<u8>, error: String },
}

/// Result for one form of a batch
#[derive(Debug)]
pub struct FormResult {
    pub form: FormId,
    pub outcome: FormOutcome,
}

impl FormResult {
    pub fn bytes(&self) -> &[u8] {
        match &self.outcome {
            FormOutcome::Filled { bytes, .. } => bytes,
            FormOutcome::Failed { placeholder, .. } => placeholder,
        }
    }

    /// Whether this result holds a usable document
    pub fn is_document(&self) -> bool {
        self.bytes().len() > MIN_DOCUMENT_BYTES
    }
}

/// Fills forms one at a time from a template store
pub struct Assembler<'a> {
    store: &'a dyn TemplateStore,
    filler: FormFiller,
}

impl<'a> Assembler<'a> {
    pub fn new(store: &'a dyn TemplateStore, filler: FormFiller) -> Self {
        Self { store, filler }
    }

    /// Fill every form in order
    ///
    /// A form that cannot be fetched or filled yields a placeholder result
    /// and the batch continues.
    pub async fn assemble(
        &self,
        set: TemplateSet,
        forms: &[FormId],
        data: &serde_json::Value,
    ) -> Vec<FormResult> {
        let mut results = Vec::with_capacity(forms.len());
        for &form in forms {
            info!("Processing {}...", form);
            let outcome = match self.fill_one(set, form, data).await {
                Ok((bytes, report)) => {
                    info!(
                        "{} completed: {} fields written, {} skipped",
                        form,
                        report.fields_written,
                        report.warnings.len()
                    );
                    FormOutcome::Filled { bytes, report }
                }
                Err(e) => {
                    error!("Error with {}: {}", form, e);
                    FormOutcome::Failed {
                        placeholder: format!("Error processing {form}").into_bytes(),
                        error: e.to_string(),
                    }
                }
            };
            results.push(FormResult { form, outcome });
        }
        results
    }

    async fn fill_one(
        &self,
        set: TemplateSet,
        form: FormId,
        data: &serde_json::Value,
    ) -> Result<(Vec<u8>, FillReport), AssembleError> {
        let schema = form.schema()?;
        let template = self.store.fetch(set, &schema.template).await?;
        let mut filled = self.filler.fill(schema, &template, data)?;
        let bytes = filled.document.to_bytes()?;
        Ok((bytes, filled.report))
    }
}

/// Concatenate every usable document of a batch, in batch order
pub fn merge(results: &[FormResult]) -> Result<Vec<u8>, PdfError> {
    let mut documents = Vec::new();
    for result in results.iter().filter(|r| r.is_document()) {
        info!("Merging {}...", result.form);
        documents.push((
            result.form.code().to_string(),
            PdfDocument::open_from_bytes(result.bytes())?,
        ));
    }
    merge_documents(documents)?.to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTemplateStore;
    use pdf_core::fixtures::FormFixture;
    use serde_json::json;

    fn store() -> MemoryTemplateStore {
        MemoryTemplateStore::new()
            .with(
                "GC-310.pdf",
                FormFixture::new()
                    .pages(2)
                    .text_field("topmostSubform[0].Page1[0].StdP1Header_sf[0].CaseNumber[0].CaseNumber_ft[0]")
                    .build(),
            )
            .with("GC-320.pdf", FormFixture::new().pages(3).build())
    }

    #[actix_web::test]
    async fn test_failed_fetch_is_isolated() {
        let store = store();
        let assembler = Assembler::new(&store, FormFiller::new());
        let forms = [FormId::Gc310, FormId::Gc312, FormId::Gc320];

        let results = assembler
            .assemble(TemplateSet::Conservatorship, &forms, &json!({}))
            .await;

        assert_eq!(results.len(), 3);
        assert!(results[0].is_document());
        assert!(!results[1].is_document());
        assert_eq!(results[1].bytes(), b"Error processing GC-312");
        assert!(matches!(
            &results[1].outcome,
            FormOutcome::Failed { error, .. } if error.contains("GC-312.pdf")
        ));
        assert!(results[2].is_document());

        let merged = PdfDocument::open_from_bytes(&merge(&results).unwrap()).unwrap();
        assert_eq!(merged.page_count(), 5);
    }

    #[actix_web::test]
    async fn test_strict_mode_turns_drift_into_failure() {
        let store = store();
        let assembler = Assembler::new(&store, FormFiller::new().strict(true));

        let results = assembler
            .assemble(TemplateSet::Conservatorship, &[FormId::Gc310], &json!({}))
            .await;

        assert!(matches!(results[0].outcome, FormOutcome::Failed { .. }));
    }

    #[test]
    fn test_merge_of_nothing_is_an_empty_document() {
        let merged = PdfDocument::open_from_bytes(&merge(&[]).unwrap()).unwrap();
        assert_eq!(merged.page_count(), 0);
    }
}
