use crate::error::{ApiError, ProcessError};
use crate::response::{self, OutputMode, ProcessResponse};
use crate::store::TemplateSet;
use crate::AppState;
use actix_web::{web, HttpResponse};
use chrono::{Local, Utc};
use forms::FormId;
use intake::{ConservatorshipRecord, RawSubmission};
use log::info;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ConservatorshipMetadata {
    pub conservatee: String,
    pub conservator: String,
    pub petitioner: String,
    pub conservatorship_type: String,
    pub case_number: String,
    pub forms_generated: Vec<String>,
}

/// Fill the conservatorship forms
///
/// Returns each document separately unless `return_individual_pdfs` is `false`.
pub async fn process_conservatorship(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let response = process(&state, &body)
        .await
        .map_err(ApiError::Conservatorship)?;
    Ok(HttpResponse::Ok().json(response))
}

async fn process(
    state: &AppState,
    body: &[u8],
) -> Result<ProcessResponse<ConservatorshipMetadata>, ProcessError> {
    let now = Utc::now();
    let raw = RawSubmission::from_slice(body)?;
    let today = now.with_timezone(&Local).date_naive();
    let record = ConservatorshipRecord::from_submission(&raw, today);
    info!(
        "Received conservatorship submission for: {}",
        record.conservatee.name
    );

    let forms: Vec<FormId> = record
        .forms
        .iter()
        .filter_map(|code| code.parse().ok())
        .collect();

    let data = serde_json::to_value(&record)?;
    let results = state
        .assembler()
        .assemble(TemplateSet::Conservatorship, &forms, &data)
        .await;
    let generated = response::forms_generated(&results);
    info!("Successfully generated {} forms: {:?}", generated.len(), generated);

    let metadata = ConservatorshipMetadata {
        conservatee: record.conservatee.name.clone(),
        conservator: record.conservator.name.clone(),
        petitioner: record.petitioner.name.clone(),
        conservatorship_type: record.conservatorship_type.clone(),
        case_number: record.case_number.clone(),
        forms_generated: generated,
    };
    let mode = OutputMode::individual_unless_false(raw.literal_bool("return_individual_pdfs"));

    Ok(response::build(
        "conservatorship",
        &record.conservatee.name,
        metadata,
        &results,
        mode,
        now,
    )?)
}
