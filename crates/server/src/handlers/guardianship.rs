use crate::error::{ApiError, ProcessError};
use crate::response::{self, OutputMode, ProcessResponse};
use crate::store::TemplateSet;
use crate::AppState;
use actix_web::{web, HttpResponse};
use chrono::{Local, Utc};
use forms::FormId;
use intake::{GuardianshipRecord, RawSubmission};
use log::info;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct GuardianshipMetadata {
    pub minor: String,
    pub guardian: String,
    pub petitioner: String,
    pub guardianship_type: String,
    pub estate_value: String,
    pub case_number: String,
    pub forms_generated: Vec<String>,
}

/// Fill the selected guardianship forms
///
/// Returns one merged document unless `return_individual_pdfs` is `true`.
pub async fn process_guardianship(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let response = process(&state, &body)
        .await
        .map_err(ApiError::Guardianship)?;
    Ok(HttpResponse::Ok().json(response))
}

async fn process(
    state: &AppState,
    body: &[u8],
) -> Result<ProcessResponse<GuardianshipMetadata>, ProcessError> {
    let now = Utc::now();
    let raw = RawSubmission::from_slice(body)?;
    let today = now.with_timezone(&Local).date_naive();
    let record = GuardianshipRecord::from_submission(&raw, today);
    info!(
        "Received guardianship submission for minor: {}",
        if record.minor.name.is_empty() { "Unknown" } else { record.minor.name.as_str() }
    );

    let forms: Vec<FormId> = record
        .selected_forms()
        .into_iter()
        .filter_map(|code| code.parse().ok())
        .collect();
    info!(
        "Guardianship type: {}, forms to generate: {:?}",
        record.guardianship_type, forms
    );

    let data = serde_json::to_value(&record)?;
    let results = state
        .assembler()
        .assemble(TemplateSet::Guardianship, &forms, &data)
        .await;
    let generated = response::forms_generated(&results);
    info!("Successfully generated {} forms: {:?}", generated.len(), generated);

    let metadata = GuardianshipMetadata {
        minor: record.minor.name.clone(),
        guardian: record.guardian.name.clone(),
        petitioner: record.petitioner.name.clone(),
        guardianship_type: record.guardianship_type.clone(),
        estate_value: record.estate.total.clone(),
        case_number: record.display_case_number().to_string(),
        forms_generated: generated,
    };
    let mode = OutputMode::merged_unless_true(raw.literal_bool("return_individual_pdfs"));

    Ok(response::build(
        "guardianship",
        &record.minor.name,
        metadata,
        &results,
        mode,
        now,
    )?)
}
