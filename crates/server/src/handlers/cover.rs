use crate::cover::{CoverParties, CoverSheet};
use crate::error::{ApiError, ProcessError};
use actix_web::{web, HttpResponse};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Local;
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverResponse {
    pub success: bool,
    pub document_url: String,
    pub document_id: String,
    pub message: String,
}

fn generate(sheet: CoverSheet, body: web::Bytes) -> Result<HttpResponse, ApiError> {
    let response = render(sheet, &body).map_err(ApiError::Cover)?;
    Ok(HttpResponse::Ok().json(response))
}

fn render(sheet: CoverSheet, body: &[u8]) -> Result<CoverResponse, ProcessError> {
    let now = Local::now();
    let body: serde_json::Value = serde_json::from_slice(body)?;
    info!("Received data for {}", sheet.code());

    let parties = CoverParties::from_value(&body);
    let bytes = sheet.render(&parties, now.date_naive())?;

    Ok(CoverResponse {
        success: true,
        document_url: format!("data:application/pdf;base64,{}", STANDARD.encode(bytes)),
        document_id: format!("{}-{}", sheet.id_prefix(), now.timestamp_millis()),
        message: format!("{} generated successfully", sheet.code()),
    })
}

pub async fn generate_gc210(body: web::Bytes) -> Result<HttpResponse, ApiError> {
    generate(CoverSheet::Gc210, body)
}

pub async fn generate_gc310(body: web::Bytes) -> Result<HttpResponse, ApiError> {
    generate(CoverSheet::Gc310, body)
}

pub async fn generate_gc320(body: web::Bytes) -> Result<HttpResponse, ApiError> {
    generate(CoverSheet::Gc320, body)
}

pub async fn generate_gc350(body: web::Bytes) -> Result<HttpResponse, ApiError> {
    generate(CoverSheet::Gc350, body)
}
