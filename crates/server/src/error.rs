use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use intake::IntakeError;
use pdf_core::PdfError;
use serde::{Deserialize, Serialize};
use std::error::Error as _;
use thiserror::Error;

/// Failure body shared by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
            details: None,
        }
    }

    pub fn method_not_allowed() -> Self {
        Self::new("Method not allowed")
    }
}

/// What can go wrong while processing a submission as a whole
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Pdf(#[from] PdfError),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to process guardianship forms")]
    Guardianship(#[source] ProcessError),

    #[error("Failed to process conservatorship form")]
    Conservatorship(#[source] ProcessError),

    #[error("Failed to generate document")]
    Cover(#[source] ProcessError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            details: self.source().map(|e| e.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_error_body_carries_details() {
        let err = ApiError::Conservatorship(ProcessError::Intake(IntakeError::NotAnObject("array")));
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body()).await.unwrap();
        let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.error, "Failed to process conservatorship form");
        assert_eq!(
            body.details.as_deref(),
            Some("Submission must be a JSON object, got array")
        );
    }

    #[test]
    fn test_method_not_allowed_has_no_details() {
        let body = serde_json::to_value(ErrorResponse::method_not_allowed()).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Method not allowed" }));
    }
}
