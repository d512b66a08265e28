use actix_web::{HttpResponse, Responder};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

pub const APP_NAME: &str = "guardianship-conservatorship";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub app: &'static str,
    pub timestamp: String,
}

/// Liveness check; answers any method
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        app: APP_NAME,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
