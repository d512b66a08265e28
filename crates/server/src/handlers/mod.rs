pub mod conservatorship;
pub mod cover;
pub mod guardianship;
pub mod health;

use crate::error::ErrorResponse;
use actix_web::{web, HttpResponse, Resource, Responder};

/// CORS preflight; the CORS middleware adds the headers
pub async fn preflight() -> impl Responder {
    HttpResponse::Ok().finish()
}

pub async fn method_not_allowed() -> impl Responder {
    HttpResponse::MethodNotAllowed().json(ErrorResponse::method_not_allowed())
}

/// A POST-only resource that also answers preflight requests
pub fn post_resource<F, Args>(path: &str, handler: F) -> Resource
where
    F: actix_web::Handler<Args>,
    Args: actix_web::FromRequest + 'static,
    F::Output: Responder + 'static,
{
    web::resource(path)
        .route(web::post().to(handler))
        .route(web::method(actix_web::http::Method::OPTIONS).to(preflight))
        .default_service(web::to(method_not_allowed))
}
