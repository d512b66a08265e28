//! HTTP service filling guardianship and conservatorship court forms
//!
//! Endpoints live under `/api`:
//! - `/health`: liveness, any method
//! - `/process-guardianship`, `/process-conservatorship`: fill every selected
//!   form of a case and return them individually or merged
//! - `/generate-gc210`, `/generate-gc310`, `/generate-gc320`, `/generate-gc350`:
//!   one-page summary sheets
//!
//! Every POST endpoint answers CORS preflight with 200 and any other method
//! with 405.

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use forms::FormFiller;
use log::info;
use std::sync::Arc;

pub mod assembler;
pub mod config;
pub mod cover;
pub mod error;
pub mod handlers;
pub mod response;
pub mod store;

use crate::assembler::Assembler;
use crate::config::ServerConfig;
use crate::handlers::post_resource;
use crate::store::{DirTemplateStore, HttpTemplateStore, TemplateStore};

/// Shared, read-only request context
pub struct AppState {
    pub store: Arc<dyn TemplateStore>,
    pub filler: FormFiller,
}

impl AppState {
    pub fn new(store: Arc<dyn TemplateStore>, filler: FormFiller) -> Self {
        Self { store, filler }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            store_from_config(config),
            FormFiller::new().strict(config.strict_fields),
        )
    }

    pub fn assembler(&self) -> Assembler<'_> {
        Assembler::new(self.store.as_ref(), self.filler)
    }
}

/// Local templates when a directory is configured, the template host otherwise
pub fn store_from_config(config: &ServerConfig) -> Arc<dyn TemplateStore> {
    match &config.template_dir {
        Some(dir) => {
            info!("Reading templates from {}", dir.display());
            Arc::new(DirTemplateStore::new(dir))
        }
        None => Arc::new(HttpTemplateStore::new(
            &config.guardianship_template_url,
            &config.conservatorship_template_url,
        )),
    }
}

pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["POST", "OPTIONS"])
        .allow_any_header()
        .max_age(3600)
}

/// Register every endpoint under `/api`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::route().to(handlers::health::health))
            .service(post_resource(
                "/process-guardianship",
                handlers::guardianship::process_guardianship,
            ))
            .service(post_resource(
                "/process-conservatorship",
                handlers::conservatorship::process_conservatorship,
            ))
            .service(post_resource("/generate-gc210", handlers::cover::generate_gc210))
            .service(post_resource("/generate-gc310", handlers::cover::generate_gc310))
            .service(post_resource("/generate-gc320", handlers::cover::generate_gc320))
            .service(post_resource("/generate-gc350", handlers::cover::generate_gc350)),
    );
}

pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let state = web::Data::new(AppState::from_config(&config));

    info!("Starting server at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(cors())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
