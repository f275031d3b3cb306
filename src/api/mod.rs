//! API module - HTTP routes and handlers

pub mod handlers;
pub mod openapi;

use actix_web::{error, web, HttpResponse};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::openapi::ApiDoc;
use crate::engine::TryOnResponse;

/// Configure all API routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/tryon")
            .route("/process", web::post().to(handlers::process::process_tryon))
            .route("/recommendations", web::post().to(handlers::advice::recommendations))
            .route("/advice", web::post().to(handlers::advice::fashion_advice))
            .route("/compatibility", web::post().to(handlers::advice::outfit_compatibility))
            .route("/health", web::get().to(handlers::health::health_check))
    )
    .route("/health", web::get().to(handlers::health::health_check))
    .route("/", web::get().to(handlers::health::index))
    // Swagger UI and OpenAPI document
    .service(
        SwaggerUi::new("/swagger-ui/{_:.*}")
            .url("/api-docs/openapi.json", ApiDoc::openapi())
    );
}

/// JSON extractor config: body size limit and error envelopes
///
/// Oversized bodies get 413, any other JSON problem 400, both in the same
/// `{status, message}` shape as pipeline errors.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(move |err, _req| {
            let response = match &err {
                error::JsonPayloadError::OverflowKnownLength { .. }
                | error::JsonPayloadError::Overflow { .. } => {
                    HttpResponse::PayloadTooLarge().json(TryOnResponse::error(format!(
                        "File too large. Maximum size is {}MB",
                        limit / (1024 * 1024)
                    )))
                }
                other => HttpResponse::BadRequest()
                    .json(TryOnResponse::error(format!("Invalid JSON body: {}", other))),
            };
            warn!(error = %err, status = response.status().as_u16(), "Rejected request body");
            error::InternalError::from_response(err, response).into()
        })
}
