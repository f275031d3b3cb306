//! Try-on processing endpoint

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{error, info, warn, Instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::AppState;
use crate::domain::{BodyMeasurements, ClothingItem};
use crate::engine::TryOnResponse;

/// Request body for a try-on (documentation schema; the handler parses
/// leniently from raw JSON)
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProcessRequest {
    /// Person photo, raw base64 or data URI
    pub person_image: String,
    /// Garment photo, raw base64 or data URI
    pub clothing_image: String,
    /// Garment details; every field is optional
    pub clothing_item: Option<ClothingItem>,
    /// Body measurements in centimeters; dropped if malformed
    pub body_measurements: Option<BodyMeasurements>,
    /// Echoed back in the response
    pub user_id: Option<String>,
}

/// POST /api/tryon/process - Run a virtual try-on
#[utoipa::path(
    post,
    path = "/api/tryon/process",
    tag = "tryon",
    request_body = ProcessRequest,
    responses(
        (status = 200, description = "Try-on produced (remote or local blend)", body = TryOnResponse),
        (status = 400, description = "Missing or undecodable images", body = TryOnResponse),
        (status = 413, description = "Request body too large", body = TryOnResponse),
        (status = 500, description = "Unexpected failure", body = TryOnResponse)
    )
)]
pub async fn process_tryon(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> HttpResponse {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("tryon", %request_id);

    async move {
        let start = Instant::now();
        info!("Processing try-on request");

        match state.pipeline.process(&body).await {
            Ok(response) => {
                info!(
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    confidence = ?response.confidence,
                    "Try-on request complete"
                );
                HttpResponse::Ok().json(response)
            }
            Err(e) if e.is_client_error() => {
                warn!(error = %e, "Rejected try-on request");
                HttpResponse::BadRequest().json(TryOnResponse::error(e.to_string()))
            }
            Err(e) => {
                error!(error = %e, "Try-on request failed");
                HttpResponse::InternalServerError().json(TryOnResponse::error(e.to_string()))
            }
        }
    }
    .instrument(span)
    .await
}
