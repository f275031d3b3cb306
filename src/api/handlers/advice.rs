//! Styling advice endpoints

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::AppState;
use crate::engine::normalizer::{parse_body_measurements, parse_clothing_item};

/// Response for recommendation requests
#[derive(Serialize, ToSchema)]
pub struct RecommendationsResponse {
    pub status: &'static str,
    pub recommendations: Vec<String>,
}

/// Request body for general fashion advice
#[derive(Debug, Deserialize, ToSchema)]
pub struct AdviceRequest {
    #[serde(default = "default_body_shape")]
    pub body_shape: String,
    #[serde(default = "default_style")]
    pub style_preference: String,
    #[serde(default = "default_occasion")]
    pub occasion: String,
    #[serde(default = "default_budget")]
    pub budget: String,
}

fn default_body_shape() -> String { "regular".to_string() }
fn default_style() -> String { "casual".to_string() }
fn default_occasion() -> String { "everyday".to_string() }
fn default_budget() -> String { "medium".to_string() }

#[derive(Serialize, ToSchema)]
pub struct AdviceResponse {
    pub status: &'static str,
    pub advice: String,
}

/// Request body for compatibility checks
#[derive(Debug, Deserialize, ToSchema)]
pub struct CompatibilityRequest {
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct CompatibilityResponse {
    pub status: &'static str,
    pub analysis: String,
    pub items_count: usize,
}

/// POST /api/tryon/recommendations - Styling tips for a garment
///
/// Accepts the same `clothing_item` / `body_measurements` objects as the
/// process endpoint, with the same defaults.
#[utoipa::path(
    post,
    path = "/api/tryon/recommendations",
    tag = "advice",
    responses(
        (status = 200, description = "Recommendations generated", body = RecommendationsResponse)
    )
)]
pub async fn recommendations(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> HttpResponse {
    let item = parse_clothing_item(body.get("clothing_item"));
    let measurements = body.get("body_measurements").and_then(parse_body_measurements);

    let recommendations = state
        .pipeline
        .advice()
        .recommend(&item, measurements.as_ref())
        .await;

    HttpResponse::Ok().json(RecommendationsResponse {
        status: "success",
        recommendations,
    })
}

/// POST /api/tryon/advice - General fashion advice
#[utoipa::path(
    post,
    path = "/api/tryon/advice",
    tag = "advice",
    request_body = AdviceRequest,
    responses(
        (status = 200, description = "Advice generated", body = AdviceResponse)
    )
)]
pub async fn fashion_advice(
    state: web::Data<AppState>,
    body: web::Json<AdviceRequest>,
) -> HttpResponse {
    let advice = state
        .pipeline
        .advice()
        .fashion_advice(&body.body_shape, &body.style_preference, &body.occasion, &body.budget)
        .await;

    HttpResponse::Ok().json(AdviceResponse { status: "success", advice })
}

/// POST /api/tryon/compatibility - Rate an outfit
#[utoipa::path(
    post,
    path = "/api/tryon/compatibility",
    tag = "advice",
    request_body = CompatibilityRequest,
    responses(
        (status = 200, description = "Compatibility analysed", body = CompatibilityResponse)
    )
)]
pub async fn outfit_compatibility(
    state: web::Data<AppState>,
    body: web::Json<CompatibilityRequest>,
) -> HttpResponse {
    let report = state.pipeline.advice().outfit_compatibility(&body.items).await;

    HttpResponse::Ok().json(CompatibilityResponse {
        status: "success",
        analysis: report.analysis,
        items_count: report.items_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;

    #[actix_web::test]
    async fn test_recommendations_use_templates_offline() {
        let state = web::Data::new(AppState::offline());
        let app = test::init_service(App::new().app_data(state).configure(api::configure_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/tryon/recommendations")
            .set_json(json!({ "clothing_item": { "item_type": "skirt", "color": "yellow" } }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["recommendations"][0], "This yellow skirt suits your style");
    }

    #[actix_web::test]
    async fn test_compatibility_counts_items() {
        let state = web::Data::new(AppState::offline());
        let app = test::init_service(App::new().app_data(state).configure(api::configure_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/tryon/compatibility")
            .set_json(json!({ "items": ["white tee", "black jeans", "loafers"] }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["items_count"], 3);
        assert_eq!(body["analysis"], "Compatibility check unavailable");
    }
}
