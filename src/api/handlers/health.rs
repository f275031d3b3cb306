//! Health check and index endpoints

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;

const SERVICE_NAME: &str = "r-tryon virtual dressing room";

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct IndexResponse {
    pub message: &'static str,
    pub api_endpoint: &'static str,
}

/// GET /health - Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let response = HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        timestamp: Utc::now(),
    };

    HttpResponse::Ok().json(response)
}

/// GET / - Service banner
#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    responses(
        (status = 200, description = "Service banner", body = IndexResponse)
    )
)]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(IndexResponse {
        message: "Virtual Dressing Room backend is running",
        api_endpoint: "/api/tryon/process",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api;
    use actix_web::{test, App};
    use serde_json::Value;

    #[actix_web::test]
    async fn test_health_both_paths() {
        let state = web::Data::new(AppState::offline());
        let app = test::init_service(App::new().app_data(state).configure(api::configure_routes)).await;

        for uri in ["/health", "/api/tryon/health"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["status"], "healthy");
        }
    }

    #[actix_web::test]
    async fn test_index_banner() {
        let state = web::Data::new(AppState::offline());
        let app = test::init_service(App::new().app_data(state).configure(api::configure_routes)).await;

        let req = test::TestRequest::get().uri("/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["api_endpoint"], "/api/tryon/process");
    }
}
