//! OpenAPI 3.0 specification definition

use utoipa::OpenApi;

use crate::api::handlers::{
    health::{HealthResponse, IndexResponse},
    process::ProcessRequest,
    advice::{
        RecommendationsResponse, AdviceRequest, AdviceResponse,
        CompatibilityRequest, CompatibilityResponse,
    },
};
use crate::domain::{BodyMeasurements, ClothingItem, ClothingType, FitAnalysis};
use crate::engine::TryOnResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "R-TryOn API",
        version = "1.0.0",
        description = "Virtual try-on with remote garment synthesis, local blend fallback and styling advice",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/", description = "Current server")
    ),
    tags(
        (name = "system", description = "System health and status endpoints"),
        (name = "tryon", description = "Virtual try-on endpoints"),
        (name = "advice", description = "Styling advice endpoints")
    ),
    paths(
        crate::api::handlers::health::health_check,
        crate::api::handlers::health::index,
        crate::api::handlers::process::process_tryon,
        crate::api::handlers::advice::recommendations,
        crate::api::handlers::advice::fashion_advice,
        crate::api::handlers::advice::outfit_compatibility,
    ),
    components(
        schemas(
            // Health schemas
            HealthResponse,
            IndexResponse,
            // Try-on schemas
            ProcessRequest,
            TryOnResponse,
            FitAnalysis,
            // Advice schemas
            RecommendationsResponse,
            AdviceRequest,
            AdviceResponse,
            CompatibilityRequest,
            CompatibilityResponse,
            // Domain schemas
            ClothingItem,
            ClothingType,
            BodyMeasurements,
        )
    )
)]
pub struct ApiDoc;
