//! R-TryOn
//!
//! Virtual dressing room backend using Rust + Actix-Web.
//! Sends person and garment photos to a remote try-on model, falls back to a
//! local alpha blend when the model is unavailable, and attaches styling
//! recommendations from a language model.

use actix_web::{web, App, HttpServer, middleware};
use anyhow::Context;
use std::time::Instant;
use tracing::info;
use tracing_actix_web::TracingLogger;

mod api;
mod config;
mod domain;
mod engine;
mod providers;

use crate::config::Settings;
use crate::engine::TryOnPipeline;

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Settings,
    pub pipeline: TryOnPipeline,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let pipeline = TryOnPipeline::from_settings(&settings);
        AppState {
            settings,
            pipeline,
            started_at: Instant::now(),
        }
    }
}

#[cfg(test)]
impl AppState {
    /// State with no provider credentials; every request takes the local paths
    pub fn offline() -> Self {
        Self::new(Settings::default())
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber for structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("r_tryon=info".parse()?)
                .add_directive("actix_web=info".parse()?)
        )
        .json()
        .init();

    // Load configuration
    let settings = Settings::load().context("Failed to load configuration")?;
    let bind_addr = format!("{}:{}", settings.server.host, settings.server.port);
    let workers = settings.server.workers.unwrap_or_else(|| num_cpus::get() * 2);

    info!(
        "Starting R-TryOn v{} on {}",
        env!("CARGO_PKG_VERSION"),
        bind_addr
    );
    // Create shared application state
    let app_state = web::Data::new(AppState::new(settings));
    info!(
        synthesis_configured = app_state.settings.synthesis.is_usable(),
        advice_remote = app_state.pipeline.advice().is_remote(),
        synthesis_endpoint = %app_state.settings.synthesis.endpoint,
        "Provider configuration"
    );

    // Configure and start HTTP server
    HttpServer::new(move || {
        let payload_limit = app_state.settings.server.max_payload_bytes;

        App::new()
            .app_data(app_state.clone())
            .app_data(api::json_config(payload_limit))
            // Middleware
            .wrap(TracingLogger::default())
            .wrap(middleware::Compress::default())
            .wrap(
                middleware::DefaultHeaders::new()
                    .add(("X-Service", "r-tryon"))
                    .add(("X-Version", env!("CARGO_PKG_VERSION")))
            )
            // Routes
            .configure(api::configure_routes)
    })
    .workers(workers)
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind {}", bind_addr))?
    .run()
    .await
    .context("HTTP server terminated with an error")
}
