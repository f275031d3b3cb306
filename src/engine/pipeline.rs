//! Try-on request pipeline
//!
//! normalize -> decode -> compose -> advise -> assemble. Only missing or
//! undecodable input images fail a request; provider problems lower the
//! quality of the answer, never its availability. Decoding and encoding run
//! on the blocking pool so large images do not stall the HTTP workers.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Settings;
use crate::domain::TryOnResult;
use super::advice::AdviceEngine;
use super::assembler::{assemble, TryOnResponse};
use super::codec::{self, CodecError};
use super::compositor::TryOnEngine;
use super::normalizer::{self, ValidationError};

/// Errors that fail a try-on request
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Image Error: {0}")]
    Decode(CodecError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PipelineError {
    /// Whether the caller sent bad input
    pub fn is_client_error(&self) -> bool {
        matches!(self, PipelineError::Validation(_) | PipelineError::Decode(_))
    }
}

/// Wires the try-on components together
pub struct TryOnPipeline {
    engine: TryOnEngine,
    advice: AdviceEngine,
}

impl TryOnPipeline {
    pub fn new(engine: TryOnEngine, advice: AdviceEngine) -> Self {
        TryOnPipeline { engine, advice }
    }

    /// Build from settings; remote paths are chosen by credential presence
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            TryOnEngine::new(settings.synthesis.clone()),
            AdviceEngine::from_settings(&settings.advice),
        )
    }

    pub fn advice(&self) -> &AdviceEngine {
        &self.advice
    }

    /// Run one request end to end
    pub async fn process(&self, raw: &Value) -> Result<TryOnResponse, PipelineError> {
        let request = normalizer::parse(raw)?;

        let (person_wire, clothing_wire) = (request.person_image, request.clothing_image);
        let (person, clothing) = run_blocking(move || -> Result<_, CodecError> {
            Ok((codec::decode(&person_wire)?, codec::decode(&clothing_wire)?))
        })
        .await?
        .map_err(PipelineError::Decode)?;

        debug!(
            person = ?person.dimensions(),
            clothing = ?clothing.dimensions(),
            item_type = %request.clothing_item.item_type,
            has_measurements = request.body_measurements.is_some(),
            "Decoded try-on inputs"
        );

        let composition = self
            .engine
            .compose(&person, &clothing, &request.clothing_item)
            .await;

        let recommendations = self
            .advice
            .recommend(&request.clothing_item, request.body_measurements.as_ref())
            .await;

        let result = TryOnResult {
            original_image: person,
            result_image: composition.image,
            confidence: composition.confidence,
            recommendations,
            fit_analysis: composition.fit_analysis,
            path: composition.path,
        };

        info!(
            original = ?result.original_image.dimensions(),
            path = ?result.path,
            confidence = result.confidence,
            recommendations = result.recommendations.len(),
            "Try-on complete"
        );

        let user_id = request.user_id;
        run_blocking(move || assemble(result, user_id))
            .await?
            .map_err(|e| PipelineError::Internal(format!("failed to encode result image: {}", e)))
    }
}

/// Run CPU-bound image work on the blocking thread pool
async fn run_blocking<T, F>(task: F) -> Result<T, PipelineError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| PipelineError::Internal(format!("image task failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::codec::tests::sample_wire;
    use crate::engine::compositor::tests::FakeBackend;
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn offline_pipeline() -> TryOnPipeline {
        TryOnPipeline::from_settings(&Settings::default())
    }

    #[tokio::test]
    async fn test_end_to_end_without_credentials() {
        let pipeline = offline_pipeline();
        let body = json!({
            "person_image": sample_wire(512, 768),
            "clothing_image": format!("data:image/png;base64,{}", sample_wire(300, 400)),
            "clothing_item": { "item_type": "jacket", "color": "olive" },
            "user_id": "user-7"
        });

        let response = pipeline.process(&body).await.unwrap();

        assert_eq!(response.status, "success");
        assert_eq!(response.confidence, Some(0.0));
        assert_eq!(response.user_id.as_deref(), Some("user-7"));

        let recs = response.recommendations.unwrap();
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0], "This olive jacket suits your style");

        let image = codec::decode(&response.result_image.unwrap()).unwrap();
        assert_eq!(image.dimensions(), (512, 768));
    }

    #[tokio::test]
    async fn test_missing_image_makes_no_provider_call() {
        let backend = Arc::new(FakeBackend::failing());
        let pipeline = TryOnPipeline::new(
            TryOnEngine::with_backend(backend.clone()),
            AdviceEngine::new(None),
        );

        let err = pipeline
            .process(&json!({ "person_image": sample_wire(4, 4) }))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Validation(ValidationError::MissingImages)));
        assert!(err.is_client_error());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_undecodable_image_is_client_error() {
        let backend = Arc::new(FakeBackend::failing());
        let pipeline = TryOnPipeline::new(
            TryOnEngine::with_backend(backend.clone()),
            AdviceEngine::new(None),
        );

        let err = pipeline
            .process(&json!({ "person_image": "not-an-image", "clothing_image": sample_wire(2, 2) }))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Decode(_)));
        assert!(err.to_string().starts_with("Image Error:"));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_image_reports_no_image_data() {
        let backend = Arc::new(FakeBackend::failing());
        let pipeline = TryOnPipeline::new(
            TryOnEngine::with_backend(backend.clone()),
            AdviceEngine::new(None),
        );

        let err = pipeline
            .process(&json!({ "person_image": "", "clothing_image": sample_wire(2, 2) }))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Decode(CodecError::Empty)));
        assert_eq!(err.to_string(), "Image Error: No image data");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_type_and_bad_measurements_still_succeed() {
        let pipeline = offline_pipeline();
        let body = json!({
            "person_image": sample_wire(16, 16),
            "clothing_image": sample_wire(8, 8),
            "clothing_item": { "item_type": "kimono", "color": "blue" },
            "body_measurements": { "height": "very tall" }
        });

        let response = pipeline.process(&body).await.unwrap();
        let recs = response.recommendations.unwrap();
        assert_eq!(recs[0], "This blue shirt suits your style");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_requests_on_spawned_tasks() {
        let pipeline = Arc::new(offline_pipeline());

        let tasks: Vec<_> = (0..4u32)
            .map(|i| {
                let pipeline = pipeline.clone();
                let body = json!({
                    "person_image": sample_wire(40 + i, 60),
                    "clothing_image": sample_wire(20, 20),
                });
                tokio::spawn(async move { pipeline.process(&body).await })
            })
            .collect();

        for (i, task) in tasks.into_iter().enumerate() {
            let response = task.await.unwrap().unwrap();
            let image = codec::decode(&response.result_image.unwrap()).unwrap();
            assert_eq!(image.dimensions(), (40 + i as u32, 60));
        }
    }

    #[tokio::test]
    async fn test_remote_result_flows_into_response() {
        let remote = codec::decode(&sample_wire(10, 10)).unwrap();
        let pipeline = TryOnPipeline::new(
            TryOnEngine::with_backend(Arc::new(FakeBackend::returning(remote.clone()))),
            AdviceEngine::new(None),
        );

        let response = pipeline
            .process(&json!({ "person_image": sample_wire(10, 10), "clothing_image": sample_wire(5, 5) }))
            .await
            .unwrap();

        assert_eq!(response.confidence, Some(0.95));
        assert_eq!(codec::decode(&response.result_image.unwrap()).unwrap(), remote);
        assert_eq!(response.fit_analysis.unwrap().overall_score, Some(0.96));
    }
}
