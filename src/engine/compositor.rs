//! Try-on compositing
//!
//! Each request first asks the remote synthesis provider for a result and
//! falls back to the local blend when that is not possible. The provider
//! client is created on first use and then shared by every request.

use std::sync::Arc;
use std::time::Instant;
use once_cell::sync::OnceCell;
use tracing::{error, info, warn};

use crate::config::SynthesisSettings;
use crate::domain::{ClothingItem, Composition, CompositionPath, FitAnalysis};
use crate::providers::{ProviderResult, RemoteSynthesisClient, SynthesisBackend};
use super::blend::blend;
use super::codec::PixelBuffer;

/// Confidence reported for provider results.
///
/// The provider is opaque and returns no quality signal, so this is a fixed
/// value rather than a computed score.
pub const REMOTE_CONFIDENCE: f32 = 0.95;

/// Confidence reported for the local blend
pub const FALLBACK_CONFIDENCE: f32 = 0.0;

/// Builds the provider handle from settings
pub type BackendFactory =
    Box<dyn Fn(&SynthesisSettings) -> ProviderResult<Arc<dyn SynthesisBackend>> + Send + Sync>;

/// Composes try-on images
pub struct TryOnEngine {
    settings: SynthesisSettings,
    factory: BackendFactory,
    /// Provider handle, initialized at most once
    backend: OnceCell<Arc<dyn SynthesisBackend>>,
}

impl TryOnEngine {
    /// Create an engine that connects to the hosted provider lazily
    pub fn new(settings: SynthesisSettings) -> Self {
        Self::with_factory(settings, Box::new(connect_remote))
    }

    /// Create an engine that builds its backend with `factory` on first use
    pub fn with_factory(settings: SynthesisSettings, factory: BackendFactory) -> Self {
        TryOnEngine {
            settings,
            factory,
            backend: OnceCell::new(),
        }
    }

    /// Create an engine with an already established backend
    pub fn with_backend(backend: Arc<dyn SynthesisBackend>) -> Self {
        TryOnEngine {
            settings: SynthesisSettings::default(),
            factory: Box::new(connect_remote),
            backend: OnceCell::with_value(backend),
        }
    }

    /// Get or establish the provider handle.
    ///
    /// Concurrent first callers wait for a single initialization. A failed
    /// initialization is not cached, so the next request tries again.
    fn backend(&self) -> ProviderResult<&Arc<dyn SynthesisBackend>> {
        self.backend.get_or_try_init(|| (self.factory)(&self.settings))
    }

    /// Produce a try-on image for `person` wearing `clothing`
    ///
    /// Never fails: any provider error is turned into the local blend with
    /// the error text in the fit description.
    pub async fn compose(
        &self,
        person: &PixelBuffer,
        clothing: &PixelBuffer,
        item: &ClothingItem,
    ) -> Composition {
        let start = Instant::now();

        match self.remote_attempt(person, clothing, item).await {
            Ok(image) => {
                info!(
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    width = image.width(),
                    height = image.height(),
                    "Remote try-on succeeded"
                );
                Composition {
                    image,
                    confidence: REMOTE_CONFIDENCE,
                    fit_analysis: FitAnalysis::remote_success(),
                    path: CompositionPath::Remote,
                }
            }
            Err(e) => {
                warn!(
                    error = %e,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Remote try-on unavailable, using local blend"
                );
                Composition {
                    image: blend_off_thread(person, clothing).await,
                    confidence: FALLBACK_CONFIDENCE,
                    fit_analysis: FitAnalysis::fallback(&e.to_string()),
                    path: CompositionPath::LocalBlend,
                }
            }
        }
    }

    async fn remote_attempt(
        &self,
        person: &PixelBuffer,
        clothing: &PixelBuffer,
        item: &ClothingItem,
    ) -> ProviderResult<PixelBuffer> {
        let backend = self.backend()?;
        info!(provider = backend.code(), description = %item.description(), "Sending try-on request");
        backend.synthesize(person, clothing, item).await
    }
}

/// Blend on the blocking pool; inline if the pool task is lost
async fn blend_off_thread(person: &PixelBuffer, clothing: &PixelBuffer) -> PixelBuffer {
    let (p, c) = (person.clone(), clothing.clone());
    match tokio::task::spawn_blocking(move || blend(&p, &c)).await {
        Ok(image) => image,
        Err(e) => {
            error!(error = %e, "Blend task failed, blending inline");
            blend(person, clothing)
        }
    }
}

fn connect_remote(settings: &SynthesisSettings) -> ProviderResult<Arc<dyn SynthesisBackend>> {
    let client: Arc<dyn SynthesisBackend> = Arc::new(RemoteSynthesisClient::connect(settings)?);
    Ok(client)
}
