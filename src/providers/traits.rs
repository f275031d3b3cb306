//! Provider trait definitions for remote AI integrations
//!
//! Two capabilities are consumed by the try-on pipeline: garment synthesis
//! (returns a composited image) and text completion (returns styling advice).
//! Both are optional at runtime; callers fall back to local strategies when a
//! provider is missing or fails.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ClothingItem;
use crate::engine::{CodecError, PixelBuffer};

// ============================================================================
// Error Types
// ============================================================================

/// Errors from talking to a remote provider
///
/// None of these reach the API caller as a failure. They are recovered by the
/// pipeline and only their text survives, inside the response body.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unrecognized response shape (top-level keys: {0})")]
    UnrecognizedShape(String),

    #[error("Provider rejected the request: {0}")]
    Rejected(String),

    #[error("Image codec error: {0}")]
    Decode(#[from] CodecError),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Rate limited by provider")]
    RateLimited,

    #[error("Content filtered by provider")]
    ContentFiltered,

    #[error("Provider returned no content")]
    EmptyResponse,
}

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

// ============================================================================
// Capability Traits
// ============================================================================

/// Remote garment synthesis
///
/// Implementations must be safe to share across concurrent requests; any
/// per-call state (headers, bodies) lives on the call's stack.
#[async_trait]
pub trait SynthesisBackend: Send + Sync {
    /// Provider code used in logs
    fn code(&self) -> &'static str;

    /// Dress `person` in `clothing`, returning the provider's image
    async fn synthesize(
        &self,
        person: &PixelBuffer,
        clothing: &PixelBuffer,
        item: &ClothingItem,
    ) -> ProviderResult<PixelBuffer>;
}

/// Single-shot text completion
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Provider code used in logs
    fn code(&self) -> &'static str;

    /// Complete `prompt`, returning the generated text
    async fn complete(&self, prompt: &str) -> ProviderResult<String>;
}
