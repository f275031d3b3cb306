//! Gemini text provider implementation
//!
//! Non-streaming `generateContent` calls used for styling recommendations.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::models::{GenerateContentRequest, GenerateContentResponse};
use crate::config::AdviceSettings;
use crate::providers::http_client::{error_body, ProviderHttpClient};
use crate::providers::traits::{LanguageModel, ProviderError, ProviderResult};

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini text client
pub struct GeminiClient {
    client: ProviderHttpClient,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> ProviderResult<Self> {
        Ok(GeminiClient {
            client: ProviderHttpClient::new(timeout)?,
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// Build a client when an API key is configured
    pub fn from_settings(settings: &AdviceSettings) -> ProviderResult<Self> {
        let api_key = settings.api_key.clone().ok_or_else(|| {
            ProviderError::NotConfigured("GEMINI_API_KEY not set".to_string())
        })?;

        Self::new(
            settings.base_url.clone(),
            settings.model.clone(),
            api_key,
            Duration::from_secs(settings.timeout_secs.max(1)),
        )
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.base_url.trim_end_matches('/'),
            self.model,
            method
        )
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    fn code(&self) -> &'static str {
        "gemini"
    }

    async fn complete(&self, prompt: &str) -> ProviderResult<String> {
        debug!(model = %self.model, prompt_len = prompt.len(), "Sending request to Gemini API");

        let response = self
            .client
            .post(&self.api_url("generateContent"))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: error_body(response).await,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Gemini response: {}", e)))?;

        if body.is_filtered() {
            return Err(ProviderError::ContentFiltered);
        }

        body.first_text().ok_or(ProviderError::EmptyResponse)
    }
}
