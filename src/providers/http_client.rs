//! HTTP client wrapper for provider APIs
//!
//! Wraps `reqwest` with the gateway's defaults: a single bounded timeout per
//! request, optional bearer authentication, and error classification into
//! `ProviderError`. No retry or backoff happens at this layer.

use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::debug;

use crate::providers::traits::ProviderError;

/// User agent sent to every provider
const USER_AGENT: &str = concat!("r-tryon/", env!("CARGO_PKG_VERSION"));

/// HTTP client for provider requests
#[derive(Debug, Clone)]
pub struct ProviderHttpClient {
    /// Inner HTTP client (connection pool is shared between clones)
    client: Client,

    /// Timeout applied to each request
    timeout: Duration,
}

impl ProviderHttpClient {
    /// Create a client whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10).min(timeout))
            .pool_max_idle_per_host(10)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(ProviderHttpClient { client, timeout })
    }

    /// Build a POST request
    pub fn post(&self, url: &str) -> ProviderRequestBuilder<'_> {
        ProviderRequestBuilder {
            client: self,
            builder: self.client.post(url),
        }
    }

    /// Execute a request, mapping transport failures
    async fn execute(&self, builder: RequestBuilder) -> Result<Response, ProviderError> {
        debug!(timeout_secs = self.timeout.as_secs(), "Executing provider request");

        builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.timeout.as_secs())
            } else {
                // URLs may carry credentials; keep them out of error text
                ProviderError::Http(e.without_url())
            }
        })
    }
}

/// Request builder bound to a `ProviderHttpClient`
pub struct ProviderRequestBuilder<'a> {
    client: &'a ProviderHttpClient,
    builder: RequestBuilder,
}

impl<'a> ProviderRequestBuilder<'a> {
    /// Add JSON body to the request
    pub fn json<T: serde::Serialize + ?Sized>(mut self, json: &T) -> Self {
        self.builder = self.builder.json(json);
        self
    }

    /// Add a header
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    /// Add a bearer token header when a token is present
    pub fn bearer_auth_opt(mut self, token: Option<&str>) -> Self {
        if let Some(token) = token {
            self.builder = self.builder.bearer_auth(token);
        }
        self
    }

    /// Send the request
    pub async fn send(self) -> Result<Response, ProviderError> {
        self.client.execute(self.builder).await
    }
}

/// Read a response body as text for error messages, capped in length
pub async fn error_body(response: Response) -> String {
    let body = response.text().await.unwrap_or_default();
    truncate(&body, 500).to_string()
}

/// Truncate on a char boundary
pub fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
