//! Remote synthesis client implementation
//!
//! Sends the person and garment images to the hosted try-on model and
//! returns the composited image. One request is made with the named schema;
//! if the provider answers with a non-2xx status a single retry is made with
//! the positional schema. There is no other retry.

use async_trait::async_trait;
use reqwest::Response;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::models::{positional_request, NamedTryOnRequest};
use super::shapes::negotiate;
use crate::config::SynthesisSettings;
use crate::domain::ClothingItem;
use crate::engine::codec;
use crate::engine::PixelBuffer;
use crate::providers::http_client::{error_body, truncate, ProviderHttpClient};
use crate::providers::traits::{ProviderError, ProviderResult, SynthesisBackend};

/// Client for the hosted try-on model
pub struct RemoteSynthesisClient {
    client: ProviderHttpClient,
    endpoint: String,
    api_token: Option<String>,
    denoise_steps: u32,
    seed: u64,
}

impl RemoteSynthesisClient {
    /// Create a client for `endpoint` with a per-attempt `timeout`
    pub fn new(
        endpoint: impl Into<String>,
        api_token: Option<String>,
        timeout: Duration,
    ) -> ProviderResult<Self> {
        Ok(RemoteSynthesisClient {
            client: ProviderHttpClient::new(timeout)?,
            endpoint: endpoint.into(),
            api_token,
            denoise_steps: 30,
            seed: 42,
        })
    }

    /// Establish the client from settings
    ///
    /// Fails with `NotConfigured` when there is no token and anonymous access
    /// is disabled.
    pub fn connect(settings: &SynthesisSettings) -> ProviderResult<Self> {
        if !settings.is_usable() {
            return Err(ProviderError::NotConfigured(
                "no synthesis API token configured (set HF_TOKEN or TRYON_SYNTHESIS__API_TOKEN)"
                    .to_string(),
            ));
        }

        if settings.api_token.is_some() {
            info!(endpoint = %settings.endpoint, "Synthesis client using authenticated access");
        } else {
            warn!(endpoint = %settings.endpoint, "Synthesis client using anonymous access (shared quota)");
        }

        let mut client = Self::new(
            settings.endpoint.clone(),
            settings.api_token.clone(),
            settings.timeout(),
        )?;
        client.denoise_steps = settings.denoise_steps;
        client.seed = settings.seed;
        Ok(client)
    }

    /// POST one body to the provider
    async fn post<T: Serialize + ?Sized>(&self, body: &T) -> ProviderResult<Response> {
        self.client
            .post(&self.endpoint)
            .bearer_auth_opt(self.api_token.as_deref())
            .json(body)
            .send()
            .await
    }

    /// Named schema first, positional schema once on a non-2xx status
    async fn send_with_alternate(&self, request: &NamedTryOnRequest<'_>) -> ProviderResult<Response> {
        let response = self.post(request).await?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let message = error_body(response).await;
        warn!(
            status = status.as_u16(),
            message = %message,
            "Synthesis provider refused named schema, retrying with positional schema"
        );

        let response = self.post(&positional_request(request)).await?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        Err(ProviderError::ApiError {
            status: status.as_u16(),
            message: error_body(response).await,
        })
    }
}

#[async_trait]
impl SynthesisBackend for RemoteSynthesisClient {
    fn code(&self) -> &'static str {
        "idm-vton"
    }

    async fn synthesize(
        &self,
        person: &PixelBuffer,
        clothing: &PixelBuffer,
        item: &ClothingItem,
    ) -> ProviderResult<PixelBuffer> {
        let person_b64 = codec::encode(person)?;
        let garment_b64 = codec::encode(clothing)?;
        let description = item.description();

        let request = NamedTryOnRequest {
            person_image: &person_b64,
            garment_image: &garment_b64,
            garment_description: &description,
            auto_mask: true,
            auto_crop: false,
            denoise_steps: self.denoise_steps,
            seed: self.seed,
        };

        debug!(
            endpoint = %self.endpoint,
            description = %description,
            authenticated = self.api_token.is_some(),
            "Sending synthesis request"
        );

        let response = self.send_with_alternate(&request).await?;
        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text).map_err(|e| {
            ProviderError::ParseError(format!("{} - Body: {}", e, truncate(&text, 500)))
        })?;

        let encoded = negotiate(&body)?;
        let image = codec::decode(encoded)?;

        info!(
            width = image.width(),
            height = image.height(),
            "Received synthesis result"
        );

        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::codec::tests::sample_wire;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn inputs() -> (PixelBuffer, PixelBuffer, ClothingItem) {
        (
            codec::decode(&sample_wire(8, 12)).unwrap(),
            codec::decode(&sample_wire(4, 4)).unwrap(),
            ClothingItem::default(),
        )
    }

    fn client_for(server: &MockServer, token: Option<&str>) -> RemoteSynthesisClient {
        RemoteSynthesisClient::new(
            format!("{}/api/tryon", server.uri()),
            token.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_direct_field_response() {
        let server = MockServer::start().await;
        let result = sample_wire(8, 12);
        Mock::given(method("POST"))
            .and(path("/api/tryon"))
            .and(header("authorization", "Bearer hf_test"))
            .and(body_partial_json(json!({ "garment_description": "black shirt" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result_image": result })))
            .expect(1)
            .mount(&server)
            .await;

        let (person, clothing, item) = inputs();
        let image = client_for(&server, Some("hf_test"))
            .synthesize(&person, &clothing, &item)
            .await
            .unwrap();

        assert_eq!(image, codec::decode(&result).unwrap());
    }

    #[tokio::test]
    async fn test_both_shapes_yield_same_image() {
        let result = sample_wire(6, 6);
        let expected = codec::decode(&result).unwrap();
        let (person, clothing, item) = inputs();

        let shapes = [
            json!({ "image": result }),
            json!({ "data": [result, "mask"] }),
            json!({ "data": [format!("data:image/png;base64,{}", result)] }),
        ];

        for shape in shapes {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(200).set_body_json(shape))
                .mount(&server)
                .await;

            let image = client_for(&server, None)
                .synthesize(&person, &clothing, &item)
                .await
                .unwrap();
            assert_eq!(image, expected);
        }
    }

    #[tokio::test]
    async fn test_non_2xx_retries_once_with_positional_schema() {
        let server = MockServer::start().await;
        let result = sample_wire(3, 3);

        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "auto_mask": true })))
            .respond_with(ResponseTemplate::new(422).set_body_string("unknown field person_image"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(|req: &Request| {
                serde_json::from_slice::<Value>(&req.body)
                    .map(|body| body.get("data").is_some())
                    .unwrap_or(false)
            })
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [result] })))
            .expect(1)
            .mount(&server)
            .await;

        let (person, clothing, item) = inputs();
        let image = client_for(&server, None)
            .synthesize(&person, &clothing, &item)
            .await
            .unwrap();
        assert_eq!(image.dimensions(), (3, 3));
    }

    #[tokio::test]
    async fn test_second_failure_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(2)
            .mount(&server)
            .await;

        let (person, clothing, item) = inputs();
        let err = client_for(&server, None)
            .synthesize(&person, &clothing, &item)
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::ApiError { status: 503, ref message } if message == "overloaded"));
    }

    #[tokio::test]
    async fn test_2xx_without_known_shape_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "queued": true })))
            .expect(1)
            .mount(&server)
            .await;

        let (person, clothing, item) = inputs();
        let err = client_for(&server, None)
            .synthesize(&person, &clothing, &item)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnrecognizedShape(_)));
    }

    #[tokio::test]
    async fn test_undecodable_result_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "image": "bm90IGFuIGltYWdl" })))
            .mount(&server)
            .await;

        let (person, clothing, item) = inputs();
        let err = client_for(&server, None)
            .synthesize(&person, &clothing, &item)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Decode(_)));
    }

    #[test]
    fn test_connect_requires_token_or_anonymous() {
        let mut settings = SynthesisSettings::default();
        assert!(matches!(
            RemoteSynthesisClient::connect(&settings),
            Err(ProviderError::NotConfigured(_))
        ));

        settings.allow_anonymous = true;
        assert!(RemoteSynthesisClient::connect(&settings).is_ok());
    }
}
