//! Synthesis API Request Models
//!
//! The provider accepts two request schemas. The named schema is tried first;
//! the positional (Gradio `data` array) schema is the one retry after a
//! non-2xx answer.

use serde::Serialize;
use serde_json::{json, Value};

use crate::engine::codec::to_data_uri;

// ============================================================================
// Named Schema
// ============================================================================

/// Named-field try-on request with raw base64 images
#[derive(Debug, Serialize)]
pub struct NamedTryOnRequest<'a> {
    pub person_image: &'a str,
    pub garment_image: &'a str,
    pub garment_description: &'a str,
    /// Let the provider mask the garment region itself
    pub auto_mask: bool,
    pub auto_crop: bool,
    pub denoise_steps: u32,
    pub seed: u64,
}

// ============================================================================
// Positional Schema
// ============================================================================

/// Gradio-style positional body with data-URI images
///
/// Argument order: editor dict (background + layers), garment image,
/// description, auto-mask, auto-crop, denoise steps, seed.
pub fn positional_request(request: &NamedTryOnRequest<'_>) -> Value {
    json!({
        "data": [
            {
                "background": to_data_uri(request.person_image),
                "layers": [],
                "composite": null
            },
            to_data_uri(request.garment_image),
            request.garment_description,
            request.auto_mask,
            request.auto_crop,
            request.denoise_steps,
            request.seed
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_request_layout() {
        let named = NamedTryOnRequest {
            person_image: "UEVSU09O",
            garment_image: "R0FSTUVOVA==",
            garment_description: "red dress",
            auto_mask: true,
            auto_crop: false,
            denoise_steps: 30,
            seed: 42,
        };

        let body = positional_request(&named);
        let data = body["data"].as_array().unwrap();

        assert_eq!(data.len(), 7);
        assert_eq!(data[0]["background"], "data:image/png;base64,UEVSU09O");
        assert_eq!(data[1], "data:image/png;base64,R0FSTUVOVA==");
        assert_eq!(data[2], "red dress");
        assert_eq!(data[5], 30);
        assert_eq!(data[6], 42);
    }
}
