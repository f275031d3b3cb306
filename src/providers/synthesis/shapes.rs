//! Response-shape negotiation
//!
//! The provider's response schema is not stable. Known shapes are tried in
//! order and the first match wins. Each matcher is a pure function over the
//! parsed body that returns the encoded image if its shape is present.

use serde_json::Value;

use crate::engine::codec::strip_data_uri;
use crate::providers::traits::{ProviderError, ProviderResult};

/// Keys that may hold the image directly at the top level
const DIRECT_KEYS: &[&str] = &["result_image", "image", "output_image"];

/// Keys that may hold a list of outputs whose first element is the image
const LIST_KEYS: &[&str] = &["data", "output", "outputs"];

/// A known response shape
pub struct ShapeMatcher {
    pub name: &'static str,
    pub extract: fn(&Value) -> Option<&str>,
}

/// Shapes in probing order
pub const RESPONSE_SHAPES: &[ShapeMatcher] = &[
    ShapeMatcher { name: "direct_field", extract: direct_field },
    ShapeMatcher { name: "output_list", extract: output_list },
];

/// `{"result_image": "<b64>"}` and synonyms
fn direct_field(body: &Value) -> Option<&str> {
    DIRECT_KEYS
        .iter()
        .filter_map(|key| body.get(*key))
        .find_map(non_empty_str)
}

/// `{"data": ["<b64 or data-uri>", ...]}` or `{"data": [{"image": "..."}]}`
fn output_list(body: &Value) -> Option<&str> {
    LIST_KEYS
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_array))
        .filter_map(|outputs| outputs.first())
        .find_map(|first| non_empty_str(first).or_else(|| first.get("image").and_then(non_empty_str)))
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.trim().is_empty())
}

/// Find the encoded result image in a provider response
///
/// Returns the bare base64 payload (any data-URI prefix removed). When no
/// shape matches, the error distinguishes an explicit provider error payload
/// from an unknown schema.
pub fn negotiate(body: &Value) -> ProviderResult<&str> {
    for shape in RESPONSE_SHAPES {
        if let Some(encoded) = (shape.extract)(body) {
            tracing::debug!(shape = shape.name, "Matched synthesis response shape");
            return Ok(strip_data_uri(encoded));
        }
    }

    if let Some(message) = body.get("error").and_then(error_message) {
        return Err(ProviderError::Rejected(message));
    }

    let keys = body
        .as_object()
        .map(|obj| obj.keys().cloned().collect::<Vec<_>>().join(", "))
        .unwrap_or_else(|| "<not an object>".to_string());
    Err(ProviderError::UnrecognizedShape(keys))
}

/// `"error": "text"` or `"error": {"message": "text"}`
fn error_message(error: &Value) -> Option<String> {
    match error {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.get("message").and_then(Value::as_str).map(str::to_string),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
