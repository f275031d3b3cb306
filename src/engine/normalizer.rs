//! Request normalization
//!
//! Turns the raw JSON body of a try-on request into typed values. Only the
//! two image fields are required. Every optional field has a default, and
//! malformed optional data is dropped or defaulted instead of failing the
//! request.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::domain::{BodyMeasurements, ClothingItem, ClothingType, DEFAULT_HEIGHT_CM};

/// Request validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Missing images")]
    MissingImages,
}

/// A try-on request with every optional field resolved
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRequest {
    /// Wire value of the person image (raw or data-URI base64)
    pub person_image: String,
    /// Wire value of the clothing image
    pub clothing_image: String,
    pub clothing_item: ClothingItem,
    pub body_measurements: Option<BodyMeasurements>,
    pub user_id: Option<String>,
}

/// Parse a raw request body
pub fn parse(raw: &Value) -> Result<NormalizedRequest, ValidationError> {
    let person_image = required_image(raw, "person_image")?;
    let clothing_image = required_image(raw, "clothing_image")?;

    Ok(NormalizedRequest {
        person_image,
        clothing_image,
        clothing_item: parse_clothing_item(raw.get("clothing_item")),
        body_measurements: raw.get("body_measurements").and_then(parse_body_measurements),
        user_id: raw.get("user_id").and_then(scalar_to_string),
    })
}

/// The key must be present; an empty or non-string value is passed on as
/// an empty string and rejected by the codec as "No image data"
fn required_image(raw: &Value, key: &str) -> Result<String, ValidationError> {
    let value = raw.get(key).ok_or(ValidationError::MissingImages)?;
    Ok(value.as_str().unwrap_or_default().to_string())
}

/// Parse the clothing descriptor, defaulting each field independently
pub fn parse_clothing_item(value: Option<&Value>) -> ClothingItem {
    let defaults = ClothingItem::default();
    let Some(obj) = value.and_then(Value::as_object) else {
        return defaults;
    };

    let text = |key: &str, default: String| field_text(obj, key).unwrap_or(default);

    ClothingItem {
        item_type: field_text(obj, "item_type")
            .map(|s| ClothingType::parse_lenient(&s))
            .unwrap_or_default(),
        color: text("color", defaults.color),
        pattern: text("pattern", defaults.pattern),
        size: text("size", defaults.size),
        fit: text("fit", defaults.fit),
        style: text("style", defaults.style),
    }
}

/// Parse body measurements
///
/// Returns `None` when the value is not an object or any numeric field fails
/// to coerce; the request carries on without measurements.
pub fn parse_body_measurements(value: &Value) -> Option<BodyMeasurements> {
    if value.is_null() {
        return None;
    }

    match try_body_measurements(value) {
        Ok(measurements) => Some(measurements),
        Err(reason) => {
            warn!(reason = %reason, "Ignoring malformed body_measurements");
            None
        }
    }
}

fn try_body_measurements(value: &Value) -> Result<BodyMeasurements, String> {
    let obj = value
        .as_object()
        .ok_or_else(|| format!("expected an object, got {}", type_name(value)))?;

    Ok(BodyMeasurements {
        height: number_field(obj, "height", DEFAULT_HEIGHT_CM)?,
        chest: number_field(obj, "chest", 0.0)?,
        waist: number_field(obj, "waist", 0.0)?,
        hips: number_field(obj, "hips", 0.0)?,
        shoulder_width: number_field(obj, "shoulder_width", 0.0)?,
        body_shape: field_text(obj, "body_shape").unwrap_or_else(|| "regular".to_string()),
    })
}

/// Missing key -> default; number or numeric string -> value; else error
fn number_field(obj: &Map<String, Value>, key: &str, default: f64) -> Result<f64, String> {
    let parsed = match obj.get(key) {
        None => return Ok(default),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("field '{}' is not a number", key))
}

/// Strings as-is, numbers and booleans stringified, everything else absent
fn field_text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(scalar_to_string)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_images() {
        assert_eq!(parse(&json!({})), Err(ValidationError::MissingImages));
        assert_eq!(
            parse(&json!({ "person_image": "abc" })),
            Err(ValidationError::MissingImages)
        );
        assert_eq!(parse(&json!(["not", "an", "object"])), Err(ValidationError::MissingImages));
    }

    #[test]
    fn test_present_but_empty_images_pass_through_as_empty() {
        let req = parse(&json!({ "person_image": "abc", "clothing_image": "" })).unwrap();
        assert_eq!(req.clothing_image, "");

        let req = parse(&json!({ "person_image": null, "clothing_image": "abc" })).unwrap();
        assert_eq!(req.person_image, "");

        let req = parse(&json!({ "person_image": 12, "clothing_image": "abc" })).unwrap();
        assert_eq!(req.person_image, "");
    }

    #[test]
    fn test_defaults_without_optional_fields() {
        let req = parse(&json!({ "person_image": "p", "clothing_image": "c" })).unwrap();

        assert_eq!(req.clothing_item, ClothingItem::default());
        assert!(req.body_measurements.is_none());
        assert!(req.user_id.is_none());
    }

    #[test]
    fn test_clothing_fields_default_individually() {
        let item = parse_clothing_item(Some(&json!({ "item_type": "Dress", "color": "red", "size": 42 })));

        assert_eq!(item.item_type, ClothingType::Dress);
        assert_eq!(item.color, "red");
        assert_eq!(item.size, "42");
        assert_eq!(item.pattern, "solid");
        assert_eq!(item.fit, "regular");
        assert_eq!(item.style, "casual");
    }

    #[test]
    fn test_unknown_item_type_becomes_shirt() {
        let req = parse(&json!({
            "person_image": "p",
            "clothing_image": "c",
            "clothing_item": { "item_type": "poncho", "color": "green" }
        }))
        .unwrap();

        assert_eq!(req.clothing_item.item_type, ClothingType::Shirt);
        assert_eq!(req.clothing_item.color, "green");
    }

    #[test]
    fn test_body_measurements_coercion() {
        let m = parse_body_measurements(&json!({
            "height": "182.5",
            "chest": 96,
            "body_shape": "athletic"
        }))
        .unwrap();

        assert_eq!(m.height, 182.5);
        assert_eq!(m.chest, 96.0);
        assert_eq!(m.waist, 0.0);
        assert_eq!(m.body_shape, "athletic");
    }

    #[test]
    fn test_body_measurements_defaults() {
        let m = parse_body_measurements(&json!({})).unwrap();
        assert_eq!(m, BodyMeasurements::default());
    }

    #[test]
    fn test_malformed_measurement_drops_whole_object() {
        let req = parse(&json!({
            "person_image": "p",
            "clothing_image": "c",
            "body_measurements": { "height": "tall", "chest": 90 }
        }))
        .unwrap();
        assert!(req.body_measurements.is_none());

        assert!(parse_body_measurements(&json!({ "waist": null })).is_none());
        assert!(parse_body_measurements(&json!({ "hips": "NaN" })).is_none());
        assert!(parse_body_measurements(&json!("170cm")).is_none());
        assert!(parse_body_measurements(&Value::Null).is_none());
    }

    #[test]
    fn test_user_id_echo() {
        let req = parse(&json!({ "person_image": "p", "clothing_image": "c", "user_id": 1234 })).unwrap();
        assert_eq!(req.user_id.as_deref(), Some("1234"));

        let req = parse(&json!({ "person_image": "p", "clothing_image": "c", "user_id": "u-1" })).unwrap();
        assert_eq!(req.user_id.as_deref(), Some("u-1"));
    }
}
