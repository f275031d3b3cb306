//! Optional body measurements used to personalize advice

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Height assumed when a measurements object omits it
pub const DEFAULT_HEIGHT_CM: f64 = 170.0;

/// Body measurements in centimeters
///
/// Requests without measurements carry `None` rather than a zeroed value,
/// so "unknown" and "explicitly zero" stay distinguishable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BodyMeasurements {
    pub height: f64,
    pub chest: f64,
    pub waist: f64,
    pub hips: f64,
    pub shoulder_width: f64,
    pub body_shape: String,
}

impl Default for BodyMeasurements {
    fn default() -> Self {
        BodyMeasurements {
            height: DEFAULT_HEIGHT_CM,
            chest: 0.0,
            waist: 0.0,
            hips: 0.0,
            shoulder_width: 0.0,
            body_shape: "regular".to_string(),
        }
    }
}
