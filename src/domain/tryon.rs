//! Try-on result types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::engine::PixelBuffer;

/// Which strategy produced the result image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionPath {
    Remote,
    LocalBlend,
}

/// Descriptive fit assessment attached to a result
///
/// Scores are fixed per composition path; nothing here is measured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FitAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit_rating: Option<f32>,
    pub fit_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_match: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_match: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f32>,
}

impl FitAnalysis {
    /// Assessment reported for a provider-generated image
    pub fn remote_success() -> Self {
        FitAnalysis {
            fit_rating: Some(0.95),
            fit_description: "High-fidelity virtual try-on result".to_string(),
            color_match: Some(0.98),
            style_match: Some(0.98),
            overall_score: Some(0.96),
        }
    }

    /// Assessment carrying the error that forced the local blend
    pub fn fallback(error: &str) -> Self {
        FitAnalysis {
            fit_rating: None,
            fit_description: format!("Error: {}", error),
            color_match: None,
            style_match: None,
            overall_score: None,
        }
    }
}

/// Output of one composition, before advice is attached
#[derive(Debug, Clone)]
pub struct Composition {
    pub image: PixelBuffer,
    pub confidence: f32,
    pub fit_analysis: FitAnalysis,
    pub path: CompositionPath,
}

/// Complete try-on outcome handed to the response assembler
#[derive(Debug, Clone)]
pub struct TryOnResult {
    pub original_image: PixelBuffer,
    pub result_image: PixelBuffer,
    pub confidence: f32,
    pub recommendations: Vec<String>,
    pub fit_analysis: FitAnalysis,
    pub path: CompositionPath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_analysis_serializes_description_only() {
        let analysis = FitAnalysis::fallback("connection refused");
        let json = serde_json::to_value(&analysis).unwrap();

        assert_eq!(json, serde_json::json!({ "fit_description": "Error: connection refused" }));
    }

    #[test]
    fn test_remote_analysis_scores() {
        let analysis = FitAnalysis::remote_success();
        assert_eq!(analysis.overall_score, Some(0.96));
        assert_eq!(analysis.fit_rating, Some(0.95));
    }
}
