//! Styling advice
//!
//! Recommendations come from a language model when one is configured and
//! from fixed templates otherwise. Advice is best-effort: errors are logged
//! and replaced with static text, never propagated.

use std::sync::Arc;
use serde::Serialize;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::config::AdviceSettings;
use crate::domain::{BodyMeasurements, ClothingItem};
use crate::providers::{GeminiClient, LanguageModel};

/// Maximum recommendations kept from a model answer
pub const MAX_RECOMMENDATIONS: usize = 4;

/// Characters stripped from both ends of each model line
const BULLET_CHARS: &[char] = &['•', '-', '*', ' ', '\t'];

/// Result of an outfit compatibility check
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CompatibilityReport {
    pub analysis: String,
    pub items_count: usize,
}

/// Produces styling recommendations
pub struct AdviceEngine {
    model: Option<Arc<dyn LanguageModel>>,
}

impl AdviceEngine {
    pub fn new(model: Option<Arc<dyn LanguageModel>>) -> Self {
        AdviceEngine { model }
    }

    /// Pick the model-backed or template-only strategy once, from settings
    pub fn from_settings(settings: &AdviceSettings) -> Self {
        if settings.api_key.is_none() {
            warn!("GEMINI_API_KEY not found, using template recommendations");
            return Self::new(None);
        }

        match GeminiClient::from_settings(settings) {
            Ok(client) => {
                info!(model = %settings.model, "Gemini API initialized for recommendations");
                Self::new(Some(Arc::new(client)))
            }
            Err(e) => {
                error!(error = %e, "Failed to initialize Gemini, using template recommendations");
                Self::new(None)
            }
        }
    }

    /// Whether recommendations come from a language model
    pub fn is_remote(&self) -> bool {
        self.model.is_some()
    }

    /// Recommendations for a garment, personalized when measurements exist
    pub async fn recommend(
        &self,
        item: &ClothingItem,
        measurements: Option<&BodyMeasurements>,
    ) -> Vec<String> {
        let Some(model) = &self.model else {
            return template_recommendations(item);
        };

        match model.complete(&recommendation_prompt(item, measurements)).await {
            Ok(text) => {
                let recommendations = parse_recommendations(&text);
                if recommendations.is_empty() {
                    vec!["Great choice for your style!".to_string()]
                } else {
                    recommendations
                }
            }
            Err(e) => {
                error!(provider = model.code(), error = %e, "Recommendation generation failed");
                vec![
                    "Great choice!".to_string(),
                    "This color complements your style".to_string(),
                ]
            }
        }
    }

    /// Free-form fashion advice
    pub async fn fashion_advice(
        &self,
        body_shape: &str,
        style_preference: &str,
        occasion: &str,
        budget: &str,
    ) -> String {
        let Some(model) = &self.model else {
            return format!(
                "Fashion advice for {} body shape with {} style preference.",
                body_shape, style_preference
            );
        };

        let prompt = format!(
            "As a fashion expert, provide personalized fashion advice for:\n\
             - Body Shape: {}\n\
             - Style: {}\n\
             - Occasion: {}\n\
             - Budget: {}\n\n\
             Give 2-3 actionable tips in a friendly tone.",
            body_shape, style_preference, occasion, budget
        );

        match model.complete(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "Fashion advice generation failed");
                "Fashion advice temporarily unavailable.".to_string()
            }
        }
    }

    /// Rate how well a set of items work together
    pub async fn outfit_compatibility(&self, items: &[String]) -> CompatibilityReport {
        let items_count = items.len();
        let Some(model) = &self.model else {
            return CompatibilityReport {
                analysis: "Compatibility check unavailable".to_string(),
                items_count,
            };
        };

        let prompt = format!(
            "Analyze outfit compatibility for these items: {}. Rate compatibility 1-10 and explain briefly.",
            items.join(", ")
        );

        let analysis = match model.complete(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "Outfit compatibility analysis failed");
                "Analysis unavailable".to_string()
            }
        };

        CompatibilityReport { analysis, items_count }
    }
}

/// Static recommendations used when no model is configured
pub fn template_recommendations(item: &ClothingItem) -> Vec<String> {
    vec![
        format!("This {} {} suits your style", item.color, item.item_type),
        "Consider pairing with complementary colors".to_string(),
        "The fit looks great on your body type".to_string(),
    ]
}

/// Stylist prompt for a garment and optional measurements
pub fn recommendation_prompt(item: &ClothingItem, measurements: Option<&BodyMeasurements>) -> String {
    let mut prompt = format!(
        "You are a professional fashion stylist. Provide 3-4 brief, personalized styling recommendations for:\n\n\
         Clothing: {} {}, {} pattern, {} fit, {} style\n",
        item.color, item.item_type, item.pattern, item.fit, item.style
    );

    if let Some(m) = measurements {
        prompt.push_str(&format!("\nBody Shape: {}, Height: {}cm", m.body_shape, m.height));
    }

    prompt.push_str(
        "\n\nProvide recommendations as a list. Each should be 1 short sentence. \
         Focus on styling tips, color pairings, and occasions.",
    );
    prompt
}

/// Split model output into clean recommendation lines
pub fn parse_recommendations(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim().trim_matches(BULLET_CHARS).trim())
        .filter(|line| !line.is_empty())
        .take(MAX_RECOMMENDATIONS)
        .map(str::to_string)
        .collect()
}
