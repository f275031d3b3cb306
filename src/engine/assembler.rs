//! Response envelope assembly
//!
//! The envelope has the same shape whichever path produced the image or the
//! advice.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{FitAnalysis, TryOnResult};
use super::codec::{self, CodecError};

/// Response body of the process endpoint
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TryOnResponse {
    /// "success" or "error"
    pub status: &'static str,
    /// Raw base64 PNG, no data-URI prefix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit_analysis: Option<FitAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TryOnResponse {
    pub fn error(message: impl Into<String>) -> Self {
        TryOnResponse {
            status: "error",
            result_image: None,
            confidence: None,
            fit_analysis: None,
            recommendations: None,
            user_id: None,
            message: Some(message.into()),
        }
    }
}

/// Build the success envelope, encoding the result image
pub fn assemble(result: TryOnResult, user_id: Option<String>) -> Result<TryOnResponse, CodecError> {
    let result_image = codec::encode(&result.result_image)?;

    Ok(TryOnResponse {
        status: "success",
        result_image: Some(result_image),
        confidence: Some(result.confidence),
        fit_analysis: Some(result.fit_analysis),
        recommendations: Some(result.recommendations),
        user_id,
        message: None,
    })
}
