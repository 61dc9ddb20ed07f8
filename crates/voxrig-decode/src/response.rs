use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use voxrig_model::{AnimationType, ModelCategory, VoxelBuffer};

use crate::decompress::decompress;
use crate::element::Element;

/// Structured output of the generation service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    pub name: String,
    /// Advisory only. Unknown values read as `None`.
    #[serde(default, deserialize_with = "lenient_category")]
    pub category: Option<ModelCategory>,
    #[serde(default)]
    pub suggested_animation: Option<AnimationType>,
    pub elements: Vec<Element>,
}

impl GenerationResponse {
    pub fn decompress(&self) -> VoxelBuffer {
        decompress(&self.elements)
    }
}

fn lenient_category<'de, D>(de: D) -> Result<Option<ModelCategory>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(de)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("generation response is empty")]
    Empty,
    #[error("element {index} extends past the coordinate range")]
    OutOfRange { index: usize },
    #[error("malformed generation response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Remove a markdown ```json fence the service sometimes wraps around its output.
pub fn strip_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed.strip_prefix("```json") {
        Some(rest) => rest.strip_suffix("```").unwrap_or(rest).trim(),
        None => trimmed,
    }
}

/// Parse raw service text. A truncated or schema-violating payload is a
/// [`DecodeError`]; nothing is partially decoded.
pub fn parse_response(text: &str) -> Result<GenerationResponse, DecodeError> {
    let body = strip_fence(text);
    if body.is_empty() {
        return Err(DecodeError::Empty);
    }
    let resp: GenerationResponse = serde_json::from_str(body)?;
    if let Some(index) = resp.elements.iter().position(|e| e.max_corner().is_none()) {
        return Err(DecodeError::OutOfRange { index });
    }
    log::debug!(
        target: "decode",
        "parsed response name={:?} elements={} suggested={:?}",
        resp.name,
        resp.elements.len(),
        resp.suggested_animation
    );
    Ok(resp)
}
