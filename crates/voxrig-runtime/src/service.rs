use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use voxrig_decode::{DecodeError, GenerationResponse};
use voxrig_model::{Model, ModelCategory, ModelMetadata};

pub(crate) const DEFAULT_PROMPT: &str = "Concept from image";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub style: String,
    pub complexity: String,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            style: "Modern".to_string(),
            complexity: "Detailed".to_string(),
        }
    }
}

/// Reference image produced by a concept request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptImage {
    pub mime_type: String,
    /// Base64 payload, without a data-URL prefix.
    pub data: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub category: ModelCategory,
    pub image: Option<ConceptImage>,
    pub options: GenerationOptions,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConceptRequest {
    pub prompt: String,
    pub category: ModelCategory,
    pub options: GenerationOptions,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    /// The service answered but the payload did not decode, usually because a
    /// large model was truncated.
    #[error("response did not parse: {0}")]
    Parse(#[from] DecodeError),
    #[error("generation service failed: {0}")]
    Service(String),
    #[error("service returned no image data")]
    MissingImage,
}

impl GenerationError {
    /// Text shown to the user for a failed model request.
    pub fn user_message(&self) -> &'static str {
        match self {
            GenerationError::Parse(_) => {
                "Model is too complex. Please try 'Simple' detail or a shorter prompt."
            }
            GenerationError::Service(_) | GenerationError::MissingImage => {
                "Failed to construct 3D model. Please try again."
            }
        }
    }

    /// Text shown to the user for a failed concept request.
    pub fn concept_message(&self) -> &'static str {
        "Concept generation failed."
    }
}

/// The external generator. Implementations may block; they run on the
/// worker thread.
pub trait GenerationService: Send + Sync {
    /// Raw structured text for a model request.
    fn generate_model(&self, req: &GenerationRequest) -> Result<String, GenerationError>;

    fn generate_concept(&self, req: &ConceptRequest) -> Result<ConceptImage, GenerationError>;
}

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Build a fresh model from a decoded response.
///
/// The category comes from the request; the response's own category field
/// is advisory only. The suggested animation becomes the initial selection.
pub fn assemble_model(resp: GenerationResponse, req: &GenerationRequest, created_at: u64) -> Model {
    let voxels = resp.decompress();
    let description = if req.prompt.trim().is_empty() {
        DEFAULT_PROMPT.to_string()
    } else {
        req.prompt.clone()
    };
    let mut model = Model::new(
        uuid::Uuid::new_v4().to_string(),
        resp.name,
        req.category,
        voxels,
    );
    model.animation = resp.suggested_animation.unwrap_or_default();
    model.metadata = Some(ModelMetadata {
        complexity: req.options.complexity.clone(),
        description,
        created_at,
        suggested_animation: resp.suggested_animation,
    });
    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxrig_decode::parse_response;
    use voxrig_model::AnimationType;

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest {
            prompt: prompt.to_string(),
            category: ModelCategory::Object,
            image: None,
            options: GenerationOptions::default(),
        }
    }

    #[test]
    fn category_follows_the_request() {
        let resp = parse_response(
            r##"{"name":"Lamp","category":"character","suggestedAnimation":"spin",
                "elements":[{"type":"voxel","x":0,"y":0,"z":0,"color":"#fff","part":"base"}]}"##,
        )
        .unwrap();
        let m = assemble_model(resp, &request("a lamp"), 42);
        assert_eq!(m.category, ModelCategory::Object);
        assert_eq!(m.animation, AnimationType::Spin);
        let meta = m.metadata.unwrap();
        assert_eq!(meta.created_at, 42);
        assert_eq!(meta.description, "a lamp");
        assert_eq!(meta.complexity, "Detailed");
        assert!(!m.id.is_empty());
    }

    #[test]
    fn blank_prompt_falls_back() {
        let resp = parse_response(r#"{"name":"X","elements":[]}"#).unwrap();
        let m = assemble_model(resp, &request("  "), 0);
        assert_eq!(m.animation, AnimationType::None);
        assert_eq!(m.metadata.unwrap().description, DEFAULT_PROMPT);
    }

    #[test]
    fn user_messages() {
        let parse: GenerationError = parse_response("{\"name\":").unwrap_err().into();
        assert!(parse.user_message().starts_with("Model is too complex"));
        assert_eq!(
            GenerationError::Service("timeout".into()).user_message(),
            "Failed to construct 3D model. Please try again."
        );
        assert_eq!(GenerationError::MissingImage.concept_message(), "Concept generation failed.");
    }
}
