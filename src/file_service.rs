use std::fs;
use std::path::PathBuf;

use voxrig_runtime::{
    ConceptImage, ConceptRequest, GenerationError, GenerationRequest, GenerationService,
};

/// Generation service that answers from files on disk.
pub struct FileGenerationService {
    response: PathBuf,
    concept: Option<PathBuf>,
}

impl FileGenerationService {
    pub fn new(response: PathBuf, concept: Option<PathBuf>) -> Self {
        Self { response, concept }
    }
}

impl GenerationService for FileGenerationService {
    fn generate_model(&self, req: &GenerationRequest) -> Result<String, GenerationError> {
        log::debug!(
            target: "service",
            "model request prompt={:?} category={} style={} complexity={}",
            req.prompt,
            req.category,
            req.options.style,
            req.options.complexity
        );
        fs::read_to_string(&self.response)
            .map_err(|e| GenerationError::Service(format!("{}: {e}", self.response.display())))
    }

    fn generate_concept(&self, _req: &ConceptRequest) -> Result<ConceptImage, GenerationError> {
        let path = self.concept.as_ref().ok_or(GenerationError::MissingImage)?;
        let data = fs::read_to_string(path)
            .map_err(|e| GenerationError::Service(format!("{}: {e}", path.display())))?;
        let data = data.trim();
        if data.is_empty() {
            return Err(GenerationError::MissingImage);
        }
        // Accept either a bare payload or a data URL.
        let (mime_type, data) = match data.strip_prefix("data:").and_then(|r| r.split_once(";base64,")) {
            Some((mime, payload)) => (mime.to_string(), payload.to_string()),
            None => ("image/png".to_string(), data.to_string()),
        };
        Ok(ConceptImage { mime_type, data })
    }
}
