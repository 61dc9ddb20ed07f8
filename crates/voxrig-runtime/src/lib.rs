//! Session state, generation jobs, and the per-frame driver.
#![forbid(unsafe_code)]

mod service;
mod studio;
mod worker;

pub use service::{
    ConceptImage, ConceptRequest, GenerationError, GenerationOptions, GenerationRequest,
    GenerationService, assemble_model, now_ms,
};
pub use studio::{FrameOutput, Studio};
pub use worker::{GenerationJob, GenerationOutcome, GenerationWorker, run_job};
