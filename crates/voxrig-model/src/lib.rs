//! Voxel, part tag, and model data types.
#![forbid(unsafe_code)]

pub mod model;
pub mod types;
pub mod voxel;

pub use model::{Model, ModelMetadata};
pub use types::{AnimationType, BodyPart, GenerationStatus, ModelCategory};
pub use voxel::{Voxel, VoxelBuffer, VoxelId};
