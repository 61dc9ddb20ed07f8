use serde::{Deserialize, Serialize};

use crate::types::{AnimationType, ModelCategory};
use crate::voxel::VoxelBuffer;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetadata {
    pub complexity: String,
    /// Source prompt the model was generated from.
    pub description: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_animation: Option<AnimationType>,
}

/// A generated or loaded voxel model. Category is fixed at creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub id: String,
    pub name: String,
    pub voxels: VoxelBuffer,
    #[serde(default)]
    pub category: ModelCategory,
    #[serde(default)]
    pub animation: AnimationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ModelMetadata>,
}

impl Model {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: ModelCategory,
        voxels: VoxelBuffer,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            voxels,
            category,
            animation: AnimationType::None,
            metadata: None,
        }
    }

    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.voxels.len()
    }
}
