//! Ragdoll mode: independent rigid-body descriptors for every voxel.
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use voxrig_geom::Vec3;
use voxrig_model::{VoxelBuffer, VoxelId};

const BASE_DAMPING: f32 = 0.1;
const DAMPING_PER_STIFFNESS: f32 = 0.5;

/// Linear and angular damping for a stiffness setting.
#[inline]
pub fn damping_for(stiffness: f32) -> f32 {
    BASE_DAMPING + stiffness.clamp(0.0, 1.0) * DAMPING_PER_STIFFNESS
}

/// Gravity scale for a stiffness setting. Stiffer models fall faster and
/// settle sooner.
#[inline]
pub fn gravity_multiplier(stiffness: f32) -> f32 {
    1.0 + stiffness.clamp(0.0, 1.0)
}

/// Simulation constants that do not depend on stiffness.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RagdollSettings {
    /// Downward acceleration magnitude before stiffness scaling.
    pub base_gravity: f32,
    /// Cube edge length. Slightly under 1 so neighbours start apart.
    pub voxel_size: f32,
    pub voxel_mass: f32,
}

impl Default for RagdollSettings {
    fn default() -> Self {
        Self {
            base_gravity: 9.81,
            voxel_size: 0.95,
            voxel_mass: 1.0,
        }
    }
}

/// World parameters for one ragdoll session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RagdollParams {
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub gravity_scale: f32,
    /// Gravity vector, pointing down.
    pub gravity: Vec3,
}

impl RagdollParams {
    pub fn from_stiffness(stiffness: f32, settings: &RagdollSettings) -> Self {
        let damping = damping_for(stiffness);
        let gravity_scale = gravity_multiplier(stiffness);
        Self {
            linear_damping: damping,
            angular_damping: damping,
            gravity_scale,
            gravity: Vec3::new(0.0, -settings.base_gravity * gravity_scale, 0.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Cuboid { half_extents: Vec3 },
}

/// Everything a rigid-body backend needs to spawn one voxel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RagdollBodyDesc {
    /// Source voxel, for hit-testing back into the buffer.
    pub index: usize,
    pub id: VoxelId,
    pub position: Vec3,
    pub shape: Shape,
    pub mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub color: String,
}

/// One dynamic body per voxel, no joints between them.
///
/// Bodies start at their grid cell shifted by the horizontal part of
/// `center_offset` only. Vertical placement is left to the simulation, which
/// settles the bodies against its ground plane.
pub fn build_bodies(
    buf: &VoxelBuffer,
    center_offset: Vec3,
    params: &RagdollParams,
    settings: &RagdollSettings,
) -> Vec<RagdollBodyDesc> {
    let shift = Vec3::new(center_offset.x, 0.0, center_offset.z);
    let edge = settings.voxel_size;
    let half_extents = Vec3::new(edge, edge, edge) * 0.5;
    let bodies: Vec<RagdollBodyDesc> = buf
        .iter()
        .enumerate()
        .filter_map(|(index, v)| {
            let id = buf.id_at(index)?;
            Some(RagdollBodyDesc {
                index,
                id,
                position: Vec3::from_grid(v.x, v.y, v.z) + shift,
                shape: Shape::Cuboid { half_extents },
                mass: settings.voxel_mass,
                linear_damping: params.linear_damping,
                angular_damping: params.angular_damping,
                color: v.color.clone(),
            })
        })
        .collect();
    log::debug!(
        target: "ragdoll",
        "built {} bodies damping={:.2} gravity={:.2}",
        bodies.len(),
        params.linear_damping,
        params.gravity.y
    );
    bodies
}
