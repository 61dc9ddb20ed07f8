//! Procedural pose engine.
//!
//! Every call to [`evaluate`] rebuilds the whole pose from the rig and the
//! clock. Nothing is carried between frames, so switching animations is
//! instantaneous and free of drift.
#![forbid(unsafe_code)]

mod creature;
mod object;

use hashbrown::HashMap;
use voxrig_geom::{Transform, Vec3};
use voxrig_model::{AnimationType, BodyPart, ModelCategory};
use voxrig_rig::{PartMember, Rig};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoseInput {
    pub animation: AnimationType,
    pub category: ModelCategory,
    /// Elapsed seconds, monotonically increasing.
    pub time: f64,
    /// 0 = loose, 1 = rigid. Clamped.
    pub stiffness: f32,
    /// Edit and ragdoll modes own the transforms; only the reset pose applies.
    pub suppressed: bool,
}

impl PoseInput {
    pub fn new(animation: AnimationType, category: ModelCategory, time: f64, stiffness: f32) -> Self {
        Self {
            animation,
            category,
            time,
            stiffness,
            suppressed: false,
        }
    }
}

/// Motion amplitude multiplier: looser joints swing further.
#[inline]
pub fn flex(stiffness: f32) -> f32 {
    (1.0 - stiffness.clamp(0.0, 1.0)) * 2.0
}

/// Per-frame output: a root transform and one local transform per present part.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PoseFrame {
    pub root: Transform,
    pub parts: HashMap<BodyPart, Transform>,
}

impl PoseFrame {
    /// Rest pose: each part at its pivot with no rotation, root at the
    /// centering offset.
    pub fn rest(rig: &Rig) -> Self {
        let parts = rig
            .groups()
            .map(|g| (g.part, Transform::at(g.pivot)))
            .collect();
        Self {
            root: Transform::at(rig.center_offset()),
            parts,
        }
    }

    #[inline]
    pub fn part(&self, part: BodyPart) -> Option<&Transform> {
        self.parts.get(&part)
    }

    /// Apply `f` to a part's transform. Absent parts are skipped.
    #[inline]
    pub(crate) fn adjust(&mut self, part: BodyPart, f: impl FnOnce(&mut Transform)) {
        if let Some(t) = self.parts.get_mut(&part) {
            f(t);
        }
    }

    /// Model-space position of a grouped voxel under this pose.
    ///
    /// Voxels sit at `voxel - pivot` inside their part, the part sits at its
    /// transform inside the root.
    pub fn voxel_position(&self, rig: &Rig, member: &PartMember) -> Option<Vec3> {
        let part = member.voxel.part;
        let pivot = rig.pivot(part)?;
        let local = self.parts.get(&part)?;
        let v = Vec3::from_grid(member.voxel.x, member.voxel.y, member.voxel.z);
        Some(self.root.apply(local.apply(v - pivot)))
    }
}

/// Compute the pose for one frame.
pub fn evaluate(rig: &Rig, input: &PoseInput) -> PoseFrame {
    let mut frame = PoseFrame::rest(rig);
    if input.suppressed || input.animation == AnimationType::None {
        return frame;
    }
    let flex = flex(input.stiffness);
    if input.category.is_articulated() {
        creature::apply(&mut frame, input.animation, input.time, flex);
    } else {
        object::apply(&mut frame, input.animation, input.time);
    }
    log::trace!(
        target: "pose",
        "t={:.3} {}/{} flex={:.2} root_y={:.3}",
        input.time,
        input.category,
        input.animation,
        flex,
        frame.root.position.y
    );
    frame
}
