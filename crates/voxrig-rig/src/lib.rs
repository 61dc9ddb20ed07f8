//! Part grouping, joint pivots, and model centering.
//!
//! A rig is derived wholesale from a voxel buffer and never patched in place:
//! any change to the buffer means building a new one.
#![forbid(unsafe_code)]

use voxrig_geom::{Aabb, Vec3};
use voxrig_model::{BodyPart, Voxel, VoxelBuffer};

const PART_SLOTS: usize = BodyPart::ALL.len();

/// A voxel together with its index in the source buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartMember {
    pub index: usize,
    pub voxel: Voxel,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PartGroup {
    pub part: BodyPart,
    /// Members in buffer order.
    pub members: Vec<PartMember>,
    pub bounds: Aabb,
    /// Joint origin the part rotates about.
    pub pivot: Vec3,
}

/// Joint origin for a part given its bounds.
///
/// Horizontally centered. Vertically: limbs hang from their top (shoulder or
/// hip line), the head sits on its bottom (neck line), everything else turns
/// about its vertical midpoint.
pub fn pivot_for(part: BodyPart, bounds: &Aabb) -> Vec3 {
    let center = bounds.center();
    let y = if part.is_limb() {
        bounds.max.y
    } else if part == BodyPart::Head {
        bounds.min.y
    } else {
        center.y
    };
    Vec3::new(center.x, y, center.z)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rig {
    /// Groups in order of first appearance in the buffer.
    groups: Vec<PartGroup>,
    slots: [Option<usize>; PART_SLOTS],
    bounds: Option<Aabb>,
    center_offset: Vec3,
    voxel_count: usize,
}

impl Rig {
    /// Group, bound, and pivot a buffer in a single pass.
    pub fn from_buffer(buf: &VoxelBuffer) -> Self {
        let mut rig = Rig::default();
        for (index, v) in buf.iter().enumerate() {
            let p = Vec3::from_grid(v.x, v.y, v.z);
            match rig.bounds.as_mut() {
                Some(b) => b.include(p),
                None => rig.bounds = Some(Aabb::from_point(p)),
            }
            let slot = v.part.index();
            let gi = match rig.slots[slot] {
                Some(gi) => {
                    rig.groups[gi].bounds.include(p);
                    gi
                }
                None => {
                    rig.groups.push(PartGroup {
                        part: v.part,
                        members: Vec::new(),
                        bounds: Aabb::from_point(p),
                        pivot: Vec3::ZERO,
                    });
                    let gi = rig.groups.len() - 1;
                    rig.slots[slot] = Some(gi);
                    gi
                }
            };
            rig.groups[gi].members.push(PartMember {
                index,
                voxel: v.clone(),
            });
        }
        for g in rig.groups.iter_mut() {
            g.pivot = pivot_for(g.part, &g.bounds);
        }
        if let Some(b) = rig.bounds {
            let c = b.center();
            rig.center_offset = Vec3::new(-c.x, -b.min.y, -c.z);
        }
        rig.voxel_count = buf.len();
        log::debug!(
            target: "rig",
            "aggregated {} voxel(s) into {} part(s) offset=({:.2},{:.2},{:.2})",
            rig.voxel_count,
            rig.groups.len(),
            rig.center_offset.x,
            rig.center_offset.y,
            rig.center_offset.z
        );
        rig
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.voxel_count
    }

    pub fn groups(&self) -> impl Iterator<Item = &PartGroup> {
        self.groups.iter()
    }

    pub fn group(&self, part: BodyPart) -> Option<&PartGroup> {
        self.slots[part.index()].map(|gi| &self.groups[gi])
    }

    #[inline]
    pub fn has_part(&self, part: BodyPart) -> bool {
        self.slots[part.index()].is_some()
    }

    pub fn pivot(&self, part: BodyPart) -> Option<Vec3> {
        self.group(part).map(|g| g.pivot)
    }

    /// Whole-model bounds; `None` for an empty buffer.
    #[inline]
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    /// Translation that centers the model horizontally and puts its lowest
    /// voxel on the ground plane. Zero for an empty buffer.
    #[inline]
    pub fn center_offset(&self) -> Vec3 {
        self.center_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(min: (f32, f32, f32), max: (f32, f32, f32)) -> Aabb {
        Aabb::new(Vec3::new(min.0, min.1, min.2), Vec3::new(max.0, max.1, max.2))
    }

    #[test]
    fn limbs_pivot_at_top_head_at_bottom() {
        let b = bounds((0.0, 2.0, -1.0), (2.0, 6.0, 1.0));
        assert_eq!(pivot_for(BodyPart::LeftLeg, &b), Vec3::new(1.0, 6.0, 0.0));
        assert_eq!(pivot_for(BodyPart::RightArm, &b), Vec3::new(1.0, 6.0, 0.0));
        assert_eq!(pivot_for(BodyPart::Head, &b), Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(pivot_for(BodyPart::Tail, &b), Vec3::new(1.0, 4.0, 0.0));
        assert_eq!(pivot_for(BodyPart::WingR, &b), Vec3::new(1.0, 4.0, 0.0));
    }

    #[test]
    fn empty_buffer_yields_empty_rig() {
        let rig = Rig::from_buffer(&VoxelBuffer::new());
        assert!(rig.is_empty());
        assert_eq!(rig.center_offset(), Vec3::ZERO);
        assert!(rig.bounds().is_none());
        assert!(rig.pivot(BodyPart::Head).is_none());
    }

    #[test]
    fn groups_keep_original_indices() {
        let buf: VoxelBuffer = vec![
            Voxel::new(0, 0, 0, "#1", BodyPart::Torso),
            Voxel::new(0, 1, 0, "#2", BodyPart::Head),
            Voxel::new(1, 0, 0, "#3", BodyPart::Torso),
        ]
        .into();
        let rig = Rig::from_buffer(&buf);
        let torso: Vec<usize> = rig
            .group(BodyPart::Torso)
            .unwrap()
            .members
            .iter()
            .map(|m| m.index)
            .collect();
        assert_eq!(torso, vec![0, 2]);
        let order: Vec<BodyPart> = rig.groups().map(|g| g.part).collect();
        assert_eq!(order, vec![BodyPart::Torso, BodyPart::Head]);
    }

    #[test]
    fn center_offset_grounds_the_model() {
        let buf: VoxelBuffer = vec![
            Voxel::new(4, 3, -2, "#1", BodyPart::Base),
            Voxel::new(8, 7, 2, "#1", BodyPart::Base),
        ]
        .into();
        let rig = Rig::from_buffer(&buf);
        assert_eq!(rig.center_offset(), Vec3::new(-6.0, -3.0, 0.0));
    }
}
