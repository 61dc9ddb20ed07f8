use proptest::prelude::*;
use voxrig_decode::{Element, decompress};
use voxrig_model::{BodyPart, Voxel, VoxelBuffer};
use voxrig_rig::Rig;

fn arb_voxel() -> impl Strategy<Value = Voxel> {
    (
        -20i32..20,
        -20i32..20,
        -20i32..20,
        prop::sample::select(BodyPart::ALL.to_vec()),
    )
        .prop_map(|(x, y, z, part)| Voxel::new(x, y, z, "#808080", part))
}

fn arb_buffer() -> impl Strategy<Value = VoxelBuffer> {
    prop::collection::vec(arb_voxel(), 0..64).prop_map(VoxelBuffer::from)
}

proptest! {
    // Aggregating the same buffer twice gives identical groups and pivots.
    #[test]
    fn aggregation_is_deterministic(buf in arb_buffer()) {
        let a = Rig::from_buffer(&buf);
        let b = Rig::from_buffer(&buf);
        prop_assert_eq!(a, b);
    }

    // Pivot height follows the tag rule against the part's own y-range.
    #[test]
    fn pivot_height_follows_part_rule(buf in arb_buffer()) {
        let rig = Rig::from_buffer(&buf);
        for g in rig.groups() {
            let ys: Vec<i32> = g.members.iter().map(|m| m.voxel.y).collect();
            let min_y = *ys.iter().min().unwrap() as f32;
            let max_y = *ys.iter().max().unwrap() as f32;
            let expected = if g.part.is_limb() {
                max_y
            } else if g.part == BodyPart::Head {
                min_y
            } else {
                (min_y + max_y) / 2.0
            };
            prop_assert_eq!(g.pivot.y, expected);
        }
    }

    // Every voxel lands in exactly one group, under its own tag.
    #[test]
    fn groups_partition_the_buffer(buf in arb_buffer()) {
        let rig = Rig::from_buffer(&buf);
        let total: usize = rig.groups().map(|g| g.members.len()).sum();
        prop_assert_eq!(total, buf.len());
        for g in rig.groups() {
            for m in &g.members {
                prop_assert_eq!(buf.get(m.index), Some(&m.voxel));
                prop_assert_eq!(m.voxel.part, g.part);
            }
        }
    }
}

#[test]
fn head_on_torso_pivots() {
    let buf = decompress(&[
        Element::filled_box((0, 0, 0), (2, 2, 2), "#ff0000", BodyPart::Head),
        Element::filled_box((0, -2, 0), (2, 2, 2), "#00ff00", BodyPart::Torso),
    ]);
    let rig = Rig::from_buffer(&buf);
    let head = rig.pivot(BodyPart::Head).unwrap();
    let torso = rig.pivot(BodyPart::Torso).unwrap();
    assert_eq!(head.y, 0.0);
    assert_eq!(torso.y, -1.5);
    assert_eq!((head.x, head.z), (0.5, 0.5));
    // Lowest voxel sits at y = -2.
    assert_eq!(rig.center_offset().y, 2.0);
    assert!(rig.pivot(BodyPart::LeftLeg).is_none());
}
