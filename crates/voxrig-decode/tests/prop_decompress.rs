use std::collections::HashSet;

use proptest::prelude::*;
use voxrig_decode::{Element, decompress};
use voxrig_model::BodyPart;

fn arb_part() -> impl Strategy<Value = BodyPart> {
    prop::sample::select(BodyPart::ALL.to_vec())
}

proptest! {
    // A well-formed box emits exactly w*h*d voxels, covering each offset once.
    #[test]
    fn box_covers_every_offset_once(
        origin in (-50i32..50, -50i32..50, -50i32..50),
        size in (1i32..7, 1i32..7, 1i32..7),
        part in arb_part(),
    ) {
        let el = Element::filled_box(origin, size, "#c0ffee", part);
        let buf = decompress(std::slice::from_ref(&el));
        let (w, h, d) = size;
        prop_assert_eq!(buf.len(), (w * h * d) as usize);

        let mut seen = HashSet::new();
        for v in &buf {
            prop_assert_eq!(v.color.as_str(), "#c0ffee");
            prop_assert_eq!(v.part, part);
            let off = (v.x - origin.0, v.y - origin.1, v.z - origin.2);
            prop_assert!(off.0 >= 0 && off.0 < w);
            prop_assert!(off.1 >= 0 && off.1 < h);
            prop_assert!(off.2 >= 0 && off.2 < d);
            prop_assert!(seen.insert(off));
        }
    }

    // Non-positive sizes floor to 1 on every axis.
    #[test]
    fn degenerate_box_emits_one_voxel(
        w in -5i32..=0,
        h in -5i32..=0,
        d in -5i32..=0,
    ) {
        let buf = decompress(&[Element::filled_box((3, 4, 5), (w, h, d), "#000", BodyPart::Base)]);
        prop_assert_eq!(buf.len(), 1);
        let v = buf.get(0).unwrap();
        prop_assert_eq!((v.x, v.y, v.z), (3, 4, 5));
    }

    // Total count is the sum of element counts, independent of grid extent.
    #[test]
    fn total_is_sum_of_elements(sizes in prop::collection::vec((1i32..4, 1i32..4, 1i32..4), 0..12)) {
        let elements: Vec<Element> = sizes
            .iter()
            .enumerate()
            .map(|(i, s)| Element::filled_box((i as i32 * 1000, 0, -(i as i32) * 1000), *s, "#fff", BodyPart::Torso))
            .collect();
        let expected: usize = sizes.iter().map(|(w, h, d)| (w * h * d) as usize).sum();
        prop_assert_eq!(decompress(&elements).len(), expected);
    }
}

#[test]
fn head_and_torso_boxes_expand_to_sixteen_voxels() {
    let buf = decompress(&[
        Element::filled_box((0, 0, 0), (2, 2, 2), "#ff0000", BodyPart::Head),
        Element::filled_box((0, -2, 0), (2, 2, 2), "#00ff00", BodyPart::Torso),
    ]);
    assert_eq!(buf.len(), 16);
    assert_eq!(buf.iter().filter(|v| v.part == BodyPart::Head).count(), 8);
    assert_eq!(buf.iter().filter(|v| v.part == BodyPart::Torso).count(), 8);
    assert!(buf.iter().filter(|v| v.part == BodyPart::Head).all(|v| v.color == "#ff0000"));
}
