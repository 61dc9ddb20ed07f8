use voxrig_model::{Voxel, VoxelBuffer};

use crate::element::Element;

/// Expand elements into a flat voxel buffer.
///
/// Emission order is source element order, then x, y, z nested (z fastest),
/// so index-addressed edits map reproducibly onto the same cubes. Cost is
/// linear in the number of emitted voxels.
pub fn decompress(elements: &[Element]) -> VoxelBuffer {
    let total: usize = elements
        .iter()
        .fold(0usize, |acc, e| acc.saturating_add(e.voxel_count()));
    let mut buf = VoxelBuffer::with_capacity(total);
    let mut floored = 0usize;
    for el in elements {
        if el.max_corner().is_none() {
            log::warn!(target: "decode", "skipping element past the i32 grid: {:?}", el.origin());
            continue;
        }
        match el {
            Element::Box {
                x, y, z, color, part, ..
            } => {
                if el.is_degenerate() {
                    floored += 1;
                }
                let (w, h, d) = el.dims();
                for ix in 0..w {
                    for iy in 0..h {
                        for iz in 0..d {
                            buf.push(Voxel::new(x + ix, y + iy, z + iz, color.as_str(), *part));
                        }
                    }
                }
            }
            Element::Voxel {
                x, y, z, color, part,
            } => {
                buf.push(Voxel::new(*x, *y, *z, color.as_str(), *part));
            }
        }
    }
    if floored > 0 {
        log::debug!(target: "decode", "floored {} degenerate box dimension(s) to 1", floored);
    }
    log::debug!(
        target: "decode",
        "decompressed {} element(s) into {} voxel(s)",
        elements.len(),
        buf.len()
    );
    buf
}
