use serde::{Deserialize, Serialize};
use voxrig_model::BodyPart;

/// One entry of a generation response. A `box` fills a region starting at
/// its origin corner; a `voxel` is a single cube.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Box {
        x: i32,
        y: i32,
        z: i32,
        #[serde(default)]
        width: Option<i32>,
        #[serde(default)]
        height: Option<i32>,
        #[serde(default)]
        depth: Option<i32>,
        color: String,
        part: BodyPart,
    },
    Voxel {
        x: i32,
        y: i32,
        z: i32,
        color: String,
        part: BodyPart,
    },
}

/// Missing, zero, or negative sizes become 1 so a box never vanishes.
#[inline]
pub fn floor_dim(d: Option<i32>) -> i32 {
    match d {
        Some(v) if v > 0 => v,
        _ => 1,
    }
}

impl Element {
    pub fn filled_box(
        origin: (i32, i32, i32),
        size: (i32, i32, i32),
        color: impl Into<String>,
        part: BodyPart,
    ) -> Self {
        Element::Box {
            x: origin.0,
            y: origin.1,
            z: origin.2,
            width: Some(size.0),
            height: Some(size.1),
            depth: Some(size.2),
            color: color.into(),
            part,
        }
    }

    pub fn single(x: i32, y: i32, z: i32, color: impl Into<String>, part: BodyPart) -> Self {
        Element::Voxel {
            x,
            y,
            z,
            color: color.into(),
            part,
        }
    }

    /// Effective (floored) box dimensions; `(1, 1, 1)` for a single voxel.
    pub fn dims(&self) -> (i32, i32, i32) {
        match self {
            Element::Box {
                width,
                height,
                depth,
                ..
            } => (floor_dim(*width), floor_dim(*height), floor_dim(*depth)),
            Element::Voxel { .. } => (1, 1, 1),
        }
    }

    /// True when any declared box dimension needed flooring.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Element::Box {
                width,
                height,
                depth,
                ..
            } => [width, height, depth]
                .iter()
                .any(|d| matches!(d, Some(v) if *v <= 0)),
            Element::Voxel { .. } => false,
        }
    }

    /// Number of voxels this element expands to.
    pub fn voxel_count(&self) -> usize {
        let (w, h, d) = self.dims();
        (w as usize)
            .saturating_mul(h as usize)
            .saturating_mul(d as usize)
    }

    /// Far corner of the filled region, or `None` when it does not fit in `i32`.
    pub fn max_corner(&self) -> Option<(i32, i32, i32)> {
        let (w, h, d) = self.dims();
        let (x, y, z) = self.origin();
        Some((
            x.checked_add(w - 1)?,
            y.checked_add(h - 1)?,
            z.checked_add(d - 1)?,
        ))
    }

    pub fn origin(&self) -> (i32, i32, i32) {
        match self {
            Element::Box { x, y, z, .. } | Element::Voxel { x, y, z, .. } => (*x, *y, *z),
        }
    }

    pub fn part(&self) -> BodyPart {
        match self {
            Element::Box { part, .. } | Element::Voxel { part, .. } => *part,
        }
    }
}
