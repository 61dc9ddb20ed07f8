use serde::{Deserialize, Serialize};

use crate::types::BodyPart;

/// One colored unit cube on the integer grid. Overlapping coordinates are allowed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Voxel {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub color: String,
    pub part: BodyPart,
}

impl Voxel {
    pub fn new(x: i32, y: i32, z: i32, color: impl Into<String>, part: BodyPart) -> Self {
        Self {
            x,
            y,
            z,
            color: color.into(),
            part,
        }
    }
}

/// Synthetic identity assigned when a voxel enters a buffer. Survives erases of
/// other voxels, unlike the positional index.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoxelId(pub u32);

/// Ordered voxel sequence. The position of a voxel is its stable index;
/// removing a voxel shifts every later index down by one.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Voxel>", into = "Vec<Voxel>")]
pub struct VoxelBuffer {
    voxels: Vec<Voxel>,
    ids: Vec<VoxelId>,
    next_id: u32,
    rev: u64,
}

impl VoxelBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            voxels: Vec::with_capacity(n),
            ids: Vec::with_capacity(n),
            next_id: 0,
            rev: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Mutation counter; bumps on every push, paint, or erase.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.rev
    }

    pub fn push(&mut self, v: Voxel) -> VoxelId {
        let id = VoxelId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.voxels.push(v);
        self.ids.push(id);
        self.bump_rev();
        id
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Voxel> {
        self.voxels.get(index)
    }

    #[inline]
    pub fn id_at(&self, index: usize) -> Option<VoxelId> {
        self.ids.get(index).copied()
    }

    pub fn index_of(&self, id: VoxelId) -> Option<usize> {
        self.ids.iter().position(|&i| i == id)
    }

    #[inline]
    pub fn as_slice(&self) -> &[Voxel] {
        &self.voxels
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Voxel> {
        self.voxels.iter()
    }

    /// Replace the color at `index`. Coordinates and part are untouched.
    pub fn set_color(&mut self, index: usize, color: &str) -> bool {
        match self.voxels.get_mut(index) {
            Some(v) => {
                v.color = color.to_string();
                self.bump_rev();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<Voxel> {
        if index >= self.voxels.len() {
            return None;
        }
        self.ids.remove(index);
        let v = self.voxels.remove(index);
        self.bump_rev();
        Some(v)
    }

    fn bump_rev(&mut self) {
        self.rev = self.rev.wrapping_add(1).max(1);
    }
}

impl From<Vec<Voxel>> for VoxelBuffer {
    fn from(voxels: Vec<Voxel>) -> Self {
        let mut buf = VoxelBuffer::with_capacity(voxels.len());
        for v in voxels {
            buf.push(v);
        }
        buf
    }
}

impl From<VoxelBuffer> for Vec<Voxel> {
    fn from(buf: VoxelBuffer) -> Self {
        buf.voxels
    }
}

impl FromIterator<Voxel> for VoxelBuffer {
    fn from_iter<I: IntoIterator<Item = Voxel>>(iter: I) -> Self {
        let mut buf = VoxelBuffer::new();
        for v in iter {
            buf.push(v);
        }
        buf
    }
}

impl<'a> IntoIterator for &'a VoxelBuffer {
    type Item = &'a Voxel;
    type IntoIter = std::slice::Iter<'a, Voxel>;

    fn into_iter(self) -> Self::IntoIter {
        self.voxels.iter()
    }
}

/// Buffers compare by content; identities and revisions are session-local.
impl PartialEq for VoxelBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.voxels == other.voxels
    }
}

impl Eq for VoxelBuffer {}
