//! Paint and erase edits against a voxel buffer, with revision stamps.
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use voxrig_model::{Voxel, VoxelBuffer, VoxelId};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditTool {
    #[default]
    Paint,
    Erase,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditStats {
    pub paints: usize,
    pub erases: usize,
    /// Requests dropped because edit mode was off, no model was loaded, or
    /// the target did not exist.
    pub ignored: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditKind {
    Paint { color: String },
    Erase { removed: Voxel },
}

/// One applied edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditRecord {
    /// Monotonic, never zero.
    pub stamp: u64,
    /// Index the edit addressed at the time it was applied.
    pub index: usize,
    pub id: VoxelId,
    pub kind: EditKind,
}

/// Edit-mode state: whether edits are accepted, the selected tool, and the brush.
///
/// Every mutating call takes the buffer as `Option` so a missing model is a
/// no-op rather than an error.
#[derive(Clone, Debug)]
pub struct Editor {
    active: bool,
    tool: EditTool,
    brush: String,
    counter: u64,
    stats: EditStats,
}

impl Editor {
    pub fn new(brush: impl Into<String>) -> Self {
        Self {
            active: false,
            tool: EditTool::default(),
            brush: brush.into(),
            counter: 0,
            stats: EditStats::default(),
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        if self.active != active {
            log::debug!(target: "edit", "edit mode {}", if active { "on" } else { "off" });
        }
        self.active = active;
    }

    #[inline]
    pub fn tool(&self) -> EditTool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: EditTool) {
        self.tool = tool;
    }

    #[inline]
    pub fn brush(&self) -> &str {
        &self.brush
    }

    pub fn set_brush(&mut self, color: impl Into<String>) {
        self.brush = color.into();
    }

    pub fn stats(&self) -> EditStats {
        self.stats
    }

    /// Stamp of the latest applied edit, 0 if none.
    #[inline]
    pub fn last_stamp(&self) -> u64 {
        self.counter
    }

    fn next_stamp(&mut self) -> u64 {
        self.counter = self.counter.wrapping_add(1).max(1);
        self.counter
    }

    fn ignore(&mut self, what: &str, index: usize) -> Option<EditRecord> {
        self.stats.ignored += 1;
        log::debug!(
            target: "edit",
            "ignored {} index={} active={}",
            what,
            index,
            self.active
        );
        None
    }

    /// Replace the color at `index`. Coordinates and part are unchanged.
    pub fn paint(
        &mut self,
        buf: Option<&mut VoxelBuffer>,
        index: usize,
        color: &str,
    ) -> Option<EditRecord> {
        let Some(buf) = buf.filter(|_| self.active) else {
            return self.ignore("paint", index);
        };
        let Some(id) = buf.id_at(index) else {
            return self.ignore("paint", index);
        };
        buf.set_color(index, color);
        self.stats.paints += 1;
        let stamp = self.next_stamp();
        log::debug!(target: "edit", "[edit {}] Paint index={} color={}", stamp, index, color);
        Some(EditRecord {
            stamp,
            index,
            id,
            kind: EditKind::Paint {
                color: color.to_string(),
            },
        })
    }

    /// Remove the voxel at `index`. Every later voxel's index drops by one.
    pub fn erase(&mut self, buf: Option<&mut VoxelBuffer>, index: usize) -> Option<EditRecord> {
        let Some(buf) = buf.filter(|_| self.active) else {
            return self.ignore("erase", index);
        };
        let Some(id) = buf.id_at(index) else {
            return self.ignore("erase", index);
        };
        let removed = buf.remove(index)?;
        self.stats.erases += 1;
        let stamp = self.next_stamp();
        log::debug!(
            target: "edit",
            "[edit {}] Erase index={} remaining={}",
            stamp,
            index,
            buf.len()
        );
        Some(EditRecord {
            stamp,
            index,
            id,
            kind: EditKind::Erase { removed },
        })
    }

    /// [`Editor::paint`] addressed by identity instead of position.
    pub fn paint_id(
        &mut self,
        buf: Option<&mut VoxelBuffer>,
        id: VoxelId,
        color: &str,
    ) -> Option<EditRecord> {
        let Some(buf) = buf else {
            return self.ignore("paint", usize::MAX);
        };
        match buf.index_of(id) {
            Some(index) => self.paint(Some(buf), index, color),
            None => self.ignore("paint", usize::MAX),
        }
    }

    /// [`Editor::erase`] addressed by identity. Unaffected by earlier erases.
    pub fn erase_id(&mut self, buf: Option<&mut VoxelBuffer>, id: VoxelId) -> Option<EditRecord> {
        let Some(buf) = buf else {
            return self.ignore("erase", usize::MAX);
        };
        match buf.index_of(id) {
            Some(index) => self.erase(Some(buf), index),
            None => self.ignore("erase", usize::MAX),
        }
    }

    /// Apply the selected tool at `index`, painting with the current brush.
    pub fn apply(&mut self, buf: Option<&mut VoxelBuffer>, index: usize) -> Option<EditRecord> {
        match self.tool {
            EditTool::Paint => {
                let brush = self.brush.clone();
                self.paint(buf, index, &brush)
            }
            EditTool::Erase => self.erase(buf, index),
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new("#3b82f6")
    }
}
