use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use voxrig_model::Model;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("writing library {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("encoding library: {0}")]
    Json(#[from] serde_json::Error),
}

/// Saved models, most recent first, backed by a single JSON file.
///
/// Each mutation rewrites the whole file.
#[derive(Debug)]
pub struct ModelLibrary {
    path: PathBuf,
    models: Vec<Model>,
}

impl ModelLibrary {
    /// Open the library at `path`. A missing or unreadable file yields an
    /// empty library.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let models = match fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str::<Vec<Model>>(&s) {
                Ok(models) => models,
                Err(e) => {
                    log::warn!(target: "library", "ignoring corrupt library {}: {}", path.display(), e);
                    Vec::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                log::warn!(target: "library", "cannot read library {}: {}", path.display(), e);
                Vec::new()
            }
        };
        log::debug!(target: "library", "opened {} with {} model(s)", path.display(), models.len());
        Self { path, models }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> &[Model] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Replace the stored model with the same id in place, or insert at the front.
    ///
    /// The in-memory list changes only once the file has been written.
    pub fn save(&mut self, model: &Model) -> Result<(), LibraryError> {
        let mut next = self.models.clone();
        match next.iter_mut().find(|m| m.id == model.id) {
            Some(slot) => *slot = model.clone(),
            None => next.insert(0, model.clone()),
        }
        self.write(&next)?;
        self.models = next;
        log::info!(
            target: "library",
            "saved '{}' id={} voxels={}",
            model.name,
            model.id,
            model.voxel_count()
        );
        Ok(())
    }

    /// Remove a model. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> Result<bool, LibraryError> {
        if self.get(id).is_none() {
            return Ok(false);
        }
        let next: Vec<Model> = self.models.iter().filter(|m| m.id != id).cloned().collect();
        self.write(&next)?;
        self.models = next;
        log::info!(target: "library", "deleted id={}", id);
        Ok(true)
    }

    fn write(&self, models: &[Model]) -> Result<(), LibraryError> {
        let io_err = |source| LibraryError::Io {
            path: self.path.clone(),
            source,
        };
        let json = serde_json::to_string_pretty(models)?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}
