use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Studio-wide defaults. Every field is optional in the file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub base_gravity: f32,
    pub default_stiffness: f32,
    pub voxel_size: f32,
    pub voxel_mass: f32,
    pub brush_color: String,
    pub library_path: PathBuf,
    /// Style hint passed through to the generation service.
    pub style: String,
    /// Detail level passed through to the generation service.
    pub complexity: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            base_gravity: 9.81,
            default_stiffness: 0.5,
            voxel_size: 0.95,
            voxel_mass: 1.0,
            brush_color: "#3b82f6".to_string(),
            library_path: PathBuf::from("voxrig_library.json"),
            style: "Modern".to_string(),
            complexity: "Detailed".to_string(),
        }
    }
}

impl StudioConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let mut cfg: StudioConfig = toml::from_str(toml_str)?;
        cfg.default_stiffness = cfg.default_stiffness.clamp(0.0, 1.0);
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&s)
    }
}
