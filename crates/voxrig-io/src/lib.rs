//! Model library persistence and studio configuration.
#![forbid(unsafe_code)]

pub mod config;
pub mod library;

pub use config::{ConfigError, StudioConfig};
pub use library::{LibraryError, ModelLibrary};
