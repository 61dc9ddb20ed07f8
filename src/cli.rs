use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use voxrig_model::{AnimationType, ModelCategory};

#[derive(Parser, Debug)]
#[command(name = "voxrig", version, about = "Voxel model rigging, posing and ragdoll tools")]
pub struct Cli {
    /// Studio config (TOML). Defaults to ./voxrig.toml when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Model library file, overriding the config.
    #[arg(long, global = true)]
    pub library: Option<PathBuf>,

    /// Log filter, e.g. `info` or `studio=debug`. RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a response and print its parts, bounds and pivots.
    Inspect {
        response: PathBuf,
    },
    /// Print the root and per-part transforms at one instant.
    Pose(PoseArgs),
    /// Print ragdoll parameters and body descriptors.
    Ragdoll {
        response: PathBuf,
        #[arg(long)]
        stiffness: Option<f32>,
        #[arg(long)]
        json: bool,
    },
    /// Run a full generation through the background worker.
    Generate(GenerateArgs),
    /// Manage saved models.
    Library {
        #[command(subcommand)]
        action: LibraryAction,
    },
}

#[derive(Args, Debug)]
pub struct PoseArgs {
    pub response: PathBuf,
    #[arg(long, default_value = "idle")]
    pub animation: AnimationType,
    /// Seconds since the animation started.
    #[arg(long, default_value_t = 0.0)]
    pub time: f64,
    #[arg(long)]
    pub stiffness: Option<f32>,
    /// Overrides the category stated in the response.
    #[arg(long)]
    pub category: Option<ModelCategory>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Canned service output to answer the model request with.
    pub response: PathBuf,
    #[arg(long, default_value = "")]
    pub prompt: String,
    #[arg(long, default_value = "character")]
    pub category: ModelCategory,
    /// File holding a base64 concept image to request first.
    #[arg(long)]
    pub concept: Option<PathBuf>,
    #[arg(long)]
    pub save: bool,
}

#[derive(Subcommand, Debug)]
pub enum LibraryAction {
    List,
    Delete { id: String },
}
