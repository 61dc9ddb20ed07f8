mod cli;
mod file_service;

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde_json::json;
use voxrig_decode::{GenerationResponse, parse_response};
use voxrig_io::{ModelLibrary, StudioConfig};
use voxrig_model::ModelCategory;
use voxrig_physics::{RagdollParams, RagdollSettings, build_bodies};
use voxrig_pose::{PoseInput, evaluate};
use voxrig_rig::Rig;
use voxrig_runtime::{GenerationWorker, Studio};

use crate::cli::{Cli, Command, GenerateArgs, LibraryAction, PoseArgs};
use crate::file_service::FileGenerationService;

const DEFAULT_CONFIG: &str = "voxrig.toml";
const GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(lib) = cli.library {
        config.library_path = lib;
    }

    match cli.command {
        Command::Inspect { response } => inspect(&response),
        Command::Pose(args) => pose(&config, args),
        Command::Ragdoll {
            response,
            stiffness,
            json,
        } => ragdoll(&config, &response, stiffness, json),
        Command::Generate(args) => generate(&config, args),
        Command::Library { action } => library(&config, action),
    }
}

fn load_config(path: Option<&Path>) -> Result<StudioConfig, Box<dyn Error>> {
    match path {
        Some(p) => Ok(StudioConfig::from_path(p)?),
        None if Path::new(DEFAULT_CONFIG).exists() => Ok(StudioConfig::from_path(DEFAULT_CONFIG)?),
        None => Ok(StudioConfig::default()),
    }
}

fn read_response(path: &Path) -> Result<GenerationResponse, Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    Ok(parse_response(&text)?)
}

fn ragdoll_settings(config: &StudioConfig) -> RagdollSettings {
    RagdollSettings {
        base_gravity: config.base_gravity,
        voxel_size: config.voxel_size,
        voxel_mass: config.voxel_mass,
    }
}

fn inspect(path: &Path) -> Result<(), Box<dyn Error>> {
    let resp = read_response(path)?;
    let buf = resp.decompress();
    let rig = Rig::from_buffer(&buf);
    println!("name: {}", resp.name);
    if let Some(c) = resp.category {
        println!("category: {c}");
    }
    if let Some(a) = resp.suggested_animation {
        println!("suggested animation: {a}");
    }
    println!("elements: {}", resp.elements.len());
    println!("voxels: {}", buf.len());
    if let Some(b) = rig.bounds() {
        println!(
            "bounds: ({}, {}, {}) .. ({}, {}, {})",
            b.min.x, b.min.y, b.min.z, b.max.x, b.max.y, b.max.z
        );
        let size = b.extents();
        println!("size: {} x {} x {}", size.x + 1.0, size.y + 1.0, size.z + 1.0);
    }
    let o = rig.center_offset();
    println!("center offset: ({:.2}, {:.2}, {:.2})", o.x, o.y, o.z);
    for g in rig.groups() {
        println!(
            "  {:<10} voxels={:<5} pivot=({:.2}, {:.2}, {:.2})",
            g.part.as_str(),
            g.members.len(),
            g.pivot.x,
            g.pivot.y,
            g.pivot.z
        );
    }
    Ok(())
}

fn pose(config: &StudioConfig, args: PoseArgs) -> Result<(), Box<dyn Error>> {
    let resp = read_response(&args.response)?;
    let rig = Rig::from_buffer(&resp.decompress());
    let category = args.category.or(resp.category).unwrap_or(ModelCategory::Character);
    let stiffness = args.stiffness.unwrap_or(config.default_stiffness);
    let input = PoseInput::new(args.animation, category, args.time, stiffness);
    let frame = evaluate(&rig, &input);

    if args.json {
        let parts: serde_json::Map<String, serde_json::Value> = rig
            .groups()
            .filter_map(|g| Some((g.part.to_string(), serde_json::to_value(frame.part(g.part)?).ok()?)))
            .collect();
        let out = json!({
            "category": category,
            "animation": args.animation,
            "time": args.time,
            "stiffness": stiffness,
            "root": frame.root,
            "parts": parts,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let r = frame.root;
    println!("{category}/{} t={:.3} stiffness={stiffness:.2}", args.animation, args.time);
    println!(
        "root      pos=({:.3}, {:.3}, {:.3}) rot=({:.3}, {:.3}, {:.3})",
        r.position.x, r.position.y, r.position.z, r.rotation.x, r.rotation.y, r.rotation.z
    );
    for g in rig.groups() {
        if let Some(t) = frame.part(g.part) {
            println!(
                "{:<9} pos=({:.3}, {:.3}, {:.3}) rot=({:.3}, {:.3}, {:.3})",
                g.part.as_str(),
                t.position.x,
                t.position.y,
                t.position.z,
                t.rotation.x,
                t.rotation.y,
                t.rotation.z
            );
        }
    }
    Ok(())
}

fn ragdoll(
    config: &StudioConfig,
    path: &Path,
    stiffness: Option<f32>,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let buf = read_response(path)?.decompress();
    let rig = Rig::from_buffer(&buf);
    let settings = ragdoll_settings(config);
    let params = RagdollParams::from_stiffness(
        stiffness.unwrap_or(config.default_stiffness),
        &settings,
    );
    let bodies = build_bodies(&buf, rig.center_offset(), &params, &settings);
    if json {
        let out = json!({ "params": params, "bodies": bodies });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    println!(
        "damping: {:.3} (linear and angular)",
        params.linear_damping
    );
    println!(
        "gravity: {:.3} (x{:.2} of {:.2})",
        params.gravity.y, params.gravity_scale, settings.base_gravity
    );
    println!("bodies: {}", bodies.len());
    Ok(())
}

fn generate(config: &StudioConfig, args: GenerateArgs) -> Result<(), Box<dyn Error>> {
    let service = FileGenerationService::new(args.response.clone(), args.concept.clone());
    let worker = GenerationWorker::spawn(Arc::new(service));
    let mut studio = Studio::new(config);
    studio.set_prompt(args.prompt);
    studio.set_category(args.category);

    if args.concept.is_some() && studio.request_concept(&worker).is_some() {
        await_result(&mut studio, &worker)?;
    }
    studio.request_model(&worker);
    await_result(&mut studio, &worker)?;

    let model = studio.model().ok_or("generation produced no model")?;
    println!("id: {}", model.id);
    println!("name: {}", model.name);
    println!("category: {}", model.category);
    println!("animation: {}", model.animation);
    println!("voxels: {}", model.voxel_count());

    if args.save {
        let mut lib = ModelLibrary::open(config.library_path.clone());
        studio.save(&mut lib)?;
        println!("saved to {}", lib.path().display());
    }
    Ok(())
}

/// Block until the pending request resolves, then surface its error if any.
fn await_result(studio: &mut Studio, worker: &GenerationWorker) -> Result<(), Box<dyn Error>> {
    while studio.pending_request().is_some() {
        let (id, outcome) = worker
            .wait(GENERATION_TIMEOUT)
            .ok_or("timed out waiting for the generation service")?;
        studio.deliver(id, outcome);
    }
    match studio.error() {
        Some(msg) => Err(msg.into()),
        None => Ok(()),
    }
}

fn library(config: &StudioConfig, action: LibraryAction) -> Result<(), Box<dyn Error>> {
    let path: PathBuf = config.library_path.clone();
    let mut lib = ModelLibrary::open(path);
    match action {
        LibraryAction::List => {
            if lib.is_empty() {
                println!("library {} is empty", lib.path().display());
            }
            for m in lib.list() {
                println!(
                    "{}  {:<24} {:<9} {:<7} voxels={}",
                    m.id,
                    m.name,
                    m.category,
                    m.animation,
                    m.voxel_count()
                );
            }
        }
        LibraryAction::Delete { id } => {
            if lib.delete(&id)? {
                println!("deleted {id}");
            } else {
                return Err(format!("no model with id {id}").into());
            }
        }
    }
    Ok(())
}
