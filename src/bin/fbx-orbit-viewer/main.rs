//! FBX orbit viewer.

use anyhow::Context;
use clap::Parser;
use fbx_orbit_viewer::{
    data::{Scene, Texture},
    fbx, CliOpt,
};
use log::{debug, error, info, warn};

pub mod vulkan;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    info!("version: {}", env!("CARGO_PKG_VERSION"));

    let opt = CliOpt::parse();
    opt.validate().context("Invalid command line options")?;
    debug!("opt: {:?}", opt);

    let scene = load_scene(&opt);
    let texture = load_texture(&opt);

    vulkan::main(&opt, scene, texture)
}

/// Loads the FBX file, or builds the primitive if no file is given.
///
/// Load failures are logged and result in an empty scene.
fn load_scene(opt: &CliOpt) -> Scene {
    let mut scene = match &opt.fbx_path {
        Some(path) => fbx::load(path).unwrap_or_else(|e| {
            error!("Failed to load FBX file {}: {:#}", path.display(), e);
            Scene::new()
        }),
        None => {
            info!("No FBX file given, showing {:?}", opt.primitive);
            opt.primitive.scene()
        }
    };
    scene.scale(opt.scale);
    if scene.is_empty() {
        warn!("Nothing to draw");
    }

    scene
}

/// Loads the texture, falling back to plain white.
fn load_texture(opt: &CliOpt) -> Texture {
    match &opt.texture {
        Some(path) => Texture::load(path).unwrap_or_else(|e| {
            error!("Failed to load texture {}: {:#}", path.display(), e);
            Texture::white()
        }),
        None => Texture::white(),
    }
}
