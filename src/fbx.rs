//! FBX.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{bail, Context};
use fbxcel_dom::any::AnyDocument;
use log::{debug, info};

use crate::data::Scene;

mod v7400;

/// Loads the scene from the FBX file.
pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Scene> {
    load_impl(path.as_ref())
}

/// Loads the scene from the FBX file.
fn load_impl(path: &Path) -> anyhow::Result<Scene> {
    debug!("Opening FBX file: {}", path.display());
    let file = File::open(path)
        .with_context(|| format!("Failed to open FBX file {}", path.display()))?;
    let reader = BufReader::new(file);
    debug!("Successfully opened FBX file: {}", path.display());

    info!("Loading FBX data: {}", path.display());
    let mut scene = match AnyDocument::from_seekable_reader(reader)
        .with_context(|| format!("Failed to parse FBX document {}", path.display()))?
    {
        AnyDocument::V7400(ver, doc) => {
            info!("FBX version: {:?}", ver);
            v7400::from_doc(&doc)?
        }
        _ => bail!("Unknown FBX DOM version"),
    };
    scene.name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned());
    info!(
        "Successfully loaded FBX data: {}, meshes={}",
        path.display(),
        scene.meshes.len()
    );

    Ok(scene)
}
