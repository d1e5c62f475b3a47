//! Scene.

use crate::vulkan::drawable::{Mesh, Texture};

/// Scene ready for drawing.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Name.
    pub(crate) name: Option<String>,
    /// Meshes.
    pub(crate) meshes: Vec<Mesh>,
    /// Texture applied to every mesh.
    pub(crate) texture: Texture,
}
