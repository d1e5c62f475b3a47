//! 3D content data.

pub use self::{mesh::Mesh, scene::Scene, texture::Texture};

mod mesh;
mod scene;
mod texture;
