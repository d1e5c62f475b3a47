//! Mesh.

use std::{fmt, sync::Arc};

use vulkano::buffer::ImmutableBuffer;

use crate::vulkan::drawable::Vertex;

/// Mesh uploaded to the GPU.
#[derive(Clone)]
pub struct Mesh {
    /// Name.
    pub(crate) name: Option<String>,
    /// Vertices.
    pub(crate) vertices: Arc<ImmutableBuffer<[Vertex]>>,
    /// Triangle indices.
    pub(crate) indices: Arc<ImmutableBuffer<[u32]>>,
    /// Number of indices.
    pub(crate) index_count: usize,
}

impl fmt::Debug for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Mesh")
            .field("name", &self.name)
            .field("index_count", &self.index_count)
            .finish()
    }
}
