//! Texture.

use std::{fmt, sync::Arc};

use vulkano::descriptor::descriptor_set::DescriptorSet;

/// Texture bound to the diffuse sampler of the pipeline.
#[derive(Clone)]
pub struct Texture {
    /// Name.
    pub(crate) name: Option<String>,
    /// Dimensions in texels.
    pub(crate) dimensions: [u32; 2],
    /// Descriptor set with the sampled image.
    pub(crate) descriptor_set: Arc<dyn DescriptorSet + Send + Sync>,
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Texture")
            .field("name", &self.name)
            .field("dimensions", &self.dimensions)
            .finish()
    }
}
