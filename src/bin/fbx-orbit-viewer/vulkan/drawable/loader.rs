//! Loader.

use std::sync::Arc;

use anyhow::Context;
use fbx_orbit_viewer::data;
use log::debug;
use vulkano::{
    buffer::{BufferUsage, ImmutableBuffer},
    descriptor::{
        descriptor_set::{DescriptorSet, PersistentDescriptorSet},
        pipeline_layout::PipelineLayoutAbstract,
    },
    device::{Device, Queue},
    format::R8G8B8A8Srgb,
    image::{Dimensions, ImmutableImage, MipmapsCount},
    pipeline::GraphicsPipelineAbstract,
    sampler::{Filter, MipmapMode, Sampler, SamplerAddressMode},
    sync::GpuFuture,
};

use crate::vulkan::drawable::{self, join_futures};

/// Descriptor set index of the diffuse texture.
const TEXTURE_SET: usize = 1;

/// Uploads scene data to the GPU.
pub struct Loader {
    /// Device.
    device: Arc<Device>,
    /// Queue.
    queue: Arc<Queue>,
    /// Pipeline the scene will be drawn with.
    pipeline: Arc<dyn GraphicsPipelineAbstract + Send + Sync>,
    /// GPU future.
    future: Option<Box<dyn GpuFuture>>,
}

impl Loader {
    /// Creates a new `Loader`.
    pub fn new(
        device: Arc<Device>,
        queue: Arc<Queue>,
        pipeline: Arc<dyn GraphicsPipelineAbstract + Send + Sync>,
    ) -> Self {
        Self {
            device,
            queue,
            pipeline,
            future: None,
        }
    }

    /// Loads the scene and the texture.
    ///
    /// The returned future, if any, must be waited on before the first draw.
    pub(crate) fn load(
        mut self,
        src_scene: &data::Scene,
        src_texture: &data::Texture,
    ) -> anyhow::Result<(drawable::Scene, Option<Box<dyn GpuFuture>>)> {
        let meshes = src_scene
            .meshes
            .iter()
            .filter(|src_mesh| {
                let empty = src_mesh.indices.is_empty();
                if empty {
                    debug!("Skipping empty mesh: name={:?}", src_mesh.name);
                }
                !empty
            })
            .map(|src_mesh| self.load_mesh(src_mesh))
            .collect::<anyhow::Result<Vec<_>>>()
            .context("Failed to upload meshes")?;
        let texture = self
            .load_texture(src_texture)
            .context("Failed to upload texture")?;

        let scene = drawable::Scene {
            name: src_scene.name.clone(),
            meshes,
            texture,
        };
        debug!("Successfully uploaded scene: {:?}", scene);

        Ok((scene, self.future))
    }

    /// Uploads vertex and index buffers of the mesh.
    fn load_mesh(&mut self, src_mesh: &data::Mesh) -> anyhow::Result<drawable::Mesh> {
        let vertices = src_mesh
            .positions
            .iter()
            .zip(&src_mesh.normals)
            .zip(&src_mesh.uv)
            .zip(&src_mesh.colors)
            .map(|(((&position, &normal), &uv), color)| drawable::Vertex {
                position,
                normal,
                uv,
                color: [color.r, color.g, color.b],
            })
            .collect::<Vec<_>>();
        let (vertices, vertices_future) = ImmutableBuffer::from_iter(
            vertices.into_iter(),
            BufferUsage::all(),
            self.queue.clone(),
        )
        .context("Failed to upload vertex buffer")?;
        join_futures(&mut self.future, vertices_future);

        let (indices, indices_future) = ImmutableBuffer::from_iter(
            src_mesh.indices.iter().cloned(),
            BufferUsage::all(),
            self.queue.clone(),
        )
        .context("Failed to upload index buffer")?;
        join_futures(&mut self.future, indices_future);

        Ok(drawable::Mesh {
            name: src_mesh.name.clone(),
            vertices,
            indices,
            index_count: src_mesh.indices.len(),
        })
    }

    /// Uploads the texture image and binds it to a descriptor set.
    fn load_texture(&mut self, src_texture: &data::Texture) -> anyhow::Result<drawable::Texture> {
        let dimensions = [src_texture.width(), src_texture.height()];
        let dim = Dimensions::Dim2d {
            width: dimensions[0],
            height: dimensions[1],
        };
        let (image, image_future) = ImmutableImage::from_iter(
            src_texture.image.as_raw().iter().cloned(),
            dim,
            MipmapsCount::One,
            R8G8B8A8Srgb,
            self.queue.clone(),
        )
        .context("Failed to upload texture image")?;
        join_futures(&mut self.future, image_future);

        let sampler = Sampler::new(
            self.device.clone(),
            Filter::Linear,
            Filter::Linear,
            MipmapMode::Nearest,
            SamplerAddressMode::Repeat,
            SamplerAddressMode::Repeat,
            SamplerAddressMode::Repeat,
            0.0,
            1.0,
            0.0,
            0.0,
        )
        .context("Failed to create sampler")?;

        let layout = self
            .pipeline
            .descriptor_set_layout(TEXTURE_SET)
            .context("Failed to get the texture descriptor set layout of the pipeline")?;
        let descriptor_set = PersistentDescriptorSet::start(layout.clone())
            .add_sampled_image(image, sampler)
            .context("Failed to add sampled image to descriptor set")?
            .build()
            .context("Failed to build descriptor set")?;

        Ok(drawable::Texture {
            name: src_texture.name.clone(),
            dimensions,
            descriptor_set: Arc::new(descriptor_set) as Arc<dyn DescriptorSet + Send + Sync>,
        })
    }
}
