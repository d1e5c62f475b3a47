//! Vulkan version.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{anyhow, Context};
use cgmath::{EuclideanSpace, Matrix4, Point3};
use fbx_orbit_viewer::{
    camera::{MouseState, OrbitCamera, Spin},
    data, CliOpt, FramePacer,
};
use log::{debug, error, info};
use rgb::RGBA;
use vulkano::{
    buffer::{BufferAccess, CpuBufferPool},
    command_buffer::{AutoCommandBufferBuilder, DynamicState, SubpassContents},
    descriptor::{
        descriptor_set::{DescriptorSet, PersistentDescriptorSet},
        pipeline_layout::PipelineLayoutAbstract,
    },
    device::{Device, Queue},
    format::Format,
    framebuffer::{FramebufferAbstract, RenderPassAbstract},
    pipeline::GraphicsPipelineAbstract,
    swapchain::{self, AcquireError, Surface, Swapchain, SwapchainCreationError},
    sync::{self, FlushError, GpuFuture},
};
use winit::{
    event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent},
    event_loop::ControlFlow,
    window::Window,
};

use self::{
    drawable::Loader,
    setup::{
        create_framebuffers, create_pipeline, create_render_pass, create_swapchain,
        select_depth_format, setup, viewport, WindowConfig,
    },
};

mod drawable;
mod setup;

/// Background color.
const CLEAR_COLOR: RGBA<f32> = RGBA {
    r: 0.5,
    g: 0.5,
    b: 0.5,
    a: 1.0,
};

/// Descriptor set index of the camera uniform.
const CAMERA_SET: usize = 0;

/// Vertex shader.
pub mod vs {
    vulkano_shaders::shader! {
        ty: "vertex",
        path: "src/bin/fbx-orbit-viewer/vulkan/shaders/default.vert",
    }
}

/// Fragment shader.
pub mod fs {
    vulkano_shaders::shader! {
        ty: "fragment",
        path: "src/bin/fbx-orbit-viewer/vulkan/shaders/default.frag",
    }
}

/// Maps OpenGL clip space to Vulkan clip space.
///
/// Vulkan has Y pointing down and depth in `0..=1`.
#[rustfmt::skip]
fn clip_correction() -> Matrix4<f32> {
    Matrix4::new(
        1.0,  0.0, 0.0, 0.0,
        0.0, -1.0, 0.0, 0.0,
        0.0,  0.0, 0.5, 0.0,
        0.0,  0.0, 0.5, 1.0,
    )
}

/// Opens the window and runs the viewer until it is closed.
pub fn main(opt: &CliOpt, scene: data::Scene, texture: data::Texture) -> anyhow::Result<()> {
    info!("Vulkan mode");

    let title = match &scene.name {
        Some(name) => format!("{} - {}", name, env!("CARGO_PKG_NAME")),
        None => env!("CARGO_PKG_NAME").to_owned(),
    };
    let window = WindowConfig {
        title,
        width: opt.width,
        height: opt.height,
    };
    let (device, queue, surface, event_loop) = setup(&window)?;
    let mut renderer = Renderer::new(device, queue, surface, &scene, &texture)?;

    let bbox = scene.bbox().bounding_box();
    let mut camera = OrbitCamera::new();
    if let Some(bbox) = &bbox {
        camera.frame(bbox);
    }
    debug!("Initial camera: {:?}", camera);
    let mut mouse = MouseState::new();
    let pivot = bbox.map_or_else(Point3::origin, |bbox| bbox.center());
    let mut spin = Spin::new(opt.spin, pivot);
    let pacer = FramePacer::new(opt.fps)?;
    let mut frame_start = Instant::now();

    event_loop.run(move |event, _, control_flow| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
            WindowEvent::Resized(_) => renderer.recreate_swapchain = true,
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state: ElementState::Pressed,
                        virtual_keycode: Some(key),
                        ..
                    },
                ..
            } => match key {
                VirtualKeyCode::Escape => *control_flow = ControlFlow::Exit,
                VirtualKeyCode::R => {
                    debug!("Resetting camera");
                    camera.reset();
                }
                _ => {}
            },
            WindowEvent::MouseInput { state, button, .. } => mouse.button(button, state),
            WindowEvent::CursorMoved { position, .. } => {
                mouse.cursor_moved(&mut camera, position);
            }
            WindowEvent::CursorLeft { .. } => mouse.cursor_left(),
            WindowEvent::MouseWheel { delta, .. } => mouse.scroll(&mut camera, delta),
            _ => {}
        },
        Event::MainEventsCleared => {
            if *control_flow == ControlFlow::Exit {
                return;
            }
            let now = Instant::now();
            if pacer.remaining(frame_start, now) == Duration::ZERO {
                frame_start = now;
                let matrices = vs::ty::Camera {
                    model: spin.model().into(),
                    view: camera.view().into(),
                    proj: (clip_correction() * camera.projection(renderer.aspect())).into(),
                };
                if let Err(e) = renderer.render(matrices) {
                    error!("Failed to render a frame: {:#}", e);
                    *control_flow = ControlFlow::Exit;
                    return;
                }
                spin.advance();
            }
            *control_flow = ControlFlow::WaitUntil(pacer.next_deadline(frame_start));
        }
        _ => {}
    })
}

/// Per-window rendering state.
struct Renderer {
    /// Device.
    device: Arc<Device>,
    /// Queue.
    queue: Arc<Queue>,
    /// Window surface.
    surface: Arc<Surface<Window>>,
    /// Swapchain.
    swapchain: Arc<Swapchain<Window>>,
    /// Render pass.
    render_pass: Arc<dyn RenderPassAbstract + Send + Sync>,
    /// Graphics pipeline.
    pipeline: Arc<dyn GraphicsPipelineAbstract + Send + Sync>,
    /// Depth buffer format.
    depth_format: Format,
    /// Framebuffers, one per swapchain image.
    framebuffers: Vec<Arc<dyn FramebufferAbstract + Send + Sync>>,
    /// Dynamic state with the current viewport.
    dynamic_state: DynamicState,
    /// Current surface dimensions.
    dimensions: [u32; 2],
    /// Camera uniform buffer pool.
    uniform_pool: CpuBufferPool<vs::ty::Camera>,
    /// Uploaded scene.
    scene: drawable::Scene,
    /// Whether the swapchain should be recreated before the next frame.
    recreate_swapchain: bool,
    /// End of the previous frame.
    previous_frame_end: Option<Box<dyn GpuFuture>>,
}

impl Renderer {
    /// Creates a new `Renderer` and uploads the scene.
    fn new(
        device: Arc<Device>,
        queue: Arc<Queue>,
        surface: Arc<Surface<Window>>,
        scene: &data::Scene,
        texture: &data::Texture,
    ) -> anyhow::Result<Self> {
        let (swapchain, images) = create_swapchain(&device, &queue, &surface)?;
        let dimensions = swapchain.dimensions();
        let depth_format = select_depth_format(&device);
        let render_pass = create_render_pass(&device, swapchain.format(), depth_format)?;
        let pipeline = create_pipeline(&device, &render_pass)?;
        let framebuffers =
            create_framebuffers(&device, &images, &render_pass, dimensions, depth_format)?;
        let dynamic_state = DynamicState {
            viewports: Some(vec![viewport(dimensions)]),
            ..DynamicState::none()
        };

        let (scene, scene_future) = Loader::new(device.clone(), queue.clone(), pipeline.clone())
            .load(scene, texture)
            .context("Failed to load scene to GPU")?;
        info!("Drawing scene: name={:?}", scene.name);
        let previous_frame_end = match scene_future {
            Some(future) => Some(future),
            None => Some(Box::new(sync::now(device.clone())) as Box<dyn GpuFuture>),
        };

        Ok(Self {
            uniform_pool: CpuBufferPool::uniform_buffer(device.clone()),
            device,
            queue,
            surface,
            swapchain,
            render_pass,
            pipeline,
            depth_format,
            framebuffers,
            dynamic_state,
            dimensions,
            scene,
            recreate_swapchain: false,
            previous_frame_end,
        })
    }

    /// Returns the aspect ratio of the surface.
    fn aspect(&self) -> f32 {
        let [width, height] = self.dimensions;
        if height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        }
    }

    /// Recreates the swapchain and the framebuffers for the current window size.
    ///
    /// Returns `false` if the window size cannot be rendered to for now.
    fn recreate_swapchain(&mut self) -> anyhow::Result<bool> {
        let dimensions: [u32; 2] = self.surface.window().inner_size().into();
        let (swapchain, images) = match self.swapchain.recreate_with_dimensions(dimensions) {
            Ok(v) => v,
            Err(SwapchainCreationError::UnsupportedDimensions) => return Ok(false),
            Err(e) => return Err(e).context("Failed to recreate swapchain"),
        };
        debug!("Recreated swapchain: dimensions={:?}", dimensions);

        self.swapchain = swapchain;
        self.framebuffers = create_framebuffers(
            &self.device,
            &images,
            &self.render_pass,
            dimensions,
            self.depth_format,
        )?;
        self.dynamic_state.viewports = Some(vec![viewport(dimensions)]);
        self.dimensions = dimensions;
        self.recreate_swapchain = false;

        Ok(true)
    }

    /// Draws a frame with the given camera matrices.
    fn render(&mut self, matrices: vs::ty::Camera) -> anyhow::Result<()> {
        if let Some(previous_frame_end) = self.previous_frame_end.as_mut() {
            previous_frame_end.cleanup_finished();
        }

        if self.recreate_swapchain && !self.recreate_swapchain()? {
            return Ok(());
        }

        let (image_num, suboptimal, acquire_future) =
            match swapchain::acquire_next_image(self.swapchain.clone(), None) {
                Ok(v) => v,
                Err(AcquireError::OutOfDate) => {
                    self.recreate_swapchain = true;
                    return Ok(());
                }
                Err(e) => return Err(e).context("Failed to acquire next image"),
            };
        if suboptimal {
            self.recreate_swapchain = true;
        }

        let uniform = self
            .uniform_pool
            .next(matrices)
            .context("Failed to allocate camera uniform buffer")?;
        let layout = self
            .pipeline
            .descriptor_set_layout(CAMERA_SET)
            .ok_or_else(|| anyhow!("Failed to get the camera descriptor set layout"))?;
        let camera_set = PersistentDescriptorSet::start(layout.clone())
            .add_buffer(uniform)
            .context("Failed to add camera uniform to descriptor set")?
            .build()
            .context("Failed to build descriptor set")?;
        let camera_set = Arc::new(camera_set) as Arc<dyn DescriptorSet + Send + Sync>;

        let mut builder = AutoCommandBufferBuilder::primary_one_time_submit(
            self.device.clone(),
            self.queue.family(),
        )
        .context("Failed to create command buffer builder")?;
        builder
            .begin_render_pass(
                self.framebuffers[image_num].clone(),
                SubpassContents::Inline,
                vec![
                    [CLEAR_COLOR.r, CLEAR_COLOR.g, CLEAR_COLOR.b, CLEAR_COLOR.a].into(),
                    1f32.into(),
                ],
            )
            .context("Failed to begin render pass")?;
        for mesh in &self.scene.meshes {
            builder
                .draw_indexed(
                    self.pipeline.clone(),
                    &self.dynamic_state,
                    vec![mesh.vertices.clone() as Arc<dyn BufferAccess + Send + Sync>],
                    mesh.indices.clone(),
                    (
                        camera_set.clone(),
                        self.scene.texture.descriptor_set.clone(),
                    ),
                    (),
                    vec![],
                )
                .with_context(|| format!("Failed to draw mesh {:?}", mesh))?;
        }
        builder
            .end_render_pass()
            .context("Failed to end render pass")?;
        let command_buffer = builder
            .build()
            .context("Failed to build command buffer")?;

        let previous_frame_end = self
            .previous_frame_end
            .take()
            .unwrap_or_else(|| Box::new(sync::now(self.device.clone())));
        let future = previous_frame_end
            .join(acquire_future)
            .then_execute(self.queue.clone(), command_buffer)
            .context("Failed to execute command buffer")?
            .then_swapchain_present(self.queue.clone(), self.swapchain.clone(), image_num)
            .then_signal_fence_and_flush();

        match future {
            Ok(future) => self.previous_frame_end = Some(Box::new(future)),
            Err(FlushError::OutOfDate) => {
                self.recreate_swapchain = true;
                self.previous_frame_end = Some(Box::new(sync::now(self.device.clone())));
            }
            Err(e) => {
                error!("Failed to flush future: {}", e);
                self.previous_frame_end = Some(Box::new(sync::now(self.device.clone())));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use cgmath::Vector4;

    #[test]
    fn clip_correction_maps_depth_to_unit_range() {
        let m = clip_correction();
        let near = m * Vector4::new(0.0, 0.0, -2.0, 2.0);
        let far = m * Vector4::new(0.0, 0.0, 2.0, 2.0);
        assert_relative_eq!(near.z / near.w, 0.0);
        assert_relative_eq!(far.z / far.w, 1.0);
    }

    #[test]
    fn clip_correction_flips_y() {
        let v = clip_correction() * Vector4::new(0.25, 0.5, 0.0, 1.0);
        assert_relative_eq!(v.x, 0.25);
        assert_relative_eq!(v.y, -0.5);
        assert_relative_eq!(v.z, 0.5);
        assert_relative_eq!(v.w, 1.0);
    }
}
