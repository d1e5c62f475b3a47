//! Vulkan setup.

use std::sync::Arc;

use anyhow::{anyhow, Context};
use log::{debug, info};
use vulkano::{
    device::{Device, DeviceExtensions, Queue},
    format::Format,
    framebuffer::{Framebuffer, FramebufferAbstract, RenderPassAbstract, Subpass},
    image::{AttachmentImage, ImageUsage, SwapchainImage},
    instance::{Instance, PhysicalDevice},
    pipeline::{viewport::Viewport, GraphicsPipeline, GraphicsPipelineAbstract},
    swapchain::{
        ColorSpace, FullscreenExclusive, PresentMode, Surface, SurfaceTransform, Swapchain,
    },
};
use vulkano_win::{self, VkSurfaceBuild};
use winit::{
    dpi::LogicalSize,
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

use crate::vulkan::{drawable::Vertex, fs, vs};

/// Depth buffer formats, most precise first.
///
/// `D16Unorm` is always supported as a depth attachment.
const DEPTH_FORMATS: [Format; 2] = [Format::D32Sfloat, Format::D16Unorm];

/// Initial window properties.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    /// Title.
    pub title: String,
    /// Inner width in logical pixels.
    pub width: u32,
    /// Inner height in logical pixels.
    pub height: u32,
}

/// Initialize vulkan.
#[allow(clippy::type_complexity)]
pub fn setup(
    window: &WindowConfig,
) -> anyhow::Result<(Arc<Device>, Arc<Queue>, Arc<Surface<Window>>, EventLoop<()>)> {
    // Create an instance of vulkan.
    let instance = {
        let extensions = vulkano_win::required_extensions();
        Instance::new(None, &extensions, None).context("Failed to create vulkan instance")?
    };
    debug!("Successfully created vulkan instance: {:?}", instance);

    // List physical devices.
    for device in PhysicalDevice::enumerate(&instance) {
        debug!(
            "Physical device available [{}]: name={:?}, type={:?}, api_version={:?}",
            device.index(),
            device.name(),
            device.ty(),
            device.api_version()
        );
    }

    // Prepare a window.
    let event_loop = EventLoop::new();
    let surface = WindowBuilder::new()
        .with_title(window.title.clone())
        .with_inner_size(LogicalSize::new(window.width, window.height))
        .build_vk_surface(&event_loop, instance.clone())
        .context("Failed to create window surface")?;

    // Select a physical device.
    let physical = PhysicalDevice::enumerate(&instance)
        .next()
        .ok_or_else(|| anyhow!("No physical devices available"))?;
    info!(
        "Selected physical device: index={:?}, name={:?}, type={:?}, api_version={:?}",
        physical.index(),
        physical.name(),
        physical.ty(),
        physical.api_version()
    );

    // Select a queue family.
    let queue_family = physical
        .queue_families()
        .find(|&q| q.supports_graphics() && surface.is_supported(q).unwrap_or(false))
        .ok_or_else(|| anyhow!("No graphical queues available"))?;
    info!(
        "Using queue family: id={:?}, count={:?}",
        queue_family.id(),
        queue_family.queues_count()
    );

    // Initialize device.
    let (device, queue) = {
        /// Queue priority, between 0.0 and 1.0.
        ///
        /// Any value in the range works, since only one queue is used.
        const QUEUE_PRIORITY: f32 = 0.5;
        let device_ext = DeviceExtensions {
            khr_swapchain: true,
            ..DeviceExtensions::none()
        };
        let (device, mut queues) = Device::new(
            physical,
            physical.supported_features(),
            &device_ext,
            [(queue_family, QUEUE_PRIORITY)].iter().cloned(),
        )
        .context("Failed to create device")?;
        let queue = queues
            .next()
            .ok_or_else(|| anyhow!("Device was created without queues"))?;
        (device, queue)
    };
    info!("Successfully created device object");

    Ok((device, queue, surface, event_loop))
}

/// Create swapchain.
#[allow(clippy::type_complexity)]
pub fn create_swapchain(
    device: &Arc<Device>,
    queue: &Arc<Queue>,
    surface: &Arc<Surface<Window>>,
) -> anyhow::Result<(Arc<Swapchain<Window>>, Vec<Arc<SwapchainImage<Window>>>)> {
    let caps = surface
        .capabilities(device.physical_device())
        .context("Failed to get surface capabilities")?;
    debug!("Capabilities: {:?}", caps);
    let alpha = caps
        .supported_composite_alpha
        .iter()
        .next()
        .ok_or_else(|| anyhow!("No desired composite alpha modes are supported"))?;
    info!("Selected alpha composite mode: {:?}", alpha);
    let format = caps
        .supported_formats
        .first()
        .map(|&(format, _)| format)
        .ok_or_else(|| anyhow!("No swapchain formats are supported"))?;
    info!("Selected swapchain format: {:?}", format);

    let window = surface.window();
    let (swapchain, images) = Swapchain::new(
        device.clone(),
        surface.clone(),
        caps.min_image_count,
        format,
        window.inner_size().into(),
        1,
        ImageUsage::color_attachment(),
        queue,
        SurfaceTransform::Identity,
        alpha,
        PresentMode::Fifo,
        FullscreenExclusive::Default,
        true,
        ColorSpace::SrgbNonLinear,
    )
    .context("Failed to create swapchain")?;
    Ok((swapchain, images))
}

/// Selects the most precise depth format the device can render to.
pub fn select_depth_format(device: &Arc<Device>) -> Format {
    let physical = device.physical_device();
    let format = DEPTH_FORMATS
        .iter()
        .copied()
        .find(|format| {
            format
                .properties(physical)
                .optimal_tiling_features
                .depth_stencil_attachment
        })
        .unwrap_or(Format::D16Unorm);
    info!("Selected depth format: {:?}", format);
    format
}

/// Creates a render pass with a color and a depth attachment.
pub fn create_render_pass(
    device: &Arc<Device>,
    color_format: Format,
    depth_format: Format,
) -> anyhow::Result<Arc<dyn RenderPassAbstract + Send + Sync>> {
    let render_pass = vulkano::single_pass_renderpass!(
        device.clone(),
        attachments: {
            color: {
                load: Clear,
                store: Store,
                format: color_format,
                samples: 1,
            },
            depth: {
                load: Clear,
                store: DontCare,
                format: depth_format,
                samples: 1,
            }
        },
        pass: {
            color: [color],
            depth_stencil: {depth}
        }
    )
    .context("Failed to create render pass")?;

    Ok(Arc::new(render_pass))
}

/// Creates the graphics pipeline for meshes.
pub fn create_pipeline(
    device: &Arc<Device>,
    render_pass: &Arc<dyn RenderPassAbstract + Send + Sync>,
) -> anyhow::Result<Arc<dyn GraphicsPipelineAbstract + Send + Sync>> {
    let vs = vs::Shader::load(device.clone()).context("Failed to load vertex shader")?;
    let fs = fs::Shader::load(device.clone()).context("Failed to load fragment shader")?;
    let subpass = Subpass::from(render_pass.clone(), 0)
        .ok_or_else(|| anyhow!("Render pass has no subpass"))?;

    let pipeline = GraphicsPipeline::start()
        .vertex_input_single_buffer::<Vertex>()
        .vertex_shader(vs.main_entry_point(), ())
        .triangle_list()
        .viewports_dynamic_scissors_irrelevant(1)
        .fragment_shader(fs.main_entry_point(), ())
        .depth_stencil_simple_depth()
        .render_pass(subpass)
        .build(device.clone())
        .context("Failed to create graphics pipeline")?;
    debug!("Successfully created graphics pipeline");

    Ok(Arc::new(pipeline))
}

/// Creates framebuffers for the swapchain images, sharing one depth buffer.
pub fn create_framebuffers(
    device: &Arc<Device>,
    images: &[Arc<SwapchainImage<Window>>],
    render_pass: &Arc<dyn RenderPassAbstract + Send + Sync>,
    dimensions: [u32; 2],
    depth_format: Format,
) -> anyhow::Result<Vec<Arc<dyn FramebufferAbstract + Send + Sync>>> {
    let depth_buffer = AttachmentImage::transient(device.clone(), dimensions, depth_format)
        .context("Failed to create depth buffer")?;

    images
        .iter()
        .map(|image| {
            let framebuffer = Framebuffer::start(render_pass.clone())
                .add(image.clone())
                .context("Failed to attach color image")?
                .add(depth_buffer.clone())
                .context("Failed to attach depth buffer")?
                .build()
                .context("Failed to build framebuffer")?;
            Ok(Arc::new(framebuffer) as Arc<dyn FramebufferAbstract + Send + Sync>)
        })
        .collect()
}

/// Returns a viewport covering the whole surface.
pub fn viewport(dimensions: [u32; 2]) -> Viewport {
    Viewport {
        origin: [0.0, 0.0],
        dimensions: [dimensions[0] as f32, dimensions[1] as f32],
        depth_range: 0.0..1.0,
    }
}
