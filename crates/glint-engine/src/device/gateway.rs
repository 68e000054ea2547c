use std::sync::Arc;

use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::session::{GpuObjectSet, SessionError};

use super::surface::{self, SurfaceErrorAction, DEPTH_FORMAT};

/// Initialization parameters for the graphics context.
///
/// Keep this structure stable and minimal. Add configuration flags only when
/// a concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct ContextInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior). FIFO is broadly supported and paces the
    /// render loop to the display refresh.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference; a supported mode is selected if the
    /// requested one is unavailable.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features. Favor an empty set for portability.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency hint for the surface.
    pub desired_maximum_frame_latency: u32,
}

impl Default for ContextInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

/// The acquired GPU drawing connection bound to one window surface.
///
/// Owns Instance/Adapter/Device/Queue, the configured surface and the depth
/// attachment. Exactly one context exists per session and it is never shared
/// across sessions.
pub struct SurfaceContext {
    instance: wgpu::Instance,
    surface: wgpu::Surface<'static>,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    depth: (wgpu::Texture, wgpu::TextureView),
}

/// Represents a single acquired frame.
///
/// Short-lived; holding the surface texture prevents acquisition of
/// subsequent frames.
pub struct ContextFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// Acquires a GPU context for `window`, blocking on the async adapter/device
/// handshake.
///
/// Failure means the environment cannot produce a context at all
/// ([`SessionError::ContextUnavailable`]); the caller should not retry.
pub fn acquire_context(
    window: Arc<Window>,
    init: ContextInit,
) -> Result<SurfaceContext, SessionError> {
    pollster::block_on(SurfaceContext::new(window, init))
}

impl SurfaceContext {
    async fn new(window: Arc<Window>, init: ContextInit) -> Result<Self, SessionError> {
        let size = window.inner_size();

        let ContextInit {
            prefer_srgb,
            present_mode,
            alpha_mode,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // The surface takes an owned window handle, so it carries no borrow
        // of the runtime's window storage.
        let surface = instance
            .create_surface(window)
            .map_err(|e| SessionError::ContextUnavailable(format!("surface creation: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| SessionError::ContextUnavailable(format!("no suitable adapter: {e}")))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("glint-engine device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| SessionError::ContextUnavailable(format!("device request: {e}")))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&surface_caps, prefer_srgb)
            .ok_or_else(|| SessionError::ContextUnavailable("no supported surface formats".into()))?;

        let alpha_mode = surface::choose_alpha_mode(&surface_caps, alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);
        let depth = surface::create_depth_view(&device, config.width, config.height);

        Ok(Self {
            instance,
            surface,
            adapter,
            device,
            queue,
            config,
            size,
            depth,
        })
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn depth_format(&self) -> wgpu::TextureFormat {
        DEPTH_FORMAT
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth.1
    }

    /// Reconfigures the surface (and depth attachment) for a new size.
    ///
    /// wgpu cannot configure a 0x0 surface; in that case only internal state
    /// is updated and configuration is deferred to the next non-empty size.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size == self.size {
            return;
        }

        self.size = new_size;
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth = surface::create_depth_view(&self.device, new_size.width, new_size.height);
    }

    /// Acquires the next surface texture and creates an encoder.
    pub fn begin_frame(&self) -> Result<ContextFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("glint frame encoder"),
            });

        Ok(ContextFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands and presents the frame.
    pub fn submit(&self, encoder: wgpu::CommandEncoder, surface_texture: wgpu::SurfaceTexture) {
        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    /// Converts a `SurfaceError` into a higher-level action.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        surface::map_surface_error(&self.surface, &self.device, &self.config, self.size, err)
    }

    /// Releases every GPU object a session may own.
    ///
    /// The binding objects (bind group, pipeline) are cleared unconditionally,
    /// independent of which ones this session actually populated; buffers and
    /// the texture are destroyed only if present. Finally the surface is reset
    /// to a minimal 1x1 configuration. Safe to call with any subset of the
    /// object set absent, and safe to call repeatedly.
    pub fn release_all(&mut self, objects: &mut GpuObjectSet) {
        objects.bind_group = None;
        objects.pipeline = None;
        objects.index_count = 0;

        if let Some(buffer) = objects.vertex_buffer.take() {
            buffer.destroy();
        }
        if let Some(buffer) = objects.index_buffer.take() {
            buffer.destroy();
        }
        if let Some(buffer) = objects.uniform_buffer.take() {
            buffer.destroy();
        }
        if let Some(texture) = objects.texture.take() {
            texture.destroy();
        }

        self.config.width = 1;
        self.config.height = 1;
        self.size = PhysicalSize::new(1, 1);
        self.surface.configure(&self.device, &self.config);
        self.depth = surface::create_depth_view(&self.device, 1, 1);
    }
}
