use glam::Mat4;

use super::error::SessionError;
use super::objects::GpuObjectSet;
use super::sizing::ViewportRect;

/// What a scene does with the frame loop.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SceneCapabilities {
    /// Animated scenes want continuous frames; static scenes draw once and
    /// then wait for external events (resize, expose).
    pub animated: bool,

    /// Whether the scene samples a texture. Purely informational; the scene
    /// itself owns its bind group layout.
    pub textured: bool,
}

/// Borrowed handles a scene needs to create and use GPU objects.
pub struct SceneGpu<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub depth_format: wgpu::TextureFormat,
}

/// Per-frame values handed to [`Scene::draw`].
pub struct SceneFrame {
    /// Drawing square the viewport/scissor are already set to.
    pub viewport: ViewportRect,

    /// Perspective projection for the drawing square.
    pub projection: Mat4,

    /// Accumulated animation angle in radians (running sum of frame deltas).
    pub rotation_angle: f32,

    /// This frame's delta in seconds.
    pub dt: f32,
}

/// One renderable demo scene.
///
/// The session drives the lifecycle: `begin_build` once, `program_ready`
/// polled, `allocate` once after readiness, then `draw` per frame. Scenes
/// without a shader program of their own report ready immediately.
pub trait Scene {
    fn capabilities(&self) -> SceneCapabilities;

    /// Kick off asynchronous program construction (and any texture loads).
    /// Called exactly once per session.
    fn begin_build(&mut self, gpu: &SceneGpu<'_>) -> Result<(), SessionError>;

    /// Level-triggered readiness: true once the program (if any) is linked
    /// and usable. Stays false forever if the build failed.
    fn program_ready(&self) -> bool;

    /// Create buffers, bind groups and the pipeline into `objects`. Called
    /// exactly once, after `program_ready` first reports true.
    fn allocate(
        &mut self,
        gpu: &SceneGpu<'_>,
        objects: &mut GpuObjectSet,
    ) -> Result<(), SessionError>;

    /// Record this frame's draw into an already-cleared pass whose viewport
    /// and scissor cover `frame.viewport`.
    fn draw(
        &mut self,
        gpu: &SceneGpu<'_>,
        objects: &mut GpuObjectSet,
        pass: &mut wgpu::RenderPass<'_>,
        frame: &SceneFrame,
    ) -> Result<(), SessionError>;
}
