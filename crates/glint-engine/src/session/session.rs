use std::sync::Arc;

use glam::Mat4;
use log::warn;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::core::{App, Directive};
use crate::device::{
    acquire_context, ContextFrame, ContextInit, SurfaceContext, SurfaceErrorAction,
};

use super::driver::{FrameDisposition, FrameInput, SessionDriver, SessionHooks, SessionPhase};
use super::error::SessionError;
use super::objects::GpuObjectSet;
use super::scene::{Scene, SceneFrame, SceneGpu};
use super::sizing::aspect_locked_viewport;

const FOV_Y_RADIANS: f32 = 45.0 * (std::f32::consts::PI / 180.0);
const Z_NEAR: f32 = 1.0;
const Z_FAR: f32 = 100.0;

/// A frame between clear and submit. The pass has its lifetime erased so it
/// can live beside the encoder it records into.
struct ActiveFrame {
    surface_texture: wgpu::SurfaceTexture,
    encoder: wgpu::CommandEncoder,
    pass: Option<wgpu::RenderPass<'static>>,
}

/// wgpu-backed hook implementation: owns the context, the scene and the GPU
/// object set, and carries frame state between the driver's hook calls.
struct SessionBody<S> {
    scene: S,
    init: ContextInit,
    window: Option<Arc<Window>>,
    ctx: Option<SurfaceContext>,
    objects: GpuObjectSet,
    pending_size: Option<PhysicalSize<u32>>,
    active: Option<ActiveFrame>,
}

impl<S: Scene> SessionBody<S> {
    fn gpu<'a>(ctx: &'a SurfaceContext) -> SceneGpu<'a> {
        SceneGpu {
            device: ctx.device(),
            queue: ctx.queue(),
            surface_format: ctx.surface_format(),
            depth_format: ctx.depth_format(),
        }
    }

    fn disposition(&self) -> FrameDisposition {
        if self.scene.capabilities().animated {
            FrameDisposition::Animated
        } else {
            FrameDisposition::Static
        }
    }
}

impl<S: Scene> SessionHooks for SessionBody<S> {
    fn surface_attached(&self) -> bool {
        self.window.is_some()
    }

    fn build_program_and_context(&mut self) -> Result<(), SessionError> {
        let Some(window) = self.window.clone() else {
            return Err(SessionError::ContextUnavailable("no window attached".into()));
        };

        let ctx = acquire_context(window, self.init.clone())?;
        self.scene.begin_build(&Self::gpu(&ctx))?;
        self.ctx = Some(ctx);
        Ok(())
    }

    fn program_ready(&self) -> bool {
        self.scene.program_ready()
    }

    fn allocate_buffers(&mut self) -> Result<(), SessionError> {
        let Some(ctx) = self.ctx.as_ref() else {
            return Err(SessionError::ContextUnavailable("context lost before allocation".into()));
        };
        let gpu = Self::gpu(ctx);
        self.scene.allocate(&gpu, &mut self.objects)
    }

    fn resize_surface(&mut self) {
        let (Some(ctx), Some(size)) = (self.ctx.as_mut(), self.pending_size.take()) else {
            return;
        };
        ctx.resize(size);
    }

    fn clear_frame(&mut self) -> Result<bool, SessionError> {
        let Some(ctx) = self.ctx.as_mut() else {
            return Ok(false);
        };

        let frame = match ctx.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                return match ctx.handle_surface_error(err) {
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => Ok(false),
                    SurfaceErrorAction::Fatal => Err(SessionError::ContextUnavailable(
                        "surface ran out of memory".into(),
                    )),
                };
            }
        };

        let ContextFrame {
            surface_texture,
            view,
            mut encoder,
        } = frame;

        let pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: ctx.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            })
            .forget_lifetime();

        self.active = Some(ActiveFrame {
            surface_texture,
            encoder,
            pass: Some(pass),
        });
        Ok(true)
    }

    fn set_viewport(&mut self) {
        let (Some(ctx), Some(active)) = (self.ctx.as_ref(), self.active.as_mut()) else {
            return;
        };
        let Some(pass) = active.pass.as_mut() else {
            return;
        };

        let size = ctx.size();
        let v = aspect_locked_viewport(size.width, size.height);
        if v.side < 1.0 {
            return;
        }
        pass.set_viewport(v.x, v.y, v.side, v.side, 0.0, 1.0);
        pass.set_scissor_rect(v.x as u32, v.y as u32, v.side as u32, v.side as u32);
    }

    fn draw_frame(&mut self, input: FrameInput) -> Result<FrameDisposition, SessionError> {
        let disposition = self.disposition();
        let (Some(ctx), Some(mut active)) = (self.ctx.as_ref(), self.active.take()) else {
            warn!("draw requested with no frame in flight");
            return Ok(disposition);
        };
        let Some(mut pass) = active.pass.take() else {
            return Ok(disposition);
        };

        let size = ctx.size();
        let viewport = aspect_locked_viewport(size.width, size.height);
        let frame = SceneFrame {
            viewport,
            projection: Mat4::perspective_rh(FOV_Y_RADIANS, viewport.aspect(), Z_NEAR, Z_FAR),
            rotation_angle: input.rotation_angle,
            dt: input.dt,
        };

        let gpu = Self::gpu(ctx);
        self.scene.draw(&gpu, &mut self.objects, &mut pass, &frame)?;

        drop(pass);
        ctx.submit(active.encoder, active.surface_texture);
        Ok(disposition)
    }

    fn release_resources(&mut self) {
        // Abandon any half-recorded frame without submitting it.
        self.active = None;

        if let Some(ctx) = self.ctx.as_mut() {
            ctx.release_all(&mut self.objects);
        }
    }
}

/// One scene running on one window: a [`SessionDriver`] paired with the
/// wgpu-backed body, exposed to the window runtime as an [`App`].
pub struct RenderSession<S> {
    driver: SessionDriver,
    body: SessionBody<S>,
}

impl<S: Scene> RenderSession<S> {
    pub fn new(scene: S) -> Self {
        Self::with_init(scene, ContextInit::default())
    }

    pub fn with_init(scene: S, init: ContextInit) -> Self {
        Self {
            driver: SessionDriver::new(),
            body: SessionBody {
                scene,
                init,
                window: None,
                ctx: None,
                objects: GpuObjectSet::default(),
                pending_size: None,
                active: None,
            },
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.driver.phase()
    }
}

impl<S: Scene> App for RenderSession<S> {
    fn attach(&mut self, window: Arc<Window>) {
        self.body.window = Some(window);
    }

    fn detach(&mut self) {
        self.driver.stop(&mut self.body);
        self.body.window = None;
    }

    fn pump(&mut self, dt: f32) -> Result<Directive, SessionError> {
        self.driver.advance(&mut self.body, dt)
    }

    fn notify_resize(&mut self, size: PhysicalSize<u32>) {
        self.body.pending_size = Some(size);
    }
}
