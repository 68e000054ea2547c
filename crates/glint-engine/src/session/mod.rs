//! Render session controller.
//!
//! A session brackets one scene's life on one window surface: acquire the
//! graphics context, wait for the asynchronously built shader program,
//! allocate GPU objects, then run the per-frame loop until torn down.
//!
//! The sequencing itself lives in [`SessionDriver`], a pure state machine
//! that talks to the GPU only through the [`SessionHooks`] trait.
//! [`RenderSession`] pairs a driver with the wgpu-backed hook implementation
//! and plugs the whole thing into the window runtime as an [`crate::core::App`].

mod driver;
mod error;
mod objects;
mod scene;
mod session;
mod sizing;

pub use driver::{FrameDisposition, FrameInput, SessionDriver, SessionHooks, SessionPhase};
pub use error::SessionError;
pub use objects::GpuObjectSet;
pub use scene::{Scene, SceneCapabilities, SceneFrame, SceneGpu};
pub use session::RenderSession;
pub use sizing::{aspect_locked_viewport, ViewportRect, SURFACE_SCALE};
