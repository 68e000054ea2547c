//! Graphics context gateway.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue from a window
//! - creating & configuring the Surface (swapchain) and its depth buffer
//! - acquiring frames and providing encoders/views for rendering
//! - the bulk, presence-checked release of everything a session owns

mod gateway;
mod surface;

pub use gateway::{acquire_context, ContextFrame, ContextInit, SurfaceContext};
pub use surface::SurfaceErrorAction;
