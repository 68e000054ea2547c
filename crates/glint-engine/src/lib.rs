//! Glint engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the demo scenes:
//! the windowed host shell, the graphics context gateway, and the render
//! session controller that sequences async program construction, buffer
//! allocation and the per-frame draw loop.

pub mod core;
pub mod device;
pub mod mesh;
pub mod session;
pub mod shader;
pub mod texture;
pub mod time;
pub mod window;

pub mod logging;
