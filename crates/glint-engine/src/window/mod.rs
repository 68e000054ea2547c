//! Windowed host shell.
//!
//! Owns the event loop and the window, and translates the application's
//! scheduling directives into winit control flow.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
