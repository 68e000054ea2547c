use std::sync::Arc;
use std::time::Duration;

use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::session::SessionError;

/// Scheduling request returned by one application pump step.
///
/// The window runtime maps each variant onto winit control flow: `RetryAfter`
/// becomes a wait-until deadline (the short startup/readiness poll), `Redraw`
/// requests the next frame callback, `Wait` parks the loop until an external
/// event, and `Halt` ends the loop.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Directive {
    RetryAfter(Duration),
    Redraw,
    Wait,
    Halt,
}

/// Application contract implemented by higher layers.
///
/// The four methods are the host lifecycle the render session depends on:
/// attach/detach bracket one session, `pump` is the per-tick scheduling
/// primitive, and `notify_resize` is the single render-affecting resize
/// notification.
pub trait App {
    /// Called once the host has a live drawing surface.
    fn attach(&mut self, window: Arc<Window>);

    /// Called when the surface goes away. Must be idempotent.
    fn detach(&mut self);

    /// Drives one cooperative step. `dt` is the frame delta in seconds
    /// (zero for non-frame poll ticks).
    fn pump(&mut self, dt: f32) -> Result<Directive, SessionError>;

    /// Surface size changed. The next pumped frame picks up the new size.
    fn notify_resize(&mut self, size: PhysicalSize<u32>);
}
