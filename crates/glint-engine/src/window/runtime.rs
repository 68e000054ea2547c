use std::sync::Arc;
use std::time::Instant;

use log::{error, info};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, Directive};
use crate::session::SessionError;
use crate::time::FrameClock;

/// Host window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Initial inner size in logical pixels.
    pub initial_size: (f64, f64),
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "glint".to_string(),
            initial_size: (900.0, 700.0),
        }
    }
}

/// Event-loop shell hosting one [`App`].
pub struct Runtime;

impl Runtime {
    /// Runs `app` until the window closes, the app halts, or a fatal session
    /// error lands.
    pub fn run<A: App>(config: RuntimeConfig, app: A) -> anyhow::Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut shell = Shell {
            config,
            app,
            window: None,
            clock: FrameClock::new(),
            poll_deadline: None,
            fatal: None,
        };
        event_loop.run_app(&mut shell)?;

        match shell.fatal {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

struct Shell<A> {
    config: RuntimeConfig,
    app: A,
    window: Option<Arc<Window>>,
    clock: FrameClock,
    poll_deadline: Option<Instant>,
    fatal: Option<SessionError>,
}

impl<A: App> Shell<A> {
    fn pump(&mut self, event_loop: &ActiveEventLoop, dt: f32) {
        match self.app.pump(dt) {
            Ok(Directive::RetryAfter(delay)) => {
                let deadline = Instant::now() + delay;
                self.poll_deadline = Some(deadline);
                event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
            }
            Ok(Directive::Redraw) => {
                self.poll_deadline = None;
                event_loop.set_control_flow(ControlFlow::Wait);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            Ok(Directive::Wait) => {
                self.poll_deadline = None;
                event_loop.set_control_flow(ControlFlow::Wait);
            }
            Ok(Directive::Halt) => {
                self.app.detach();
                event_loop.exit();
            }
            Err(err) => {
                error!("session failed: {err}");
                self.app.detach();
                self.fatal = Some(err);
                event_loop.exit();
            }
        }
    }
}

impl<A: App> ApplicationHandler for Shell<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.config.initial_size;
        let attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(width, height));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                error!("window creation failed: {err}");
                self.fatal = Some(SessionError::ContextUnavailable(err.to_string()));
                event_loop.exit();
                return;
            }
        };

        info!("window ready: {}", self.config.title);
        self.app.attach(Arc::clone(&window));
        self.window = Some(window);
        self.clock.reset();
        self.pump(event_loop, 0.0);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.app.detach();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.app.notify_resize(size);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                let dt = self.clock.tick().dt;
                self.pump(event_loop, dt);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(deadline) = self.poll_deadline else {
            return;
        };

        if Instant::now() >= deadline {
            self.poll_deadline = None;
            self.pump(event_loop, 0.0);
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
        }
    }
}
