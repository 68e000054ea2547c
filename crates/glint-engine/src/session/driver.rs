use std::time::Duration;

use crate::core::Directive;

use super::error::SessionError;

/// Delay between readiness polls while the program builds in the background.
const POLL_DELAY: Duration = Duration::from_millis(3);

/// Lifecycle phase of one render session.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SessionPhase {
    /// No context acquired yet.
    Idle,
    /// Context acquired, program building in the background.
    Building,
    /// Program linked and buffers allocated; first frame not yet drawn.
    Ready,
    /// Frame loop active.
    Running,
    /// Resources released; the session is inert.
    TornDown,
}

/// Per-frame values the driver hands to the draw hook.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameInput {
    /// Frame delta in seconds.
    pub dt: f32,
    /// Running sum of frame deltas since the session started drawing.
    pub rotation_angle: f32,
}

/// What the scene did with the frame, deciding whether another is scheduled.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameDisposition {
    /// Continuous animation; request the next frame.
    Animated,
    /// Drawn once; wait for an external trigger.
    Static,
}

/// GPU-facing operations the driver sequences.
///
/// The driver never touches wgpu itself; everything effectful goes through
/// this trait so the sequencing can be exercised without a device.
pub trait SessionHooks {
    /// Whether a drawing surface currently exists.
    fn surface_attached(&self) -> bool;

    /// Acquire the graphics context and kick off asynchronous program
    /// construction. Called at most once per session.
    fn build_program_and_context(&mut self) -> Result<(), SessionError>;

    /// Level-triggered: true once the program is usable. A failed build
    /// leaves this false forever.
    fn program_ready(&self) -> bool;

    /// Allocate every GPU object the scene draws with. Called exactly once,
    /// after the first true readiness poll.
    fn allocate_buffers(&mut self) -> Result<(), SessionError>;

    /// Apply the current window size to the surface. Runs unconditionally at
    /// the top of every frame.
    fn resize_surface(&mut self);

    /// Acquire the frame and clear color + depth. `Ok(false)` means the frame
    /// could not be acquired this time and should be skipped.
    fn clear_frame(&mut self) -> Result<bool, SessionError>;

    /// Set the viewport/scissor to the aspect-locked drawing square.
    fn set_viewport(&mut self);

    /// Record and submit the draw.
    fn draw_frame(&mut self, input: FrameInput) -> Result<FrameDisposition, SessionError>;

    /// Release everything the session owns. Presence-checked internally, so
    /// it is safe at any phase and safe to repeat.
    fn release_resources(&mut self);
}

/// Pure sequencing core of a render session.
///
/// Each [`advance`](Self::advance) call performs at most one step of the
/// lifecycle and returns a [`Directive`] telling the host when to call back.
pub struct SessionDriver {
    phase: SessionPhase,
    initialization_started: bool,
    rotation_angle: f32,
}

impl SessionDriver {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            initialization_started: false,
            rotation_angle: 0.0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Drives one step. `dt` is the frame delta in seconds; poll ticks pass
    /// zero and frame ticks pass the clock's measurement.
    pub fn advance<H: SessionHooks>(
        &mut self,
        hooks: &mut H,
        dt: f32,
    ) -> Result<Directive, SessionError> {
        match self.phase {
            SessionPhase::TornDown => Ok(Directive::Wait),

            SessionPhase::Idle => {
                if !hooks.surface_attached() {
                    return Ok(Directive::RetryAfter(POLL_DELAY));
                }
                if !self.initialization_started {
                    self.initialization_started = true;
                    hooks.build_program_and_context()?;
                    self.phase = SessionPhase::Building;
                }
                Ok(Directive::RetryAfter(POLL_DELAY))
            }

            SessionPhase::Building => {
                if hooks.program_ready() {
                    hooks.allocate_buffers()?;
                    self.phase = SessionPhase::Ready;
                    Ok(Directive::Redraw)
                } else {
                    // A failed build never reports ready, so the session
                    // stalls here. The failure itself is logged where it
                    // happens; the stall is the diagnosable symptom.
                    Ok(Directive::RetryAfter(POLL_DELAY))
                }
            }

            SessionPhase::Ready | SessionPhase::Running => self.frame(hooks, dt),
        }
    }

    fn frame<H: SessionHooks>(
        &mut self,
        hooks: &mut H,
        dt: f32,
    ) -> Result<Directive, SessionError> {
        hooks.resize_surface();

        if !hooks.clear_frame()? {
            return Ok(Directive::Redraw);
        }
        hooks.set_viewport();

        self.rotation_angle += dt;
        let disposition = hooks.draw_frame(FrameInput {
            dt,
            rotation_angle: self.rotation_angle,
        })?;
        self.phase = SessionPhase::Running;

        Ok(match disposition {
            FrameDisposition::Animated => Directive::Redraw,
            FrameDisposition::Static => Directive::Wait,
        })
    }

    /// Tears the session down. Idempotent: the first call releases resources,
    /// later calls are no-ops. Valid at any phase, including before the
    /// session ever started.
    pub fn stop<H: SessionHooks>(&mut self, hooks: &mut H) {
        if self.phase == SessionPhase::TornDown {
            return;
        }
        hooks.release_resources();
        self.phase = SessionPhase::TornDown;
    }
}

impl Default for SessionDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Copy, Clone, Eq, PartialEq)]
    enum Call {
        Build,
        Allocate,
        Resize,
        Clear,
        Viewport,
        Draw,
        Release,
    }

    struct RecordingHooks {
        calls: Vec<Call>,
        draws: Vec<FrameInput>,
        surface: bool,
        ready: bool,
        build_result: Option<SessionError>,
        clear_acquires: bool,
        disposition: FrameDisposition,
    }

    impl RecordingHooks {
        fn new() -> Self {
            Self {
                calls: Vec::new(),
                draws: Vec::new(),
                surface: true,
                ready: true,
                build_result: None,
                clear_acquires: true,
                disposition: FrameDisposition::Animated,
            }
        }

        fn count(&self, call: Call) -> usize {
            self.calls.iter().filter(|c| **c == call).count()
        }
    }

    impl SessionHooks for RecordingHooks {
        fn surface_attached(&self) -> bool {
            self.surface
        }

        fn build_program_and_context(&mut self) -> Result<(), SessionError> {
            self.calls.push(Call::Build);
            match self.build_result.take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        fn program_ready(&self) -> bool {
            self.ready
        }

        fn allocate_buffers(&mut self) -> Result<(), SessionError> {
            self.calls.push(Call::Allocate);
            Ok(())
        }

        fn resize_surface(&mut self) {
            self.calls.push(Call::Resize);
        }

        fn clear_frame(&mut self) -> Result<bool, SessionError> {
            self.calls.push(Call::Clear);
            Ok(self.clear_acquires)
        }

        fn set_viewport(&mut self) {
            self.calls.push(Call::Viewport);
        }

        fn draw_frame(&mut self, input: FrameInput) -> Result<FrameDisposition, SessionError> {
            self.calls.push(Call::Draw);
            self.draws.push(input);
            Ok(self.disposition)
        }

        fn release_resources(&mut self) {
            self.calls.push(Call::Release);
        }
    }

    /// Runs the driver until it first asks for a redraw (startup complete).
    fn start(driver: &mut SessionDriver, hooks: &mut RecordingHooks) {
        for _ in 0..16 {
            if driver.advance(hooks, 0.0).unwrap() == Directive::Redraw {
                return;
            }
        }
        panic!("session never became ready");
    }

    // ── startup ───────────────────────────────────────────────────────────

    #[test]
    fn waits_for_surface_before_building() {
        let mut driver = SessionDriver::new();
        let mut hooks = RecordingHooks::new();
        hooks.surface = false;

        for _ in 0..5 {
            let d = driver.advance(&mut hooks, 0.0).unwrap();
            assert_eq!(d, Directive::RetryAfter(POLL_DELAY));
        }
        assert_eq!(hooks.count(Call::Build), 0);
        assert_eq!(driver.phase(), SessionPhase::Idle);

        hooks.surface = true;
        driver.advance(&mut hooks, 0.0).unwrap();
        assert_eq!(hooks.count(Call::Build), 1);
        assert_eq!(driver.phase(), SessionPhase::Building);
    }

    #[test]
    fn builds_and_allocates_exactly_once() {
        let mut driver = SessionDriver::new();
        let mut hooks = RecordingHooks::new();

        start(&mut driver, &mut hooks);
        for _ in 0..4 {
            driver.advance(&mut hooks, 0.016).unwrap();
        }

        assert_eq!(hooks.count(Call::Build), 1);
        assert_eq!(hooks.count(Call::Allocate), 1);
        assert_eq!(hooks.count(Call::Draw), 4);
        assert_eq!(driver.phase(), SessionPhase::Running);
    }

    #[test]
    fn polls_while_program_builds() {
        let mut driver = SessionDriver::new();
        let mut hooks = RecordingHooks::new();
        hooks.ready = false;

        driver.advance(&mut hooks, 0.0).unwrap();
        for _ in 0..3 {
            let d = driver.advance(&mut hooks, 0.0).unwrap();
            assert_eq!(d, Directive::RetryAfter(POLL_DELAY));
        }
        assert_eq!(hooks.count(Call::Allocate), 0);

        hooks.ready = true;
        let d = driver.advance(&mut hooks, 0.0).unwrap();
        assert_eq!(d, Directive::Redraw);
        assert_eq!(hooks.count(Call::Allocate), 1);
    }

    #[test]
    fn failed_build_stalls_without_drawing() {
        let mut driver = SessionDriver::new();
        let mut hooks = RecordingHooks::new();
        // A failed background build simply never reports ready.
        hooks.ready = false;

        for _ in 0..10 {
            let d = driver.advance(&mut hooks, 0.0).unwrap();
            assert_eq!(d, Directive::RetryAfter(POLL_DELAY));
        }

        assert_eq!(driver.phase(), SessionPhase::Building);
        assert_eq!(hooks.count(Call::Build), 1);
        assert_eq!(hooks.count(Call::Draw), 0);
    }

    #[test]
    fn context_failure_propagates() {
        let mut driver = SessionDriver::new();
        let mut hooks = RecordingHooks::new();
        hooks.build_result = Some(SessionError::ContextUnavailable("no adapter".into()));

        let err = driver.advance(&mut hooks, 0.0).unwrap_err();
        assert!(matches!(err, SessionError::ContextUnavailable(_)));
    }

    // ── frame loop ────────────────────────────────────────────────────────

    #[test]
    fn frame_steps_run_in_order() {
        let mut driver = SessionDriver::new();
        let mut hooks = RecordingHooks::new();

        start(&mut driver, &mut hooks);
        for _ in 0..3 {
            driver.advance(&mut hooks, 0.016).unwrap();
        }

        // Every draw is preceded by resize, clear, viewport in that order.
        for (i, call) in hooks.calls.iter().enumerate() {
            if *call == Call::Draw {
                assert_eq!(hooks.calls[i - 3..i], [Call::Resize, Call::Clear, Call::Viewport]);
            }
        }
        assert_eq!(hooks.count(Call::Draw), 3);
    }

    #[test]
    fn rotation_accumulates_frame_deltas() {
        let mut driver = SessionDriver::new();
        let mut hooks = RecordingHooks::new();

        start(&mut driver, &mut hooks);
        for dt in [0.1, 0.2, 0.3] {
            driver.advance(&mut hooks, dt).unwrap();
        }

        let angles: Vec<f32> = hooks.draws.iter().map(|d| d.rotation_angle).collect();
        assert!((angles[0] - 0.1).abs() < 1e-6);
        assert!((angles[1] - 0.3).abs() < 1e-6);
        assert!((angles[2] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn skipped_frame_retries_without_drawing() {
        let mut driver = SessionDriver::new();
        let mut hooks = RecordingHooks::new();

        start(&mut driver, &mut hooks);
        hooks.clear_acquires = false;
        let d = driver.advance(&mut hooks, 0.016).unwrap();

        assert_eq!(d, Directive::Redraw);
        assert_eq!(hooks.count(Call::Viewport), 0);
        assert_eq!(hooks.count(Call::Draw), 0);

        hooks.clear_acquires = true;
        driver.advance(&mut hooks, 0.016).unwrap();
        assert_eq!(hooks.count(Call::Draw), 1);
    }

    #[test]
    fn static_scene_draws_once_then_waits() {
        let mut driver = SessionDriver::new();
        let mut hooks = RecordingHooks::new();
        hooks.disposition = FrameDisposition::Static;

        start(&mut driver, &mut hooks);
        let d = driver.advance(&mut hooks, 0.016).unwrap();
        assert_eq!(d, Directive::Wait);
        assert_eq!(driver.phase(), SessionPhase::Running);
    }

    // ── teardown ──────────────────────────────────────────────────────────

    #[test]
    fn stop_releases_and_parks_the_session() {
        let mut driver = SessionDriver::new();
        let mut hooks = RecordingHooks::new();

        start(&mut driver, &mut hooks);
        driver.advance(&mut hooks, 0.016).unwrap();
        driver.stop(&mut hooks);

        assert_eq!(hooks.count(Call::Release), 1);
        assert_eq!(driver.phase(), SessionPhase::TornDown);

        // A frame already scheduled when stop landed is tolerated: it runs
        // against the torn-down session and does nothing.
        let calls_before = hooks.calls.len();
        let d = driver.advance(&mut hooks, 0.016).unwrap();
        assert_eq!(d, Directive::Wait);
        assert_eq!(hooks.calls.len(), calls_before);
    }

    #[test]
    fn stop_before_start_is_safe() {
        let mut driver = SessionDriver::new();
        let mut hooks = RecordingHooks::new();

        driver.stop(&mut hooks);
        assert_eq!(hooks.count(Call::Release), 1);
        assert_eq!(driver.phase(), SessionPhase::TornDown);
    }

    #[test]
    fn stop_twice_releases_once() {
        let mut driver = SessionDriver::new();
        let mut hooks = RecordingHooks::new();

        start(&mut driver, &mut hooks);
        driver.stop(&mut hooks);
        driver.stop(&mut hooks);
        assert_eq!(hooks.count(Call::Release), 1);
    }
}
