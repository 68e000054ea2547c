use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,
}

/// Wall-clock delta source for the render loop.
///
/// One clock per session; the accumulated rotation angle downstream is the
/// plain sum of the deltas this clock hands out, so the clamps below bound
/// how far a single stalled frame can advance the animation.
#[derive(Debug, Clone)]
pub struct FrameClock {
    previous: Instant,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a clock with default delta clamps.
    ///
    /// The minimum guards against zero-length deltas from back-to-back
    /// redraws; the maximum keeps the animation sane after a debugger pause
    /// or a minimized window.
    pub fn new() -> Self {
        Self {
            previous: Instant::now(),
            dt_min: Duration::from_micros(100),
            dt_max: Duration::from_millis(250),
        }
    }

    /// Resets the baseline, e.g. after the session re-enters its loop.
    pub fn reset(&mut self) {
        self.previous = Instant::now();
    }

    /// Advances the clock and returns the clamped delta.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now
            .saturating_duration_since(self.previous)
            .clamp(self.dt_min, self.dt_max);

        self.previous = now;

        FrameTime {
            dt: dt.as_secs_f32(),
            now,
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dt_is_clamped_to_minimum() {
        let mut clock = FrameClock::new();
        // Two immediate ticks produce a delta below the minimum clamp.
        let ft = clock.tick();
        assert!(ft.dt >= 0.0001 - f32::EPSILON);
    }

    #[test]
    fn dt_never_exceeds_maximum() {
        let mut clock = FrameClock::new();
        clock.previous = Instant::now() - Duration::from_secs(10);
        let ft = clock.tick();
        assert!(ft.dt <= 0.25 + f32::EPSILON);
    }

    #[test]
    fn reset_rebases_the_delta() {
        let mut clock = FrameClock::new();
        clock.previous = Instant::now() - Duration::from_secs(10);
        clock.reset();
        let ft = clock.tick();
        assert!(ft.dt < 0.25);
    }
}
