/// Fraction of the window's smaller dimension given to the drawing square.
pub const SURFACE_SCALE: f32 = 0.8;

/// An axis-aligned square region within the surface, in physical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportRect {
    pub x: f32,
    pub y: f32,
    pub side: f32,
}

impl ViewportRect {
    /// Width over height. The region is square, so this is constant; it is
    /// kept as a method so the projection code reads in terms of the region
    /// it projects into.
    pub fn aspect(&self) -> f32 {
        1.0
    }
}

/// Computes the centered aspect-locked drawing square for a window size.
///
/// The square's side is `min(width, height) * SURFACE_SCALE`, recomputed from
/// the current window size on every frame; shrinking the window shrinks the
/// square on the very next frame.
pub fn aspect_locked_viewport(width: u32, height: u32) -> ViewportRect {
    let side = (width.min(height) as f32) * SURFACE_SCALE;
    ViewportRect {
        x: (width as f32 - side) / 2.0,
        y: (height as f32 - side) / 2.0,
        side,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_window_centers_square() {
        let v = aspect_locked_viewport(1000, 1000);
        assert_eq!(v.side, 800.0);
        assert_eq!(v.x, 100.0);
        assert_eq!(v.y, 100.0);
    }

    #[test]
    fn wide_window_locks_to_height() {
        let v = aspect_locked_viewport(1920, 1080);
        assert_eq!(v.side, 1080.0 * SURFACE_SCALE);
        assert_eq!(v.y, (1080.0 - v.side) / 2.0);
        assert!(v.x > v.y);
    }

    #[test]
    fn tall_window_locks_to_width() {
        let v = aspect_locked_viewport(600, 1400);
        assert_eq!(v.side, 480.0);
        assert_eq!(v.x, 60.0);
    }

    #[test]
    fn zero_size_yields_zero_square() {
        let v = aspect_locked_viewport(0, 480);
        assert_eq!(v.side, 0.0);
        assert_eq!(v.aspect(), 1.0);
    }
}
