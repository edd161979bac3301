//! Scroll drivers: sources of the per-frame scroll offset.
//!
//! The gallery only needs to read the current offset and to advance the
//! driver once per animation frame. [`SmoothScroll`] is the inertial
//! implementation used in the browser; anything else that can report an
//! offset (a fixed value in tests, the raw page scroll) can stand in.

mod smooth;

pub use smooth::SmoothScroll;

/// Direction of the most recent scroll movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollDirection {
    /// No movement yet, or the last frame did not move.
    #[default]
    Idle,
    /// Offset increased (content moves up).
    Down,
    /// Offset decreased (content moves down).
    Up,
}

/// A component producing a scroll offset over time.
pub trait ScrollDriver {
    /// Current offset in CSS pixels from the top of the document.
    fn scroll(&self) -> f32;

    /// Advance the driver to the given animation-frame timestamp (ms).
    fn raf(&mut self, timestamp_ms: f64);

    /// Maximum reachable offset (document height minus viewport height).
    fn set_limit(&mut self, limit: f32);

    /// Whether the offset is still animating toward a target.
    fn is_scrolling(&self) -> bool;
}

/// Driver that never moves unless told to; useful for headless runs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedScroll {
    /// The offset reported every frame.
    pub offset: f32,
}

impl ScrollDriver for FixedScroll {
    fn scroll(&self) -> f32 {
        self.offset
    }

    fn raf(&mut self, _timestamp_ms: f64) {}

    fn set_limit(&mut self, limit: f32) {
        self.offset = self.offset.clamp(0.0, limit.max(0.0));
    }

    fn is_scrolling(&self) -> bool {
        false
    }
}

/// Pixels per line for wheel events reported in lines.
const LINE_HEIGHT: f32 = 100.0 / 6.0;

/// Convert a wheel delta to CSS pixels. `delta_mode` follows the DOM
/// `WheelEvent.deltaMode` values: 0 pixels, 1 lines, 2 pages.
#[must_use]
pub fn normalize_wheel_delta(delta: f32, delta_mode: u32, page_height: f32) -> f32 {
    match delta_mode {
        1 => delta * LINE_HEIGHT,
        2 => delta * page_height,
        _ => delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_delta_modes() {
        assert_eq!(normalize_wheel_delta(120.0, 0, 900.0), 120.0);
        assert!((normalize_wheel_delta(3.0, 1, 900.0) - 50.0).abs() < 1e-4);
        assert_eq!(normalize_wheel_delta(-1.0, 2, 900.0), -900.0);
    }

    #[test]
    fn fixed_scroll_clamps_to_limit() {
        let mut scroll = FixedScroll { offset: 800.0 };
        scroll.raf(16.0);
        assert_eq!(scroll.scroll(), 800.0);
        scroll.set_limit(500.0);
        assert_eq!(scroll.scroll(), 500.0);
        assert!(!scroll.is_scrolling());
    }
}
