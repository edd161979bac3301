//! Frame clock fed by animation-frame timestamps.

/// Frame clock driven by animation-frame timestamps, with a smoothed FPS
/// estimate.
///
/// Timestamps are milliseconds on a monotonic clock (what
/// `requestAnimationFrame` hands its callback).
#[derive(Debug, Clone)]
pub struct FrameTiming {
    /// Timestamp of the previous frame, if any.
    last_timestamp: Option<f64>,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
    frames: u64,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTiming {
    /// Create a frame clock that has not seen a frame yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_timestamp: None,
            smoothed_fps: 60.0, // Start with reasonable default
            smoothing: 0.05,    /* 5% new value, 95% old value for smooth
                                 * display */
            frames: 0,
        }
    }

    /// Record a frame at `timestamp_ms` and return the seconds elapsed since
    /// the previous one (0.0 on the first frame or if the clock went
    /// backwards).
    pub fn tick(&mut self, timestamp_ms: f64) -> f32 {
        let dt = self
            .last_timestamp
            .map_or(0.0, |last| ((timestamp_ms - last) / 1000.0).max(0.0))
            as f32;
        self.last_timestamp = Some(timestamp_ms);
        self.frames += 1;

        if dt > 0.0 {
            let instant_fps = 1.0 / dt;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
        dt
    }

    /// Get the current FPS (smoothed)
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Number of frames recorded so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_has_zero_delta() {
        let mut timing = FrameTiming::new();
        assert_eq!(timing.tick(1234.0), 0.0);
        assert_eq!(timing.frames(), 1);
    }

    #[test]
    fn delta_is_in_seconds() {
        let mut timing = FrameTiming::new();
        let _ = timing.tick(1000.0);
        let dt = timing.tick(1016.0);
        assert!((dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn backwards_clock_clamps_to_zero() {
        let mut timing = FrameTiming::new();
        let _ = timing.tick(500.0);
        assert_eq!(timing.tick(400.0), 0.0);
    }

    #[test]
    fn fps_converges_toward_frame_rate() {
        let mut timing = FrameTiming::new();
        let mut t = 0.0;
        for _ in 0..500 {
            let _ = timing.tick(t);
            t += 1000.0 / 30.0;
        }
        assert!((timing.fps() - 30.0).abs() < 0.5);
    }
}
