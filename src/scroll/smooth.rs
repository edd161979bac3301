//! Inertial scroll driver.
//!
//! Input (wheel deltas, programmatic `scroll_to`) only moves a clamped
//! target; the animated offset chases that target once per frame, either
//! by frame-rate independent exponential damping (lerp mode) or by an eased
//! tween of fixed duration.

use super::{ScrollDirection, ScrollDriver};
use crate::{options::ScrollOptions, util::easing::EasingFunction};

/// Offsets closer than this to the target snap onto it.
const SNAP_DISTANCE: f32 = 0.5;

/// Accepted range of the lerp rate.
const LERP_RANGE: (f32, f32) = (0.01, 1.0);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Tween {
    Damped {
        lerp: f32,
    },
    Timed {
        from: f32,
        to: f32,
        elapsed: f32,
        duration: f32,
        easing: EasingFunction,
    },
}

/// Smoothed scroll offset over a `[0, limit]` range.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    options: ScrollOptions,
    easing: EasingFunction,
    animated: f32,
    target: f32,
    limit: f32,
    velocity: f32,
    direction: ScrollDirection,
    last_timestamp: Option<f64>,
    tween: Option<Tween>,
}

/// `lerp(x, y, 1 - e^(-lambda * dt))`: exponential approach that covers the
/// same fraction of the distance per second at any frame rate.
fn damp(current: f32, target: f32, lambda: f32, dt: f32) -> f32 {
    let t = 1.0 - (-lambda * dt).exp();
    current + (target - current) * t
}

impl SmoothScroll {
    /// Create a driver resting at offset 0 with an unbounded limit.
    #[must_use]
    pub fn new(mut options: ScrollOptions) -> Self {
        options.lerp = if options.lerp.is_finite() {
            options.lerp.clamp(LERP_RANGE.0, LERP_RANGE.1)
        } else {
            log::warn!("non-finite scroll lerp, using the default");
            ScrollOptions::default().lerp
        };
        Self {
            options,
            easing: EasingFunction::DEFAULT,
            animated: 0.0,
            target: 0.0,
            limit: f32::MAX,
            velocity: 0.0,
            direction: ScrollDirection::Idle,
            last_timestamp: None,
            tween: None,
        }
    }

    /// Use a different easing curve for timed tweens.
    #[must_use]
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// The offset currently being chased.
    #[must_use]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Offset change over the last frame.
    #[must_use]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Direction of the last frame's movement.
    #[must_use]
    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    /// The current upper bound of the offset.
    #[must_use]
    pub fn limit(&self) -> f32 {
        self.limit
    }

    /// Feed a wheel delta (positive = down).
    pub fn handle_wheel(&mut self, delta_y: f32) {
        let target = self.target + delta_y * self.options.wheel_multiplier;
        self.scroll_to(target, !self.options.smooth_wheel);
    }

    /// Move to `target`, clamped to `[0, limit]`. `immediate` skips the
    /// animation.
    pub fn scroll_to(&mut self, target: f32, immediate: bool) {
        let to = target.clamp(0.0, self.limit);
        self.target = to;

        if immediate {
            self.animated = to;
            self.velocity = 0.0;
            self.tween = None;
            return;
        }

        self.tween = match self.options.duration {
            Some(duration) if duration > 0.0 => Some(Tween::Timed {
                from: self.animated,
                to,
                elapsed: 0.0,
                duration,
                easing: self.easing,
            }),
            Some(_) => {
                self.animated = to;
                None
            }
            None => Some(Tween::Damped {
                lerp: self.options.lerp,
            }),
        };
    }

    /// Adopt an offset reported by the page (keyboard, scrollbar drag).
    /// Ignored while a tween is running, since the page is then following
    /// this driver rather than the other way around.
    pub fn sync_native(&mut self, offset: f32) {
        if self.tween.is_none() {
            let offset = offset.clamp(0.0, self.limit);
            self.animated = offset;
            self.target = offset;
        }
    }

    fn step(&mut self, dt: f32) {
        let Some(tween) = self.tween else {
            return;
        };

        match tween {
            Tween::Damped { lerp } => {
                self.animated = damp(self.animated, self.target, lerp * 60.0, dt);
                if (self.animated - self.target).abs() < SNAP_DISTANCE {
                    self.animated = self.target;
                    self.tween = None;
                }
            }
            Tween::Timed {
                from,
                to,
                elapsed,
                duration,
                easing,
            } => {
                let elapsed = elapsed + dt;
                let t = (elapsed / duration).min(1.0);
                self.animated = from + (to - from) * easing.evaluate(t);
                if t >= 1.0 {
                    self.animated = to;
                    self.tween = None;
                } else {
                    self.tween = Some(Tween::Timed {
                        from,
                        to,
                        elapsed,
                        duration,
                        easing,
                    });
                }
            }
        }
    }
}

impl ScrollDriver for SmoothScroll {
    fn scroll(&self) -> f32 {
        self.animated
    }

    fn raf(&mut self, timestamp_ms: f64) {
        let dt = self
            .last_timestamp
            .map_or(0.0, |last| ((timestamp_ms - last) / 1000.0).max(0.0))
            as f32;
        self.last_timestamp = Some(timestamp_ms);

        let previous = self.animated;
        self.step(dt);
        self.animated = self.animated.clamp(0.0, self.limit);
        self.velocity = self.animated - previous;
        self.direction = if self.velocity > 0.0 {
            ScrollDirection::Down
        } else if self.velocity < 0.0 {
            ScrollDirection::Up
        } else {
            ScrollDirection::Idle
        };
    }

    fn set_limit(&mut self, limit: f32) {
        self.limit = limit.max(0.0);
        self.target = self.target.min(self.limit);
        if self.tween.is_none() {
            self.animated = self.animated.min(self.limit);
        }
    }

    fn is_scrolling(&self) -> bool {
        self.tween.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn run_frames(scroll: &mut SmoothScroll, start: f64, frames: usize) -> f64 {
        let mut t = start;
        for _ in 0..frames {
            scroll.raf(t);
            t += FRAME_MS;
        }
        t
    }

    #[test]
    fn wheel_moves_target_not_offset() {
        let mut scroll = SmoothScroll::new(ScrollOptions::default());
        scroll.set_limit(5000.0);
        scroll.handle_wheel(120.0);
        assert_eq!(scroll.target(), 120.0);
        assert_eq!(scroll.scroll(), 0.0);
        assert!(scroll.is_scrolling());
    }

    #[test]
    fn damping_covers_lerp_fraction_per_60hz_frame() {
        let mut scroll = SmoothScroll::new(ScrollOptions::default());
        scroll.set_limit(5000.0);
        scroll.handle_wheel(1000.0);
        scroll.raf(0.0);
        assert_eq!(scroll.scroll(), 0.0);
        scroll.raf(FRAME_MS);
        // 1 - e^(-0.1 * 60 / 60) of the remaining distance
        let expected = 1000.0 * (1.0 - (-0.1_f32).exp());
        assert!((scroll.scroll() - expected).abs() < 0.01);
        assert_eq!(scroll.direction(), ScrollDirection::Down);
        assert!(scroll.velocity() > 0.0);
    }

    #[test]
    fn damping_settles_exactly_on_target() {
        let mut scroll = SmoothScroll::new(ScrollOptions::default());
        scroll.set_limit(5000.0);
        scroll.handle_wheel(400.0);
        let _ = run_frames(&mut scroll, 0.0, 240);
        assert_eq!(scroll.scroll(), 400.0);
        assert!(!scroll.is_scrolling());
        assert_eq!(scroll.direction(), ScrollDirection::Idle);
    }

    #[test]
    fn damping_is_frame_rate_independent() {
        let mut at_60 = SmoothScroll::new(ScrollOptions::default());
        let mut at_30 = SmoothScroll::new(ScrollOptions::default());
        for scroll in [&mut at_60, &mut at_30] {
            scroll.set_limit(10_000.0);
            scroll.handle_wheel(2000.0);
            scroll.raf(0.0);
        }
        at_60.raf(FRAME_MS);
        at_60.raf(2.0 * FRAME_MS);
        at_30.raf(2.0 * FRAME_MS);
        assert!((at_60.scroll() - at_30.scroll()).abs() < 0.05);
    }

    #[test]
    fn target_is_clamped_to_limit() {
        let mut scroll = SmoothScroll::new(ScrollOptions::default());
        scroll.set_limit(300.0);
        scroll.handle_wheel(1000.0);
        assert_eq!(scroll.target(), 300.0);
        scroll.handle_wheel(-5000.0);
        assert_eq!(scroll.target(), 0.0);
    }

    #[test]
    fn shrinking_limit_pulls_offset_back() {
        let mut scroll = SmoothScroll::new(ScrollOptions::default());
        scroll.set_limit(1000.0);
        scroll.scroll_to(800.0, true);
        scroll.set_limit(500.0);
        assert_eq!(scroll.scroll(), 500.0);
        assert_eq!(scroll.target(), 500.0);
    }

    #[test]
    fn immediate_wheel_when_smoothing_disabled() {
        let mut scroll = SmoothScroll::new(ScrollOptions {
            smooth_wheel: false,
            wheel_multiplier: 2.0,
            ..ScrollOptions::default()
        });
        scroll.set_limit(5000.0);
        scroll.handle_wheel(100.0);
        assert_eq!(scroll.scroll(), 200.0);
        assert!(!scroll.is_scrolling());
    }

    #[test]
    fn timed_tween_reaches_target_after_duration() {
        let mut scroll = SmoothScroll::new(ScrollOptions {
            duration: Some(0.5),
            ..ScrollOptions::default()
        })
        .with_easing(EasingFunction::Linear);
        scroll.set_limit(5000.0);
        scroll.scroll_to(600.0, false);

        scroll.raf(0.0);
        scroll.raf(250.0);
        assert!((scroll.scroll() - 300.0).abs() < 0.01);
        scroll.raf(500.0);
        assert_eq!(scroll.scroll(), 600.0);
        assert!(!scroll.is_scrolling());
    }

    #[test]
    fn out_of_range_lerp_still_settles_inside_the_limit() {
        for lerp in [0.0, -0.1, 7.5, f32::NAN] {
            let mut scroll = SmoothScroll::new(ScrollOptions {
                lerp,
                ..ScrollOptions::default()
            });
            scroll.set_limit(1000.0);
            scroll.handle_wheel(300.0);
            let mut t = 0.0;
            for _ in 0..900 {
                scroll.raf(t);
                assert!((0.0..=1000.0).contains(&scroll.scroll()), "lerp {lerp}");
                t += FRAME_MS;
            }
            assert_eq!(scroll.scroll(), 300.0, "lerp {lerp}");
            assert!(!scroll.is_scrolling(), "lerp {lerp}");
        }
    }

    #[test]
    fn offset_stays_within_limit_when_it_shrinks_mid_tween() {
        let mut scroll = SmoothScroll::new(ScrollOptions {
            duration: Some(1.0),
            ..ScrollOptions::default()
        });
        scroll.set_limit(2000.0);
        scroll.scroll_to(1800.0, false);
        scroll.raf(0.0);
        scroll.raf(500.0);
        scroll.set_limit(100.0);
        scroll.raf(600.0);
        assert!(scroll.scroll() <= 100.0);
    }

    #[test]
    fn native_scroll_is_adopted_only_when_idle() {
        let mut scroll = SmoothScroll::new(ScrollOptions::default());
        scroll.set_limit(5000.0);
        scroll.sync_native(320.0);
        assert_eq!(scroll.scroll(), 320.0);

        scroll.handle_wheel(100.0);
        scroll.sync_native(0.0);
        assert_eq!(scroll.target(), 420.0);
        assert_eq!(scroll.scroll(), 320.0);
    }
}
