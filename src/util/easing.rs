//! Easing curves for timed scroll tweens.

/// Progress curve of a timed tween, mapping normalized time to normalized
/// distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EasingFunction {
    /// Constant speed.
    Linear,
    /// Quadratic ease-out (fast start, slow end).
    QuadraticOut,
    /// Cubic ease-in-out, symmetric around the midpoint.
    CubicInOut,
    /// Exponential ease-out, `min(1, 1.001 - 2^(-10t))`. Nearly all of the
    /// motion happens in the first third of the tween.
    ExpoOut,
}

impl EasingFunction {
    /// Default easing for timed scrolling.
    pub const DEFAULT: EasingFunction = EasingFunction::ExpoOut;

    /// Distance covered at time `t`, both in `[0, 1]`. `t` is clamped.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadraticOut => {
                let rest = 1.0 - t;
                1.0 - rest * rest
            }
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let rest = -2.0 * t + 2.0;
                    1.0 - rest * rest * rest / 2.0
                }
            }
            Self::ExpoOut => (1.001 - 2.0_f32.powf(-10.0 * t)).min(1.0),
        }
    }
}

impl Default for EasingFunction {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EasingFunction; 4] = [
        EasingFunction::Linear,
        EasingFunction::QuadraticOut,
        EasingFunction::CubicInOut,
        EasingFunction::ExpoOut,
    ];

    #[test]
    fn every_curve_ends_at_one() {
        for easing in ALL {
            assert_eq!(easing.evaluate(1.0), 1.0, "{easing:?}");
            assert!(easing.evaluate(0.0) < 0.01, "{easing:?}");
        }
    }

    #[test]
    fn every_curve_is_monotonic() {
        for easing in ALL {
            let mut previous = easing.evaluate(0.0);
            for step in 1..=100 {
                let value = easing.evaluate(step as f32 / 100.0);
                assert!(value >= previous, "{easing:?} at step {step}");
                previous = value;
            }
        }
    }

    #[test]
    fn time_outside_the_tween_is_clamped() {
        assert_eq!(EasingFunction::Linear.evaluate(-0.5), 0.0);
        assert_eq!(EasingFunction::CubicInOut.evaluate(1.5), 1.0);
    }

    #[test]
    fn expo_out_front_loads_the_motion() {
        let expo = EasingFunction::ExpoOut;
        assert!(expo.evaluate(0.3) > 0.8);
        assert_eq!(EasingFunction::QuadraticOut.evaluate(0.5), 0.75);
        assert_eq!(EasingFunction::CubicInOut.evaluate(0.5), 0.5);
    }

    #[test]
    fn default_is_expo_out() {
        assert_eq!(EasingFunction::default(), EasingFunction::ExpoOut);
    }
}
