use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Scroll", inline)]
#[serde(default)]
/// Smooth-scroll parameters.
pub struct ScrollOptions {
    /// Damping rate in lerp mode, scaled so one 60 Hz frame covers
    /// `1 - e^(-lerp)` of the remaining distance (about 0.095 for 0.1).
    /// Values outside `[0.01, 1]` are clamped. Ignored when `duration` is
    /// set.
    #[schemars(title = "Lerp", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub lerp: f32,
    /// Fixed tween duration in seconds. `None` selects lerp mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(title = "Duration")]
    pub duration: Option<f32>,
    /// Multiplier applied to wheel deltas.
    #[schemars(title = "Wheel Multiplier", range(min = 0.1, max = 5.0), extend("step" = 0.1))]
    pub wheel_multiplier: f32,
    /// Animate wheel input; when off the offset jumps to the target.
    #[schemars(title = "Smooth Wheel")]
    pub smooth_wheel: bool,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            lerp: 0.1,
            duration: None,
            wheel_multiplier: 1.0,
            smooth_wheel: true,
        }
    }
}
