use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Renderer", inline)]
#[serde(default)]
/// Output surface parameters.
pub struct RendererOptions {
    /// Multisample the plane edges (4x MSAA).
    #[schemars(title = "Antialias")]
    pub antialias: bool,
    /// Composite the canvas over the page (transparent clear color).
    #[schemars(title = "Transparent Canvas")]
    pub alpha: bool,
    /// Upper bound on the device pixel ratio used for the drawing buffer.
    #[schemars(title = "Max Pixel Ratio", range(min = 1.0, max = 4.0), extend("step" = 0.5))]
    pub max_pixel_ratio: f64,
    /// Longest texture edge; larger images are downscaled on upload.
    #[schemars(skip)]
    pub max_texture_size: u32,
    /// Clear color (RGBA, 0-1). The alpha channel is ignored when `alpha`
    /// is off.
    #[schemars(skip)]
    pub clear_color: [f32; 4],
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            antialias: true,
            alpha: true,
            max_pixel_ratio: 2.0,
            max_texture_size: 2048,
            clear_color: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

impl RendererOptions {
    /// Pixel ratio to render at for the given device pixel ratio.
    #[must_use]
    pub fn clamp_pixel_ratio(&self, device_pixel_ratio: f64) -> f64 {
        device_pixel_ratio.min(self.max_pixel_ratio)
    }

    /// The clear color as a `wgpu::Color`, forced opaque when the canvas is
    /// not transparent.
    #[must_use]
    pub fn wgpu_clear_color(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_color;
        wgpu::Color {
            r: f64::from(r),
            g: f64::from(g),
            b: f64::from(b),
            a: if self.alpha { f64::from(a) } else { 1.0 },
        }
    }
}
