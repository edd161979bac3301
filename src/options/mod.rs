//! Gallery options with TOML support.
//!
//! Camera, renderer, scroll and DOM selector settings are consolidated
//! here. Every section uses `#[serde(default)]`, so a partial TOML file
//! (e.g. only overriding `[scroll]`) works.

mod camera;
mod dom;
mod renderer;
mod scroll;

use std::path::Path;

pub use camera::CameraOptions;
pub use dom::DomOptions;
pub use renderer::RendererOptions;
use schemars::JsonSchema;
pub use scroll::ScrollOptions;
use serde::{Deserialize, Serialize};

use crate::error::GalleryError;

/// Top-level options container.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Camera projection parameters.
    pub camera: CameraOptions,
    /// Output surface parameters.
    pub renderer: RendererOptions,
    /// Smooth-scroll parameters.
    pub scroll: ScrollOptions,
    /// Canvas and image selectors.
    #[schemars(skip)]
    pub dom: DomOptions,
}

impl Options {
    /// Generate JSON Schema describing the user-tunable options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, GalleryError> {
        toml::from_str(content)
            .map_err(|e| GalleryError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, GalleryError> {
        let content = std::fs::read_to_string(path).map_err(GalleryError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), GalleryError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GalleryError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(GalleryError::Io)?;
        }
        std::fs::write(path, content).map_err(GalleryError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed = Options::from_toml_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[scroll]
lerp = 0.2
duration = 1.2
";
        let opts = Options::from_toml_str(toml_str).unwrap();
        assert_eq!(opts.scroll.lerp, 0.2);
        assert_eq!(opts.scroll.duration, Some(1.2));
        // Everything else should be default
        assert_eq!(opts.scroll.wheel_multiplier, 1.0);
        assert_eq!(opts.camera.distance, 1.0);
        assert_eq!(opts.renderer.max_pixel_ratio, 2.0);
        assert_eq!(opts.dom.canvas_selector, "canvas.webgl");
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml_str("[camera]\ndistance = \"far\"")
            .unwrap_err();
        assert!(matches!(err, GalleryError::OptionsParse(_)));
    }

    #[test]
    fn pixel_ratio_is_capped() {
        let renderer = RendererOptions::default();
        assert_eq!(renderer.clamp_pixel_ratio(1.0), 1.0);
        assert_eq!(renderer.clamp_pixel_ratio(2.0), 2.0);
        assert_eq!(renderer.clamp_pixel_ratio(3.0), 2.0);
        assert_eq!(renderer.clamp_pixel_ratio(1.5), 1.5);
    }

    #[test]
    fn opaque_canvas_forces_alpha() {
        let renderer = RendererOptions {
            alpha: false,
            ..RendererOptions::default()
        };
        assert_eq!(renderer.wgpu_clear_color().a, 1.0);
        assert_eq!(RendererOptions::default().wgpu_clear_color().a, 0.0);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("camera"));
        assert!(props.contains_key("renderer"));
        assert!(props.contains_key("scroll"));
        assert!(!props.contains_key("dom"));

        let renderer = &props["renderer"]["properties"];
        assert!(renderer.get("max_pixel_ratio").is_some());
        assert!(renderer.get("clear_color").is_none());
    }
}
