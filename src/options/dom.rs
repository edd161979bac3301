use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Document", inline)]
#[serde(default)]
/// Selectors used to find the canvas and the gallery images.
pub struct DomOptions {
    /// CSS selector of the output canvas.
    #[schemars(title = "Canvas Selector")]
    pub canvas_selector: String,
    /// CSS selector of the images to project.
    #[schemars(title = "Image Selector")]
    pub image_selector: String,
}

impl Default for DomOptions {
    fn default() -> Self {
        Self {
            canvas_selector: "canvas.webgl".into(),
            image_selector: "img".into(),
        }
    }
}
