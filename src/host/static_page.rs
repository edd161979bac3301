//! In-memory page: a window, a set of canvases and a list of positioned
//! images, described in TOML.
//!
//! ```toml
//! device_pixel_ratio = 2.0
//!
//! [window]
//! width = 1280.0
//! height = 720.0
//!
//! [[images]]
//! label = "hero.jpg"
//! rect = { left = 100.0, top = 200.0, width = 400.0, height = 300.0 }
//! ```
//!
//! The page is shared behind `Rc<RefCell<_>>` so a test (or the binary) can
//! keep a handle and mutate the page while a gallery owns another.

use std::{cell::RefCell, path::Path, rc::Rc};

use serde::{Deserialize, Serialize};

use super::{fit_within, Host, ImageSource, TextureData};
use crate::{
    error::GalleryError,
    layout::{Rect, Viewport},
};

fn default_pixel_ratio() -> f64 {
    1.0
}

fn default_canvases() -> Vec<String> {
    vec!["canvas.webgl".into()]
}

fn default_loaded() -> bool {
    true
}

fn default_color() -> [u8; 4] {
    [128, 128, 128, 255]
}

/// Serializable description of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDescription {
    /// Inner window size.
    pub window: Viewport,
    /// Physical pixels per CSS pixel.
    #[serde(default = "default_pixel_ratio")]
    pub device_pixel_ratio: f64,
    /// Scrollable height; defaults to the bottom of the lowest image or the
    /// window height, whichever is larger.
    #[serde(default)]
    pub document_height: Option<f32>,
    /// Selectors that resolve to a canvas.
    #[serde(default = "default_canvases")]
    pub canvases: Vec<String>,
    /// Images in document order.
    #[serde(default)]
    pub images: Vec<ImageDescription>,
}

/// One image on a [`PageDescription`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDescription {
    /// Identifier used in logs and output.
    #[serde(default)]
    pub label: String,
    /// Layout box in document space.
    pub rect: Rect,
    /// Whether the image has finished loading.
    #[serde(default = "default_loaded")]
    pub loaded: bool,
    /// Intrinsic pixel size; defaults to the layout size.
    #[serde(default)]
    pub natural_size: Option<(u32, u32)>,
    /// Fill color of the generated texture.
    #[serde(default = "default_color")]
    pub color: [u8; 4],
}

impl ImageDescription {
    /// A loaded image with the given label and layout box.
    #[must_use]
    pub fn new(label: impl Into<String>, rect: Rect) -> Self {
        Self {
            label: label.into(),
            rect,
            loaded: true,
            natural_size: None,
            color: default_color(),
        }
    }

    /// Mark the image as still loading.
    #[must_use]
    pub fn pending(mut self) -> Self {
        self.loaded = false;
        self
    }
}

impl PageDescription {
    /// A page with the given window size, pixel ratio 1, the default canvas
    /// and no images.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            window: Viewport::new(width, height),
            device_pixel_ratio: default_pixel_ratio(),
            document_height: None,
            canvases: default_canvases(),
            images: Vec::new(),
        }
    }
}

/// Shared, mutable in-memory page implementing [`Host`].
#[derive(Debug, Clone)]
pub struct StaticPage {
    inner: Rc<RefCell<PageDescription>>,
}

/// Canvas handle returned by [`StaticPage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticCanvas {
    /// The selector that matched.
    pub selector: String,
}

/// Image handle returned by [`StaticPage`]; reads through to the page so
/// later edits (loading, layout shifts) are visible.
#[derive(Debug, Clone)]
pub struct StaticImage {
    page: Rc<RefCell<PageDescription>>,
    index: usize,
}

impl StaticPage {
    /// Wrap a page description.
    #[must_use]
    pub fn new(description: PageDescription) -> Self {
        Self {
            inner: Rc::new(RefCell::new(description)),
        }
    }

    /// Parse a page description from TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, GalleryError> {
        toml::from_str(content)
            .map(Self::new)
            .map_err(|e| GalleryError::PageParse(e.to_string()))
    }

    /// Load a page description from a TOML file.
    pub fn load(path: &Path) -> Result<Self, GalleryError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// A copy of the current description.
    #[must_use]
    pub fn description(&self) -> PageDescription {
        self.inner.borrow().clone()
    }

    /// Change the window size (does not fire any event by itself).
    pub fn resize_window(&self, width: f32, height: f32) {
        self.inner.borrow_mut().window = Viewport::new(width, height);
    }

    /// Change the device pixel ratio.
    pub fn set_device_pixel_ratio(&self, ratio: f64) {
        self.inner.borrow_mut().device_pixel_ratio = ratio;
    }

    /// Append an image to the document.
    pub fn push_image(&self, image: ImageDescription) {
        self.inner.borrow_mut().images.push(image);
    }

    /// Mark the image at `index` as loaded. Returns `false` if there is no
    /// such image.
    pub fn mark_loaded(&self, index: usize) -> bool {
        self.inner
            .borrow_mut()
            .images
            .get_mut(index)
            .map(|image| image.loaded = true)
            .is_some()
    }

    /// Move the image at `index` to a new layout box. Returns `false` if
    /// there is no such image.
    pub fn move_image(&self, index: usize, rect: Rect) -> bool {
        self.inner
            .borrow_mut()
            .images
            .get_mut(index)
            .map(|image| image.rect = rect)
            .is_some()
    }
}

impl Host for StaticPage {
    type Canvas = StaticCanvas;
    type Image = StaticImage;

    fn window_size(&self) -> Viewport {
        self.inner.borrow().window
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.inner.borrow().device_pixel_ratio
    }

    fn document_height(&self) -> f32 {
        let page = self.inner.borrow();
        page.document_height.unwrap_or_else(|| {
            page.images
                .iter()
                .map(|image| image.rect.top + image.rect.height)
                .fold(page.window.height, f32::max)
        })
    }

    fn find_canvas(&self, selector: &str) -> Option<StaticCanvas> {
        self.inner
            .borrow()
            .canvases
            .iter()
            .any(|canvas| canvas == selector)
            .then(|| StaticCanvas {
                selector: selector.to_owned(),
            })
    }

    /// Every image on the page; a static page only holds images, so the
    /// selector is not interpreted.
    fn images(&self, _selector: &str) -> Vec<StaticImage> {
        (0..self.inner.borrow().images.len())
            .map(|index| StaticImage {
                page: Rc::clone(&self.inner),
                index,
            })
            .collect()
    }
}

impl StaticImage {
    fn with<T>(&self, f: impl FnOnce(&ImageDescription) -> T) -> Option<T> {
        self.page.borrow().images.get(self.index).map(f)
    }
}

impl ImageSource for StaticImage {
    fn layout_rect(&self) -> Rect {
        self.with(|image| image.rect).unwrap_or_default()
    }

    fn texture(&self, max_edge: u32) -> Option<TextureData> {
        self.with(|image| {
            if !image.loaded {
                return None;
            }
            let (width, height) = image.natural_size.unwrap_or((
                image.rect.width.round() as u32,
                image.rect.height.round() as u32,
            ));
            let (width, height) = fit_within(width, height, max_edge);
            Some(TextureData::solid(width, height, image.color))
        })
        .flatten()
    }

    fn label(&self) -> String {
        self.with(|image| image.label.clone()).unwrap_or_default()
    }
}
