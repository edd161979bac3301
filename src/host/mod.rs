//! The page the gallery runs in.
//!
//! [`Host`] abstracts the window and document: viewport size, device pixel
//! ratio, canvas lookup and image enumeration. The browser implementation
//! lives in `crate::web`; [`StaticPage`] is an in-memory page used by the
//! headless binary and the tests.

mod static_page;

pub use static_page::{ImageDescription, PageDescription, StaticCanvas, StaticImage, StaticPage};

use crate::layout::{Rect, Viewport};

/// Decoded RGBA8 pixels of one image, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed RGBA8 rows (`width * height * 4` bytes).
    pub rgba: Vec<u8>,
}

impl TextureData {
    /// Wrap packed RGBA8 pixels; `None` if the buffer length does not match
    /// the dimensions or either dimension is zero.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * 4;
        (width > 0 && height > 0 && rgba.len() == expected).then_some(Self {
            width,
            height,
            rgba,
        })
    }

    /// A single-color texture.
    #[must_use]
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let rgba = color
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            rgba,
        }
    }
}

/// Largest size with the same aspect ratio as `(width, height)` whose
/// longest edge does not exceed `max_edge`. Never returns a zero dimension.
#[must_use]
pub fn fit_within(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_edge || longest == 0 {
        return (width.max(1), height.max(1));
    }
    let scale = f64::from(max_edge) / f64::from(longest);
    let fit = |v: u32| ((f64::from(v) * scale).round() as u32).max(1);
    (fit(width), fit(height))
}

/// One image element on the page.
pub trait ImageSource {
    /// The element's current layout box in document space.
    fn layout_rect(&self) -> Rect;

    /// Decoded pixels, downscaled so the longest edge is at most
    /// `max_edge`. `None` while the image has not finished loading.
    fn texture(&self, max_edge: u32) -> Option<TextureData>;

    /// Human-readable identifier for logs (usually the image URL).
    fn label(&self) -> String;
}

/// The window and document the gallery renders into.
pub trait Host {
    /// Handle to the output canvas.
    type Canvas;
    /// Handle to one image element.
    type Image: ImageSource;

    /// Inner window size in CSS pixels.
    fn window_size(&self) -> Viewport;

    /// Physical pixels per CSS pixel.
    fn device_pixel_ratio(&self) -> f64;

    /// Total scrollable document height in CSS pixels.
    fn document_height(&self) -> f32;

    /// First canvas matching `selector`, if any.
    fn find_canvas(&self, selector: &str) -> Option<Self::Canvas>;

    /// Every image matching `selector`, in document order. A snapshot:
    /// elements added afterwards are not reflected.
    fn images(&self, selector: &str) -> Vec<Self::Image>;

    /// Largest reachable scroll offset.
    fn scroll_limit(&self) -> f32 {
        (self.document_height() - self.window_size().height).max(0.0)
    }
}
