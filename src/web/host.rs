//! [`Host`] over the live browser window and document.

use std::cell::Cell;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement,
    Window,
};

use crate::{
    error::GalleryError,
    host::{fit_within, Host, ImageSource, TextureData},
    layout::{Rect, Viewport},
};

fn js_number(value: Result<JsValue, JsValue>) -> f32 {
    value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
}

/// The browser window the module was loaded into.
#[derive(Debug, Clone)]
pub struct WebHost {
    window: Window,
    document: Document,
}

impl WebHost {
    /// Bind to the global window.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::Host`] outside a browser main thread.
    pub fn new() -> Result<Self, GalleryError> {
        let window = web_sys::window()
            .ok_or_else(|| GalleryError::Host("no global window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| GalleryError::Host("window has no document".into()))?;
        Ok(Self { window, document })
    }

    /// The global window.
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// The page's native vertical scroll offset.
    #[must_use]
    pub fn scroll_y(&self) -> f32 {
        self.window.scroll_y().unwrap_or(0.0) as f32
    }
}

impl Host for WebHost {
    type Canvas = HtmlCanvasElement;
    type Image = DomImage;

    fn window_size(&self) -> Viewport {
        Viewport::new(
            js_number(self.window.inner_width()),
            js_number(self.window.inner_height()),
        )
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    fn document_height(&self) -> f32 {
        self.document
            .document_element()
            .map_or(0.0, |root| root.scroll_height() as f32)
    }

    fn find_canvas(&self, selector: &str) -> Option<HtmlCanvasElement> {
        self.document
            .query_selector(selector)
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into().ok())
    }

    fn images(&self, selector: &str) -> Vec<DomImage> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            log::warn!("invalid image selector {selector:?}");
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<HtmlImageElement>().ok())
            .map(|element| DomImage {
                element,
                window: self.window.clone(),
                unreadable: Cell::new(false),
            })
            .collect()
    }
}

/// One `<img>` element.
#[derive(Debug)]
pub struct DomImage {
    element: HtmlImageElement,
    window: Window,
    /// Set once reading pixels failed (typically a cross-origin image
    /// without CORS headers); later frames stop retrying.
    unreadable: Cell<bool>,
}

impl DomImage {
    /// The underlying element.
    #[must_use]
    pub fn element(&self) -> &HtmlImageElement {
        &self.element
    }

    /// Draw the image into a scratch 2D canvas at the target size and read
    /// the pixels back.
    fn rasterize(&self, max_edge: u32) -> Result<Option<TextureData>, JsValue> {
        let natural = (self.element.natural_width(), self.element.natural_height());
        if !self.element.complete() || natural.0 == 0 || natural.1 == 0 {
            return Ok(None);
        }
        let (width, height) = fit_within(natural.0, natural.1, max_edge);

        let document = self
            .window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        let canvas: HtmlCanvasElement =
            document.create_element("canvas")?.dyn_into()?;
        canvas.set_width(width);
        canvas.set_height(height);
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;

        context.draw_image_with_html_image_element_and_dw_and_dh(
            &self.element,
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        )?;
        let pixels = context.get_image_data(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        )?;
        Ok(TextureData::from_rgba(width, height, pixels.data().0))
    }
}

impl ImageSource for DomImage {
    fn layout_rect(&self) -> Rect {
        let client = self.element.get_bounding_client_rect();
        let scroll_x = self.window.scroll_x().unwrap_or(0.0);
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        Rect::new(
            (client.left() + scroll_x) as f32,
            (client.top() + scroll_y) as f32,
            client.width() as f32,
            client.height() as f32,
        )
    }

    fn texture(&self, max_edge: u32) -> Option<TextureData> {
        if self.unreadable.get() {
            return None;
        }
        match self.rasterize(max_edge) {
            Ok(texture) => texture,
            Err(e) => {
                log::warn!("cannot read pixels of {}: {e:?}", self.label());
                self.unreadable.set(true);
                None
            }
        }
    }

    fn label(&self) -> String {
        self.element.current_src()
    }
}
