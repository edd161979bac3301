use web_sys::HtmlCanvasElement;

use crate::{
    camera::core::Camera,
    error::GalleryError,
    layout::Viewport,
    options::RendererOptions,
    renderer::{FrameRenderer, PlaneRenderer},
    scene::Scene,
};

/// [`PlaneRenderer`] bound to a canvas element whose drawing buffer and CSS
/// box follow the renderer's size.
pub struct WebRenderer {
    canvas: HtmlCanvasElement,
    inner: PlaneRenderer,
}

impl WebRenderer {
    /// Create the GPU surface on `canvas`.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::Gpu`] if WebGPU/WebGL2 is unavailable.
    pub async fn new(
        canvas: HtmlCanvasElement,
        viewport: Viewport,
        pixel_ratio: f64,
        options: RendererOptions,
    ) -> Result<Self, GalleryError> {
        let inner = PlaneRenderer::new(
            wgpu::SurfaceTarget::Canvas(canvas.clone()),
            viewport,
            pixel_ratio,
            options,
        )
        .await?;
        let renderer = Self { canvas, inner };
        renderer.sync_canvas();
        Ok(renderer)
    }

    fn sync_canvas(&self) {
        let (width, height) = self.inner.physical_size();
        self.canvas.set_width(width);
        self.canvas.set_height(height);

        let viewport = self.inner.viewport();
        let style = self.canvas.style();
        for (property, value) in [
            ("width", viewport.width),
            ("height", viewport.height),
        ] {
            if let Err(e) = style.set_property(property, &format!("{value}px")) {
                log::warn!("failed to set canvas {property}: {e:?}");
            }
        }
    }
}

impl FrameRenderer for WebRenderer {
    fn set_size(&mut self, viewport: Viewport) {
        self.inner.set_size(viewport);
        self.sync_canvas();
    }

    fn set_pixel_ratio(&mut self, pixel_ratio: f64) {
        self.inner.set_pixel_ratio(pixel_ratio);
        self.sync_canvas();
    }

    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), GalleryError> {
        self.inner.render(scene, camera)
    }
}
