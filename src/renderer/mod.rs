//! Frame renderers.
//!
//! [`FrameRenderer`] is the surface the gallery drives: it is sized in CSS
//! pixels, scaled by a pixel ratio, and asked to draw the scene once per
//! frame. [`PlaneRenderer`] draws with wgpu; [`RecordingRenderer`] keeps
//! a log of what it was asked to draw.

mod plane_pass;
mod recording;

pub use plane_pass::PlaneRenderer;
pub use recording::{PlaneSnapshot, RecordingRenderer, RenderedFrame};

use crate::{
    camera::core::Camera, error::GalleryError, layout::Viewport, scene::Scene,
};

/// Something that can draw a [`Scene`] through a [`Camera`].
pub trait FrameRenderer {
    /// Resize the output to `viewport` CSS pixels.
    fn set_size(&mut self, viewport: Viewport);

    /// Set the number of physical pixels per CSS pixel of the drawing
    /// buffer. Callers are expected to have clamped it already.
    fn set_pixel_ratio(&mut self, pixel_ratio: f64);

    /// Draw one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame could not be presented and the
    /// renderer could not recover on its own.
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), GalleryError>;
}
