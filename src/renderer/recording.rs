use glam::{Vec2, Vec3};
use serde::Serialize;

use super::FrameRenderer;
use crate::{
    camera::core::Camera, error::GalleryError, layout::Viewport,
    scene::{MeshId, Scene},
};

/// One mesh as it was drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaneSnapshot {
    /// Handle of the mesh.
    pub id: MeshId,
    /// Source identifier.
    pub label: String,
    /// Plane center.
    pub position: Vec3,
    /// Plane extent.
    pub scale: Vec2,
}

/// Everything a single render call saw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedFrame {
    /// Output size at the time of the call.
    pub size: Viewport,
    /// Pixel ratio at the time of the call.
    pub pixel_ratio: f64,
    /// Camera field of view in degrees.
    pub fovy: f32,
    /// Camera aspect ratio.
    pub aspect: f32,
    /// Meshes in draw order.
    pub planes: Vec<PlaneSnapshot>,
}

/// Renderer that draws nothing and records every call.
#[derive(Debug, Clone)]
pub struct RecordingRenderer {
    size: Viewport,
    pixel_ratio: f64,
    frames: Vec<RenderedFrame>,
    /// Keep only the most recent frame when set.
    keep_last_only: bool,
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingRenderer {
    /// A recorder that keeps every frame.
    #[must_use]
    pub fn new() -> Self {
        Self {
            size: Viewport::new(0.0, 0.0),
            pixel_ratio: 1.0,
            frames: Vec::new(),
            keep_last_only: false,
        }
    }

    /// A recorder that keeps only the latest frame (long headless runs).
    #[must_use]
    pub fn last_frame_only() -> Self {
        Self {
            keep_last_only: true,
            ..Self::new()
        }
    }

    /// Current output size.
    #[must_use]
    pub fn size(&self) -> Viewport {
        self.size
    }

    /// Current pixel ratio.
    #[must_use]
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Recorded frames, oldest first.
    #[must_use]
    pub fn frames(&self) -> &[RenderedFrame] {
        &self.frames
    }

    /// The most recent frame.
    #[must_use]
    pub fn last_frame(&self) -> Option<&RenderedFrame> {
        self.frames.last()
    }
}

impl FrameRenderer for RecordingRenderer {
    fn set_size(&mut self, viewport: Viewport) {
        self.size = viewport;
    }

    fn set_pixel_ratio(&mut self, pixel_ratio: f64) {
        self.pixel_ratio = pixel_ratio;
    }

    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), GalleryError> {
        let planes = scene
            .iter()
            .map(|(id, mesh)| PlaneSnapshot {
                id,
                label: mesh.label.clone(),
                position: mesh.transform.position,
                scale: mesh.transform.scale,
            })
            .collect();
        if self.keep_last_only {
            self.frames.clear();
        }
        self.frames.push(RenderedFrame {
            size: self.size,
            pixel_ratio: self.pixel_ratio,
            fovy: camera.fovy,
            aspect: camera.aspect,
            planes,
        });
        Ok(())
    }
}
