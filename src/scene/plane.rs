//! Per-image wrapper keeping one plane aligned with one DOM image.

use std::sync::Arc;

use super::{MeshId, PlaneMesh, Scene};
use crate::{
    host::ImageSource,
    layout::{project_rect, Viewport},
};

/// Whether an image has produced its mesh yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneState {
    /// The image has no pixels yet (still loading) or no layout area.
    NotReady,
    /// The mesh is in the scene.
    Ready(MeshId),
}

/// Associates one image element with one scene mesh.
#[derive(Debug)]
pub struct ImagePlane<I> {
    image: I,
    viewport: Viewport,
    scroll: f32,
    max_texture_size: u32,
    state: PlaneState,
}

impl<I: ImageSource> ImagePlane<I> {
    /// Wrap `image`, adding its mesh to `scene` right away if the image is
    /// already decoded.
    pub fn new(
        image: I,
        viewport: Viewport,
        scroll: f32,
        max_texture_size: u32,
        scene: &mut Scene,
    ) -> Self {
        let mut plane = Self {
            image,
            viewport,
            scroll,
            max_texture_size,
            state: PlaneState::NotReady,
        };
        plane.try_attach(scene);
        plane
    }

    /// Re-read the element's layout box and reposition the mesh for the
    /// given viewport and scroll offset. A plane that is not ready yet
    /// retries building its mesh.
    pub fn update(&mut self, viewport: Viewport, scroll: f32, scene: &mut Scene) {
        self.viewport = viewport;
        self.scroll = scroll;

        match self.state {
            PlaneState::NotReady => self.try_attach(scene),
            PlaneState::Ready(id) => {
                if let Some(mesh) = scene.mesh_mut(id) {
                    mesh.transform =
                        project_rect(self.image.layout_rect(), viewport, scroll);
                }
            }
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> PlaneState {
        self.state
    }

    /// The mesh handle, once ready.
    #[must_use]
    pub fn mesh(&self) -> Option<MeshId> {
        match self.state {
            PlaneState::Ready(id) => Some(id),
            PlaneState::NotReady => None,
        }
    }

    /// The wrapped image.
    #[must_use]
    pub fn image(&self) -> &I {
        &self.image
    }

    /// Viewport seen at the last creation/update.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Scroll offset seen at the last creation/update.
    #[must_use]
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    fn try_attach(&mut self, scene: &mut Scene) {
        let rect = self.image.layout_rect();
        if !rect.has_area() {
            return;
        }
        let Some(texture) = self.image.texture(self.max_texture_size) else {
            log::debug!("image {} not decoded yet", self.image.label());
            return;
        };

        let id = scene.add(PlaneMesh {
            transform: project_rect(rect, self.viewport, self.scroll),
            texture: Arc::new(texture),
            label: self.image.label(),
        });
        self.state = PlaneState::Ready(id);
    }
}
