//! DOM layout primitives and the layout-to-scene coordinate mapping.
//!
//! The camera is configured so that one scene unit equals one CSS pixel on
//! the `z = 0` plane (see [`crate::camera::core::pixel_aligned_fovy`]).
//! Mapping a layout box into the scene is therefore a pure translation:
//! move the origin from the document's top-left corner to the viewport
//! center and flip the Y axis.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Window size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Inner window width.
    pub width: f32,
    /// Inner window height.
    pub height: f32,
}

impl Viewport {
    /// Create a viewport from a width and height in CSS pixels.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width over height. Degenerate (zero-height) viewports report 1.0.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Physical surface size for the given pixel ratio, never below 1x1.
    #[must_use]
    pub fn physical_size(&self, pixel_ratio: f64) -> (u32, u32) {
        let scale = |v: f32| ((f64::from(v) * pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}

/// An element's layout box in document space.
///
/// `left`/`top` are measured from the document origin, i.e. the client
/// rect offset by the page scroll at the time of measurement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Distance from the document's left edge.
    pub left: f32,
    /// Distance from the document's top edge.
    pub top: f32,
    /// Box width.
    pub width: f32,
    /// Box height.
    pub height: f32,
}

impl Rect {
    /// Create a rect from its document-space origin and size.
    #[must_use]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Whether the box covers any pixels at all.
    #[must_use]
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Placement of a unit quad in scene space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaneTransform {
    /// Center of the plane.
    pub position: Vec3,
    /// Plane extent along X and Y (the quad is 1x1 before scaling).
    pub scale: Vec2,
}

/// Map a document-space layout box to a plane transform for the current
/// viewport and scroll offset.
#[must_use]
pub fn project_rect(rect: Rect, viewport: Viewport, scroll: f32) -> PlaneTransform {
    let x = rect.left - viewport.width / 2.0 + rect.width / 2.0;
    let y = -(rect.top - scroll) + viewport.height / 2.0 - rect.height / 2.0;
    PlaneTransform {
        position: Vec3::new(x, y, 0.0),
        scale: Vec2::new(rect.width, rect.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_filling_the_viewport_sits_at_the_origin() {
        let viewport = Viewport::new(1024.0, 768.0);
        let t = project_rect(Rect::new(0.0, 0.0, 1024.0, 768.0), viewport, 0.0);
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.scale, Vec2::new(1024.0, 768.0));
    }

    #[test]
    fn top_left_box_maps_to_upper_left_quadrant() {
        let viewport = Viewport::new(800.0, 600.0);
        let t = project_rect(Rect::new(0.0, 0.0, 100.0, 50.0), viewport, 0.0);
        assert_eq!(t.position.x, -350.0);
        assert_eq!(t.position.y, 275.0);
    }

    #[test]
    fn scrolling_down_moves_planes_up() {
        let viewport = Viewport::new(800.0, 600.0);
        let rect = Rect::new(100.0, 900.0, 200.0, 100.0);
        let before = project_rect(rect, viewport, 0.0);
        let after = project_rect(rect, viewport, 250.0);
        assert_eq!(after.position.y - before.position.y, 250.0);
        assert_eq!(after.position.x, before.position.x);
    }

    #[test]
    fn physical_size_applies_pixel_ratio() {
        let viewport = Viewport::new(1024.0, 768.0);
        assert_eq!(viewport.physical_size(2.0), (2048, 1536));
        assert_eq!(Viewport::new(0.0, 0.0).physical_size(2.0), (1, 1));
    }

    #[test]
    fn zero_height_viewport_has_unit_aspect() {
        assert_eq!(Viewport::new(300.0, 0.0).aspect(), 1.0);
    }
}
