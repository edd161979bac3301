use glam::{Mat4, Vec3};

use crate::{layout::Viewport, options::CameraOptions};

/// Vertical field of view, in degrees, at which one scene unit spans one
/// CSS pixel on the plane `distance` units in front of the camera.
///
/// `fovy = 2 * atan(height / 2 / distance)`
#[must_use]
pub fn pixel_aligned_fovy(viewport_height: f32, distance: f32) -> f32 {
    let half_height = f64::from(viewport_height) / 2.0;
    (2.0 * (half_height / f64::from(distance)).atan()).to_degrees() as f32
}

/// Perspective camera defined by eye position, target, and projection
/// parameters.
///
/// The projection matrix is cached; call
/// [`update_projection_matrix`](Self::update_projection_matrix) after
/// changing `aspect`, `fovy`, `znear` or `zfar`.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// Distance from the eye to the pixel-aligned `z = 0` plane.
    distance: f32,
    projection: Mat4,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Camera {
    /// Camera looking down -Z at the origin from `options.distance`, with a
    /// field of view that makes one unit equal one pixel at the origin.
    #[must_use]
    pub fn pixel_aligned(viewport: Viewport, options: &CameraOptions) -> Self {
        let mut camera = Self {
            eye: Vec3::new(0.0, 0.0, options.distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: viewport.aspect(),
            fovy: pixel_aligned_fovy(viewport.height, options.distance),
            znear: options.znear,
            zfar: options.zfar,
            distance: options.distance,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    /// Re-derive aspect and field of view for a new viewport and refresh the
    /// projection matrix.
    pub fn fit_viewport(&mut self, viewport: Viewport) {
        self.aspect = viewport.aspect();
        self.fovy = pixel_aligned_fovy(viewport.height, self.distance);
        self.update_projection_matrix();
    }

    /// Recompute the cached projection matrix from the current parameters.
    pub fn update_projection_matrix(&mut self) {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        self.projection = Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        );
    }

    /// The cached projection matrix.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// World-to-view matrix.
    #[must_use]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        self.projection * self.view()
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity view-projection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }

    /// Update uniform fields from the given camera's current state.
    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj = camera.build_matrix().to_cols_array_2d();
    }
}
