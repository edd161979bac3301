//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, image texture upload and
//! the small amount of pipeline boilerplate the plane renderer needs.

/// Shared wgpu boilerplate helpers for the quad pipeline.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Image textures and the multisample color target.
pub mod texture;
