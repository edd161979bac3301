//! Pixel-aligned perspective camera.
//!
//! The camera sits a fixed distance in front of the `z = 0` plane with a
//! field of view chosen so that one scene unit spans one CSS pixel there.

/// Core camera struct, GPU uniform, and the pixel-aligned FOV relation.
pub mod core;
