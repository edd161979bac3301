//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the vitrine crate.
#[derive(Debug)]
pub enum GalleryError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Presentation surface failure that could not be recovered by
    /// reconfiguring.
    Surface(wgpu::SurfaceError),
    /// No canvas element matched the configured selector.
    MissingCanvas(String),
    /// The host environment (DOM, window) rejected an operation.
    Host(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Malformed page description.
    PageParse(String),
}

impl fmt::Display for GalleryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Surface(e) => write!(f, "surface error: {e}"),
            Self::MissingCanvas(selector) => {
                write!(f, "no canvas element matches `{selector}`")
            }
            Self::Host(msg) => write!(f, "host error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::PageParse(msg) => {
                write!(f, "page description parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for GalleryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Surface(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for GalleryError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<wgpu::SurfaceError> for GalleryError {
    fn from(e: wgpu::SurfaceError) -> Self {
        Self::Surface(e)
    }
}

impl From<std::io::Error> for GalleryError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
