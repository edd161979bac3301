// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! GPU-rendered parallax image gallery.
//!
//! Every `<img>` on a page is mirrored by a textured plane in a 3D scene.
//! The camera is pixel aligned (one scene unit is one CSS pixel on the
//! `z = 0` plane), so placing a plane is a pure translation of the image's
//! layout box by the current scroll offset. Planes follow a smoothed scroll
//! offset every animation frame and are reprojected on window resize.
//!
//! # Key entry points
//!
//! - [`gallery::Gallery`] - the scene controller and frame loop
//! - [`scene::ImagePlane`] - keeps one plane aligned with one image
//! - [`scroll::SmoothScroll`] - inertial scroll driver
//! - [`host::Host`] - the page abstraction ([`host::StaticPage`] in memory,
//!   `web::WebHost` in the browser)
//! - [`renderer::PlaneRenderer`] - wgpu renderer
//! - [`options::Options`] - runtime configuration (camera, renderer, scroll,
//!   selectors)
//!
//! # Browser use
//!
//! With the `web` feature on `wasm32`, `web::start_gallery` bootstraps
//! everything from the live DOM and returns a handle whose `stop()` tears
//! the loop and its event listeners down.

pub mod camera;
pub mod error;
pub mod gallery;
pub mod gpu;
pub mod host;
pub mod layout;
pub mod options;
pub mod renderer;
pub mod scene;
pub mod scroll;
pub mod util;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use error::GalleryError;
pub use gallery::Gallery;
