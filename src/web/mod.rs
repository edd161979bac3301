//! Browser front end (wasm32 with the `web` feature).
//!
//! [`start_gallery`] wires a [`Gallery`](crate::gallery::Gallery) to the
//! live page: [`WebHost`] reads layout from the DOM, [`WebRenderer`] draws
//! into the canvas, and `resize`, `scroll` and `wheel` listeners are held
//! as [`EventSubscription`]s until [`GalleryHandle::stop`].

mod entry;
mod host;
mod renderer;
mod subscription;

pub use entry::{start_gallery, GalleryHandle};
pub use host::{DomImage, WebHost};
pub use renderer::WebRenderer;
pub use subscription::EventSubscription;
