//! `startGallery()` and the animation loop.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast, JsValue};
use web_sys::{Event, EventTarget, WheelEvent, Window};

use super::{EventSubscription, WebHost, WebRenderer};
use crate::{
    error::GalleryError,
    gallery::{locate_canvas, Gallery},
    host::Host,
    options::Options,
    scroll::{normalize_wheel_delta, ScrollDriver, SmoothScroll},
};

type WebGallery = Gallery<WebHost, WebRenderer, SmoothScroll>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn to_js(error: GalleryError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn init_logging() {
    console_error_panic_hook::set_once();
    // Already initialised when the gallery is started twice.
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Running gallery. Dropping the handle does not stop the loop; call
/// [`GalleryHandle::stop`].
#[wasm_bindgen]
pub struct GalleryHandle {
    gallery: Rc<RefCell<WebGallery>>,
    window: Window,
    callback: FrameCallback,
    request: Rc<Cell<Option<i32>>>,
}

#[wasm_bindgen]
impl GalleryHandle {
    /// Stop the loop, remove every event listener and release the frame
    /// callback.
    pub fn stop(&self) {
        match self.gallery.try_borrow_mut() {
            Ok(mut gallery) => gallery.teardown(),
            Err(_) => log::warn!("stop requested while a frame is running"),
        }
        if let Some(id) = self.request.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                log::warn!("failed to cancel animation frame: {e:?}");
            }
        }
        let _ = self.callback.borrow_mut().take();
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.gallery.try_borrow().map_or(0.0, |gallery| gallery.fps())
    }

    /// Number of images wrapped at startup.
    #[wasm_bindgen(js_name = imageCount)]
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.gallery
            .try_borrow()
            .map_or(0, |gallery| gallery.planes().len())
    }
}

/// Find the canvas, create the GPU renderer, wrap every image on the page
/// and start the animation loop. `options_toml` overrides the defaults.
///
/// # Errors
///
/// Rejects with a message if the options do not parse, the canvas is
/// missing, or no GPU backend is available.
#[wasm_bindgen(js_name = startGallery)]
pub async fn start_gallery(
    options_toml: Option<String>,
) -> Result<GalleryHandle, JsValue> {
    init_logging();
    let options = match options_toml {
        Some(content) => Options::from_toml_str(&content).map_err(to_js)?,
        None => Options::default(),
    };

    let host = WebHost::new().map_err(to_js)?;
    let canvas = locate_canvas(&host, &options).map_err(to_js)?;
    let viewport = host.window_size();
    let pixel_ratio = options
        .renderer
        .clamp_pixel_ratio(host.device_pixel_ratio());
    let renderer =
        WebRenderer::new(canvas, viewport, pixel_ratio, options.renderer.clone())
            .await
            .map_err(to_js)?;

    let mut scroll = SmoothScroll::new(options.scroll.clone());
    scroll.set_limit(host.scroll_limit());
    scroll.sync_native(host.scroll_y());

    let window = host.window().clone();
    let gallery = Rc::new(RefCell::new(
        Gallery::new(host, renderer, scroll, options).map_err(to_js)?,
    ));
    subscribe(&gallery, &window)?;

    let request = Rc::new(Cell::new(None));
    let callback = start_loop(&gallery, &window, &request)?;
    log::info!("gallery started");

    Ok(GalleryHandle {
        gallery,
        window,
        callback,
        request,
    })
}

/// Attach resize, scroll and wheel listeners; the gallery owns them until
/// teardown.
fn subscribe(
    gallery: &Rc<RefCell<WebGallery>>,
    window: &Window,
) -> Result<(), JsValue> {
    let target: &EventTarget = window.as_ref();

    let on_resize = {
        let gallery = Rc::clone(gallery);
        EventSubscription::listen(target, "resize", true, move |_: Event| {
            if let Ok(mut gallery) = gallery.try_borrow_mut() {
                gallery.resize();
            }
        })?
    };

    let on_scroll = {
        let gallery = Rc::clone(gallery);
        let window = window.clone();
        EventSubscription::listen(target, "scroll", true, move |_: Event| {
            let Ok(mut gallery) = gallery.try_borrow_mut() else {
                return;
            };
            if !gallery.scroll_driver().is_scrolling() {
                let native = window.scroll_y().unwrap_or(0.0) as f32;
                gallery.scroll_driver_mut().sync_native(native);
            }
            gallery.on_scroll();
        })?
    };

    let on_wheel = {
        let gallery = Rc::clone(gallery);
        EventSubscription::listen(target, "wheel", false, move |event: Event| {
            let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
                return;
            };
            // Pinch-zoom arrives as ctrl+wheel.
            if wheel.ctrl_key() {
                return;
            }
            wheel.prevent_default();
            if let Ok(mut gallery) = gallery.try_borrow_mut() {
                let delta = normalize_wheel_delta(
                    wheel.delta_y() as f32,
                    wheel.delta_mode(),
                    gallery.viewport().height,
                );
                gallery.scroll_driver_mut().handle_wheel(delta);
            }
        })?
    };

    let mut gallery = gallery.borrow_mut();
    gallery.hold(on_resize);
    gallery.hold(on_scroll);
    gallery.hold(on_wheel);
    Ok(())
}

/// Run one frame and mirror the smoothed offset onto the page.
fn run_frame(gallery: &mut WebGallery, timestamp: f64, window: &Window) -> bool {
    let was_scrolling = gallery.scroll_driver().is_scrolling();
    match gallery.frame(timestamp) {
        Ok(reschedule) => {
            if was_scrolling {
                window.scroll_to_with_x_and_y(
                    window.scroll_x().unwrap_or(0.0),
                    f64::from(gallery.scroll_driver().scroll()),
                );
            }
            reschedule
        }
        Err(e) => {
            log::error!("render failed, stopping: {e}");
            gallery.stop();
            false
        }
    }
}

fn start_loop(
    gallery: &Rc<RefCell<WebGallery>>,
    window: &Window,
    request: &Rc<Cell<Option<i32>>>,
) -> Result<FrameCallback, JsValue> {
    let callback: FrameCallback = Rc::new(RefCell::new(None));

    let next = Rc::clone(&callback);
    let gallery = Rc::clone(gallery);
    let frame_window = window.clone();
    let frame_request = Rc::clone(request);
    *callback.borrow_mut() =
        Some(Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
            frame_request.set(None);
            let reschedule = match gallery.try_borrow_mut() {
                Ok(mut gallery) => run_frame(&mut gallery, timestamp, &frame_window),
                Err(_) => true,
            };
            if !reschedule {
                return;
            }
            if let Some(closure) = next.borrow().as_ref() {
                match frame_window
                    .request_animation_frame(closure.as_ref().unchecked_ref())
                {
                    Ok(id) => frame_request.set(Some(id)),
                    Err(e) => log::error!("requestAnimationFrame failed: {e:?}"),
                }
            }
        }));

    if let Some(closure) = callback.borrow().as_ref() {
        request.set(Some(
            window.request_animation_frame(closure.as_ref().unchecked_ref())?,
        ));
    }
    Ok(callback)
}
