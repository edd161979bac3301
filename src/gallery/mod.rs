//! Scene controller.
//!
//! [`Gallery`] ties a [`Host`] page to a [`FrameRenderer`] and a
//! [`ScrollDriver`]. At construction it locates the output canvas, builds a
//! pixel-aligned camera, sizes the renderer and wraps every image on the
//! page in an [`ImagePlane`]. Each call to [`Gallery::frame`] then advances
//! the scroll driver, moves every plane to its image's scroll-adjusted
//! position and renders once.
//!
//! The image set is a snapshot: images inserted into the page after
//! construction are never picked up, and meshes are never removed.

use std::any::Any;

use crate::{
    camera::core::Camera,
    error::GalleryError,
    host::Host,
    layout::Viewport,
    options::Options,
    renderer::FrameRenderer,
    scene::{ImagePlane, Scene},
    scroll::ScrollDriver,
    util::frame_timing::FrameTiming,
};

/// Loop lifecycle. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Constructed but not yet animating.
    Idle,
    /// Frames are processed and rescheduled.
    Running,
    /// Stopped for good; frames are ignored.
    Stopped,
}

/// Resolve the output canvas named by `options.dom.canvas_selector`.
///
/// # Errors
///
/// Returns [`GalleryError::MissingCanvas`] if nothing on the page matches.
pub fn locate_canvas<H: Host>(
    host: &H,
    options: &Options,
) -> Result<H::Canvas, GalleryError> {
    let selector = &options.dom.canvas_selector;
    host.find_canvas(selector)
        .ok_or_else(|| GalleryError::MissingCanvas(selector.clone()))
}

/// Owns the scene, camera, renderer and scroll driver of one page.
pub struct Gallery<H: Host, R, S> {
    host: H,
    canvas: H::Canvas,
    renderer: R,
    scroll: S,
    options: Options,
    scene: Scene,
    camera: Camera,
    planes: Vec<ImagePlane<H::Image>>,
    viewport: Viewport,
    pixel_ratio: f64,
    /// Last offset reported through [`Gallery::on_scroll`]. Frames read the
    /// driver directly, so this only mirrors it between frames.
    current_scroll: f32,
    state: RunState,
    timing: FrameTiming,
    subscriptions: Vec<Box<dyn Any>>,
}

impl<H, R, S> Gallery<H, R, S>
where
    H: Host,
    R: FrameRenderer,
    S: ScrollDriver,
{
    /// Build the gallery for `host` and start the loop.
    ///
    /// Images that are not decoded yet get a plane without a mesh; it is
    /// filled in by a later frame once the pixels are available.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::MissingCanvas`] if the page has no canvas
    /// matching the configured selector.
    pub fn new(
        host: H,
        mut renderer: R,
        scroll: S,
        options: Options,
    ) -> Result<Self, GalleryError> {
        let canvas = locate_canvas(&host, &options)?;

        let viewport = host.window_size();
        let camera = Camera::pixel_aligned(viewport, &options.camera);
        let pixel_ratio = options
            .renderer
            .clamp_pixel_ratio(host.device_pixel_ratio());
        renderer.set_pixel_ratio(pixel_ratio);
        renderer.set_size(viewport);

        let current_scroll = scroll.scroll();
        let mut scene = Scene::new();
        let planes: Vec<_> = host
            .images(&options.dom.image_selector)
            .into_iter()
            .map(|image| {
                ImagePlane::new(
                    image,
                    viewport,
                    current_scroll,
                    options.renderer.max_texture_size,
                    &mut scene,
                )
            })
            .collect();
        log::info!(
            "gallery: {} images, {} ready, viewport {}x{} @ {}",
            planes.len(),
            scene.len(),
            viewport.width,
            viewport.height,
            pixel_ratio
        );

        let mut gallery = Self {
            host,
            canvas,
            renderer,
            scroll,
            options,
            scene,
            camera,
            planes,
            viewport,
            pixel_ratio,
            current_scroll,
            state: RunState::Idle,
            timing: FrameTiming::new(),
            subscriptions: Vec::new(),
        };
        gallery.resize();
        gallery.start();
        Ok(gallery)
    }

    /// Re-read the window size and pixel ratio and propagate them to the
    /// camera, the renderer and the scroll limit.
    pub fn resize(&mut self) {
        self.viewport = self.host.window_size();
        self.pixel_ratio = self
            .options
            .renderer
            .clamp_pixel_ratio(self.host.device_pixel_ratio());

        self.camera.fit_viewport(self.viewport);
        self.renderer.set_pixel_ratio(self.pixel_ratio);
        self.renderer.set_size(self.viewport);
        self.scroll.set_limit(self.host.scroll_limit());

        log::debug!(
            "resize: {}x{}, fov {:.4}",
            self.viewport.width,
            self.viewport.height,
            self.camera.fovy
        );
    }

    /// Run one loop iteration at `timestamp_ms` and report whether another
    /// frame should be scheduled.
    ///
    /// The scroll driver advances first, then every plane is moved to the
    /// new offset, then the scene is rendered once.
    ///
    /// # Errors
    ///
    /// Propagates render failures the renderer could not recover from.
    pub fn frame(&mut self, timestamp_ms: f64) -> Result<bool, GalleryError> {
        if self.state != RunState::Running {
            return Ok(false);
        }
        let _ = self.timing.tick(timestamp_ms);

        self.scroll.raf(timestamp_ms);
        let scroll = self.scroll.scroll();
        for plane in &mut self.planes {
            plane.update(self.viewport, scroll, &mut self.scene);
        }
        self.renderer.render(&self.scene, &self.camera)?;

        Ok(self.state == RunState::Running)
    }

    /// Record the driver's current offset.
    pub fn on_scroll(&mut self) {
        self.current_scroll = self.scroll.scroll();
    }

    /// Move from `Idle` to `Running`. No effect once stopped.
    pub fn start(&mut self) {
        if self.state == RunState::Idle {
            self.state = RunState::Running;
        }
    }

    /// Stop the loop; the next [`Gallery::frame`] does nothing.
    pub fn stop(&mut self) {
        if self.state != RunState::Stopped {
            log::info!("gallery stopped after {} frames", self.timing.frames());
        }
        self.state = RunState::Stopped;
    }

    /// Stop the loop and release every held subscription.
    pub fn teardown(&mut self) {
        self.stop();
        self.subscriptions.clear();
    }

    /// Keep `subscription` alive until [`Gallery::teardown`].
    pub fn hold(&mut self, subscription: impl Any) {
        self.subscriptions.push(Box::new(subscription));
    }

    /// Number of subscriptions currently held.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Current loop state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// One wrapper per image found at construction.
    #[must_use]
    pub fn planes(&self) -> &[ImagePlane<H::Image>] {
        &self.planes
    }

    /// The scene drawn each frame.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The pixel-aligned camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The renderer.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The renderer, mutably.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// The scroll driver.
    #[must_use]
    pub fn scroll_driver(&self) -> &S {
        &self.scroll
    }

    /// The scroll driver, mutably (to feed it input).
    pub fn scroll_driver_mut(&mut self) -> &mut S {
        &mut self.scroll
    }

    /// The host page.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The output canvas.
    #[must_use]
    pub fn canvas(&self) -> &H::Canvas {
        &self.canvas
    }

    /// Viewport as of the last resize.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Clamped pixel ratio passed to the renderer.
    #[must_use]
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Offset recorded by the last [`Gallery::on_scroll`].
    #[must_use]
    pub fn current_scroll(&self) -> f32 {
        self.current_scroll
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.timing.fps()
    }

    /// Options the gallery was built with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        camera::core::pixel_aligned_fovy,
        host::{ImageDescription, PageDescription, StaticPage},
        layout::Rect,
        renderer::RecordingRenderer,
        scene::PlaneState,
        scroll::{FixedScroll, SmoothScroll},
    };

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn page(width: f32, height: f32, images: Vec<ImageDescription>) -> StaticPage {
        let mut description = PageDescription::new(width, height);
        description.images = images;
        StaticPage::new(description)
    }

    fn image(label: &str, top: f32) -> ImageDescription {
        ImageDescription::new(label, Rect::new(100.0, top, 400.0, 300.0))
    }

    fn gallery(
        page: &StaticPage,
    ) -> Gallery<StaticPage, RecordingRenderer, FixedScroll> {
        Gallery::new(
            page.clone(),
            RecordingRenderer::new(),
            FixedScroll::default(),
            Options::default(),
        )
        .unwrap()
    }

    #[test]
    fn one_plane_per_image() {
        for count in [0, 1, 7] {
            let images = (0..count)
                .map(|i| image(&format!("{i}.jpg"), i as f32 * 400.0))
                .collect();
            let page = page(1024.0, 768.0, images);
            let gallery = gallery(&page);
            assert_eq!(gallery.planes().len(), count);
            assert_eq!(gallery.scene().len(), count);
        }
    }

    #[test]
    fn images_added_after_construction_are_ignored() {
        let page = page(1024.0, 768.0, vec![image("a.jpg", 0.0)]);
        let mut gallery = gallery(&page);
        page.push_image(image("late.jpg", 500.0));

        for i in 0..3 {
            assert!(gallery.frame(f64::from(i) * FRAME_MS).unwrap());
        }
        assert_eq!(gallery.planes().len(), 1);
        assert_eq!(gallery.scene().len(), 1);
    }

    #[test]
    fn pending_image_joins_scene_once_loaded() {
        let page = page(
            1024.0,
            768.0,
            vec![image("a.jpg", 0.0), image("b.jpg", 400.0).pending()],
        );
        let mut gallery = gallery(&page);
        assert_eq!(gallery.planes().len(), 2);
        assert_eq!(gallery.scene().len(), 1);
        assert_eq!(gallery.planes()[1].state(), PlaneState::NotReady);

        assert!(gallery.frame(0.0).unwrap());
        assert_eq!(gallery.scene().len(), 1);

        assert!(page.mark_loaded(1));
        assert!(gallery.frame(FRAME_MS).unwrap());
        assert_eq!(gallery.scene().len(), 2);
        assert!(matches!(gallery.planes()[1].state(), PlaneState::Ready(_)));
        assert_eq!(gallery.renderer().last_frame().unwrap().planes.len(), 2);
    }

    #[test]
    fn pixel_ratio_is_capped() {
        for (dpr, expected) in [(1.0, 1.0), (2.0, 2.0), (3.0, 2.0)] {
            let page = page(800.0, 600.0, Vec::new());
            page.set_device_pixel_ratio(dpr);
            let gallery = gallery(&page);
            assert_eq!(gallery.pixel_ratio(), expected);
            assert_eq!(gallery.renderer().pixel_ratio(), expected);
            assert!(gallery.pixel_ratio() <= 2.0);
        }
    }

    #[test]
    fn desktop_page_with_two_images_on_a_dense_display() {
        let page = page(
            1024.0,
            768.0,
            vec![
                ImageDescription::new("a.jpg", Rect::new(0.0, 100.0, 400.0, 300.0)),
                ImageDescription::new("b.jpg", Rect::new(500.0, 1200.0, 400.0, 600.0)),
            ],
        );
        page.set_device_pixel_ratio(3.0);
        let mut gallery = gallery(&page);

        assert_eq!(gallery.planes().len(), 2);
        assert_eq!(gallery.pixel_ratio(), 2.0);
        assert!((gallery.camera().aspect - 4.0 / 3.0).abs() < 1e-6);
        assert!((gallery.camera().fovy - pixel_aligned_fovy(768.0, 1.0)).abs() < 1e-4);
        assert_eq!(gallery.renderer().size(), Viewport::new(1024.0, 768.0));

        assert!(gallery.frame(0.0).unwrap());
        let frame = gallery.renderer().last_frame().unwrap();
        // x = 0 - 512 + 200, y = -100 + 384 - 150
        assert_eq!(frame.planes[0].position.x, -312.0);
        assert_eq!(frame.planes[0].position.y, 134.0);
        // x = 500 - 512 + 200, y = -1200 + 384 - 300
        assert_eq!(frame.planes[1].position.x, 188.0);
        assert_eq!(frame.planes[1].position.y, -1116.0);
    }

    #[test]
    fn resize_updates_camera_and_renderer() {
        let page = page(1024.0, 768.0, vec![image("a.jpg", 0.0)]);
        let mut gallery = gallery(&page);

        page.resize_window(500.0, 800.0);
        gallery.resize();

        assert_eq!(gallery.viewport(), Viewport::new(500.0, 800.0));
        assert!((gallery.camera().aspect - 500.0 / 800.0).abs() < 1e-6);
        assert!((gallery.camera().fovy - 179.713_52).abs() < 1e-3);
        assert_eq!(gallery.renderer().size(), Viewport::new(500.0, 800.0));

        assert!(gallery.frame(0.0).unwrap());
        let frame = gallery.renderer().last_frame().unwrap();
        assert_eq!(frame.aspect, gallery.camera().aspect);
        // x = 100 - 250 + 200
        assert_eq!(frame.planes[0].position.x, 50.0);
    }

    #[test]
    fn resize_refreshes_scroll_limit() {
        let mut description = PageDescription::new(800.0, 600.0);
        description.document_height = Some(3000.0);
        let page = StaticPage::new(description);
        let mut gallery = Gallery::new(
            page.clone(),
            RecordingRenderer::new(),
            SmoothScroll::new(Default::default()),
            Options::default(),
        )
        .unwrap();
        assert_eq!(gallery.scroll_driver().limit(), 2400.0);

        page.resize_window(800.0, 1000.0);
        gallery.resize();
        assert_eq!(gallery.scroll_driver().limit(), 2000.0);
    }

    #[test]
    fn missing_canvas_is_an_error() {
        let mut description = PageDescription::new(800.0, 600.0);
        description.canvases.clear();
        let page = StaticPage::new(description);

        let result = Gallery::new(
            page,
            RecordingRenderer::new(),
            FixedScroll::default(),
            Options::default(),
        );
        assert!(matches!(
            result,
            Err(GalleryError::MissingCanvas(selector)) if selector == "canvas.webgl"
        ));
    }

    #[test]
    fn starts_running_and_stops_deterministically() {
        let page = page(800.0, 600.0, vec![image("a.jpg", 0.0)]);
        let mut gallery = gallery(&page);
        assert_eq!(gallery.state(), RunState::Running);

        assert!(gallery.frame(0.0).unwrap());
        assert!(gallery.frame(FRAME_MS).unwrap());
        gallery.stop();
        assert_eq!(gallery.state(), RunState::Stopped);

        assert!(!gallery.frame(2.0 * FRAME_MS).unwrap());
        assert_eq!(gallery.renderer().frames().len(), 2);

        gallery.start();
        assert_eq!(gallery.state(), RunState::Stopped);
    }

    #[test]
    fn teardown_releases_subscriptions() {
        struct Guard(Rc<RefCell<bool>>);
        impl Drop for Guard {
            fn drop(&mut self) {
                *self.0.borrow_mut() = true;
            }
        }

        let page = page(800.0, 600.0, Vec::new());
        let mut gallery = gallery(&page);
        let released = Rc::new(RefCell::new(false));
        gallery.hold(Guard(Rc::clone(&released)));
        assert_eq!(gallery.subscription_count(), 1);

        gallery.teardown();
        assert!(*released.borrow());
        assert_eq!(gallery.subscription_count(), 0);
        assert_eq!(gallery.state(), RunState::Stopped);
    }

    /// Scroll driver that jumps by a fixed step per frame and logs each call.
    struct SteppingScroll {
        offset: f32,
        step: f32,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl ScrollDriver for SteppingScroll {
        fn scroll(&self) -> f32 {
            self.offset
        }

        fn raf(&mut self, _timestamp_ms: f64) {
            self.offset += self.step;
            self.log.borrow_mut().push("raf");
        }

        fn set_limit(&mut self, _limit: f32) {}

        fn is_scrolling(&self) -> bool {
            true
        }
    }

    /// Renderer that logs each call and wraps a recorder.
    struct LoggingRenderer {
        inner: RecordingRenderer,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl FrameRenderer for LoggingRenderer {
        fn set_size(&mut self, viewport: Viewport) {
            self.inner.set_size(viewport);
        }

        fn set_pixel_ratio(&mut self, pixel_ratio: f64) {
            self.inner.set_pixel_ratio(pixel_ratio);
        }

        fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), GalleryError> {
            self.log.borrow_mut().push("render");
            self.inner.render(scene, camera)
        }
    }

    #[test]
    fn scroll_advances_before_planes_move_and_render() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let page = page(800.0, 600.0, vec![image("a.jpg", 0.0)]);
        let mut gallery = Gallery::new(
            page,
            LoggingRenderer {
                inner: RecordingRenderer::new(),
                log: Rc::clone(&log),
            },
            SteppingScroll {
                offset: 0.0,
                step: 50.0,
                log: Rc::clone(&log),
            },
            Options::default(),
        )
        .unwrap();

        assert!(gallery.frame(0.0).unwrap());
        assert!(gallery.frame(FRAME_MS).unwrap());
        assert_eq!(*log.borrow(), ["raf", "render", "raf", "render"]);

        // The rendered plane already reflects this frame's offset.
        let frames = gallery.renderer().inner.frames();
        // y = -(0 - 50) + 300 - 150
        assert_eq!(frames[0].planes[0].position.y, 200.0);
        assert_eq!(frames[1].planes[0].position.y, 250.0);
        assert_eq!(gallery.planes()[0].scroll(), 100.0);
    }

    #[test]
    fn on_scroll_caches_driver_offset() {
        let page = page(800.0, 600.0, Vec::new());
        let mut gallery = gallery(&page);
        gallery.scroll_driver_mut().offset = 120.0;
        assert_eq!(gallery.current_scroll(), 0.0);
        gallery.on_scroll();
        assert_eq!(gallery.current_scroll(), 120.0);
    }

    #[test]
    fn smooth_scroll_moves_planes_up_over_frames() {
        let mut description = PageDescription::new(800.0, 600.0);
        description.document_height = Some(4000.0);
        description.images = vec![image("a.jpg", 1000.0)];
        let page = StaticPage::new(description);
        let mut gallery = Gallery::new(
            page,
            RecordingRenderer::last_frame_only(),
            SmoothScroll::new(Default::default()),
            Options::default(),
        )
        .unwrap();

        gallery.scroll_driver_mut().handle_wheel(500.0);
        let mut previous = f32::NEG_INFINITY;
        for i in 0..120 {
            assert!(gallery.frame(f64::from(i) * FRAME_MS).unwrap());
            let y = gallery.renderer().last_frame().unwrap().planes[0].position.y;
            assert!(y >= previous);
            previous = y;
        }
        // y = -(1000 - 500) + 300 - 150
        assert_eq!(previous, -350.0);
        assert_eq!(gallery.renderer().frames().len(), 1);
    }

    #[test]
    fn demo_page_runs_headless() {
        let page = StaticPage::from_toml_str(include_str!("../../demos/page.toml"))
            .unwrap();
        let mut gallery = Gallery::new(
            page,
            RecordingRenderer::last_frame_only(),
            SmoothScroll::new(Default::default()),
            Options::default(),
        )
        .unwrap();
        assert_eq!(gallery.planes().len(), 4);
        assert_eq!(gallery.scene().len(), 3);
        assert_eq!(gallery.pixel_ratio(), 2.0);
        assert_eq!(gallery.scroll_driver().limit(), 1800.0);

        gallery.scroll_driver_mut().handle_wheel(600.0);
        for i in 0..180 {
            assert!(gallery.frame(f64::from(i) * FRAME_MS).unwrap());
        }
        let frame = gallery.renderer().last_frame().unwrap();
        assert_eq!(gallery.scroll_driver().scroll(), 600.0);
        // y = -(120 - 600) + 400 - 180
        assert_eq!(frame.planes[0].position.y, 700.0);
        assert_eq!(frame.planes[0].label, "images/harbor.jpg");
    }
}
