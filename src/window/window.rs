//! The clipview window.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver};

use crate::color::Color;
use crate::event::WindowEvent;
use crate::renderer::{ModelRenderer, OverlayRenderer, ToneMapping};
use crate::window::canvas::CanvasSetup;
use crate::window::{Canvas, Viewport};

static DEFAULT_WIDTH: u32 = 800u32;
static DEFAULT_HEIGHT: u32 = 600u32;

/// Structure representing a window and the renderers drawing into it.
///
/// This is the main interface with the GPU: a [`crate::scene::Scene`] is drawn
/// by calling [`Window::render`] once per frame.
pub struct Window {
    pub(super) events: Rc<Receiver<WindowEvent>>,
    pub(super) unhandled_events: Rc<RefCell<Vec<WindowEvent>>>,
    pub(super) should_close: bool,
    pub(super) tone_mapping: ToneMapping,
    pub(super) exposure: f32,
    /// Overrides the window scale factor as the drawing buffer pixel ratio.
    pub(super) pixel_ratio: Option<f64>,
    pub(super) viewport: Viewport,
    pub(super) canvas: Canvas,
    pub(super) model_renderer: ModelRenderer,
    pub(super) overlay_renderer: OverlayRenderer,
}

impl Window {
    /// Indicates whether this window should be closed.
    #[inline]
    pub fn should_close(&self) -> bool {
        self.should_close
    }

    /// The drawing buffer width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.canvas.size().0
    }

    /// The drawing buffer height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.canvas.size().1
    }

    /// The size of the window client area, in physical pixels.
    #[inline]
    pub fn window_size(&self) -> (u32, u32) {
        self.canvas.inner_size()
    }

    /// The window scale factor (physical pixels per logical pixel).
    #[inline]
    pub fn scale_factor(&self) -> f64 {
        self.canvas.scale_factor()
    }

    /// The current drawing buffer viewport.
    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Sets the window title.
    pub fn set_title(&mut self, title: &str) {
        self.canvas.set_title(title)
    }

    /// Closes the window.
    ///
    /// The next call to [`Window::render`] returns `false`.
    #[inline]
    pub fn close(&mut self) {
        self.should_close = true;
    }

    /// Sets the tone mapping operator applied to the lit model.
    #[inline]
    pub fn set_tone_mapping(&mut self, tone_mapping: ToneMapping) {
        self.tone_mapping = tone_mapping;
    }

    /// Sets the exposure applied before tone mapping.
    #[inline]
    pub fn set_exposure(&mut self, exposure: f32) {
        self.exposure = exposure;
    }

    /// Sets the drawing buffer pixel ratio.
    ///
    /// `None` follows the window scale factor, which is the device pixel ratio.
    #[inline]
    pub fn set_pixel_ratio(&mut self, pixel_ratio: Option<f64>) {
        self.pixel_ratio = pixel_ratio;
    }

    /// Queues a solid rectangle drawn over the scene during the next frame.
    ///
    /// Coordinates are in physical window pixels from the top-left corner.
    pub fn draw_overlay_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let (w, h) = self.window_size();
        self.overlay_renderer
            .draw_rect(x, y, width, height, color, w as f32, h as f32);
    }

    /// Opens a new window of 800x600 logical pixels.
    ///
    /// # Example
    /// ```no_run
    /// # use clipview::prelude::*;
    /// # async fn example() {
    /// let mut window = Window::new("clipview").await;
    /// let mut scene = Scene::default();
    /// let mut camera = PerspectiveCamera::default();
    ///
    /// while window.render(&mut scene, &mut camera).await {
    ///     // per-frame code
    /// }
    /// # }
    /// ```
    pub async fn new(title: &str) -> Window {
        Window::new_with_setup(title, DEFAULT_WIDTH, DEFAULT_HEIGHT, CanvasSetup::default()).await
    }

    /// Opens a new window with custom dimensions and setup options.
    pub async fn new_with_setup(title: &str, width: u32, height: u32, setup: CanvasSetup) -> Window {
        let (event_send, event_receive) = mpsc::channel();
        let canvas = Canvas::open(title, width, height, setup, event_send).await;
        let (w, h) = canvas.size();
        let viewport = Viewport::new(w, h, canvas.scale_factor());

        Window {
            events: Rc::new(event_receive),
            unhandled_events: Rc::new(RefCell::new(Vec::new())),
            should_close: false,
            tone_mapping: ToneMapping::default(),
            exposure: 1.0,
            pixel_ratio: None,
            viewport,
            canvas,
            model_renderer: ModelRenderer::new(),
            overlay_renderer: OverlayRenderer::new(),
        }
    }
}
