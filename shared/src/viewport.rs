//! The single owner of all viewer state, and the input dispatcher that routes
//! each event to exactly one handler.

use crate::annotation::AnnotationLayer;
use crate::controller::{zoom_at, PanZoomController, ZOOM_STEP_FACTOR};
use crate::input::{InputEvent, PointerButton};
use crate::surface::{Rect, RenderSurface};
use crate::transform::{ScaleBounds, ViewportTransform};
use crate::{Color, Point, Stroke, ViewerConfig};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Interaction,
    Drawing,
}

impl Mode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "interaction" | "pan" => Some(Mode::Interaction),
            "drawing" | "draw" => Some(Mode::Drawing),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

/// Background image availability. Moves to `Loaded` once and stays there.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ImageState {
    #[default]
    Pending,
    Loaded(ImageSize),
}

/// Transform, mode, image and viewport size: everything both the pan/zoom
/// controller and the annotation layer read.
#[derive(Clone, Debug)]
pub struct ViewportState {
    pub transform: ViewportTransform,
    pub mode: Mode,
    pub image: ImageState,
    pub width: f64,
    pub height: f64,
    pub config: ViewerConfig,
}

impl ViewportState {
    /// An invalid config is replaced wholesale by the defaults.
    pub fn new(config: ViewerConfig, width: f64, height: f64) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                log::warn!("Using default viewer config: {err}");
                ViewerConfig::default()
            }
        };
        let bounds = ScaleBounds {
            min: config.min_scale,
            max: config.max_scale,
        };
        let (width, height) = clamp_viewport(&config, width, height);
        Self {
            transform: ViewportTransform::new(config.initial_scale, bounds),
            mode: Mode::Interaction,
            image: ImageState::Pending,
            width,
            height,
            config,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.image, ImageState::Loaded(_))
    }

    pub fn image_size(&self) -> Option<ImageSize> {
        match self.image {
            ImageState::Loaded(size) => Some(size),
            ImageState::Pending => None,
        }
    }

    pub fn viewport_rect(&self) -> Rect {
        Rect {
            x: 0.0,
            y: 0.0,
            width: self.width,
            height: self.height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    fn center_image(&mut self) {
        if let Some(size) = self.image_size() {
            self.transform
                .center_on(size.width, size.height, self.width, self.height);
        }
    }
}

/// Clamp a container size to the configured maxima, never below zero.
pub fn clamp_viewport(config: &ViewerConfig, width: f64, height: f64) -> (f64, f64) {
    (
        width.min(config.viewport_max_width).max(0.0),
        height.min(config.viewport_max_height).max(0.0),
    )
}

pub struct Viewport<S> {
    state: ViewportState,
    controller: PanZoomController,
    annotations: AnnotationLayer,
    surface: S,
}

impl<S: RenderSurface> Viewport<S> {
    pub fn new(config: ViewerConfig, width: f64, height: f64, surface: S) -> Self {
        Self {
            state: ViewportState::new(config, width, height),
            controller: PanZoomController::new(),
            annotations: AnnotationLayer::new(),
            surface,
        }
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn transform(&self) -> &ViewportTransform {
        &self.state.transform
    }

    pub fn controller(&self) -> &PanZoomController {
        &self.controller
    }

    pub fn annotations(&self) -> &AnnotationLayer {
        &self.annotations
    }

    pub fn strokes(&self) -> &[Stroke] {
        self.annotations.strokes()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    /// Switch modes. Gestures already under way are not rewritten; the new
    /// mode decides where the next pointer event goes.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.state.mode != mode {
            log::info!("Mode changed to {mode:?}");
        }
        self.state.mode = mode;
    }

    /// One-shot notification that the background image is ready. Centers it
    /// and performs the first render. Later calls are ignored.
    pub fn image_loaded(&mut self, size: ImageSize) -> bool {
        if self.state.is_loaded() {
            log::warn!("Ignoring repeated image load notification");
            return false;
        }
        if !(size.width.is_finite() && size.height.is_finite()) {
            log::warn!("Ignoring image with non-finite size");
            return false;
        }
        log::info!(
            "Image loaded ({}x{}), viewport {}x{}",
            size.width,
            size.height,
            self.state.width,
            self.state.height
        );
        self.state.image = ImageState::Loaded(size);
        self.state.center_image();
        self.redraw_all();
        true
    }

    /// Dispatch one input event. Returns whether the view was redrawn.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        if !self.state.is_loaded() {
            return false;
        }
        let changed = match event {
            InputEvent::PointerDown { position, button } => {
                if button != PointerButton::Primary {
                    return false;
                }
                match self.state.mode {
                    Mode::Interaction => {
                        self.controller.pointer_down(&self.state, position);
                        false
                    }
                    Mode::Drawing => {
                        let color = self.state.config.brush_color;
                        let width = self.state.config.brush_width;
                        self.annotations
                            .begin_stroke(&self.state, position, color, width)
                    }
                }
            }
            InputEvent::PointerMove { position } => match self.state.mode {
                Mode::Interaction => self.controller.pointer_move(&mut self.state, position),
                Mode::Drawing => self.annotations.extend_stroke(&self.state, position),
            },
            InputEvent::PointerUp { .. } | InputEvent::PointerLeave => {
                self.controller.release();
                self.annotations.end_stroke();
                false
            }
            InputEvent::Wheel { position, delta_y } => {
                self.controller.wheel(&mut self.state, position, delta_y)
            }
        };
        if changed {
            self.redraw_all();
        }
        changed
    }

    pub fn begin_stroke(&mut self, screen: Point, color: Color, width: f64) -> bool {
        let started = self
            .annotations
            .begin_stroke(&self.state, screen, color, width);
        if started {
            self.redraw_all();
        }
        started
    }

    pub fn extend_stroke(&mut self, screen: Point) -> bool {
        let extended = self.annotations.extend_stroke(&self.state, screen);
        if extended {
            self.redraw_all();
        }
        extended
    }

    pub fn end_stroke(&mut self) -> bool {
        self.annotations.end_stroke()
    }

    pub fn clear(&mut self) {
        log::info!("Clearing {} strokes", self.annotations.strokes().len());
        self.annotations.clear();
        self.redraw_all();
    }

    pub fn initialize_strokes(&mut self, strokes: Vec<Stroke>) {
        self.annotations.initialize_strokes(strokes);
        log::info!("Loaded {} strokes", self.annotations.strokes().len());
        self.redraw_all();
    }

    pub fn redraw_all(&mut self) {
        self.annotations.redraw_all(&self.state, &mut self.surface);
    }

    /// Adopt a new container size, keeping the view centre in place.
    pub fn resize(&mut self, width: f64, height: f64) {
        let (width, height) = clamp_viewport(&self.state.config, width, height);
        if !(width.is_finite() && height.is_finite()) {
            return;
        }
        let dx = (width - self.state.width) / 2.0;
        let dy = (height - self.state.height) / 2.0;
        log::debug!(
            "Resizing viewport from {}x{} to {width}x{height}",
            self.state.width,
            self.state.height
        );
        self.state.width = width;
        self.state.height = height;
        self.state.transform.translate(dx, dy);
        self.redraw_all();
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if !self.state.is_loaded() || !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        self.state.transform.translate(dx, dy);
        self.redraw_all();
    }

    /// Zoom one step about the viewport centre; positive zooms in.
    pub fn zoom_step(&mut self, direction: i32) {
        if !self.state.is_loaded() || direction == 0 {
            return;
        }
        let factor = ZOOM_STEP_FACTOR.powi(direction.signum());
        let center = self.state.center();
        zoom_at(&mut self.state, center, factor);
        self.redraw_all();
    }

    /// Back to the initial scale with the image centred.
    pub fn reset_view(&mut self) {
        if !self.state.is_loaded() {
            return;
        }
        let initial = self.state.config.initial_scale;
        self.state.transform.set_scale(initial);
        self.state.center_image();
        self.redraw_all();
    }
}
