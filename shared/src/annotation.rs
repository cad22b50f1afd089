//! Freehand strokes stored in image space and replayed through the current
//! transform on every render pass.

use crate::surface::{ImagePlacement, RenderSurface};
use crate::viewport::{Mode, ViewportState};
use crate::{normalize_point, Color, Point, Stroke};

pub const MIN_STROKE_WIDTH: f64 = 0.5;
pub const MAX_STROKE_WIDTH: f64 = 64.0;
const FALLBACK_STROKE_WIDTH: f64 = 3.0;

pub fn sanitize_width(width: f64) -> f64 {
    let width = if width.is_finite() {
        width
    } else {
        FALLBACK_STROKE_WIDTH
    };
    width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH)
}

#[derive(Debug, Default)]
pub struct AnnotationLayer {
    strokes: Vec<Stroke>,
    /// Index of the stroke being drawn; `None` outside a drawing session.
    active: Option<usize>,
}

impl AnnotationLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    pub fn begin_stroke(
        &mut self,
        state: &ViewportState,
        screen: Point,
        color: Color,
        width: f64,
    ) -> bool {
        if state.mode != Mode::Drawing {
            log::debug!("Ignoring stroke start outside drawing mode");
            return false;
        }
        if !state.is_loaded() {
            log::debug!("Ignoring stroke start before the image has loaded");
            return false;
        }
        let Some(point) = normalize_point(state.transform.screen_to_model(screen)) else {
            return false;
        };
        self.strokes.push(Stroke {
            color,
            width: sanitize_width(width),
            points: vec![point],
        });
        self.active = Some(self.strokes.len() - 1);
        log::debug!(
            "Stroke {} started at ({:.1}, {:.1})",
            self.strokes.len() - 1,
            point.x,
            point.y
        );
        true
    }

    pub fn extend_stroke(&mut self, state: &ViewportState, screen: Point) -> bool {
        let Some(index) = self.active else {
            return false;
        };
        let Some(point) = normalize_point(state.transform.screen_to_model(screen)) else {
            return false;
        };
        match self.strokes.get_mut(index) {
            Some(stroke) => {
                stroke.points.push(point);
                true
            }
            None => {
                self.active = None;
                false
            }
        }
    }

    /// Close the drawing session; the stroke is final from here on.
    pub fn end_stroke(&mut self) -> bool {
        match self.active.take() {
            Some(index) => {
                let points = self.strokes.get(index).map_or(0, |stroke| stroke.points.len());
                log::debug!("Stroke {index} finished with {points} points");
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.active = None;
    }

    /// Replace every stroke. Non-finite points are dropped, and so are
    /// strokes left without points.
    pub fn initialize_strokes(&mut self, strokes: Vec<Stroke>) {
        let mut sanitized = Vec::with_capacity(strokes.len());
        for mut stroke in strokes {
            stroke.points = stroke
                .points
                .into_iter()
                .filter_map(normalize_point)
                .collect();
            if stroke.points.is_empty() {
                continue;
            }
            stroke.width = sanitize_width(stroke.width);
            sanitized.push(stroke);
        }
        self.strokes = sanitized;
        self.active = None;
    }

    /// Full render pass: clear, background image, then every stroke in
    /// insertion order. Does nothing until the image has loaded.
    pub fn redraw_all<S: RenderSurface + ?Sized>(&self, state: &ViewportState, surface: &mut S) {
        let Some(image) = state.image_size() else {
            return;
        };
        let transform = &state.transform;
        surface.clear(state.viewport_rect());
        surface.draw_image(ImagePlacement {
            x: transform.offset_x,
            y: transform.offset_y,
            scale: transform.scale(),
            width: image.width,
            height: image.height,
        });
        let mut screen_points = Vec::new();
        for stroke in &self.strokes {
            screen_points.clear();
            screen_points.extend(
                stroke
                    .points
                    .iter()
                    .map(|point| transform.model_to_screen(*point)),
            );
            // One point renders as a zero-length segment, i.e. a round dot.
            match screen_points.len() {
                0 => continue,
                1 => screen_points.push(screen_points[0]),
                _ => {}
            }
            surface.stroke_polyline(
                &screen_points,
                stroke.color,
                stroke.width * transform.scale(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{Command, RecordingSurface};
    use crate::viewport::{ImageSize, ImageState};
    use crate::ViewerConfig;

    fn drawing_state() -> ViewportState {
        let mut state = ViewportState::new(ViewerConfig::default(), 800.0, 600.0);
        state.image = ImageState::Loaded(ImageSize {
            width: 400.0,
            height: 300.0,
        });
        state.transform.center_on(400.0, 300.0, 800.0, 600.0);
        state.mode = Mode::Drawing;
        state
    }

    #[test]
    fn stroke_points_are_stored_in_image_space() {
        let state = drawing_state();
        let mut layer = AnnotationLayer::new();
        assert!(layer.begin_stroke(&state, Point::new(210.0, 160.0), Color::default(), 3.0));
        assert!(layer.extend_stroke(&state, Point::new(220.0, 170.0)));
        assert!(layer.end_stroke());
        assert_eq!(
            layer.strokes()[0].points,
            vec![Point::new(10.0, 10.0), Point::new(20.0, 20.0)]
        );
    }

    #[test]
    fn begin_is_ignored_in_interaction_mode() {
        let mut state = drawing_state();
        state.mode = Mode::Interaction;
        let mut layer = AnnotationLayer::new();
        assert!(!layer.begin_stroke(&state, Point::new(1.0, 1.0), Color::default(), 3.0));
        assert!(layer.strokes().is_empty());
        assert!(!layer.is_drawing());
    }

    #[test]
    fn begin_is_ignored_before_image_load() {
        let mut state = drawing_state();
        state.image = ImageState::Pending;
        let mut layer = AnnotationLayer::new();
        assert!(!layer.begin_stroke(&state, Point::new(1.0, 1.0), Color::default(), 3.0));
        assert!(layer.strokes().is_empty());
    }

    #[test]
    fn extend_without_session_is_noop() {
        let state = drawing_state();
        let mut layer = AnnotationLayer::new();
        assert!(!layer.extend_stroke(&state, Point::new(5.0, 5.0)));
        layer.begin_stroke(&state, Point::new(0.0, 0.0), Color::default(), 3.0);
        layer.end_stroke();
        assert!(!layer.extend_stroke(&state, Point::new(5.0, 5.0)));
        assert_eq!(layer.strokes()[0].points.len(), 1);
        assert!(!layer.end_stroke());
    }

    #[test]
    fn single_point_stroke_renders_as_dot() {
        let state = drawing_state();
        let mut layer = AnnotationLayer::new();
        layer.begin_stroke(&state, Point::new(300.0, 250.0), Color::rgb(1, 2, 3), 4.0);
        layer.end_stroke();
        let mut surface = RecordingSurface::default();
        layer.redraw_all(&state, &mut surface);
        assert_eq!(
            surface.polylines(),
            vec![&Command::Polyline {
                points: vec![Point::new(300.0, 250.0), Point::new(300.0, 250.0)],
                color: Color::rgb(1, 2, 3),
                width: 4.0,
            }]
        );
    }

    #[test]
    fn redraw_orders_clear_image_then_strokes() {
        let state = drawing_state();
        let mut layer = AnnotationLayer::new();
        layer.begin_stroke(&state, Point::new(200.0, 150.0), Color::default(), 2.0);
        layer.extend_stroke(&state, Point::new(250.0, 150.0));
        layer.end_stroke();
        layer.begin_stroke(&state, Point::new(400.0, 400.0), Color::rgb(0, 0, 0), 2.0);
        layer.end_stroke();

        let mut surface = RecordingSurface::default();
        layer.redraw_all(&state, &mut surface);
        let commands = surface.take();
        assert_eq!(commands.len(), 4);
        assert!(matches!(commands[0], Command::Clear(_)));
        assert_eq!(
            commands[1],
            Command::Image(ImagePlacement {
                x: 200.0,
                y: 150.0,
                scale: 1.0,
                width: 400.0,
                height: 300.0,
            })
        );
        match &commands[3] {
            Command::Polyline { color, .. } => assert_eq!(*color, Color::rgb(0, 0, 0)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn redraw_is_idempotent_and_tracks_transform() {
        let mut state = drawing_state();
        let mut layer = AnnotationLayer::new();
        layer.begin_stroke(&state, Point::new(210.0, 160.0), Color::default(), 3.0);
        layer.extend_stroke(&state, Point::new(230.0, 160.0));
        layer.end_stroke();

        let mut first = RecordingSurface::default();
        let mut second = RecordingSurface::default();
        layer.redraw_all(&state, &mut first);
        layer.redraw_all(&state, &mut second);
        assert_eq!(first.commands, second.commands);

        state.transform.set_scale(2.0);
        state.transform.offset_x = 0.0;
        state.transform.offset_y = 0.0;
        let mut zoomed = RecordingSurface::default();
        layer.redraw_all(&state, &mut zoomed);
        assert_eq!(
            zoomed.polylines(),
            vec![&Command::Polyline {
                points: vec![Point::new(20.0, 20.0), Point::new(60.0, 20.0)],
                color: Color::default(),
                width: 6.0,
            }]
        );
    }

    #[test]
    fn redraw_before_load_draws_nothing() {
        let mut state = drawing_state();
        state.image = ImageState::Pending;
        let layer = AnnotationLayer::new();
        let mut surface = RecordingSurface::default();
        layer.redraw_all(&state, &mut surface);
        assert!(surface.commands.is_empty());
    }

    #[test]
    fn initialize_replaces_and_sanitizes() {
        let state = drawing_state();
        let mut layer = AnnotationLayer::new();
        layer.begin_stroke(&state, Point::new(0.0, 0.0), Color::default(), 3.0);
        layer.initialize_strokes(vec![
            Stroke {
                color: Color::rgb(9, 9, 9),
                width: f64::INFINITY,
                points: vec![Point::new(1.0, 2.0), Point::new(f64::NAN, 0.0)],
            },
            Stroke {
                color: Color::default(),
                width: 2.0,
                points: vec![Point::new(f64::NAN, f64::NAN)],
            },
        ]);
        assert!(!layer.is_drawing());
        assert_eq!(layer.strokes().len(), 1);
        assert_eq!(layer.strokes()[0].points, vec![Point::new(1.0, 2.0)]);
        assert_eq!(layer.strokes()[0].width, 3.0);
    }

    #[test]
    fn clear_ends_session() {
        let state = drawing_state();
        let mut layer = AnnotationLayer::new();
        layer.begin_stroke(&state, Point::new(0.0, 0.0), Color::default(), 3.0);
        layer.clear();
        assert!(layer.strokes().is_empty());
        assert!(!layer.extend_stroke(&state, Point::new(1.0, 1.0)));
    }

    #[test]
    fn width_is_clamped() {
        assert_eq!(sanitize_width(0.0), MIN_STROKE_WIDTH);
        assert_eq!(sanitize_width(1000.0), MAX_STROKE_WIDTH);
        assert_eq!(sanitize_width(f64::NAN), 3.0);
    }
}
