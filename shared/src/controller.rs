//! Pan and zoom handling.
//!
//! Dragging keeps the model point grabbed at pointer-down under the pointer
//! for the whole gesture. Zooming keeps the model point under the cursor
//! fixed, re-anchoring after the scale has been clamped.

use crate::viewport::{Mode, ViewportState};
use crate::Point;

/// Multiplier applied per keyboard/button zoom step.
pub const ZOOM_STEP_FACTOR: f64 = 1.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragState {
    Idle,
    Dragging {
        anchor_screen: Point,
        anchor_model: Point,
    },
}

#[derive(Debug)]
pub struct PanZoomController {
    drag: DragState,
}

impl Default for PanZoomController {
    fn default() -> Self {
        Self::new()
    }
}

impl PanZoomController {
    pub fn new() -> Self {
        Self {
            drag: DragState::Idle,
        }
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Start a drag. Only honored in interaction mode.
    pub fn pointer_down(&mut self, state: &ViewportState, position: Point) -> bool {
        if state.mode != Mode::Interaction {
            return false;
        }
        self.drag = DragState::Dragging {
            anchor_screen: position,
            anchor_model: state.transform.screen_to_model(position),
        };
        true
    }

    /// Follow the pointer while dragging. Returns whether the transform moved.
    pub fn pointer_move(&mut self, state: &mut ViewportState, position: Point) -> bool {
        let DragState::Dragging { anchor_model, .. } = self.drag else {
            return false;
        };
        state.transform.anchor(anchor_model, position);
        true
    }

    /// End any drag in progress. Returns whether one was active.
    pub fn release(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.drag = DragState::Idle;
        was_dragging
    }

    pub fn wheel(&mut self, state: &mut ViewportState, cursor: Point, delta_y: f64) -> bool {
        if !delta_y.is_finite() {
            return false;
        }
        let factor = wheel_zoom_factor(delta_y, state.config.zoom_sensitivity);
        zoom_at(state, cursor, factor);
        true
    }
}

pub fn wheel_zoom_factor(delta_y: f64, sensitivity: f64) -> f64 {
    (-sensitivity * delta_y).exp()
}

/// Multiply the scale by `factor` about `cursor`.
///
/// The anchor is taken from the pre-zoom transform and reapplied after the
/// clamp, so at a scale bound the cursor point may drift.
pub fn zoom_at(state: &mut ViewportState, cursor: Point, factor: f64) {
    let anchor_model = state.transform.screen_to_model(cursor);
    let scale = state.transform.scale();
    state.transform.set_scale(scale * factor);
    state.transform.anchor(anchor_model, cursor);
}
