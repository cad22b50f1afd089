use crate::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Other,
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` code.
    pub fn from_dom(button: i16) -> Self {
        if button == 0 {
            PointerButton::Primary
        } else {
            PointerButton::Other
        }
    }
}

/// Raw input, positioned in screen space relative to the canvas origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown { position: Point, button: PointerButton },
    PointerMove { position: Point },
    PointerUp { position: Point },
    PointerLeave,
    Wheel { position: Point, delta_y: f64 },
}
