use crate::{Color, Point};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Where the background image lands on screen: its top-left corner and the
/// uniform scale applied to its natural size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImagePlacement {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub width: f64,
    pub height: f64,
}

/// Drawing operations the viewer issues. All coordinates are screen space.
pub trait RenderSurface {
    fn clear(&mut self, rect: Rect);

    fn draw_image(&mut self, placement: ImagePlacement);

    /// Stroke a connected polyline. Implementations use round caps and joins,
    /// so a zero-length segment shows as a dot of diameter `width`.
    fn stroke_polyline(&mut self, points: &[Point], color: Color, width: f64);
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum Command {
        Clear(Rect),
        Image(ImagePlacement),
        Polyline {
            points: Vec<Point>,
            color: Color,
            width: f64,
        },
    }

    #[derive(Default)]
    pub struct RecordingSurface {
        pub commands: Vec<Command>,
    }

    impl RecordingSurface {
        pub fn polylines(&self) -> Vec<&Command> {
            self.commands
                .iter()
                .filter(|command| matches!(command, Command::Polyline { .. }))
                .collect()
        }

        pub fn take(&mut self) -> Vec<Command> {
            std::mem::take(&mut self.commands)
        }
    }

    impl RenderSurface for RecordingSurface {
        fn clear(&mut self, rect: Rect) {
            self.commands.push(Command::Clear(rect));
        }

        fn draw_image(&mut self, placement: ImagePlacement) {
            self.commands.push(Command::Image(placement));
        }

        fn stroke_polyline(&mut self, points: &[Point], color: Color, width: f64) {
            self.commands.push(Command::Polyline {
                points: points.to_vec(),
                color,
                width,
            });
        }
    }
}
