//! Affine mapping between screen space and image (model) space.
//!
//! `screen = model * scale + offset`. Scale is uniform and always lies inside
//! the transform's [`ScaleBounds`].

use crate::Point;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleBounds {
    pub min: f64,
    pub max: f64,
}

impl ScaleBounds {
    /// Never panics; with inverted bounds `max` wins.
    pub fn clamp(self, scale: f64) -> f64 {
        scale.max(self.min).min(self.max)
    }
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self { min: 0.5, max: 3.0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportTransform {
    pub offset_x: f64,
    pub offset_y: f64,
    scale: f64,
    bounds: ScaleBounds,
}

impl ViewportTransform {
    pub fn new(scale: f64, bounds: ScaleBounds) -> Self {
        let scale = if scale.is_finite() { scale } else { 1.0 };
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: bounds.clamp(scale),
            bounds,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn bounds(&self) -> ScaleBounds {
        self.bounds
    }

    pub fn screen_to_model(&self, point: Point) -> Point {
        Point {
            x: (point.x - self.offset_x) / self.scale,
            y: (point.y - self.offset_y) / self.scale,
        }
    }

    pub fn model_to_screen(&self, point: Point) -> Point {
        Point {
            x: point.x * self.scale + self.offset_x,
            y: point.y * self.scale + self.offset_y,
        }
    }

    /// Center an image of the given size inside the viewport at the current scale.
    pub fn center_on(
        &mut self,
        image_width: f64,
        image_height: f64,
        viewport_width: f64,
        viewport_height: f64,
    ) {
        self.offset_x = (viewport_width - image_width * self.scale) / 2.0;
        self.offset_y = (viewport_height - image_height * self.scale) / 2.0;
    }

    /// Clamp and apply a new scale. Offsets are untouched, so no screen point
    /// is anchored; callers that zoom about a point re-anchor afterwards.
    pub fn set_scale(&mut self, scale: f64) {
        if !scale.is_finite() {
            return;
        }
        self.scale = self.bounds.clamp(scale);
    }

    /// Move the offset so that `model` lands on `screen` at the current scale.
    pub fn anchor(&mut self, model: Point, screen: Point) {
        self.offset_x = screen.x - model.x * self.scale;
        self.offset_y = screen.y - model.y * self.scale;
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::new(1.0, ScaleBounds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
    }

    fn sample_transforms() -> Vec<ViewportTransform> {
        let mut out = Vec::new();
        for &scale in &[0.5, 0.73, 1.0, 1.9, 3.0] {
            for &(ox, oy) in &[(0.0, 0.0), (200.0, 150.0), (-431.5, 77.25)] {
                let mut transform = ViewportTransform::new(scale, ScaleBounds::default());
                transform.offset_x = ox;
                transform.offset_y = oy;
                out.push(transform);
            }
        }
        out
    }

    #[test]
    fn round_trips_in_both_directions() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(123.4, -56.7),
            Point::new(-1000.0, 2500.5),
        ];
        for transform in sample_transforms() {
            for &point in &points {
                let there = transform.model_to_screen(point);
                assert!(approx_eq(transform.screen_to_model(there), point));
                let back = transform.screen_to_model(point);
                assert!(approx_eq(transform.model_to_screen(back), point));
            }
        }
    }

    #[test]
    fn centers_image_in_viewport() {
        let mut transform = ViewportTransform::default();
        transform.center_on(400.0, 300.0, 800.0, 600.0);
        assert_eq!(transform.offset_x, 200.0);
        assert_eq!(transform.offset_y, 150.0);
    }

    #[test]
    fn centering_accounts_for_scale() {
        let mut transform = ViewportTransform::new(2.0, ScaleBounds::default());
        transform.center_on(400.0, 300.0, 800.0, 600.0);
        assert_eq!(transform.offset_x, 0.0);
        assert_eq!(transform.offset_y, 0.0);
    }

    #[test]
    fn set_scale_clamps_without_moving_offset() {
        let mut transform = ViewportTransform::default();
        transform.offset_x = 12.0;
        transform.set_scale(10.0);
        assert_eq!(transform.scale(), 3.0);
        transform.set_scale(0.01);
        assert_eq!(transform.scale(), 0.5);
        transform.set_scale(f64::NAN);
        assert_eq!(transform.scale(), 0.5);
        assert_eq!(transform.offset_x, 12.0);
    }

    #[test]
    fn initial_scale_is_clamped() {
        let transform = ViewportTransform::new(8.0, ScaleBounds { min: 0.5, max: 3.0 });
        assert_eq!(transform.scale(), 3.0);
    }

    #[test]
    fn malformed_bounds_do_not_panic() {
        let inverted = ScaleBounds { min: 3.0, max: 0.5 };
        assert_eq!(inverted.clamp(1.0), 0.5);
        let open_top = ScaleBounds {
            min: 0.5,
            max: f64::NAN,
        };
        assert_eq!(open_top.clamp(1.0), 1.0);
        assert_eq!(open_top.clamp(0.1), 0.5);
    }

    #[test]
    fn anchor_places_model_point_on_screen_point() {
        let mut transform = ViewportTransform::new(1.7, ScaleBounds::default());
        let model = Point::new(33.0, -8.0);
        let screen = Point::new(410.0, 95.0);
        transform.anchor(model, screen);
        assert!(approx_eq(transform.model_to_screen(model), screen));
    }
}
