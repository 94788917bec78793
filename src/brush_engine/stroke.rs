use serde::{Deserialize, Serialize};

use crate::utils::{color::Color, vector::Vec2};

/// Pressure assumed when the input device reports none.
pub const DEFAULT_PRESSURE: f32 = 0.5;

fn default_pressure() -> f32 {
    DEFAULT_PRESSURE
}

/// One sampled input position in canvas space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_pressure")]
    pub pressure: f32,
}

impl Point {
    pub fn new(x: f32, y: f32, pressure: f32) -> Self {
        Self { x, y, pressure }
    }

    pub fn at(pos: Vec2, pressure: f32) -> Self {
        Self::new(pos.x, pos.y, pressure)
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Same sample moved to `pos`, keeping its pressure.
    pub fn moved_to(self, pos: Vec2) -> Self {
        Self::at(pos, self.pressure)
    }

    pub fn scaled(self, sx: f32, sy: f32) -> Self {
        self.moved_to(self.pos().scale_xy(sx, sy))
    }
}

/// A drawn line: the authoritative geometry plus what is currently displayed.
///
/// `points` and `original_points` always have the same length and index `i`
/// of one corresponds to index `i` of the other. The displayed copy is only
/// ever replaced wholesale, never aliased with the original.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
    original_points: Vec<Point>,
    color: Color,
    base_size: f32,
}

impl Stroke {
    pub fn new(color: Color, base_size: f32) -> Self {
        Self {
            points: Vec::new(),
            original_points: Vec::new(),
            color,
            base_size,
        }
    }

    /// Build a finished stroke whose displayed geometry starts equal to `points`.
    pub fn from_points(points: Vec<Point>, color: Color, base_size: f32) -> Self {
        Self {
            original_points: points.clone(),
            points,
            color,
            base_size,
        }
    }

    /// Displayed geometry.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Authoritative geometry.
    pub fn original_points(&self) -> &[Point] {
        &self.original_points
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn base_size(&self) -> f32 {
        self.base_size
    }

    pub fn len(&self) -> usize {
        self.original_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.original_points.is_empty()
    }

    pub(crate) fn push(&mut self, point: Point) {
        self.points.push(point);
        self.original_points.push(point);
    }

    pub(crate) fn replace_points(&mut self, points: &[Point]) {
        self.points = points.to_vec();
        self.original_points = points.to_vec();
    }

    /// Swap in a freshly computed displayed buffer. Buffers of the wrong
    /// length are refused so index correspondence can never break.
    pub fn set_displayed(&mut self, points: Vec<Point>) -> bool {
        if points.len() != self.original_points.len() {
            log::warn!(
                "refusing displayed buffer of {} points for a {}-point stroke",
                points.len(),
                self.original_points.len()
            );
            return false;
        }
        self.points = points;
        true
    }

    /// Put the displayed geometry back onto the original exactly.
    pub fn restore_original(&mut self) {
        self.points.clone_from(&self.original_points);
    }

    pub fn is_displaced(&self) -> bool {
        self.points != self.original_points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_independent_copies() {
        let mut stroke = Stroke::new(Color::black(), 3.0);
        stroke.push(Point::new(1.0, 2.0, 0.4));
        stroke.push(Point::new(3.0, 4.0, 0.6));

        let mut moved = stroke.points().to_vec();
        moved[0].x = 99.0;
        assert!(stroke.set_displayed(moved));
        assert_eq!(stroke.original_points()[0].x, 1.0);
        assert!(stroke.is_displaced());

        stroke.restore_original();
        assert_eq!(stroke.points(), stroke.original_points());
    }

    #[test]
    fn wrong_length_display_buffer_is_refused() {
        let mut stroke = Stroke::from_points(vec![Point::new(0.0, 0.0, 0.5)], Color::black(), 2.0);
        assert!(!stroke.set_displayed(Vec::new()));
        assert_eq!(stroke.points().len(), 1);
    }

    #[test]
    fn missing_pressure_defaults() {
        let p: Point = serde_json::from_str(r#"{"x": 1.5, "y": 2}"#).unwrap();
        assert_eq!(p, Point::new(1.5, 2.0, DEFAULT_PRESSURE));
    }
}
