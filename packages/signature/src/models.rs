use pmu_image::{Color, image::LineStyle};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A position in canvas space, in pixels from the top-left corner.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f32; 2] {
    fn from(value: Point) -> Self {
        [value.x, value.y]
    }
}

/// One finalized pointer-drag path.
///
/// Strokes are built by [`crate::drawing::Drawing`] and cannot be modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether this stroke leaves a visible mark. A single tap does not.
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        self.points.len() >= 2
    }

    #[must_use]
    pub fn to_polyline(&self) -> Vec<[f32; 2]> {
        self.points.iter().copied().map(Into::into).collect()
    }
}

impl From<Vec<Point>> for Stroke {
    fn from(points: Vec<Point>) -> Self {
        Self { points }
    }
}

/// Pixel dimensions of the drawing surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `self` if both dimensions are non-zero.
    ///
    /// # Errors
    ///
    /// * If the width or height is zero
    pub const fn validate(self) -> Result<Self, InvalidCanvasSize> {
        if self.width == 0 || self.height == 0 {
            return Err(InvalidCanvasSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }

    /// Whether `point` lies on the canvas, edges included.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0.0
            && point.y >= 0.0
            && point.x <= self.width as f32
            && point.y <= self.height as f32
    }
}

#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
#[error("Canvas must not be empty: {width}x{height}")]
pub struct InvalidCanvasSize {
    pub width: u32,
    pub height: u32,
}

/// The fixed pen every stroke on a pad is drawn with.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub color: Color,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 2.0,
            color: Color::BLACK,
        }
    }
}

impl From<StrokeStyle> for LineStyle {
    fn from(value: StrokeStyle) -> Self {
        Self {
            width: value.width,
            color: value.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test_log::test]
    fn canvas_contains_edges_but_not_beyond() {
        let size = CanvasSize::new(100, 50);

        assert!(size.contains(Point::new(0.0, 0.0)));
        assert!(size.contains(Point::new(100.0, 50.0)));
        assert!(!size.contains(Point::new(-0.1, 10.0)));
        assert!(!size.contains(Point::new(10.0, 50.5)));
    }

    #[test_log::test]
    fn single_point_stroke_is_not_renderable() {
        let tap = Stroke::from(vec![Point::new(1.0, 1.0)]);
        let line = Stroke::from(vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)]);

        assert!(!tap.is_renderable());
        assert!(line.is_renderable());
        assert_eq!(line.to_polyline(), vec![[1.0, 1.0], [2.0, 2.0]]);
    }

    #[test_log::test]
    fn stroke_serializes_as_point_array() {
        let stroke = Stroke::from(vec![Point::new(1.0, 2.5)]);

        assert_eq!(
            serde_json::to_string(&stroke).unwrap(),
            r#"[{"x":1.0,"y":2.5}]"#
        );
    }
}
