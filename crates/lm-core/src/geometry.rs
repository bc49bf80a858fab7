//! Axis-aligned bounds in document pixel units.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Left/top/width/height rectangle, the shape the editor reports to its host.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Normalize two arbitrary corners into a positive-size rectangle.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    /// Rectangle of the given size centered on `center`.
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.left + dx, self.top + dy, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn corners_normalize_in_any_direction() {
        let b = Bounds::from_corners(Point::new(150.0, 130.0), Point::new(100.0, 100.0));
        assert_eq!(b, Bounds::new(100.0, 100.0, 50.0, 30.0));
    }

    #[test]
    fn center_and_edges() {
        let b = Bounds::new(10.0, 20.0, 40.0, 60.0);
        assert_eq!(b.center(), Point::new(30.0, 50.0));
        assert_eq!((b.right(), b.bottom()), (50.0, 80.0));
        assert_eq!(Bounds::centered(b.center(), 40.0, 60.0), b);
    }
}
