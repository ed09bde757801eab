//! Screen-space geometry for hit testing

use serde::{Deserialize, Serialize};

/// A point in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Absolute per-axis distance as `(close, far)`: the smaller of `|dx|` and
    /// `|dy|` first. Points on the same row or column have a close distance of 0.
    pub fn axis_distances(&self, other: &Point) -> (f64, f64) {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        (dx.min(dy), dx.max(dy))
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Width and height
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Rectangle of `size` centered on `center`
    pub fn centered(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Zero, negative or non-finite extent
    pub fn is_degenerate(&self) -> bool {
        !(self.size.width > 0.0 && self.size.height > 0.0)
            || !self.origin.is_finite()
            || !self.size.width.is_finite()
            || !self.size.height.is_finite()
    }

    /// Half-open containment: the min edges are inside, the max edges are not.
    pub fn contains(&self, point: Point) -> bool {
        !self.is_degenerate()
            && point.x >= self.min_x()
            && point.x < self.max_x()
            && point.y >= self.min_y()
            && point.y < self.max_y()
    }

    /// Grow each axis to at least `min_size`, keeping the same center.
    pub fn padded_to(&self, min_size: f64) -> Rect {
        let min_size = if min_size.is_finite() { min_size.max(0.0) } else { 0.0 };
        Rect::centered(
            self.center(),
            Size::new(self.size.width.max(min_size), self.size.height.max(min_size)),
        )
    }

    /// Map a point given relative to `from` onto the same proportional
    /// position inside `self`. Falls back to the center when `from` has no area.
    pub fn map_from(&self, point: Point, from: &Rect) -> Point {
        if from.size.width <= 0.0 || from.size.height <= 0.0 {
            return self.center();
        }
        let scaled_x = (point.x - from.origin.x) / from.size.width;
        let scaled_y = (point.y - from.origin.y) / from.size.height;
        Point::new(
            self.origin.x + scaled_x * self.size.width,
            self.origin.y + scaled_y * self.size.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_half_open() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Point::new(0.0, 0.0)));
        assert!(rect.contains(Point::new(9.9, 9.9)));
        assert!(!rect.contains(Point::new(10.0, 5.0)));
        assert!(!rect.contains(Point::new(-0.1, 5.0)));
    }

    #[test]
    fn test_degenerate_contains_nothing() {
        let rect = Rect::new(5.0, 5.0, 0.0, 10.0);
        assert!(rect.is_degenerate());
        assert!(!rect.contains(Point::new(5.0, 6.0)));
    }

    #[test]
    fn test_padded_to_keeps_center() {
        let rect = Rect::new(98.0, 198.0, 4.0, 4.0);
        let padded = rect.padded_to(40.0);
        assert_eq!(padded.center(), rect.center());
        assert_eq!(padded.size, Size::new(40.0, 40.0));

        let large = Rect::new(0.0, 0.0, 100.0, 10.0).padded_to(40.0);
        assert_eq!(large.size, Size::new(100.0, 40.0));
    }

    #[test]
    fn test_map_from_padded_rect() {
        let target = Rect::new(100.0, 100.0, 10.0, 10.0);
        let padded = target.padded_to(40.0);
        // Top-left of the padded rect maps to the target's origin
        assert_eq!(target.map_from(padded.origin, &padded), target.origin);
        // Center maps to center
        assert_eq!(target.map_from(padded.center(), &padded), target.center());
    }

    #[test]
    fn test_axis_distances() {
        let a = Point::new(0.0, 0.0);
        assert_eq!(a.axis_distances(&Point::new(3.0, -8.0)), (3.0, 8.0));
        assert_eq!(a.axis_distances(&Point::new(0.0, 5.0)), (0.0, 5.0));
    }
}
