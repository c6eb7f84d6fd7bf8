//! Points, sizes, and rectangles in canvas coordinates

use std::ops::{Add, Neg, Sub};

/// A point in absolute canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

/// A displacement between two canvas points, e.g. a drag delta.
pub type CanvasVector = CanvasPoint;

impl CanvasPoint {
    pub const ZERO: CanvasPoint = CanvasPoint { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, by: CanvasVector) -> Self {
        Self {
            x: self.x + by.x,
            y: self.y + by.y,
        }
    }
}

impl Add for CanvasPoint {
    type Output = CanvasPoint;

    fn add(self, rhs: Self) -> Self {
        self.offset(rhs)
    }
}

impl Sub for CanvasPoint {
    type Output = CanvasPoint;

    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Neg for CanvasPoint {
    type Output = CanvasPoint;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A rectangle in absolute canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct CanvasRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasRect {
    pub const ZERO: CanvasRect = CanvasRect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: CanvasPoint, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn origin(&self) -> CanvasPoint {
        CanvasPoint {
            x: self.x,
            y: self.y,
        }
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Moves the rectangle by the negated offset, e.g. from viewport into
    /// canvas coordinates given the container origin.
    pub fn offset_by_negated(&self, origin: CanvasPoint) -> Self {
        self.translate(-origin.x, -origin.y)
    }

    pub fn contains(&self, point: CanvasPoint) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x <= self.x + self.width
            && point.y <= self.y + self.height
    }

    pub fn intersects(&self, other: &CanvasRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// The smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &CanvasRect) -> CanvasRect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        CanvasRect {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }

    /// Grows the rectangle by the given amounts on the trailing edges.
    pub fn stretch(&self, w: f64, h: f64) -> CanvasRect {
        CanvasRect {
            width: self.width + w,
            height: self.height + h,
            ..*self
        }
    }

    /// Scales origin and size uniformly, used to undo canvas zoom.
    pub fn scale(&self, factor: f64) -> CanvasRect {
        CanvasRect {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    /// Per-component difference `other - self`, used to detect frame changes.
    pub fn difference(&self, other: &CanvasRect) -> CanvasRect {
        CanvasRect {
            x: other.x - self.x,
            y: other.y - self.y,
            width: other.width - self.width,
            height: other.height - self.height,
        }
    }

    pub fn is_zero_delta(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.width == 0.0 && self.height == 0.0
    }
}

/// The smallest rectangle containing every rectangle in the slice, or `None`
/// for an empty slice.
pub fn bounding_rectangle_array(rects: &[CanvasRect]) -> Option<CanvasRect> {
    let (first, rest) = rects.split_first()?;
    Some(rest.iter().fold(*first, |acc, r| acc.union(r)))
}

/// Rounds to the nearest half pixel, matching what the render surface
/// reports for element bounds.
pub fn round_to_nearest_half(value: f64) -> f64 {
    (value * 2.0).round() / 2.0
}

#[cfg(test)]
#[path = "tests/primitives_tests.rs"]
mod tests;
