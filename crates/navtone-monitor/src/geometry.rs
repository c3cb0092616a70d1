// SPDX-License-Identifier: MIT
//
// Viewport geometry in CSS pixels. Origin top-left, y grows downward.

/// A point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle, as returned by a bounding-rect query.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    #[must_use]
    pub const fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    #[must_use]
    pub const fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Geometric center.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            self.width.mul_add(0.5, self.x),
            self.height.mul_add(0.5, self.y),
        )
    }

    /// Half-open containment: the left/top edges are inside, the
    /// right/bottom edges are not.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// The same rectangle moved vertically by `dy`.
    #[must_use]
    pub fn offset_y(self, dy: f64) -> Self {
        Self {
            y: self.y + dy,
            ..self
        }
    }

    /// Whether the vertical extents of `self` and `other` overlap.
    #[must_use]
    pub fn overlaps_vertically(&self, other: &Self) -> bool {
        self.top() < other.bottom() && self.bottom() > other.top()
    }
}
