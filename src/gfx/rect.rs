//! Integer geometry used throughout the display core.
//!
//! Rectangles are half-open: `p0` is the top-left corner (inclusive),
//! `p1` the bottom-right corner (exclusive). A rectangle is empty when
//! either dimension is non-positive; the all-zero rectangle is the
//! canonical empty value used for dirty tracking.

use std::fmt;
use std::ops::{Add, Neg, Sub};

/// A point in desktop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    pub p0: Point,
    pub p1: Point,
}

impl Rect {
    /// The canonical empty rectangle.
    pub const EMPTY: Rect = Rect {
        p0: Point::new(0, 0),
        p1: Point::new(0, 0),
    };

    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            p0: Point::new(x0, y0),
            p1: Point::new(x1, y1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.p1.x <= self.p0.x || self.p1.y <= self.p0.y
    }

    pub fn width(&self) -> i32 {
        self.p1.x - self.p0.x
    }

    pub fn height(&self) -> i32 {
        self.p1.y - self.p0.y
    }

    /// Width and height as a point.
    pub fn dims(&self) -> Point {
        Point::new(self.width(), self.height())
    }

    /// Intersection of `self` with `clip`. Empty result if they do not
    /// overlap.
    pub fn clip(&self, clip: &Rect) -> Rect {
        let r = Rect {
            p0: Point::new(self.p0.x.max(clip.p0.x), self.p0.y.max(clip.p0.y)),
            p1: Point::new(self.p1.x.min(clip.p1.x), self.p1.y.min(clip.p1.y)),
        };
        if r.is_empty() {
            Rect::EMPTY
        } else {
            r
        }
    }

    /// Minimal bounding rectangle of `self` and `other`. An empty operand
    /// yields the other operand unchanged.
    pub fn envelope(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect {
            p0: Point::new(self.p0.x.min(other.p0.x), self.p0.y.min(other.p0.y)),
            p1: Point::new(self.p1.x.max(other.p1.x), self.p1.y.max(other.p1.y)),
        }
    }

    pub fn translate(&self, offs: Point) -> Rect {
        Rect {
            p0: self.p0 + offs,
            p1: self.p1 + offs,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.p0.x && p.x < self.p1.x && p.y >= self.p0.y && p.y < self.p1.y
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.p0, self.p1)
    }
}
