#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Coordinates are signed: a view's origin is expressed in its owner's
//! coordinate space and may lie partially (or entirely) outside the owner.
//! Rectangles are half-open: `a` is inclusive, `b` is exclusive.

use core::ops::{Add, AddAssign, Sub, SubAssign};

/// A cell coordinate or a size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// Column.
    pub x: i16,
    /// Row.
    pub y: i16,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl AddAssign for Point {
    #[inline]
    fn add_assign(&mut self, rhs: Point) {
        *self = *self + rhs;
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

impl SubAssign for Point {
    #[inline]
    fn sub_assign(&mut self, rhs: Point) {
        *self = *self - rhs;
    }
}

impl From<(i16, i16)> for Point {
    fn from((x, y): (i16, i16)) -> Self {
        Self::new(x, y)
    }
}

/// A rectangle given by its top-left corner `a` (inclusive) and its
/// bottom-right corner `b` (exclusive).
///
/// An empty rectangle has `b.x <= a.x` or `b.y <= a.y`. Operations that can
/// produce an empty result normalise it so that `a == b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Top-left corner (inclusive).
    pub a: Point,
    /// Bottom-right corner (exclusive).
    pub b: Point,
}

impl Rect {
    /// Create a rectangle from corner coordinates.
    #[inline]
    pub const fn new(ax: i16, ay: i16, bx: i16, by: i16) -> Self {
        Self {
            a: Point::new(ax, ay),
            b: Point::new(bx, by),
        }
    }

    /// Create a rectangle from an origin and a size.
    #[inline]
    pub fn from_origin_size(origin: Point, size: Point) -> Self {
        Self {
            a: origin,
            b: origin + size,
        }
    }

    /// Create a rectangle anchored at the origin with the given size.
    #[inline]
    pub const fn from_size(width: i16, height: i16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Width in cells (never negative).
    #[inline]
    pub const fn width(&self) -> i16 {
        clamp_extent(self.b.x as i32 - self.a.x as i32)
    }

    /// Height in cells (never negative).
    #[inline]
    pub const fn height(&self) -> i16 {
        clamp_extent(self.b.y as i32 - self.a.y as i32)
    }

    /// Size as a point.
    #[inline]
    pub const fn size(&self) -> Point {
        Point::new(self.width(), self.height())
    }

    /// Area in cells.
    #[inline]
    pub const fn area(&self) -> u32 {
        self.width() as u32 * self.height() as u32
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.a.x >= self.b.x || self.a.y >= self.b.y
    }

    /// Check if a point lies inside the rectangle.
    #[inline]
    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.a.x && p.x < self.b.x && p.y >= self.a.y && p.y < self.b.y
    }

    /// Check if a row lies inside the rectangle's vertical extent.
    #[inline]
    pub const fn contains_row(&self, y: i16) -> bool {
        y >= self.a.y && y < self.b.y
    }

    /// Intersection with another rectangle; empty (normalised) if disjoint.
    #[must_use]
    pub fn intersect(&self, other: &Rect) -> Rect {
        let a = Point::new(self.a.x.max(other.a.x), self.a.y.max(other.a.y));
        let b = Point::new(self.b.x.min(other.b.x), self.b.y.min(other.b.y));
        let r = Rect { a, b };
        if r.is_empty() { Rect { a, b: a } } else { r }
    }

    /// The smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect::new(
            self.a.x.min(other.a.x),
            self.a.y.min(other.a.y),
            self.b.x.max(other.b.x),
            self.b.y.max(other.b.y),
        )
    }

    /// Translate both corners by `(dx, dy)`.
    #[must_use]
    pub fn moved(&self, dx: i16, dy: i16) -> Rect {
        let d = Point::new(dx, dy);
        Rect {
            a: self.a + d,
            b: self.b + d,
        }
    }

    /// Translate both corners by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Point) -> Rect {
        self.moved(offset.x, offset.y)
    }

    /// Grow outward by `dx` columns and `dy` rows on every side (negative
    /// values shrink).
    #[must_use]
    pub fn grown(&self, dx: i16, dy: i16) -> Rect {
        let r = Rect {
            a: self.a - Point::new(dx, dy),
            b: self.b + Point::new(dx, dy),
        };
        if r.is_empty() { Rect { a: r.a, b: r.a } } else { r }
    }
}

#[inline]
const fn clamp_extent(v: i32) -> i16 {
    if v <= 0 {
        0
    } else if v > i16::MAX as i32 {
        i16::MAX
    } else {
        v as i16
    }
}
