// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inclusive integer rectangles.

use crate::point::Point;

/// Axis-aligned box with inclusive upper-left (`ul`) and lower-right (`lr`)
/// corners.
///
/// Width and height are `|lr - ul| + 1` and therefore never negative. Most
/// operations assume `ul <= lr` on both axes; [`Rectangle::new`] does not
/// reorder corners, so inverted rectangles keep a positive size but behave as
/// empty for containment tests.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rectangle {
    /// Upper-left corner (inclusive).
    pub ul: Point,
    /// Lower-right corner (inclusive).
    pub lr: Point,
}

impl Rectangle {
    /// The degenerate `(0,0)-(0,0)` rectangle; the result of intersecting
    /// disjoint rectangles.
    pub const ZERO: Self = Self::new(Point::ZERO, Point::ZERO);

    /// Create a rectangle from its two inclusive corners.
    #[inline]
    pub const fn new(ul: Point, lr: Point) -> Self {
        Self { ul, lr }
    }

    /// Create a rectangle from inclusive corner coordinates.
    #[inline]
    pub const fn from_coords(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self::new(Point::new(x0, y0), Point::new(x1, y1))
    }

    /// Create a rectangle from its upper-left corner and a size in pixels.
    ///
    /// A zero or negative size yields a one pixel rectangle.
    #[inline]
    pub fn from_origin_size(ul: Point, width: i32, height: i32) -> Self {
        Self::new(
            ul,
            Point::new(ul.x + (width - 1).max(0), ul.y + (height - 1).max(0)),
        )
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> i32 {
        (self.lr.x - self.ul.x).abs() + 1
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> i32 {
        (self.lr.y - self.ul.y).abs() + 1
    }

    /// Width and height packed into a point.
    #[inline]
    pub fn size(&self) -> Point {
        Point::new(self.width(), self.height())
    }

    /// The rectangle of the same size anchored at the origin.
    #[inline]
    pub fn extent(&self) -> Self {
        Self::from_coords(0, 0, self.width() - 1, self.height() - 1)
    }

    /// Translate by a delta.
    #[inline]
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        let d = Point::new(dx, dy);
        self.ul += d;
        self.lr += d;
    }

    /// Return a copy translated by a delta.
    #[inline]
    #[must_use]
    pub fn moved(mut self, dx: i32, dy: i32) -> Self {
        self.move_by(dx, dy);
        self
    }

    /// Move the upper-left corner to `p`, keeping the size.
    #[inline]
    pub fn move_to(&mut self, p: Point) {
        let d = p - self.ul;
        self.move_by(d.x, d.y);
    }

    /// Grow each side outwards by `dx` horizontally and `dy` vertically.
    ///
    /// Negative values shrink. `zoom(-d, -d)` followed by `zoom(d, d)`
    /// restores the original corners.
    #[inline]
    pub fn zoom(&mut self, dx: i32, dy: i32) {
        self.ul.x -= dx;
        self.ul.y -= dy;
        self.lr.x += dx;
        self.lr.y += dy;
    }

    /// Return a zoomed copy. See [`Rectangle::zoom`].
    #[inline]
    #[must_use]
    pub fn zoomed(mut self, dx: i32, dy: i32) -> Self {
        self.zoom(dx, dy);
        self
    }

    /// Whether `p` lies inside, boundary included.
    #[inline]
    pub fn includes(&self, p: Point) -> bool {
        self.ul.x <= p.x && p.x <= self.lr.x && self.ul.y <= p.y && p.y <= self.lr.y
    }

    /// Whether `other` lies completely inside `self`.
    #[inline]
    pub fn contains(&self, other: &Self) -> bool {
        self.includes(other.ul) && self.includes(other.lr)
    }

    /// Whether the two rectangles share at least one pixel.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.ul.x.max(other.ul.x) <= self.lr.x.min(other.lr.x)
            && self.ul.y.max(other.ul.y) <= self.lr.y.min(other.lr.y)
    }

    /// The overlapping area of both rectangles.
    ///
    /// Disjoint rectangles produce [`Rectangle::ZERO`]; use
    /// [`Rectangle::intersects`] to tell that apart from a real one pixel
    /// overlap at the origin.
    pub fn intersection(&self, other: &Self) -> Self {
        if !self.intersects(other) {
            return Self::ZERO;
        }
        Self::from_coords(
            self.ul.x.max(other.ul.x),
            self.ul.y.max(other.ul.y),
            self.lr.x.min(other.lr.x),
            self.lr.y.min(other.lr.y),
        )
    }

    /// The smallest rectangle covering both.
    pub fn join(&self, other: &Self) -> Self {
        Self::from_coords(
            self.ul.x.min(other.ul.x),
            self.ul.y.min(other.ul.y),
            self.lr.x.max(other.lr.x),
            self.lr.y.max(other.lr.y),
        )
    }

    /// Move by `(dx, dy)` without leaving `clip`.
    ///
    /// Nothing happens unless `clip` already contains `self`. Each axis is
    /// clamped independently, so an overshooting drag slides along the edge
    /// of `clip`. Returns whether the rectangle actually moved.
    pub fn move_clipped(&mut self, dx: i32, dy: i32, clip: Self) -> bool {
        if !clip.contains(self) {
            return false;
        }
        let dx = clamp_delta(dx, self.ul.x, self.lr.x, clip.ul.x, clip.lr.x);
        let dy = clamp_delta(dy, self.ul.y, self.lr.y, clip.ul.y, clip.lr.y);
        if dx == 0 && dy == 0 {
            return false;
        }
        self.move_by(dx, dy);
        true
    }

    /// Centre `self` inside `other`.
    ///
    /// Leaves `self` untouched when `other` does not contain it.
    pub fn center(&mut self, other: &Self) {
        if !other.contains(self) {
            return;
        }
        let ul = Point::new(
            other.ul.x + (other.width() - self.width()) / 2,
            other.ul.y + (other.height() - self.height()) / 2,
        );
        self.move_to(ul);
    }

    /// Half-open Kurbo rectangle covering the same pixels.
    #[inline]
    pub fn to_kurbo(&self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.ul.x),
            f64::from(self.ul.y),
            f64::from(self.lr.x) + 1.0,
            f64::from(self.lr.y) + 1.0,
        )
    }
}

impl From<Rectangle> for kurbo::Rect {
    #[inline]
    fn from(r: Rectangle) -> Self {
        r.to_kurbo()
    }
}

#[inline]
fn clamp_delta(d: i32, lo: i32, hi: i32, clip_lo: i32, clip_hi: i32) -> i32 {
    if lo + d < clip_lo {
        clip_lo - lo
    } else if hi + d > clip_hi {
        clip_hi - hi
    } else {
        d
    }
}
