// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer points.

use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A pixel coordinate, either global (screen) or local to some view.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Horizontal coordinate, growing to the right.
    pub x: i32,
    /// Vertical coordinate, growing downwards.
    pub y: i32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Convert to a Kurbo point at the top-left corner of this pixel.
    #[inline]
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(f64::from(self.x), f64::from(self.y))
    }
}

impl From<(i32, i32)> for Point {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for kurbo::Point {
    #[inline]
    fn from(p: Point) -> Self {
        p.to_kurbo()
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl AddAssign for Point {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Point {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        let a = Point::new(3, -4);
        let b = Point::new(10, 20);
        assert_eq!(a + b, Point::new(13, 16));
        assert_eq!(b - a, Point::new(7, 24));
        assert_eq!(-a, Point::new(-3, 4));

        let mut c = a;
        c += b;
        c -= b;
        assert_eq!(c, a, "add then subtract should round trip");
    }

    #[test]
    fn kurbo_conversion() {
        let p: kurbo::Point = Point::new(5, 7).into();
        assert_eq!(p, kurbo::Point::new(5.0, 7.0));
    }
}
