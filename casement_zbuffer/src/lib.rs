// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=casement_zbuffer --heading-base-level=0

//! Casement Z-Buffer: a per-pixel occupancy grid for exposure computation.
//!
//! The view tree decides which views need painting with a painter's algorithm
//! run in reverse. Views are visited front to back; before a view stamps its
//! screen footprint into the [`ZBuffer`] it asks whether that footprint is
//! already completely covered. If it is, everything in front hides the view
//! and it is not exposed.
//!
//! All queries are conjunctive: [`ZBuffer::is_area_set`] answers `true` only
//! when *every* pixel of the area is marked, and [`ZBuffer::is_area_clear`]
//! only when every pixel is unmarked. A partially covered area answers `false`
//! to both.
//!
//! ```rust
//! use casement_geometry::Rectangle;
//! use casement_zbuffer::ZBuffer;
//!
//! let mut z = ZBuffer::new(Rectangle::from_coords(0, 0, 99, 99));
//! let window = Rectangle::from_coords(10, 10, 59, 59);
//! z.set(window);
//!
//! // A view entirely behind the window is hidden...
//! assert!(z.is_area_set(Rectangle::from_coords(20, 20, 30, 30)));
//! // ...one that sticks out is still exposed.
//! assert!(!z.is_area_set(Rectangle::from_coords(50, 50, 70, 70)));
//! ```
//!
//! Areas that are not fully inside the configured screen are ignored by
//! [`ZBuffer::set`] and [`ZBuffer::clear`], and answer `false` to both
//! queries. Callers clip footprints to the screen first.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use casement_geometry::Rectangle;

/// Occupancy grid covering a screen rectangle, one byte per pixel.
#[derive(Clone, Default)]
pub struct ZBuffer {
    screen: Rectangle,
    stride: usize,
    cells: Vec<u8>,
}

impl core::fmt::Debug for ZBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let marked = self.cells.iter().filter(|c| **c != 0).count();
        f.debug_struct("ZBuffer")
            .field("screen", &self.screen)
            .field("cells", &self.cells.len())
            .field("marked", &marked)
            .finish()
    }
}

impl ZBuffer {
    /// Create a buffer covering `screen`, with every pixel clear.
    pub fn new(screen: Rectangle) -> Self {
        let mut z = Self::default();
        z.configure(screen);
        z
    }

    /// (Re)allocate the grid for `screen`, clearing every pixel.
    pub fn configure(&mut self, screen: Rectangle) {
        #[allow(
            clippy::cast_sign_loss,
            reason = "Rectangle sizes are always at least one pixel."
        )]
        let (w, h) = (screen.width() as usize, screen.height() as usize);
        self.screen = screen;
        self.stride = w;
        self.cells.clear();
        self.cells.resize(w * h, 0);
    }

    /// Clear every pixel without reallocating.
    pub fn reset(&mut self) {
        self.cells.fill(0);
    }

    /// The configured screen rectangle.
    pub fn screen(&self) -> Rectangle {
        self.screen
    }

    /// Mark every pixel of `area`. Ignored unless `area` lies inside the screen.
    pub fn set(&mut self, area: Rectangle) {
        self.fill(area, 1);
    }

    /// Unmark every pixel of `area`. Ignored unless `area` lies inside the screen.
    pub fn clear(&mut self, area: Rectangle) {
        self.fill(area, 0);
    }

    /// Whether every pixel of `area` is marked.
    pub fn is_area_set(&self, area: Rectangle) -> bool {
        self.all(area, |c| c != 0)
    }

    /// Whether every pixel of `area` is unmarked.
    pub fn is_area_clear(&self, area: Rectangle) -> bool {
        self.all(area, |c| c == 0)
    }

    fn fill(&mut self, area: Rectangle, value: u8) {
        if !self.covers(&area) {
            return;
        }
        let w = self.width_of(&area);
        for row in row_starts(self.screen, self.stride, area) {
            self.cells[row..row + w].fill(value);
        }
    }

    fn all(&self, area: Rectangle, pred: impl Fn(u8) -> bool) -> bool {
        if !self.covers(&area) {
            return false;
        }
        let w = self.width_of(&area);
        row_starts(self.screen, self.stride, area)
            .all(|row| self.cells[row..row + w].iter().all(|c| pred(*c)))
    }

    fn covers(&self, area: &Rectangle) -> bool {
        !self.cells.is_empty()
            && area.ul.x <= area.lr.x
            && area.ul.y <= area.lr.y
            && self.screen.contains(area)
    }

    #[allow(
        clippy::cast_sign_loss,
        reason = "Only called for areas inside the screen."
    )]
    fn width_of(&self, area: &Rectangle) -> usize {
        area.width() as usize
    }
}

/// Start offsets of each row of `area` in a grid covering `screen`.
#[allow(
    clippy::cast_sign_loss,
    reason = "Only called for areas inside the screen."
)]
fn row_starts(screen: Rectangle, stride: usize, area: Rectangle) -> impl Iterator<Item = usize> {
    let x = (area.ul.x - screen.ul.x) as usize;
    let y0 = (area.ul.y - screen.ul.y) as usize;
    let y1 = (area.lr.y - screen.ul.y) as usize;
    (y0..=y1).map(move |y| y * stride + x)
}
