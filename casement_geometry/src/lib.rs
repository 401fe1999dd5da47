// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=casement_geometry --heading-base-level=0

//! Casement Geometry: integer pixel geometry for the Casement view tree.
//!
//! Views in Casement live on an integer pixel grid. A [`Rectangle`] stores its
//! upper-left and lower-right corners **inclusively**, so a rectangle from
//! `(0, 0)` to `(9, 9)` covers ten pixels on each axis. Widths and heights are
//! computed as `|lr - ul| + 1` and are never negative, even when the corners are
//! supplied in the wrong order.
//!
//! ## API overview
//!
//! - [`Point`]: a coordinate with value semantics and the usual arithmetic.
//! - [`Rectangle`]: inclusive box with
//!   [`intersection`](Rectangle::intersection), [`join`](Rectangle::join),
//!   [`includes`](Rectangle::includes), [`contains`](Rectangle::contains),
//!   [`zoom`](Rectangle::zoom), [`center`](Rectangle::center) and
//!   [`move_clipped`](Rectangle::move_clipped).
//!
//! `move_clipped` is the building block for dragging: a scrollbar thumb or a
//! window can be pushed past the edge of its container and will slide along
//! the edge instead of escaping it.
//!
//! ```rust
//! use casement_geometry::Rectangle;
//!
//! let track = Rectangle::from_coords(0, 0, 99, 9);
//! let mut thumb = Rectangle::from_coords(10, 0, 19, 9);
//!
//! // Overshoot to the right: the thumb stops at the end of the track.
//! assert!(thumb.move_clipped(500, 0, track));
//! assert_eq!(thumb, Rectangle::from_coords(90, 0, 99, 9));
//! ```
//!
//! ## Interop with Kurbo
//!
//! Draw backends speak [`kurbo`]. [`Rectangle::to_kurbo`] converts the inclusive
//! integer box into the equivalent half-open `f64` rectangle covering the same
//! pixels, and [`Point::to_kurbo`] converts coordinates.
//!
//! This crate is `no_std`.

#![no_std]

mod point;
mod rect;

pub use point::Point;
pub use rect::Rectangle;
