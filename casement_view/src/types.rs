// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the view tree: handles, flag groups and insertion data.

use casement_geometry::{Point, Rectangle};

/// Handle of a view in a [`ViewTree`](crate::ViewTree) (generational).
///
/// Handles never own the view. Once the view is destroyed its handle is stale:
/// every accessor answers `None`/`false` for it, and a recycled slot gets a new
/// generation so old handles never alias a newer view.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ViewId(pub(crate) u32, pub(crate) u32);

impl ViewId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Which edges of a view follow the parent when the parent is resized.
    ///
    /// `GROW_LO_X` moves the left edge with the parent's right edge,
    /// `GROW_HI_X` moves the right edge with it; likewise for `Y`. A view with
    /// an empty resize mode never changes size and refuses to maximize.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ResizeMode: u8 {
        /// Left edge follows the parent's right edge.
        const GROW_LO_X = 0b0000_0001;
        /// Top edge follows the parent's bottom edge.
        const GROW_LO_Y = 0b0000_0010;
        /// Right edge follows the parent's right edge.
        const GROW_HI_X = 0b0000_0100;
        /// Bottom edge follows the parent's bottom edge.
        const GROW_HI_Y = 0b0000_1000;
        /// Stretch with the parent on both axes.
        const GROW_HI = Self::GROW_HI_X.bits() | Self::GROW_HI_Y.bits();
        /// Every edge follows; the view slides with the parent's lower-right corner.
        const GROW_ALL = 0b0000_1111;
    }
}

bitflags::bitflags! {
    /// Static behaviour options of a view.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ViewOptions: u8 {
        /// The view may become its parent's selected (and focused) child.
        const SELECTABLE = 0b0000_0001;
        /// Selecting the view brings it to the front of its siblings.
        const TOP_SELECT = 0b0000_0010;
        /// The view takes part in tiling layouts.
        const TILEABLE   = 0b0000_0100;
        /// The view is centred in its parent on insertion.
        const CENTERED   = 0b0000_1000;
        /// The view wants its data validated before it loses focus.
        const VALIDATE   = 0b0001_0000;
        /// The view is painted into a cached offscreen surface.
        const BUFFERED   = 0b0010_0000;
    }
}

bitflags::bitflags! {
    /// Dynamic state of a view.
    ///
    /// The bits are orthogonal; nothing beyond masking constrains their
    /// combinations. In particular `DISABLED` does not clear `FOCUSED`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ViewState: u8 {
        /// The view is shown.
        const VISIBLE    = 0b0000_0001;
        /// The view is its parent's `actual` child.
        const SELECTED   = 0b0000_0010;
        /// The view is on the focus chain.
        const FOCUSED    = 0b0000_0100;
        /// The view should ignore input (advisory).
        const DISABLED   = 0b0000_1000;
        /// The view holds the pointer capture.
        const DRAGGING   = 0b0001_0000;
        /// The view is running the event loop.
        const RUNNING    = 0b0010_0000;
        /// Some part of the view is not hidden by views in front of it.
        const EXPOSED    = 0b0100_0000;
        /// The view is the frontmost of its siblings.
        const FOREGROUND = 0b1000_0000;
    }
}

bitflags::bitflags! {
    /// Pending work for a view.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ChangeFlags: u8 {
        /// The view must be repainted.
        const REDRAW = 0b0000_0001;
        /// The view's data changed.
        const DATA   = 0b0000_0010;
    }
}

/// Insertion data for a view: geometry, flags and size limits.
#[derive(Clone, Debug)]
pub struct ViewConfig {
    /// Bounding rectangle in the parent's local coordinates.
    pub borders: Rectangle,
    /// Edges that follow the parent on resize.
    pub resize_mode: ResizeMode,
    /// Behaviour options.
    pub options: ViewOptions,
    /// Initial state. Defaults to [`ViewState::VISIBLE`].
    pub state: ViewState,
    /// Smallest accepted size, in pixels.
    pub min_size: Point,
    /// Largest accepted size, in pixels.
    pub max_size: Point,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            borders: Rectangle::ZERO,
            resize_mode: ResizeMode::empty(),
            options: ViewOptions::empty(),
            state: ViewState::VISIBLE,
            min_size: Point::new(1, 1),
            max_size: Point::new(i32::MAX, i32::MAX),
        }
    }
}

impl ViewConfig {
    /// A visible view with the given borders and default everything else.
    pub fn new(borders: Rectangle) -> Self {
        Self {
            borders,
            ..Self::default()
        }
    }

    /// Set the options.
    pub fn options(mut self, options: ViewOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the resize mode.
    pub fn resize_mode(mut self, mode: ResizeMode) -> Self {
        self.resize_mode = mode;
        self
    }

    /// Set the initial state.
    pub fn state(mut self, state: ViewState) -> Self {
        self.state = state;
        self
    }

    /// Set the size limits.
    pub fn size_limits(mut self, min: Point, max: Point) -> Self {
        self.min_size = min;
        self.max_size = max;
        self
    }

    /// Whether `size` falls within the limits.
    pub fn accepts_size(&self, size: Point) -> bool {
        size_within(size, self.min_size, self.max_size)
    }
}

pub(crate) fn size_within(size: Point, min: Point, max: Point) -> bool {
    min.x <= size.x && size.x <= max.x && min.y <= size.y && size.y <= max.y
}
