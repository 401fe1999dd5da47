// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Colour tables for the stock widgets.
//!
//! A [`Palette`] maps a [`PaletteGroup`] and a small role index to a colour.
//! The index constants below name the roles every group provides.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::render::Color;

/// Background / face colour.
pub const FACE: usize = 0;
/// Text and glyph colour.
pub const TEXT: usize = 1;
/// Border colour.
pub const BORDER: usize = 2;
/// Accent colour: pressed, focused or filled state.
pub const ACCENT: usize = 3;

/// Widget family a colour belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PaletteGroup {
    /// The root background.
    Desktop,
    /// Window body.
    Window,
    /// Window title bar.
    TitleBar,
    /// Push buttons.
    Button,
    /// Decorative frames.
    Frame,
    /// Scroll bars.
    ScrollBar,
    /// Progress bars.
    ProgressBar,
}

/// Colour table keyed by widget family.
#[derive(Clone, Debug)]
pub struct Palette {
    groups: HashMap<PaletteGroup, SmallVec<[Color; 4]>>,
}

impl Palette {
    /// A palette with no colours; every lookup falls back to black.
    pub fn empty() -> Self {
        Self {
            groups: HashMap::new(),
        }
    }

    /// Replace the colours of a group, indexed by role.
    pub fn set(&mut self, group: PaletteGroup, colors: &[Color]) {
        self.groups.insert(group, colors.iter().copied().collect());
    }

    /// Look up one colour.
    pub fn get(&self, group: PaletteGroup, index: usize) -> Option<Color> {
        self.groups.get(&group)?.get(index).copied()
    }

    /// Look up one colour, falling back to black when it is missing.
    pub fn color(&self, group: PaletteGroup, index: usize) -> Color {
        self.get(group, index).unwrap_or(Color::BLACK)
    }
}

impl Default for Palette {
    fn default() -> Self {
        let mut palette = Self::empty();
        let grey = Color::rgb(0xc0, 0xc0, 0xc0);
        let dark = Color::rgb(0x40, 0x40, 0x40);
        let navy = Color::rgb(0x00, 0x00, 0x80);
        palette.set(
            PaletteGroup::Desktop,
            &[Color::rgb(0x00, 0x80, 0x80), Color::WHITE, dark, navy],
        );
        palette.set(PaletteGroup::Window, &[grey, Color::BLACK, dark, navy]);
        palette.set(
            PaletteGroup::TitleBar,
            &[Color::rgb(0x80, 0x80, 0x80), Color::WHITE, dark, navy],
        );
        palette.set(
            PaletteGroup::Button,
            &[grey, Color::BLACK, dark, Color::rgb(0xa0, 0xa0, 0xa0)],
        );
        palette.set(PaletteGroup::Frame, &[grey, Color::BLACK, dark, Color::WHITE]);
        palette.set(
            PaletteGroup::ScrollBar,
            &[Color::rgb(0xe0, 0xe0, 0xe0), Color::BLACK, dark, grey],
        );
        palette.set(
            PaletteGroup::ProgressBar,
            &[Color::WHITE, Color::BLACK, dark, navy],
        );
        palette
    }
}
