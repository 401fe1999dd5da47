// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing backend interface and the per-frame render context.

use casement_geometry::{Point, Rectangle};
use casement_zbuffer::ZBuffer;
use kurbo::{Line, Rect};

use crate::palette::{Palette, PaletteGroup};
use crate::tree::ViewTree;

/// Handle of an offscreen surface owned by a [`Renderer`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

/// A 32-bit ARGB colour.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self(0);

    /// Colour from its four channels.
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Opaque colour from its three channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::argb(0xff, r, g, b)
    }

    /// Alpha channel.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "The shift leaves only the top byte."
    )]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }
}

/// Drawing backend.
///
/// All geometry is in global (screen) coordinates as half-open Kurbo shapes.
/// Drawing goes to the selected target: the screen back buffer when no
/// surface is selected, or an offscreen surface.
pub trait Renderer {
    /// Allocate an offscreen surface covering `area`.
    fn create_surface(&mut self, area: Rect) -> SurfaceId;
    /// Release a surface. Unknown handles are ignored.
    fn destroy_surface(&mut self, surface: SurfaceId);
    /// Direct drawing to `surface`, or to the back buffer with `None`.
    fn select_surface(&mut self, surface: Option<SurfaceId>);
    /// Fill the whole target.
    fn clear(&mut self, color: Color);
    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// Outline a rectangle.
    fn frame_rect(&mut self, rect: Rect, color: Color);
    /// Stroke a line.
    fn line(&mut self, line: Line, color: Color);
    /// Draw a run of text with its top-left corner at `origin`.
    fn text(&mut self, origin: kurbo::Point, text: &str, color: Color);
    /// Copy a surface onto the current target at `area`.
    fn composite(&mut self, surface: SurfaceId, area: Rect);
    /// Show the back buffer.
    fn present(&mut self);
}

/// What widgets draw with: a renderer, the palette and the current target.
///
/// Takes integer [`Rectangle`]s and [`Point`]s in global coordinates.
pub struct Painter<'a> {
    renderer: &'a mut dyn Renderer,
    palette: &'a Palette,
    target: Option<SurfaceId>,
}

impl core::fmt::Debug for Painter<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Painter")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl<'a> Painter<'a> {
    /// A painter drawing to the back buffer.
    pub fn new(renderer: &'a mut dyn Renderer, palette: &'a Palette) -> Self {
        Self {
            renderer,
            palette,
            target: None,
        }
    }

    /// The palette in use.
    pub fn palette(&self) -> &Palette {
        self.palette
    }

    /// Shorthand for a palette lookup.
    pub fn color(&self, group: PaletteGroup, index: usize) -> Color {
        self.palette.color(group, index)
    }

    /// Fill `rect` (inclusive pixel bounds).
    pub fn fill(&mut self, rect: Rectangle, color: Color) {
        self.renderer.fill_rect(rect.to_kurbo(), color);
    }

    /// Outline `rect`.
    pub fn frame(&mut self, rect: Rectangle, color: Color) {
        self.renderer.frame_rect(rect.to_kurbo(), color);
    }

    /// Line between two pixel positions.
    pub fn line(&mut self, from: Point, to: Point, color: Color) {
        self.renderer.line(Line::new(from, to), color);
    }

    /// Text with its top-left corner at `at`.
    pub fn text(&mut self, at: Point, text: &str, color: Color) {
        self.renderer.text(at.to_kurbo(), text, color);
    }

    pub(crate) fn create_surface(&mut self, area: Rectangle) -> SurfaceId {
        self.renderer.create_surface(area.to_kurbo())
    }

    pub(crate) fn destroy_surface(&mut self, surface: SurfaceId) {
        self.renderer.destroy_surface(surface);
    }

    /// Switch targets, returning the previous one.
    pub(crate) fn select_surface(&mut self, surface: Option<SurfaceId>) -> Option<SurfaceId> {
        let previous = core::mem::replace(&mut self.target, surface);
        self.renderer.select_surface(surface);
        previous
    }

    pub(crate) fn composite(&mut self, surface: SurfaceId, area: Rectangle) {
        self.renderer.composite(surface, area.to_kurbo());
    }
}

/// Everything needed to turn a [`ViewTree`] into a frame.
#[derive(Debug)]
pub struct RenderContext<R> {
    /// The backend.
    pub renderer: R,
    /// Colours used by the stock widgets.
    pub palette: Palette,
    /// Occlusion buffer, sized to the screen.
    pub zbuffer: ZBuffer,
}

impl<R: Renderer> RenderContext<R> {
    /// A context for `screen` with the default palette.
    pub fn new(renderer: R, screen: Rectangle) -> Self {
        Self {
            renderer,
            palette: Palette::default(),
            zbuffer: ZBuffer::new(screen),
        }
    }

    /// Replace the palette.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Render one frame: recompute exposure, paint exposed views and present.
    pub fn frame(&mut self, tree: &mut ViewTree) {
        self.renderer.select_surface(None);
        self.renderer
            .clear(self.palette.color(PaletteGroup::Desktop, crate::palette::FACE));
        tree.compute_exposure(&mut self.zbuffer);
        let mut painter = Painter::new(&mut self.renderer, &self.palette);
        tree.draw(&mut painter);
        self.renderer.present();
    }
}
