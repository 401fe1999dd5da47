// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`Renderer`] that records draw operations instead of rasterising them.
//!
//! Useful headless: tests and demos inspect [`RecordingRenderer::ops`] to see
//! what a frame would have painted and where.

use hashbrown::HashMap;
use kurbo::{Line, Rect};

use crate::render::{Color, Renderer, SurfaceId};

/// One recorded call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// A surface was allocated.
    CreateSurface(SurfaceId, Rect),
    /// A surface was released.
    DestroySurface(SurfaceId),
    /// The draw target changed.
    Select(Option<SurfaceId>),
    /// The target was cleared.
    Clear(Color),
    /// A filled rectangle.
    Fill(Rect, Color),
    /// A rectangle outline.
    Frame(Rect, Color),
    /// A line.
    Line(Line, Color),
    /// A run of text.
    Text(kurbo::Point, String, Color),
    /// A surface was copied to the target.
    Composite(SurfaceId, Rect),
    /// The frame was shown.
    Present,
}

/// Records every call; keeps track of live surfaces.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    ops: Vec<DrawOp>,
    surfaces: HashMap<SurfaceId, Rect>,
    next_surface: u32,
    frames: usize,
}

impl RecordingRenderer {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded since the last [`take_ops`](Self::take_ops).
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drain the recorded operations.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        core::mem::take(&mut self.ops)
    }

    /// Number of live surfaces.
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Number of presented frames.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Recorded text runs, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(_, s, _) => Some(s.as_str()),
            _ => None,
        })
    }
}

impl Renderer for RecordingRenderer {
    fn create_surface(&mut self, area: Rect) -> SurfaceId {
        let id = SurfaceId(self.next_surface);
        self.next_surface += 1;
        self.surfaces.insert(id, area);
        self.ops.push(DrawOp::CreateSurface(id, area));
        id
    }

    fn destroy_surface(&mut self, surface: SurfaceId) {
        if self.surfaces.remove(&surface).is_some() {
            self.ops.push(DrawOp::DestroySurface(surface));
        }
    }

    fn select_surface(&mut self, surface: Option<SurfaceId>) {
        self.ops.push(DrawOp::Select(surface));
    }

    fn clear(&mut self, color: Color) {
        self.ops.push(DrawOp::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::Fill(rect, color));
    }

    fn frame_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::Frame(rect, color));
    }

    fn line(&mut self, line: Line, color: Color) {
        self.ops.push(DrawOp::Line(line, color));
    }

    fn text(&mut self, origin: kurbo::Point, text: &str, color: Color) {
        self.ops.push(DrawOp::Text(origin, text.to_owned(), color));
    }

    fn composite(&mut self, surface: SurfaceId, area: Rect) {
        self.ops.push(DrawOp::Composite(surface, area));
    }

    fn present(&mut self) {
        self.frames += 1;
        self.ops.push(DrawOp::Present);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surfaces_are_tracked() {
        let mut r = RecordingRenderer::new();
        let a = r.create_surface(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = r.create_surface(Rect::new(0.0, 0.0, 5.0, 5.0));
        assert_ne!(a, b);
        assert_eq!(r.surface_count(), 2);
        r.destroy_surface(a);
        r.destroy_surface(a);
        assert_eq!(r.surface_count(), 1);
        let destroys = r
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::DestroySurface(_)))
            .count();
        assert_eq!(destroys, 1, "double destroy is ignored");
    }
}
