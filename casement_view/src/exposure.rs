// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Exposure tracking and painting.
//!
//! Each frame the tree walks its views front to back against a [`ZBuffer`].
//! A view's footprint is its global rectangle clipped to its parent's
//! footprint. Children claim pixels before their parent does, and a view is
//! exposed when any pixel of its footprint was still unclaimed, or when any
//! child is exposed. Painting then skips unexposed views entirely.

use casement_geometry::Rectangle;
use casement_zbuffer::ZBuffer;

use crate::render::Painter;
use crate::tree::{Children, ViewTree};
use crate::types::{ChangeFlags, ViewId, ViewOptions, ViewState};

impl ViewTree {
    /// Recompute [`ViewState::EXPOSED`] for every view.
    ///
    /// Reconfigures `zbuffer` when the root's size changed. Returns whether the
    /// root is exposed.
    pub fn compute_exposure(&mut self, zbuffer: &mut ZBuffer) -> bool {
        let root = self.root();
        let Some(screen) = self.global_rect(root) else {
            return false;
        };
        if zbuffer.screen() == screen {
            zbuffer.reset();
        } else {
            zbuffer.configure(screen);
        }
        self.expose(root, screen, zbuffer)
    }

    fn expose(&mut self, id: ViewId, clip: Rectangle, zbuffer: &mut ZBuffer) -> bool {
        let Some(rect) = self.global_rect(id) else {
            return false;
        };
        if !self.has_state(id, ViewState::VISIBLE) || !rect.intersects(&clip) {
            self.conceal(id);
            return false;
        }
        let footprint = rect.intersection(&clip);
        let mut any_child = false;
        let children: Children = self.children_of(id).iter().copied().collect();
        for child in children {
            any_child |= self.expose(child, footprint, zbuffer);
        }
        let own = !zbuffer.is_area_set(footprint);
        zbuffer.set(footprint);
        let exposed = own || any_child;
        self.mark_exposed(id, exposed);
        exposed
    }

    /// Clear `EXPOSED` on a whole subtree.
    fn conceal(&mut self, id: ViewId) {
        let mut stack: Children = Children::new();
        stack.push(id);
        while let Some(v) = stack.pop() {
            self.mark_exposed(v, false);
            stack.extend(self.children_of(v).iter().copied());
        }
    }

    /// Record a view's exposure. A view whose exposure flipped is flagged for
    /// redraw so that buffered ancestors repaint their cached surface.
    fn mark_exposed(&mut self, id: ViewId, exposed: bool) {
        let Some(n) = self.get_mut(id) else {
            return;
        };
        if n.state.contains(ViewState::EXPOSED) == exposed {
            return;
        }
        n.state.set(ViewState::EXPOSED, exposed);
        self.set_changed(id, ChangeFlags::REDRAW);
    }

    /// Paint every visible, exposed view, back to front.
    ///
    /// Views with [`ViewOptions::BUFFERED`] keep an offscreen surface and only
    /// repaint it when flagged for redraw; otherwise the cached surface is
    /// composited as is.
    pub fn draw(&mut self, painter: &mut Painter<'_>) {
        for surface in core::mem::take(&mut self.retired) {
            painter.destroy_surface(surface);
        }
        let root = self.root();
        self.draw_view(root, painter);
    }

    fn draw_view(&mut self, id: ViewId, painter: &mut Painter<'_>) {
        let Some(n) = self.get(id) else {
            return;
        };
        if !n.state.contains(ViewState::VISIBLE | ViewState::EXPOSED) {
            return;
        }
        if n.options.contains(ViewOptions::BUFFERED) {
            self.draw_buffered(id, painter);
        } else {
            self.paint(id, painter);
        }
    }

    fn paint(&mut self, id: ViewId, painter: &mut Painter<'_>) {
        let Some(widget) = self.widget(id) else {
            return;
        };
        widget.draw(self, id, painter);
        let children: Children = self.children_of(id).iter().rev().copied().collect();
        for child in children {
            self.draw_view(child, painter);
        }
        self.clear_changed(id, ChangeFlags::REDRAW);
    }

    fn draw_buffered(&mut self, id: ViewId, painter: &mut Painter<'_>) {
        let Some(rect) = self.global_rect(id) else {
            return;
        };
        let Some(n) = self.get(id) else {
            return;
        };
        let cached = n.surface;
        let dirty = n.changed.contains(ChangeFlags::REDRAW);
        let (surface, fresh) = match cached {
            Some((surface, area)) if area == rect => (surface, false),
            other => {
                if let Some((stale, _)) = other {
                    painter.destroy_surface(stale);
                }
                let surface = painter.create_surface(rect);
                if let Some(n) = self.get_mut(id) {
                    n.surface = Some((surface, rect));
                }
                (surface, true)
            }
        };
        if fresh || dirty {
            let previous = painter.select_surface(Some(surface));
            self.paint(id, painter);
            painter.select_surface(previous);
        }
        painter.composite(surface, rect);
    }
}

#[cfg(test)]
mod tests {
    use casement_geometry::Rectangle;

    use super::*;
    use crate::palette::{Palette, PaletteGroup};
    use crate::recording::{DrawOp, RecordingRenderer};
    use crate::render::RenderContext;
    use crate::types::ViewConfig;
    use crate::widget::{Plain, Widget};

    fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Rectangle {
        Rectangle::from_coords(x0, y0, x1, y1)
    }

    /// Fills its rectangle.
    #[derive(Debug)]
    struct Solid;

    impl Widget for Solid {
        fn draw(&self, tree: &ViewTree, id: ViewId, painter: &mut Painter<'_>) {
            if let Some(r) = tree.global_rect(id) {
                let face = painter.color(PaletteGroup::Button, crate::palette::FACE);
                painter.fill(r, face);
            }
        }
    }

    fn fills(ops: &[DrawOp]) -> usize {
        ops.iter().filter(|op| matches!(op, DrawOp::Fill(..))).count()
    }

    #[test]
    fn fully_covered_views_are_not_exposed() {
        let mut tree = ViewTree::new(rect(0, 0, 99, 99));
        let root = tree.root();
        let back = tree.insert(root, ViewConfig::new(rect(10, 10, 19, 19)), Plain).unwrap();
        let front = tree.insert(root, ViewConfig::new(rect(0, 0, 29, 29)), Plain).unwrap();
        let mut z = ZBuffer::new(rect(0, 0, 99, 99));
        assert!(tree.compute_exposure(&mut z));
        assert!(tree.has_state(front, ViewState::EXPOSED));
        assert!(!tree.has_state(back, ViewState::EXPOSED));
        assert!(tree.has_state(root, ViewState::EXPOSED));

        tree.hide(front);
        tree.compute_exposure(&mut z);
        assert!(tree.has_state(back, ViewState::EXPOSED));
        assert!(!tree.has_state(front, ViewState::EXPOSED));
    }

    #[test]
    fn partial_overlap_keeps_both_exposed() {
        let mut tree = ViewTree::new(rect(0, 0, 99, 99));
        let root = tree.root();
        let back = tree.insert(root, ViewConfig::new(rect(0, 0, 19, 19)), Plain).unwrap();
        let front = tree.insert(root, ViewConfig::new(rect(10, 10, 29, 29)), Plain).unwrap();
        let mut z = ZBuffer::new(rect(0, 0, 49, 49));
        tree.compute_exposure(&mut z);
        assert_eq!(z.screen(), rect(0, 0, 99, 99), "buffer follows the root");
        assert!(tree.has_state(back, ViewState::EXPOSED));
        assert!(tree.has_state(front, ViewState::EXPOSED));
    }

    #[test]
    fn children_are_clipped_to_their_parent() {
        let mut tree = ViewTree::new(rect(0, 0, 99, 99));
        let root = tree.root();
        let g = tree.insert_group(root, ViewConfig::new(rect(0, 0, 19, 19)), Plain).unwrap();
        // Entirely outside its parent.
        let lost = tree.insert(g, ViewConfig::new(rect(40, 40, 49, 49)), Plain).unwrap();
        let mut z = ZBuffer::new(rect(0, 0, 99, 99));
        tree.compute_exposure(&mut z);
        assert!(!tree.has_state(lost, ViewState::EXPOSED));
        assert!(tree.has_state(g, ViewState::EXPOSED));
    }

    #[test]
    fn covered_views_are_not_painted() {
        let mut tree = ViewTree::new(rect(0, 0, 99, 99));
        let root = tree.root();
        tree.insert(root, ViewConfig::new(rect(10, 10, 19, 19)), Solid);
        tree.insert(root, ViewConfig::new(rect(0, 0, 29, 29)), Solid);
        let mut ctx = RenderContext::new(RecordingRenderer::new(), rect(0, 0, 99, 99));
        ctx.frame(&mut tree);
        assert_eq!(fills(ctx.renderer.ops()), 1);
        assert_eq!(ctx.renderer.frames(), 1);
        assert_eq!(tree.changed(root), Some(ChangeFlags::empty()));
    }

    #[test]
    fn buffered_views_reuse_their_surface() {
        let mut tree = ViewTree::new(rect(0, 0, 99, 99));
        let root = tree.root();
        let v = tree
            .insert(
                root,
                ViewConfig::new(rect(10, 10, 29, 29)).options(ViewOptions::BUFFERED),
                Solid,
            )
            .unwrap();
        let mut ctx = RenderContext::new(RecordingRenderer::new(), rect(0, 0, 99, 99))
            .with_palette(Palette::default());

        ctx.frame(&mut tree);
        let first = ctx.renderer.take_ops();
        assert_eq!(fills(&first), 1);
        assert!(first.iter().any(|op| matches!(op, DrawOp::Composite(..))));

        ctx.frame(&mut tree);
        let second = ctx.renderer.take_ops();
        assert_eq!(fills(&second), 0, "clean surface is only composited");
        assert!(second.iter().any(|op| matches!(op, DrawOp::Composite(..))));

        tree.set_changed(v, ChangeFlags::REDRAW);
        ctx.frame(&mut tree);
        assert_eq!(fills(&ctx.renderer.take_ops()), 1);

        assert!(tree.move_clipped(v, 5, 0));
        ctx.frame(&mut tree);
        let moved = ctx.renderer.take_ops();
        assert!(moved.iter().any(|op| matches!(op, DrawOp::DestroySurface(_))));
        assert_eq!(ctx.renderer.surface_count(), 1);

        tree.remove(root, v);
        ctx.frame(&mut tree);
        assert_eq!(ctx.renderer.surface_count(), 0, "surfaces die with their view");
    }

    #[test]
    fn buffered_groups_repaint_when_a_child_is_uncovered() {
        let mut tree = ViewTree::new(rect(0, 0, 99, 99));
        let root = tree.root();
        let b = tree
            .insert_group(
                root,
                ViewConfig::new(rect(0, 0, 49, 49)).options(ViewOptions::BUFFERED),
                Plain,
            )
            .unwrap();
        let c = tree.insert(b, ViewConfig::new(rect(0, 0, 9, 9)), Solid).unwrap();
        let w = tree.insert(root, ViewConfig::new(rect(0, 0, 19, 19)), Plain).unwrap();
        let mut ctx = RenderContext::new(RecordingRenderer::new(), rect(0, 0, 99, 99));

        ctx.frame(&mut tree);
        assert!(!tree.has_state(c, ViewState::EXPOSED));
        assert_eq!(fills(&ctx.renderer.take_ops()), 0, "covered child is skipped");

        assert!(tree.move_clipped(w, 60, 60));
        ctx.frame(&mut tree);
        assert!(tree.has_state(c, ViewState::EXPOSED));
        assert_eq!(fills(&ctx.renderer.take_ops()), 1, "cached surface was refreshed");

        ctx.frame(&mut tree);
        assert_eq!(fills(&ctx.renderer.take_ops()), 0, "and is reused afterwards");

        // Covering the child again and then removing the cover also repaints.
        let cover = tree.insert(root, ViewConfig::new(rect(0, 0, 19, 19)), Plain).unwrap();
        ctx.frame(&mut tree);
        ctx.renderer.take_ops();
        assert!(tree.remove(root, cover));
        ctx.frame(&mut tree);
        assert_eq!(fills(&ctx.renderer.take_ops()), 1);
    }
}
