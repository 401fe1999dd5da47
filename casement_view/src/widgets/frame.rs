// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decorative frames.

use crate::palette::{self, PaletteGroup};
use crate::render::Painter;
use crate::tree::ViewTree;
use crate::types::ViewId;
use crate::widget::Widget;

/// An outlined rectangle, optionally with a caption in its top edge.
///
/// Frames are never selectable and ignore input.
#[derive(Debug, Default)]
pub struct Frame {
    caption: Option<String>,
}

impl Frame {
    /// A plain frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// A frame with a caption.
    pub fn with_caption(caption: impl Into<String>) -> Self {
        Self {
            caption: Some(caption.into()),
        }
    }
}

impl Widget for Frame {
    fn draw(&self, tree: &ViewTree, id: ViewId, painter: &mut Painter<'_>) {
        let Some(r) = tree.global_rect(id) else {
            return;
        };
        painter.frame(r, painter.color(PaletteGroup::Frame, palette::BORDER));
        if let Some(caption) = &self.caption {
            painter.text(
                r.ul + casement_geometry::Point::new(4, 0),
                caption,
                painter.color(PaletteGroup::Frame, palette::TEXT),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use casement_geometry::Rectangle;

    use super::*;
    use crate::recording::RecordingRenderer;
    use crate::render::RenderContext;
    use crate::types::ViewConfig;

    #[test]
    fn frames_draw_outline_and_caption() {
        let mut tree = ViewTree::new(Rectangle::from_coords(0, 0, 49, 49));
        let root = tree.root();
        let f = tree
            .insert(
                root,
                ViewConfig::new(Rectangle::from_coords(5, 5, 44, 44)),
                Frame::with_caption("Options"),
            )
            .unwrap();
        assert!(!tree.focus(f));
        let mut ctx = RenderContext::new(RecordingRenderer::new(), Rectangle::from_coords(0, 0, 49, 49));
        ctx.frame(&mut tree);
        assert_eq!(ctx.renderer.texts().collect::<Vec<_>>(), ["Options"]);
    }
}
