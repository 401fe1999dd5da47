// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Progress bars.

use core::cell::Cell;

use casement_geometry::Rectangle;

use crate::event::{Command, CommandEvent};
use crate::palette::{self, PaletteGroup};
use crate::render::Painter;
use crate::tree::ViewTree;
use crate::types::{ChangeFlags, ViewId};
use crate::widget::Widget;

/// Shows `value` out of `max` as a filled portion of the bar.
///
/// Updated through [`Command::ValueChanged`] with the new value in `payload`.
#[derive(Debug)]
pub struct ProgressBar {
    value: Cell<i64>,
    max: i64,
}

impl ProgressBar {
    /// An empty bar counting up to `max`.
    pub fn new(max: i64) -> Self {
        Self {
            value: Cell::new(0),
            max: max.max(1),
        }
    }

    /// Current value.
    pub fn value(&self) -> i64 {
        self.value.get()
    }

    /// Upper bound.
    pub fn max(&self) -> i64 {
        self.max
    }

    /// Width in pixels of the filled part of a bar `width` pixels wide.
    pub fn filled_width(&self, width: i32) -> i32 {
        let filled = i64::from(width) * self.value.get() / self.max;
        i32::try_from(filled).unwrap_or(width)
    }
}

impl Widget for ProgressBar {
    fn validate_command(&self, tree: &ViewTree, id: ViewId, command: Command) -> bool {
        command == Command::ValueChanged || tree.base_validate_command(id, command)
    }

    fn execute_command(&self, tree: &mut ViewTree, id: ViewId, command: &CommandEvent) -> bool {
        if command.command != Command::ValueChanged {
            return tree.base_execute_command(id, command);
        }
        let value = command.payload.clamp(0, self.max);
        if self.value.replace(value) != value {
            tree.set_changed(id, ChangeFlags::REDRAW);
        }
        true
    }

    fn draw(&self, tree: &ViewTree, id: ViewId, painter: &mut Painter<'_>) {
        let Some(r) = tree.global_rect(id) else {
            return;
        };
        painter.fill(r, painter.color(PaletteGroup::ProgressBar, palette::FACE));
        let filled = self.filled_width(r.width());
        if filled > 0 {
            let bar = Rectangle::from_origin_size(r.ul, filled, r.height());
            painter.fill(bar, painter.color(PaletteGroup::ProgressBar, palette::ACCENT));
        }
        painter.frame(r, painter.color(PaletteGroup::ProgressBar, palette::BORDER));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawOp, RecordingRenderer};
    use crate::render::RenderContext;
    use crate::types::ViewConfig;

    #[test]
    fn value_changed_updates_and_clamps() {
        let mut tree = ViewTree::new(Rectangle::from_coords(0, 0, 99, 9));
        let root = tree.root();
        let bar = tree
            .insert(
                root,
                ViewConfig::new(Rectangle::from_coords(0, 0, 99, 9)),
                ProgressBar::new(200),
            )
            .unwrap();
        let set = |v| CommandEvent::new(Command::ValueChanged).to(bar).payload(v);
        assert!(tree.execute_command(bar, &set(50)));
        let widget = tree.widget_ref::<ProgressBar>(bar).unwrap();
        assert_eq!(widget.value(), 50);
        assert_eq!(widget.filled_width(100), 25);
        assert!(tree.execute_command(bar, &set(-4)));
        assert_eq!(tree.widget_ref::<ProgressBar>(bar).unwrap().value(), 0);
        assert!(tree.execute_command(bar, &set(10_000)));
        assert_eq!(tree.widget_ref::<ProgressBar>(bar).unwrap().value(), 200);
    }

    #[test]
    fn draws_the_filled_portion() {
        let mut tree = ViewTree::new(Rectangle::from_coords(0, 0, 99, 9));
        let root = tree.root();
        let bar = tree
            .insert(
                root,
                ViewConfig::new(Rectangle::from_coords(0, 0, 99, 9)),
                ProgressBar::new(4),
            )
            .unwrap();
        let set = CommandEvent::new(Command::ValueChanged).to(bar).payload(1);
        tree.send_event(crate::event::Event::command(set));
        let mut ctx = RenderContext::new(RecordingRenderer::new(), Rectangle::from_coords(0, 0, 99, 9));
        ctx.frame(&mut tree);
        let filled = Rectangle::from_coords(0, 0, 24, 9).to_kurbo();
        assert!(
            ctx.renderer
                .ops()
                .iter()
                .any(|op| matches!(op, DrawOp::Fill(r, _) if *r == filled))
        );
    }
}
