// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll bars.

use core::cell::Cell;

use casement_geometry::{Point, Rectangle};

use crate::event::{Address, Command, CommandEvent, Event, PointerEvent};
use crate::palette::{self, PaletteGroup};
use crate::render::Painter;
use crate::tree::ViewTree;
use crate::types::{ChangeFlags, ViewId};
use crate::widget::Widget;

/// A horizontal or vertical scroll bar over `min..=max`.
///
/// The bar is vertical when it is taller than wide. The thumb is a square as
/// thick as the bar. Dragging the thumb or clicking the track changes the
/// value and sends [`Command::ValueChanged`] to the parent, with the new value
/// in `payload`. Executing `ValueChanged` on the bar itself sets the value
/// from `payload` without notifying anyone.
#[derive(Debug)]
pub struct ScrollBar {
    min: i32,
    max: i32,
    page: i32,
    value: Cell<i32>,
    /// thumb rectangle while dragging, in global coordinates
    drag: Cell<Option<Rectangle>>,
}

impl ScrollBar {
    /// A bar over `min..=max` starting at `min`; track clicks move by `page`.
    pub fn new(min: i32, max: i32, page: i32) -> Self {
        let max = max.max(min);
        Self {
            min,
            max,
            page: page.max(1),
            value: Cell::new(min),
            drag: Cell::new(None),
        }
    }

    /// Current value.
    pub fn value(&self) -> i32 {
        self.value.get()
    }

    /// Range as `(min, max)`.
    pub fn range(&self) -> (i32, i32) {
        (self.min, self.max)
    }

    /// Store a clamped value. Returns whether it changed.
    fn store(&self, value: i32) -> bool {
        let value = value.clamp(self.min, self.max);
        self.value.replace(value) != value
    }

    fn geometry(track: Rectangle) -> (bool, i32, i32) {
        let vertical = track.height() > track.width();
        let (len, thick) = if vertical {
            (track.height(), track.width())
        } else {
            (track.width(), track.height())
        };
        (vertical, len, thick.min(len))
    }

    /// Thumb rectangle for the current value inside `track` (global).
    pub(crate) fn thumb(&self, track: Rectangle) -> Rectangle {
        let (vertical, len, thumb) = Self::geometry(track);
        let travel = i64::from(len - thumb);
        let span = i64::from(self.max) - i64::from(self.min);
        let offset = if span == 0 {
            0
        } else {
            (i64::from(self.value.get()) - i64::from(self.min)) * travel / span
        };
        let offset = i32::try_from(offset).unwrap_or(0);
        if vertical {
            Rectangle::from_origin_size(track.ul + Point::new(0, offset), track.width(), thumb)
        } else {
            Rectangle::from_origin_size(track.ul + Point::new(offset, 0), thumb, track.height())
        }
    }

    /// Value for a thumb placed at `thumb` inside `track`.
    fn value_at(&self, track: Rectangle, thumb: Rectangle) -> i32 {
        let (vertical, len, size) = Self::geometry(track);
        let travel = i64::from(len - size);
        if travel == 0 {
            return self.min;
        }
        let offset = if vertical {
            thumb.ul.y - track.ul.y
        } else {
            thumb.ul.x - track.ul.x
        };
        let span = i64::from(self.max) - i64::from(self.min);
        let value = i64::from(self.min) + (i64::from(offset) * span + travel / 2) / travel;
        i32::try_from(value).unwrap_or(self.max)
    }

    fn notify(&self, tree: &mut ViewTree, id: ViewId) {
        tree.set_changed(id, ChangeFlags::REDRAW);
        let Some(parent) = tree.parent_of(id) else {
            return;
        };
        let event = CommandEvent::new(Command::ValueChanged)
            .to(Address::View(parent))
            .about(id)
            .sent_by(id)
            .payload(i64::from(self.value.get()));
        tree.send_event(Event::command(event));
    }

    fn pointer(&self, tree: &mut ViewTree, id: ViewId, p: &PointerEvent) -> bool {
        let Some(track) = tree.global_rect(id) else {
            return false;
        };
        if p.is_press() {
            if !track.includes(p.position()) {
                return false;
            }
            let thumb = self.thumb(track);
            if thumb.includes(p.position()) {
                self.drag.set(Some(thumb));
                tree.capture_pointer(id);
                return false;
            }
            let (vertical, ..) = Self::geometry(track);
            let before = if vertical {
                p.y < thumb.ul.y
            } else {
                p.x < thumb.ul.x
            };
            let step = if before { -self.page } else { self.page };
            return self.store(self.value.get().saturating_add(step));
        }
        if p.is_motion()
            && let Some(mut thumb) = self.drag.get()
        {
            let (vertical, ..) = Self::geometry(track);
            let (dx, dy) = if vertical { (0, p.yrel) } else { (p.xrel, 0) };
            thumb.move_clipped(dx, dy, track);
            self.drag.set(Some(thumb));
            return self.store(self.value_at(track, thumb));
        }
        if p.is_release() && self.drag.take().is_some() {
            tree.release_pointer(id);
            tree.set_changed(id, ChangeFlags::REDRAW);
        }
        false
    }
}

impl Widget for ScrollBar {
    fn validate_command(&self, tree: &ViewTree, id: ViewId, command: Command) -> bool {
        command == Command::ValueChanged || tree.base_validate_command(id, command)
    }

    fn execute_command(&self, tree: &mut ViewTree, id: ViewId, command: &CommandEvent) -> bool {
        if command.command != Command::ValueChanged {
            return tree.base_execute_command(id, command);
        }
        let clamped = command
            .payload
            .clamp(i64::from(self.min), i64::from(self.max));
        self.store(i32::try_from(clamped).unwrap_or(self.min));
        tree.set_changed(id, ChangeFlags::REDRAW);
        true
    }

    fn handle_event(&self, tree: &mut ViewTree, id: ViewId, event: &mut Event) {
        let Some(p) = event.as_pointer().copied() else {
            tree.base_handle_event(id, event);
            return;
        };
        if self.pointer(tree, id, &p) {
            self.notify(tree, id);
        }
        event.clear();
    }

    fn draw(&self, tree: &ViewTree, id: ViewId, painter: &mut Painter<'_>) {
        let Some(track) = tree.global_rect(id) else {
            return;
        };
        painter.fill(track, painter.color(PaletteGroup::ScrollBar, palette::FACE));
        let thumb = self.drag.get().unwrap_or_else(|| self.thumb(track));
        painter.fill(thumb, painter.color(PaletteGroup::ScrollBar, palette::ACCENT));
        painter.frame(thumb, painter.color(PaletteGroup::ScrollBar, palette::BORDER));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::event::Buttons;
    use crate::types::ViewConfig;

    /// Group remembering the last `ValueChanged` payload.
    #[derive(Debug, Default)]
    struct Listener {
        last: Rc<Cell<Option<i64>>>,
    }

    impl Widget for Listener {
        fn validate_command(&self, tree: &ViewTree, id: ViewId, command: Command) -> bool {
            command == Command::ValueChanged || tree.base_validate_command(id, command)
        }

        fn execute_command(&self, tree: &mut ViewTree, id: ViewId, command: &CommandEvent) -> bool {
            if command.command == Command::ValueChanged {
                self.last.set(Some(command.payload));
                return true;
            }
            tree.base_execute_command(id, command)
        }
    }

    fn setup() -> (ViewTree, ViewId, Rc<Cell<Option<i64>>>) {
        let mut tree = ViewTree::new(Rectangle::from_coords(0, 0, 199, 99));
        let root = tree.root();
        let listener = Listener::default();
        let last = listener.last.clone();
        let panel = tree
            .insert_group(
                root,
                ViewConfig::new(Rectangle::from_coords(0, 0, 149, 49)),
                listener,
            )
            .unwrap();
        // 100 wide, 10 high: thumb is 10 wide with 90 pixels of travel.
        let bar = tree
            .insert(
                panel,
                ViewConfig::new(Rectangle::from_coords(0, 0, 99, 9)),
                ScrollBar::new(0, 90, 10),
            )
            .unwrap();
        (tree, bar, last)
    }

    fn pointer(tree: &mut ViewTree, p: PointerEvent) {
        let root = tree.root();
        let mut event = Event::pointer(p);
        tree.handle_event(root, &mut event);
    }

    fn value(tree: &ViewTree, bar: ViewId) -> i32 {
        tree.widget_ref::<ScrollBar>(bar).unwrap().value()
    }

    #[test]
    fn dragging_the_thumb_reports_values() {
        let (mut tree, bar, last) = setup();
        pointer(&mut tree, PointerEvent::press(3, 3));
        assert_eq!(tree.pointer_capture(), Some(bar));
        pointer(&mut tree, PointerEvent::motion(33, 3, 30, 0, Buttons::LEFT));
        assert_eq!(value(&tree, bar), 30);
        assert_eq!(last.get(), Some(30));

        // Dragging past the end stops at the maximum.
        pointer(&mut tree, PointerEvent::motion(300, 3, 300, 0, Buttons::LEFT));
        assert_eq!(value(&tree, bar), 90);
        assert_eq!(last.get(), Some(90));

        pointer(&mut tree, PointerEvent::release(300, 3));
        assert_eq!(tree.pointer_capture(), None);
    }

    #[test]
    fn clicking_the_track_pages() {
        let (mut tree, bar, last) = setup();
        pointer(&mut tree, PointerEvent::press(60, 5));
        assert_eq!(value(&tree, bar), 10);
        assert_eq!(last.get(), Some(10));
        pointer(&mut tree, PointerEvent::press(1, 5));
        assert_eq!(value(&tree, bar), 0);
        // The thumb is back under the pointer: this press starts a drag.
        last.set(None);
        pointer(&mut tree, PointerEvent::press(1, 5));
        assert_eq!(last.get(), None);
        assert_eq!(tree.pointer_capture(), Some(bar));
    }

    #[test]
    fn value_changed_sets_without_notifying() {
        let (mut tree, bar, last) = setup();
        let set = CommandEvent::new(Command::ValueChanged).to(bar).payload(1_000);
        assert!(tree.execute_command(bar, &set));
        assert_eq!(value(&tree, bar), 90);
        assert_eq!(last.get(), None);
        let track = tree.global_rect(bar).unwrap();
        let thumb = tree.widget_ref::<ScrollBar>(bar).unwrap().thumb(track);
        assert_eq!(thumb, Rectangle::from_coords(90, 0, 99, 9));
    }
}
