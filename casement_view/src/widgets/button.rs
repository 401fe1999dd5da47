// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Push buttons.

use core::cell::Cell;

use casement_geometry::{Point, Rectangle};

use crate::event::{Address, Command, CommandEvent, Event, KeyCode, PointerEvent};
use crate::palette::{self, PaletteGroup};
use crate::render::Painter;
use crate::tree::ViewTree;
use crate::types::{ChangeFlags, ViewConfig, ViewId, ViewOptions, ViewState};
use crate::widget::Widget;

/// Press/release tracking shared by clickable widgets.
///
/// A press inside the view arms it and captures the pointer; the release
/// ends the capture and reports a click when it lands inside the view.
pub(crate) fn track_click(
    pressed: &Cell<bool>,
    tree: &mut ViewTree,
    id: ViewId,
    p: &PointerEvent,
) -> bool {
    let inside = tree
        .global_rect(id)
        .is_some_and(|r| r.includes(p.position()));
    if p.is_press() {
        if inside && !tree.has_state(id, ViewState::DISABLED) {
            pressed.set(true);
            tree.capture_pointer(id);
            tree.set_changed(id, ChangeFlags::REDRAW);
        }
        return false;
    }
    if p.is_release() && pressed.replace(false) {
        tree.release_pointer(id);
        tree.set_changed(id, ChangeFlags::REDRAW);
        return inside;
    }
    false
}

/// A labelled button that sends its command to its parent when clicked.
///
/// The command goes out as a [`CommandEvent`] addressed to the parent with
/// the button as sender and target.
#[derive(Debug)]
pub struct Button {
    label: String,
    command: Command,
    pressed: Cell<bool>,
}

impl Button {
    /// A button firing `command`.
    pub fn new(label: impl Into<String>, command: Command) -> Self {
        Self {
            label: label.into(),
            command,
            pressed: Cell::new(false),
        }
    }

    /// Insertion data for a selectable button at `borders`.
    pub fn config(borders: Rectangle) -> ViewConfig {
        ViewConfig::new(borders).options(ViewOptions::SELECTABLE)
    }

    /// The label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the pointer is currently held down on the button.
    pub fn is_pressed(&self) -> bool {
        self.pressed.get()
    }

    fn fire(&self, tree: &mut ViewTree, id: ViewId) {
        let dest = tree.parent_of(id).map_or(Address::Broadcast, Address::View);
        let event = CommandEvent::new(self.command)
            .to(dest)
            .about(id)
            .sent_by(id);
        tree.send_event(Event::command(event));
    }
}

impl Widget for Button {
    fn validate_command(&self, tree: &ViewTree, id: ViewId, command: Command) -> bool {
        command == Command::Clicked || tree.base_validate_command(id, command)
    }

    fn execute_command(&self, tree: &mut ViewTree, id: ViewId, command: &CommandEvent) -> bool {
        match command.command {
            Command::Clicked => {
                self.fire(tree, id);
                true
            }
            Command::Quit => {
                self.pressed.set(false);
                tree.base_execute_command(id, command)
            }
            _ => tree.base_execute_command(id, command),
        }
    }

    fn handle_event(&self, tree: &mut ViewTree, id: ViewId, event: &mut Event) {
        if let Some(p) = event.as_pointer().copied() {
            let clicked = track_click(&self.pressed, tree, id, &p);
            tree.base_handle_event(id, event);
            if clicked {
                self.fire(tree, id);
            }
            return;
        }
        if let Some(k) = event.as_key().copied()
            && tree.has_state(id, ViewState::FOCUSED)
            && k.modifiers.is_empty()
            && (k.key == KeyCode::ENTER || k.key == KeyCode::SPACE)
        {
            event.clear();
            self.fire(tree, id);
            return;
        }
        tree.base_handle_event(id, event);
    }

    fn draw(&self, tree: &ViewTree, id: ViewId, painter: &mut Painter<'_>) {
        let Some(r) = tree.global_rect(id) else {
            return;
        };
        let face = if self.pressed.get() {
            palette::ACCENT
        } else {
            palette::FACE
        };
        painter.fill(r, painter.color(PaletteGroup::Button, face));
        painter.frame(r, painter.color(PaletteGroup::Button, palette::BORDER));
        let at = r.ul + Point::new(2, 1);
        painter.text(at, &self.label, painter.color(PaletteGroup::Button, palette::TEXT));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::event::{KeyEvent, Modifiers};
    use crate::widget::Plain;

    /// Group counting the commands it executes.
    #[derive(Debug, Default)]
    struct Listener {
        user: Rc<Cell<u32>>,
        last_sender: Rc<Cell<Option<ViewId>>>,
    }

    impl Widget for Listener {
        fn validate_command(&self, tree: &ViewTree, id: ViewId, command: Command) -> bool {
            matches!(command, Command::User(_)) || tree.base_validate_command(id, command)
        }

        fn execute_command(&self, tree: &mut ViewTree, id: ViewId, command: &CommandEvent) -> bool {
            if let Command::User(_) = command.command {
                self.user.set(self.user.get() + 1);
                self.last_sender.set(command.sender);
                return true;
            }
            tree.base_execute_command(id, command)
        }
    }

    fn setup() -> (ViewTree, ViewId, ViewId, Rc<Cell<u32>>, Rc<Cell<Option<ViewId>>>) {
        let mut tree = ViewTree::new(Rectangle::from_coords(0, 0, 99, 99));
        let root = tree.root();
        let listener = Listener::default();
        let count = listener.user.clone();
        let sender = listener.last_sender.clone();
        let panel = tree
            .insert_group(
                root,
                ViewConfig::new(Rectangle::from_coords(0, 0, 49, 49))
                    .options(ViewOptions::SELECTABLE),
                listener,
            )
            .unwrap();
        let button = tree
            .insert(
                panel,
                Button::config(Rectangle::from_coords(10, 10, 29, 19)),
                Button::new("OK", Command::User(1)),
            )
            .unwrap();
        (tree, panel, button, count, sender)
    }

    fn pointer(tree: &mut ViewTree, p: PointerEvent) {
        let root = tree.root();
        let mut event = Event::pointer(p);
        tree.handle_event(root, &mut event);
    }

    #[test]
    fn click_inside_fires_once() {
        let (mut tree, _, button, count, sender) = setup();
        pointer(&mut tree, PointerEvent::press(12, 12));
        assert!(tree.widget_ref::<Button>(button).unwrap().is_pressed());
        assert_eq!(tree.pointer_capture(), Some(button));
        assert!(tree.has_state(button, ViewState::FOCUSED), "press focuses");
        pointer(&mut tree, PointerEvent::release(13, 13));
        assert_eq!(count.get(), 1);
        assert_eq!(sender.get(), Some(button));
        assert_eq!(tree.pointer_capture(), None);
    }

    #[test]
    fn release_outside_cancels() {
        let (mut tree, _, button, count, _) = setup();
        pointer(&mut tree, PointerEvent::press(12, 12));
        pointer(&mut tree, PointerEvent::release(90, 90));
        assert_eq!(count.get(), 0);
        assert!(!tree.widget_ref::<Button>(button).unwrap().is_pressed());
    }

    #[test]
    fn disabled_buttons_ignore_presses() {
        let (mut tree, _, button, count, _) = setup();
        tree.set_state(button, ViewState::DISABLED, true);
        pointer(&mut tree, PointerEvent::press(12, 12));
        pointer(&mut tree, PointerEvent::release(12, 12));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn enter_clicks_the_focused_button() {
        let (mut tree, _, button, count, _) = setup();
        assert!(tree.focus(button));
        let root = tree.root();
        let mut key = Event::key(KeyEvent::press(KeyCode::ENTER, Modifiers::empty()));
        tree.handle_event(root, &mut key);
        assert!(key.is_nothing());
        assert_eq!(count.get(), 1);
        assert!(tree.execute(button, Command::Clicked, None));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn plain_views_reject_clicked() {
        let mut tree = ViewTree::new(Rectangle::from_coords(0, 0, 9, 9));
        let root = tree.root();
        let plain = tree
            .insert(root, ViewConfig::new(Rectangle::from_coords(0, 0, 1, 1)), Plain)
            .unwrap();
        assert!(!tree.execute(plain, Command::Clicked, None));
    }
}
