// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Windows and their decorations.

use core::cell::Cell;

use casement_geometry::{Point, Rectangle};

use super::button::track_click;
use crate::event::{Address, Command, CommandEvent, Event};
use crate::palette::{self, PaletteGroup};
use crate::render::Painter;
use crate::tree::ViewTree;
use crate::types::{ResizeMode, ViewConfig, ViewId, ViewOptions, ViewState};
use crate::widget::Widget;

/// Height of a window's title bar, in pixels.
pub const TITLE_HEIGHT: i32 = 12;

/// A top-level group with a border, a title bar and a close button.
#[derive(Debug)]
pub struct Window {
    title: String,
}

/// Handles of a window built by [`Window::build`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WindowParts {
    /// The window group.
    pub window: ViewId,
    /// Its title bar.
    pub title_bar: ViewId,
    /// Its close button.
    pub close: ViewId,
}

impl Window {
    /// A window titled `title`.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// The title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Insertion data for a window at `borders`.
    ///
    /// Windows are selectable, come to the front when selected and follow
    /// their parent's lower-right corner.
    pub fn config(borders: Rectangle) -> ViewConfig {
        ViewConfig::new(borders)
            .options(ViewOptions::SELECTABLE | ViewOptions::TOP_SELECT)
            .resize_mode(ResizeMode::GROW_HI)
            .size_limits(
                Point::new(3 * TITLE_HEIGHT, TITLE_HEIGHT + 2),
                Point::new(i32::MAX, i32::MAX),
            )
    }

    /// Insert a decorated window into `parent` and select it.
    ///
    /// Returns `None` when `parent` is not a live group or `borders` is too
    /// small for the decorations.
    pub fn build(
        tree: &mut ViewTree,
        parent: ViewId,
        borders: Rectangle,
        title: impl Into<String>,
    ) -> Option<WindowParts> {
        let title = title.into();
        let config = Self::config(borders);
        if !config.accepts_size(borders.size()) {
            return None;
        }
        let window = tree.insert_group(parent, config, Self::new(title.clone()))?;
        let width = borders.width();
        let title_bar = tree.insert(
            window,
            ViewConfig::new(Rectangle::from_coords(0, 0, width - 1, TITLE_HEIGHT - 1))
                .resize_mode(ResizeMode::GROW_HI_X),
            TitleBar::new(title),
        )?;
        let close = tree.insert(
            window,
            ViewConfig::new(Rectangle::from_coords(
                width - TITLE_HEIGHT,
                0,
                width - 1,
                TITLE_HEIGHT - 1,
            ))
            .resize_mode(ResizeMode::GROW_LO_X | ResizeMode::GROW_HI_X),
            CloseButton::new(),
        )?;
        tree.select(window);
        Some(WindowParts {
            window,
            title_bar,
            close,
        })
    }
}

impl Widget for Window {
    fn draw(&self, tree: &ViewTree, id: ViewId, painter: &mut Painter<'_>) {
        let Some(r) = tree.global_rect(id) else {
            return;
        };
        painter.fill(r, painter.color(PaletteGroup::Window, palette::FACE));
        let border = if tree.has_state(id, ViewState::FOCUSED) {
            palette::ACCENT
        } else {
            palette::BORDER
        };
        painter.frame(r, painter.color(PaletteGroup::Window, border));
    }
}

/// Drag handle for the enclosing window.
///
/// A press focuses the window and captures the pointer; motion while
/// captured moves the window, clipped to the window's parent.
#[derive(Debug)]
pub struct TitleBar {
    title: String,
}

impl TitleBar {
    /// A title bar showing `title`.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Widget for TitleBar {
    fn handle_event(&self, tree: &mut ViewTree, id: ViewId, event: &mut Event) {
        let Some(p) = event.as_pointer().copied() else {
            tree.base_handle_event(id, event);
            return;
        };
        let Some(window) = tree.parent_of(id) else {
            return;
        };
        if p.is_press() {
            if tree
                .global_rect(id)
                .is_some_and(|r| r.includes(p.position()))
            {
                tree.focus(window);
                tree.capture_pointer(id);
                event.clear();
            }
        } else if p.is_motion() && tree.pointer_capture() == Some(id) {
            tree.move_clipped(window, p.xrel, p.yrel);
            event.clear();
        } else if p.is_release() && tree.release_pointer(id) {
            event.clear();
        }
    }

    fn draw(&self, tree: &ViewTree, id: ViewId, painter: &mut Painter<'_>) {
        let Some(r) = tree.global_rect(id) else {
            return;
        };
        let active = tree
            .parent_of(id)
            .is_some_and(|w| tree.has_state(w, ViewState::FOCUSED));
        let face = if active { palette::ACCENT } else { palette::FACE };
        painter.fill(r, painter.color(PaletteGroup::TitleBar, face));
        painter.text(
            r.ul + Point::new(2, 1),
            &self.title,
            painter.color(PaletteGroup::TitleBar, palette::TEXT),
        );
    }
}

/// Closes the enclosing window.
///
/// Sends [`Command::Close`] to the window's parent with the window as target.
/// Not selectable, so clicking it never moves focus.
#[derive(Debug, Default)]
pub struct CloseButton {
    pressed: Cell<bool>,
}

impl CloseButton {
    /// A close button.
    pub fn new() -> Self {
        Self::default()
    }

    fn fire(tree: &mut ViewTree, id: ViewId) {
        let Some(window) = tree.parent_of(id) else {
            return;
        };
        let dest = tree
            .parent_of(window)
            .map_or(Address::Unset, Address::View);
        let close = CommandEvent::new(Command::Close)
            .to(dest)
            .about(window)
            .sent_by(id);
        tree.send_event(Event::command(close));
    }
}

impl Widget for CloseButton {
    fn handle_event(&self, tree: &mut ViewTree, id: ViewId, event: &mut Event) {
        let Some(p) = event.as_pointer().copied() else {
            tree.base_handle_event(id, event);
            return;
        };
        if track_click(&self.pressed, tree, id, &p) {
            Self::fire(tree, id);
        }
        event.clear();
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
        let ink = painter.color(PaletteGroup::Button, palette::TEXT);
        painter.line(r.ul, r.lr, ink);
        painter.line(Point::new(r.lr.x, r.ul.y), Point::new(r.ul.x, r.lr.y), ink);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::event::{Buttons, PointerEvent};
    use crate::exec::ViewExec;
    use crate::recording::RecordingRenderer;
    use crate::source::{EventSource, SourceError};

    fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Rectangle {
        Rectangle::from_coords(x0, y0, x1, y1)
    }

    fn pointer(tree: &mut ViewTree, p: PointerEvent) {
        let root = tree.root();
        let mut event = Event::pointer(p);
        tree.handle_event(root, &mut event);
    }

    /// Root widget recording every `Close` it executes.
    #[derive(Debug, Default)]
    struct Desk {
        closes: Rc<Cell<u32>>,
        last_target: Rc<Cell<Option<ViewId>>>,
    }

    impl Widget for Desk {
        fn execute_command(&self, tree: &mut ViewTree, id: ViewId, command: &CommandEvent) -> bool {
            if command.command == Command::Close {
                self.closes.set(self.closes.get() + 1);
                self.last_target.set(command.target.view());
            }
            tree.base_execute_command(id, command)
        }
    }

    /// Window stand-in that counts drops.
    #[derive(Debug)]
    struct Dropping(Rc<Cell<u32>>);

    impl Drop for Dropping {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    impl Widget for Dropping {}

    /// Decorates `window` the way [`Window::build`] does.
    fn decorate(tree: &mut ViewTree, window: ViewId, width: i32) -> ViewId {
        tree.insert(
            window,
            ViewConfig::new(rect(0, 0, width - 1, TITLE_HEIGHT - 1)),
            TitleBar::new("Scratch"),
        )
        .unwrap();
        tree.insert(
            window,
            ViewConfig::new(rect(width - TITLE_HEIGHT, 0, width - 1, TITLE_HEIGHT - 1)),
            CloseButton::new(),
        )
        .unwrap()
    }

    #[test]
    fn build_lays_out_decorations() {
        let mut tree = ViewTree::new(rect(0, 0, 199, 99));
        let root = tree.root();
        let parts = Window::build(&mut tree, root, rect(10, 10, 109, 59), "Hello").unwrap();
        assert_eq!(tree.borders(parts.title_bar), Some(rect(0, 0, 99, 11)));
        assert_eq!(tree.borders(parts.close), Some(rect(88, 0, 99, 11)));
        assert_eq!(tree.actual_of(root), Some(parts.window));
        assert_eq!(tree.widget_ref::<Window>(parts.window).unwrap().title(), "Hello");

        // Growing the window keeps the close button in the corner.
        assert!(tree.set_location(parts.window, rect(10, 10, 129, 59)));
        assert_eq!(tree.borders(parts.close), Some(rect(108, 0, 119, 11)));
        assert_eq!(tree.borders(parts.title_bar), Some(rect(0, 0, 119, 11)));

        assert!(Window::build(&mut tree, root, rect(0, 0, 5, 5), "tiny").is_none());
    }

    #[test]
    fn dragging_the_title_bar_moves_the_window() {
        let mut tree = ViewTree::new(rect(0, 0, 199, 99));
        let root = tree.root();
        let parts = Window::build(&mut tree, root, rect(10, 10, 109, 59), "Drag").unwrap();
        pointer(&mut tree, PointerEvent::press(20, 12));
        assert!(tree.has_state(parts.window, ViewState::FOCUSED));
        assert_eq!(tree.pointer_capture(), Some(parts.title_bar));

        pointer(&mut tree, PointerEvent::motion(25, 15, 5, 3, Buttons::LEFT));
        assert_eq!(tree.borders(parts.window), Some(rect(15, 13, 114, 62)));

        // Overshooting slides along the parent's edge.
        pointer(&mut tree, PointerEvent::motion(500, 15, 500, 0, Buttons::LEFT));
        assert_eq!(tree.borders(parts.window), Some(rect(100, 13, 199, 62)));

        pointer(&mut tree, PointerEvent::release(500, 15));
        assert_eq!(tree.pointer_capture(), None);
        pointer(&mut tree, PointerEvent::motion(510, 15, 10, 0, Buttons::empty()));
        assert_eq!(tree.borders(parts.window), Some(rect(100, 13, 199, 62)));
    }

    #[test]
    fn close_button_closes_its_window_directly() {
        let desk = Desk::default();
        let closes = desk.closes.clone();
        let target = desk.last_target.clone();
        let mut tree = ViewTree::with_root_widget(rect(0, 0, 199, 99), desk);
        let root = tree.root();
        let drops = Rc::new(Cell::new(0));
        let window = tree
            .insert_group(
                root,
                Window::config(rect(10, 10, 109, 59)),
                Dropping(drops.clone()),
            )
            .unwrap();
        let close = decorate(&mut tree, window, 100);
        let Some(spot) = tree.global_rect(close).map(|r| r.ul + Point::new(1, 1)) else {
            panic!("close button has geometry");
        };

        pointer(&mut tree, PointerEvent::press(spot.x, spot.y));
        assert!(tree.is_alive(window), "press alone does nothing");
        pointer(&mut tree, PointerEvent::release(spot.x, spot.y));

        assert_eq!(closes.get(), 1);
        assert_eq!(target.get(), Some(window));
        assert!(!tree.is_alive(window));
        assert!(!tree.is_alive(close));
        assert_eq!(drops.get(), 1);
        assert!(tree.children_of(root).is_empty());
    }

    /// Scripted source that also records what the loop injects.
    #[derive(Debug, Default)]
    struct Script {
        queue: std::collections::VecDeque<Event>,
        injected: Vec<Event>,
    }

    impl EventSource for Script {
        fn wait(&mut self, _timeout_ms: i32) -> Result<Option<Event>, SourceError> {
            Ok(self.queue.pop_front())
        }

        fn inject(&mut self, event: Event) -> Result<(), SourceError> {
            self.injected.push(event.clone());
            self.queue.push_back(event);
            Ok(())
        }
    }

    #[test]
    fn close_button_closes_its_window_through_the_loop() {
        let desk = Desk::default();
        let closes = desk.closes.clone();
        let tree = ViewTree::with_root_widget(rect(0, 0, 199, 99), desk);
        let mut exec = ViewExec::with_tree(
            tree,
            Script::default(),
            RecordingRenderer::new(),
            crate::config::ExecConfig::default(),
        );
        let root = exec.tree().root();
        let drops = Rc::new(Cell::new(0));
        let window = exec
            .tree_mut()
            .insert_group(
                root,
                Window::config(rect(10, 10, 109, 59)),
                Dropping(drops.clone()),
            )
            .unwrap();
        let close = decorate(exec.tree_mut(), window, 100);
        let Some(spot) = exec
            .tree()
            .global_rect(close)
            .map(|r| r.ul + Point::new(1, 1))
        else {
            panic!("close button has geometry");
        };
        exec.start();
        let script = exec.source_mut();
        script.queue.push_back(Event::pointer(PointerEvent::press(spot.x, spot.y)));
        script.queue.push_back(Event::pointer(PointerEvent::release(spot.x, spot.y)));

        while exec.step(0).unwrap() {}

        let injected = &exec.source_mut().injected;
        assert_eq!(injected.len(), 1, "exactly one close was posted");
        let Some(Event::Command(c)) = injected.first() else {
            panic!("a command was posted");
        };
        assert_eq!(c.command, Command::Close);
        assert_eq!(c.dest, Address::View(root));
        assert_eq!(c.target, Address::View(window));
        assert_eq!(c.sender, Some(close));

        assert_eq!(closes.get(), 1);
        assert!(!exec.tree().is_alive(window));
        assert_eq!(drops.get(), 1);
        assert!(exec.render().renderer.frames() >= 1);
    }

    #[test]
    fn close_button_outside_a_group_goes_nowhere() {
        let mut tree = ViewTree::new(rect(0, 0, 99, 99));
        let root = tree.root();
        let close = tree
            .insert(root, ViewConfig::new(rect(0, 0, 9, 9)), CloseButton::new())
            .unwrap();
        pointer(&mut tree, PointerEvent::press(1, 1));
        pointer(&mut tree, PointerEvent::release(1, 1));
        assert!(tree.is_alive(close), "the root has no parent to close it");
    }
}
