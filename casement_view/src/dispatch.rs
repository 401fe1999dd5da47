// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event dispatch and the base command behaviour.
//!
//! ## Routing
//!
//! Events enter at a view (normally the root) and travel down:
//!
//! - Pointer events go to the view holding the pointer capture, if it lies in
//!   the group's subtree, and otherwise to the frontmost visible child under
//!   the pointer. A group always consumes a pointer event it routed.
//! - Key events follow the focus chain. A focused group first checks the
//!   zoom key; anything else goes to its actual child.
//! - Commands go to their destination: a direct child, the group itself,
//!   or (for broadcasts) every descendant. Anything else follows the actual
//!   child toward the focused view.
//!
//! Whoever handles an event clears it; a cleared event stops travelling.

use casement_geometry::Rectangle;
use tracing::{debug, info, trace, warn};

use crate::event::{Address, Command, CommandEvent, Event, PointerEvent};
use crate::tree::{Children, Saved, ViewTree};
use crate::types::{ChangeFlags, ResizeMode, ViewId, ViewState};

impl ViewTree {
    /// Deliver `event` to `id` through its widget.
    pub fn handle_event(&mut self, id: ViewId, event: &mut Event) {
        if event.is_nothing() {
            return;
        }
        let Some(widget) = self.widget(id) else {
            return;
        };
        trace!(view = ?id, ?event, "dispatch");
        widget.handle_event(self, id, event);
    }

    /// Ask the widget of `id` whether it accepts `command`.
    pub fn validate_command(&self, id: ViewId, command: Command) -> bool {
        match self.get(id) {
            Some(n) => n.widget.validate_command(self, id, command),
            None => false,
        }
    }

    /// Validate, then execute `command` on `id`. Returns whether it ran and succeeded.
    pub fn execute_command(&mut self, id: ViewId, command: &CommandEvent) -> bool {
        if !self.validate_command(id, command.command) {
            return false;
        }
        let Some(widget) = self.widget(id) else {
            return false;
        };
        widget.execute_command(self, id, command)
    }

    /// Shorthand for [`execute_command`](Self::execute_command) with a bare command.
    pub fn execute(&mut self, id: ViewId, command: Command, sender: Option<ViewId>) -> bool {
        let mut event = CommandEvent::new(command).to(id);
        event.sender = sender;
        self.execute_command(id, &event)
    }

    /// Send an event into the tree.
    ///
    /// While the root runs its event loop the event is queued and picked up by
    /// the loop; otherwise it is dispatched at the root immediately.
    pub fn send_event(&mut self, event: Event) {
        let root = self.root();
        if self.has_state(root, ViewState::RUNNING) {
            self.posted.push_back(event);
        } else {
            let mut event = event;
            self.handle_event(root, &mut event);
        }
    }

    /// Commands every view accepts, plus the group set for groups.
    pub fn base_validate_command(&self, id: ViewId, command: Command) -> bool {
        let Some(n) = self.get(id) else {
            return false;
        };
        let view = matches!(
            command,
            Command::Draw | Command::Redraw | Command::RelFocus | Command::Quit
        );
        if n.group.is_none() {
            return view;
        }
        view || matches!(
            command,
            Command::Close
                | Command::Select
                | Command::ReqFocus
                | Command::Maximize
                | Command::Restore
                | Command::Zoom
                | Command::FocusNext
                | Command::SelectNext
        )
    }

    /// Default command behaviour.
    pub fn base_execute_command(&mut self, id: ViewId, command: &CommandEvent) -> bool {
        match command.command {
            Command::Draw => {
                self.redraw_subtree(id);
                true
            }
            Command::Redraw => {
                self.set_changed(id, ChangeFlags::REDRAW);
                true
            }
            Command::RelFocus => self.release_focus(id),
            Command::Quit => {
                if self.has_state(id, ViewState::RUNNING) {
                    self.set_state(id, ViewState::RUNNING, false);
                    info!(view = ?id, "leaving event loop");
                }
                true
            }
            Command::Close => self.close(id, command.target),
            Command::Select => command
                .sender
                .is_some_and(|caller| self.select_child(id, caller)),
            Command::ReqFocus => command
                .sender
                .is_some_and(|caller| self.request_focus(id, caller)),
            Command::Maximize => self.maximize(id),
            Command::Restore => self.restore(id),
            Command::Zoom => self.zoom(id),
            Command::FocusNext => self.focus_next(id, command.sub_command),
            Command::SelectNext => self.select_next(id, command.sub_command),
            Command::Clicked | Command::ValueChanged | Command::User(_) => false,
        }
    }

    /// Default event behaviour: group routing for groups, leaf handling otherwise.
    pub fn base_handle_event(&mut self, id: ViewId, event: &mut Event) {
        if self.is_group(id) {
            self.group_handle_event(id, event);
        } else {
            self.view_handle_event(id, event);
        }
    }

    fn view_handle_event(&mut self, id: ViewId, event: &mut Event) {
        if let Some(p) = event.as_pointer().copied() {
            self.focus_on_press(id, &p);
            return;
        }
        let Some(c) = event.as_command().copied() else {
            return;
        };
        match c.dest {
            Address::View(dest) if dest == id => {
                self.execute_command(id, &c);
                event.clear();
            }
            Address::Broadcast => {
                self.execute_command(id, &c);
            }
            _ => {}
        }
    }

    /// A press inside an unfocused view focuses it.
    fn focus_on_press(&mut self, id: ViewId, p: &PointerEvent) {
        if !p.is_press() || self.has_state(id, ViewState::FOCUSED) {
            return;
        }
        if !self
            .global_rect(id)
            .is_some_and(|r| r.includes(p.position()))
        {
            return;
        }
        if self.focus(id) {
            let root = self.root();
            self.set_changed(root, ChangeFlags::REDRAW);
        }
    }

    fn group_handle_event(&mut self, id: ViewId, event: &mut Event) {
        match event {
            Event::Pointer(_) => self.route_pointer(id, event),
            Event::Key(_) => self.route_key(id, event),
            Event::Command(_) => self.route_command(id, event),
            Event::Nothing => {}
        }
    }

    fn route_pointer(&mut self, id: ViewId, event: &mut Event) {
        let Some(p) = event.as_pointer().copied() else {
            return;
        };
        let target = match self.capture_route(id) {
            Some(route) => Some(route),
            None => self.make_local(id, p.position()).and_then(|local| {
                self.children_of(id).iter().copied().find(|&c| {
                    self.get(c).is_some_and(|n| {
                        n.state.contains(ViewState::VISIBLE) && n.borders.includes(local)
                    })
                })
            }),
        };
        match target {
            Some(child) if child != id => self.handle_event(child, event),
            _ => self.focus_on_press(id, &p),
        }
        event.clear();
    }

    /// The child of `id` on the path to the capturing view, or `id` itself
    /// when it holds the capture.
    fn capture_route(&self, id: ViewId) -> Option<ViewId> {
        let capture = self.pointer_capture()?;
        if capture == id {
            return Some(id);
        }
        let mut cur = capture;
        while let Some(parent) = self.parent_of(cur) {
            if parent == id {
                return Some(cur);
            }
            cur = parent;
        }
        None
    }

    fn route_key(&mut self, id: ViewId, event: &mut Event) {
        if !self.has_state(id, ViewState::FOCUSED) {
            return;
        }
        if event
            .as_key()
            .is_some_and(|k| k.matches(self.keymap.zoom))
            && self.execute(id, Command::Zoom, None)
        {
            event.clear();
            return;
        }
        if let Some(actual) = self.actual_of(id) {
            self.handle_event(actual, event);
        }
    }

    fn route_command(&mut self, id: ViewId, event: &mut Event) {
        let Some(c) = event.as_command().copied() else {
            return;
        };
        match c.dest {
            Address::Unset => event.clear(),
            Address::View(dest) if !self.is_alive(dest) => {
                debug!(?dest, command = ?c.command, "command for a destroyed view dropped");
                event.clear();
            }
            Address::View(dest) if dest == id => {
                self.execute_command(id, &c);
                event.clear();
            }
            Address::Broadcast => {
                self.execute_command(id, &c);
                let children: Children = self.children_of(id).iter().copied().collect();
                for child in children {
                    if self.is_alive(child) {
                        let mut copy = Event::Command(c);
                        self.handle_event(child, &mut copy);
                    }
                }
                if self.parent_of(id).is_none() {
                    event.clear();
                }
            }
            Address::View(dest) if self.is_child(id, dest) => self.handle_event(dest, event),
            Address::View(_) => match self.actual_of(id) {
                Some(actual) => self.handle_event(actual, event),
                None => event.clear(),
            },
        }
    }

    /// Destroy the child named by `target`, or every child for a broadcast.
    ///
    /// After closing the selected child, the frontmost selectable child is
    /// selected (and focused, in a focused group).
    pub fn close(&mut self, group: ViewId, target: Address) -> bool {
        match target {
            Address::Broadcast => {
                let children: Children = self.children_of(group).iter().copied().collect();
                for child in children {
                    self.remove(group, child);
                }
                debug!(view = ?group, "closed all children");
                true
            }
            Address::View(child) => {
                if !self.remove(group, child) {
                    warn!(view = ?group, target = ?child, "close target is not a child");
                    return false;
                }
                self.adopt_front(group);
                true
            }
            Address::Unset => false,
        }
    }

    /// Grow `id` to fill its parent, remembering the old geometry.
    ///
    /// Refused for the root, for views with an empty resize mode and for views
    /// that are already maximized.
    pub fn maximize(&mut self, id: ViewId) -> bool {
        let Some(parent) = self.parent_of(id) else {
            return false;
        };
        let Some(n) = self.get(id) else {
            return false;
        };
        if n.resize_mode.is_empty() || n.saved.is_some() {
            return false;
        }
        let saved = Saved {
            borders: n.borders,
            resize_mode: n.resize_mode,
        };
        let Some(full) = self.extent(parent) else {
            return false;
        };
        if !self.set_location(id, full) {
            return false;
        }
        if let Some(n) = self.get_mut(id) {
            n.saved = Some(saved);
            n.resize_mode = ResizeMode::GROW_HI;
        }
        debug!(view = ?id, "maximized");
        true
    }

    /// Return a maximized view to its remembered geometry.
    pub fn restore(&mut self, id: ViewId) -> bool {
        let Some(saved) = self.get_mut(id).and_then(|n| n.saved.take()) else {
            return false;
        };
        if let Some(n) = self.get_mut(id) {
            n.resize_mode = saved.resize_mode;
        }
        let restored = self.set_location(id, saved.borders);
        debug!(view = ?id, restored, "restored");
        restored
    }

    /// Toggle between maximized and restored.
    pub fn zoom(&mut self, id: ViewId) -> bool {
        if self.is_maximized(id) {
            self.restore(id)
        } else {
            self.maximize(id)
        }
    }

    /// Geometry a maximized view will return to.
    pub fn saved_borders(&self, id: ViewId) -> Option<Rectangle> {
        self.get(id)?.saved.map(|s| s.borders)
    }
}
