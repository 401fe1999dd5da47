// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selection and keyboard focus.
//!
//! Every group remembers one selected child, its *actual*. Focus is a chain:
//! a view is focused exactly when its parent is focused and it is the
//! parent's actual. The root is the top of the chain.
//!
//! Moving focus is two-phase. [`ViewTree::can_focus`] walks the would-be
//! chain without changing anything and asks every view that would lose
//! focus for permission ([`Command::RelFocus`]). Only when every view agrees
//! does the tree commit, so a refused request leaves no partial state.

use smallvec::SmallVec;
use tracing::debug;

use crate::event::{BACKWARD, Command};
use crate::tree::ViewTree;
use crate::types::{ChangeFlags, ViewId, ViewOptions, ViewState};

impl ViewTree {
    /// Give keyboard focus to `id`.
    ///
    /// Asks the parent through [`Command::ReqFocus`]. Fails when the view is
    /// not selectable, is running a modal loop, or any view currently holding
    /// focus refuses to release it.
    ///
    /// Every unfocused group between `id` and the focus chain is selected on
    /// the way, so each of them must be [`ViewOptions::SELECTABLE`] as well.
    /// A selectable view inside a plain, unselectable panel cannot take focus
    /// until that panel is already focused.
    pub fn focus(&mut self, id: ViewId) -> bool {
        let Some(state) = self.state(id) else {
            return false;
        };
        if state.contains(ViewState::FOCUSED) {
            return true;
        }
        if state.contains(ViewState::RUNNING) || !self.is_selectable(id) {
            return false;
        }
        match self.parent_of(id) {
            Some(parent) => self.execute(parent, Command::ReqFocus, Some(id)),
            None => {
                self.set_state(id, ViewState::SELECTED | ViewState::FOCUSED, true);
                self.grant_chain(id);
                true
            }
        }
    }

    /// Make `id` its parent's selected child.
    ///
    /// Inside a focused group this moves focus as well.
    pub fn select(&mut self, id: ViewId) -> bool {
        if !self.is_selectable(id) {
            return false;
        }
        if let Some(parent) = self.parent_of(id)
            && !self.execute(parent, Command::Select, Some(id))
        {
            return false;
        }
        self.set_state(id, ViewState::SELECTED, true)
    }

    /// Whether focusing `id` would succeed. Changes nothing.
    pub fn can_focus(&self, id: ViewId) -> bool {
        let Some(state) = self.state(id) else {
            return false;
        };
        if state.contains(ViewState::FOCUSED) {
            return true;
        }
        if state.contains(ViewState::RUNNING) || !self.is_selectable(id) {
            return false;
        }
        let Some(parent) = self.parent_of(id) else {
            return true;
        };
        if !self.validate_command(parent, Command::ReqFocus) {
            return false;
        }
        if self.has_state(parent, ViewState::FOCUSED) {
            match self.actual_of(parent) {
                Some(old) if old != id && self.has_state(old, ViewState::FOCUSED) => {
                    self.can_release(old)
                }
                _ => true,
            }
        } else {
            self.can_focus(parent)
        }
    }

    /// Whether `id` and everything focused below it agree to lose focus.
    pub fn can_release(&self, id: ViewId) -> bool {
        if !self.validate_command(id, Command::RelFocus) {
            return false;
        }
        match self.actual_of(id) {
            Some(a) if self.has_state(a, ViewState::FOCUSED) => self.can_release(a),
            _ => true,
        }
    }

    /// The deepest view on the focus chain.
    pub fn focused_view(&self) -> ViewId {
        let mut cur = self.root();
        while let Some(a) = self.actual_of(cur) {
            if !self.has_state(a, ViewState::FOCUSED) {
                break;
            }
            cur = a;
        }
        cur
    }

    fn is_selectable(&self, id: ViewId) -> bool {
        self.options(id)
            .is_some_and(|o| o.contains(ViewOptions::SELECTABLE))
    }

    /// [`Command::ReqFocus`] executed by `group` on behalf of `caller`.
    pub(crate) fn request_focus(&mut self, group: ViewId, caller: ViewId) -> bool {
        if !self.is_child(group, caller) {
            return false;
        }
        if self.actual_of(group) == Some(caller) && self.has_state(caller, ViewState::FOCUSED) {
            return true;
        }
        if !self.can_focus(caller) {
            debug!(view = ?caller, "focus request refused");
            return false;
        }
        self.commit_focus(caller);
        true
    }

    /// [`Command::Select`] executed by `group` on behalf of `caller`.
    pub(crate) fn select_child(&mut self, group: ViewId, caller: ViewId) -> bool {
        if !self.is_child(group, caller) || !self.is_selectable(caller) {
            return false;
        }
        if self.actual_of(group) == Some(caller) {
            return true;
        }
        if self.has_state(group, ViewState::FOCUSED) {
            return self.request_focus(group, caller);
        }
        self.make_actual(group, caller);
        true
    }

    /// [`Command::RelFocus`]: drop focus from `id` and everything below it.
    ///
    /// The root heads the chain and stays focused; only the chain below it
    /// is released.
    pub(crate) fn release_focus(&mut self, id: ViewId) -> bool {
        if !self.can_release(id) {
            return false;
        }
        if self.parent_of(id).is_some() {
            self.release_chain(id);
        } else if let Some(a) = self.actual_of(id) {
            self.release_chain(a);
        }
        true
    }

    /// [`Command::FocusNext`].
    pub(crate) fn focus_next(&mut self, group: ViewId, direction: u32) -> bool {
        match self.next_candidate(group, direction) {
            Some(next) => self.request_focus(group, next),
            None => false,
        }
    }

    /// [`Command::SelectNext`].
    pub(crate) fn select_next(&mut self, group: ViewId, direction: u32) -> bool {
        match self.next_candidate(group, direction) {
            Some(next) => self.select_child(group, next),
            None => false,
        }
    }

    /// Next selectable child after the actual one, in insertion order.
    ///
    /// Z-order changes as children come to the front, so traversal follows
    /// the order children were inserted in and wraps around.
    fn next_candidate(&self, group: ViewId, direction: u32) -> Option<ViewId> {
        if direction == BACKWARD {
            return None;
        }
        let current = self
            .actual_of(group)
            .and_then(|a| self.get(a))
            .map(|n| n.serial);
        let mut candidates: SmallVec<[(u64, ViewId); 8]> = self
            .children_of(group)
            .iter()
            .filter_map(|&c| {
                let n = self.get(c)?;
                let usable = n.options.contains(ViewOptions::SELECTABLE)
                    && n.state.contains(ViewState::VISIBLE)
                    && !n.state.contains(ViewState::DISABLED);
                usable.then_some((n.serial, c))
            })
            .collect();
        candidates.sort_unstable_by_key(|(serial, _)| *serial);
        let next = match current {
            Some(cur) => candidates
                .iter()
                .find(|(serial, _)| *serial > cur)
                .or_else(|| candidates.first())
                .filter(|(serial, _)| *serial != cur),
            None => candidates.first(),
        };
        next.map(|(_, id)| *id)
    }

    /// Move focus to `id`. The caller has already checked [`Self::can_focus`].
    fn commit_focus(&mut self, id: ViewId) {
        // Path from `id` up to (excluding) the nearest focused ancestor.
        let mut path: SmallVec<[ViewId; 8]> = SmallVec::new();
        path.push(id);
        let mut anchor = None;
        let mut cur = id;
        while let Some(p) = self.parent_of(cur) {
            if self.has_state(p, ViewState::FOCUSED) {
                anchor = Some(p);
                break;
            }
            path.push(p);
            cur = p;
        }

        if let Some(anchor) = anchor
            && let Some(old) = self.actual_of(anchor)
            && Some(&old) != path.last()
        {
            self.release_chain(old);
        }

        let mut parent = anchor;
        for &v in path.iter().rev() {
            if let Some(p) = parent {
                self.make_actual(p, v);
            }
            parent = Some(v);
        }
        for &v in &path {
            self.set_state(v, ViewState::SELECTED | ViewState::FOCUSED, true);
        }
        self.grant_chain(id);
        debug!(view = ?id, "focus moved");
    }

    /// Make `child` the actual of `group`, deselecting the previous one.
    pub(crate) fn make_actual(&mut self, group: ViewId, child: ViewId) {
        let previous = self.actual_of(group);
        if previous == Some(child) {
            self.set_state(child, ViewState::SELECTED, true);
            return;
        }
        if let Some(old) = previous {
            self.set_state(old, ViewState::SELECTED, false);
        }
        if let Some(g) = self.group_mut(group) {
            g.actual = Some(child);
        }
        self.set_state(child, ViewState::SELECTED, true);
        self.to_foreground(group, child);
        self.set_changed(group, ChangeFlags::REDRAW);
    }

    /// Clear `FOCUSED` from `id` and down its actual chain.
    pub(crate) fn release_chain(&mut self, id: ViewId) {
        let mut cur = Some(id);
        while let Some(v) = cur {
            if !self.has_state(v, ViewState::FOCUSED) {
                break;
            }
            self.set_state(v, ViewState::FOCUSED, false);
            cur = self.actual_of(v);
        }
    }

    /// Set `FOCUSED` down the actual chain below a newly focused `id`.
    fn grant_chain(&mut self, id: ViewId) {
        let mut cur = self.actual_of(id);
        while let Some(v) = cur {
            self.set_state(v, ViewState::FOCUSED, true);
            cur = self.actual_of(v);
        }
    }

    /// After a child is closed, select the frontmost selectable child and,
    /// inside a focused group, focus it.
    pub(crate) fn adopt_front(&mut self, group: ViewId) {
        if self.actual_of(group).is_some() {
            return;
        }
        let Some(front) = self.children_of(group).iter().copied().find(|&c| {
            self.is_selectable(c) && self.has_state(c, ViewState::VISIBLE)
        }) else {
            return;
        };
        self.make_actual(group, front);
        if self.has_state(group, ViewState::FOCUSED) {
            self.set_state(front, ViewState::FOCUSED, true);
            self.grant_chain(front);
        }
    }
}
