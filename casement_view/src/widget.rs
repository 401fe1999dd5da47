// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-view behaviour hooks.

use core::any::Any;
use core::fmt;

use crate::event::{Command, CommandEvent, Event};
use crate::render::Painter;
use crate::tree::ViewTree;
use crate::types::ViewId;

/// Behaviour attached to a view.
///
/// Every hook has a default that runs the tree's base behaviour for the
/// view, so an implementation overrides only what it specialises and calls
/// the matching `ViewTree::base_*` method to fall back, much like calling
/// the parent class in a classic widget toolkit.
///
/// Hooks take the tree by reference and the view's own id. The tree hands
/// out a shared handle to the widget for the duration of the call, so a hook
/// may freely mutate the tree, including destroying its own view. Widgets
/// keep private mutable state in [`Cell`](core::cell::Cell)s.
pub trait Widget: Any + fmt::Debug {
    /// Whether the view is willing to execute `command` right now.
    fn validate_command(&self, tree: &ViewTree, id: ViewId, command: Command) -> bool {
        tree.base_validate_command(id, command)
    }

    /// Execute an already validated command. Returns whether it succeeded.
    fn execute_command(&self, tree: &mut ViewTree, id: ViewId, command: &CommandEvent) -> bool {
        tree.base_execute_command(id, command)
    }

    /// React to an event. Clear it to mark it consumed.
    fn handle_event(&self, tree: &mut ViewTree, id: ViewId, event: &mut Event) {
        tree.base_handle_event(id, event);
    }

    /// Paint the view. Children are painted by the tree afterwards.
    fn draw(&self, tree: &ViewTree, id: ViewId, painter: &mut Painter<'_>) {
        let _ = (tree, id, painter);
    }
}

/// A widget with only base behaviour. Draws nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Plain;

impl Widget for Plain {}
