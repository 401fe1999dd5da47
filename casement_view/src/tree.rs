// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: arena storage, structure, geometry and flags.

use std::collections::VecDeque;
use std::rc::Rc;

use casement_geometry::{Point, Rectangle};
use smallvec::SmallVec;
use tracing::debug;

use crate::config::Keymap;
use crate::event::Event;
use crate::render::SurfaceId;
use crate::types::{
    ChangeFlags, ResizeMode, ViewConfig, ViewId, ViewOptions, ViewState, size_within,
};
use crate::widget::{Plain, Widget};

/// Child handles of a group, front (topmost) first.
pub(crate) type Children = SmallVec<[ViewId; 8]>;

/// The view tree: an arena of views addressed by [`ViewId`].
///
/// The tree always has a root group covering the screen. The root starts
/// visible, selected and focused, so the focus chain always starts there.
/// Groups own their children; destroying a view destroys its subtree and
/// drops every widget in it exactly once.
///
/// ## Example
///
/// ```rust
/// use casement_geometry::{Point, Rectangle};
/// use casement_view::{Plain, ViewConfig, ViewTree};
///
/// let mut tree = ViewTree::new(Rectangle::from_coords(0, 0, 99, 99));
/// let root = tree.root();
/// let panel = tree
///     .insert_group(root, ViewConfig::new(Rectangle::from_coords(10, 10, 59, 59)), Plain)
///     .unwrap();
/// let label = tree
///     .insert(panel, ViewConfig::new(Rectangle::from_coords(5, 5, 14, 9)), Plain)
///     .unwrap();
///
/// // Coordinates accumulate through every ancestor.
/// assert_eq!(tree.make_global(label, Point::ZERO), Some(Point::new(15, 15)));
/// assert_eq!(tree.children_of(root), &[panel]);
/// ```
pub struct ViewTree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: ViewId,
    next_serial: u64,
    pub(crate) capture: Option<ViewId>,
    pub(crate) posted: VecDeque<Event>,
    pub(crate) keymap: Keymap,
    pub(crate) retired: Vec<SurfaceId>,
}

impl core::fmt::Debug for ViewTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("ViewTree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("root", &self.root)
            .field("capture", &self.capture)
            .field("posted", &self.posted.len())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Saved {
    pub(crate) borders: Rectangle,
    pub(crate) resize_mode: ResizeMode,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Group {
    pub(crate) children: Children,
    pub(crate) actual: Option<ViewId>,
}

#[derive(Debug)]
pub(crate) struct Node {
    generation: u32,
    pub(crate) parent: Option<ViewId>,
    pub(crate) borders: Rectangle,
    pub(crate) resize_mode: ResizeMode,
    pub(crate) options: ViewOptions,
    pub(crate) state: ViewState,
    pub(crate) changed: ChangeFlags,
    pub(crate) min_size: Point,
    pub(crate) max_size: Point,
    /// insertion order, used for keyboard traversal
    pub(crate) serial: u64,
    pub(crate) group: Option<Group>,
    pub(crate) saved: Option<Saved>,
    pub(crate) surface: Option<(SurfaceId, Rectangle)>,
    pub(crate) widget: Rc<dyn Widget>,
}

impl Node {
    fn new(
        generation: u32,
        serial: u64,
        config: ViewConfig,
        widget: Rc<dyn Widget>,
        group: bool,
    ) -> Self {
        Self {
            generation,
            parent: None,
            borders: config.borders,
            resize_mode: config.resize_mode,
            options: config.options,
            state: config.state,
            changed: ChangeFlags::REDRAW,
            min_size: config.min_size,
            max_size: config.max_size,
            serial,
            group: group.then(Group::default),
            saved: None,
            surface: None,
            widget,
        }
    }
}

impl ViewTree {
    /// Create a tree whose root is a plain group covering `screen`.
    pub fn new(screen: Rectangle) -> Self {
        Self::with_root_widget(screen, Plain)
    }

    /// Create a tree whose root group uses `widget`.
    pub fn with_root_widget(screen: Rectangle, widget: impl Widget) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: ViewId::new(0, 0),
            next_serial: 0,
            capture: None,
            posted: VecDeque::new(),
            keymap: Keymap::default(),
            retired: Vec::new(),
        };
        let config = ViewConfig::new(screen).state(
            ViewState::VISIBLE | ViewState::SELECTED | ViewState::FOCUSED | ViewState::FOREGROUND,
        );
        tree.root = tree.alloc(config, Rc::new(widget), true);
        tree
    }

    /// The root group.
    pub fn root(&self) -> ViewId {
        self.root
    }

    /// The keys the tree reserves for itself.
    pub fn keymap(&self) -> Keymap {
        self.keymap
    }

    /// Replace the reserved keys.
    pub fn set_keymap(&mut self, keymap: Keymap) {
        self.keymap = keymap;
    }

    /// Insert a leaf view in front of `parent`'s children.
    ///
    /// Returns `None` when `parent` is stale or not a group.
    pub fn insert(
        &mut self,
        parent: ViewId,
        config: ViewConfig,
        widget: impl Widget,
    ) -> Option<ViewId> {
        self.insert_rc(parent, config, Rc::new(widget), false)
    }

    /// Insert a group view in front of `parent`'s children.
    ///
    /// Returns `None` when `parent` is stale or not a group.
    pub fn insert_group(
        &mut self,
        parent: ViewId,
        config: ViewConfig,
        widget: impl Widget,
    ) -> Option<ViewId> {
        self.insert_rc(parent, config, Rc::new(widget), true)
    }

    fn insert_rc(
        &mut self,
        parent: ViewId,
        mut config: ViewConfig,
        widget: Rc<dyn Widget>,
        group: bool,
    ) -> Option<ViewId> {
        let parent_extent = {
            let p = self.get(parent)?;
            p.group.as_ref()?;
            p.borders.extent()
        };
        if config.options.contains(ViewOptions::CENTERED) {
            config.borders.center(&parent_extent);
        }
        let id = self.alloc(config, widget, group);
        self.link_front(parent, id);
        self.set_changed(parent, ChangeFlags::REDRAW);
        Some(id)
    }

    fn alloc(&mut self, config: ViewConfig, widget: Rc<dyn Widget>, group: bool) -> ViewId {
        let serial = self.next_serial;
        self.next_serial += 1;
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, serial, config, widget, group));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ViewId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes
                .push(Some(Node::new(generation, serial, config, widget, group)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ViewId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        ViewId::new(idx, generation)
    }

    fn link_front(&mut self, parent: ViewId, id: ViewId) {
        let previous_front = self.children_of(parent).first().copied();
        if let Some(prev) = previous_front
            && let Some(n) = self.get_mut(prev)
        {
            n.state.remove(ViewState::FOREGROUND);
        }
        if let Some(g) = self.group_mut(parent) {
            g.children.insert(0, id);
        }
        if let Some(n) = self.get_mut(id) {
            n.parent = Some(parent);
            n.state.insert(ViewState::FOREGROUND);
        }
    }

    /// Detach `child` from `parent` and destroy its subtree.
    ///
    /// Focus and selection bookkeeping is released first. Returns `false`, and
    /// leaves the tree unchanged, when `child` is not a child of `parent`.
    pub fn remove(&mut self, parent: ViewId, child: ViewId) -> bool {
        if !self.is_child(parent, child) {
            return false;
        }
        if self.actual_of(parent) == Some(child) {
            self.release_chain(child);
            if let Some(g) = self.group_mut(parent) {
                g.actual = None;
            }
        }
        let mut new_front = None;
        if let Some(g) = self.group_mut(parent) {
            let was_front = g.children.first() == Some(&child);
            g.children.retain(|c| *c != child);
            if was_front {
                new_front = g.children.first().copied();
            }
        }
        if let Some(front) = new_front
            && let Some(n) = self.get_mut(front)
        {
            n.state.insert(ViewState::FOREGROUND);
        }
        self.destroy(child);
        self.set_changed(parent, ChangeFlags::REDRAW);
        true
    }

    fn destroy(&mut self, id: ViewId) {
        if !self.is_alive(id) {
            return;
        }
        let children = self.children_of(id).iter().copied().collect::<Children>();
        for child in children {
            self.destroy(child);
        }
        if self.capture == Some(id) {
            self.capture = None;
        }
        let node = self.nodes[id.idx()].take();
        self.free_list.push(id.idx());
        if let Some(node) = node {
            if let Some((surface, _)) = node.surface {
                self.retired.push(surface);
            }
            debug!(view = ?id, widget = ?node.widget, "view destroyed");
        }
    }

    // --- lookups ---

    pub(crate) fn get(&self, id: ViewId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    pub(crate) fn get_mut(&mut self, id: ViewId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    pub(crate) fn group_mut(&mut self, id: ViewId) -> Option<&mut Group> {
        self.get_mut(id)?.group.as_mut()
    }

    /// Returns true if `id` refers to a live view.
    pub fn is_alive(&self, id: ViewId) -> bool {
        self.get(id).is_some()
    }

    /// Whether `id` is a live group.
    pub fn is_group(&self, id: ViewId) -> bool {
        self.get(id).is_some_and(|n| n.group.is_some())
    }

    /// The parent of a live view, or `None` for the root and stale handles.
    pub fn parent_of(&self, id: ViewId) -> Option<ViewId> {
        self.get(id)?.parent
    }

    /// Children of a group, front (topmost) first. Empty for leaves and stale handles.
    pub fn children_of(&self, id: ViewId) -> &[ViewId] {
        self.get(id)
            .and_then(|n| n.group.as_ref())
            .map(|g| g.children.as_slice())
            .unwrap_or(&[])
    }

    /// The selected child of a group.
    pub fn actual_of(&self, id: ViewId) -> Option<ViewId> {
        self.get(id)?.group.as_ref()?.actual
    }

    /// Whether `child` is a direct child of `parent`.
    pub fn is_child(&self, parent: ViewId, child: ViewId) -> bool {
        self.is_alive(child) && self.parent_of(child) == Some(parent)
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_within(&self, id: ViewId, ancestor: ViewId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return self.is_alive(c);
            }
            cur = self.parent_of(c);
        }
        false
    }

    /// The widget of a live view.
    pub fn widget(&self, id: ViewId) -> Option<Rc<dyn Widget>> {
        self.get(id).map(|n| Rc::clone(&n.widget))
    }

    /// The widget of a live view, downcast to a concrete type.
    pub fn widget_ref<T: Widget>(&self, id: ViewId) -> Option<&T> {
        let widget: &dyn core::any::Any = &*self.get(id)?.widget;
        widget.downcast_ref::<T>()
    }

    /// Bounding rectangle in the parent's coordinates.
    pub fn borders(&self, id: ViewId) -> Option<Rectangle> {
        self.get(id).map(|n| n.borders)
    }

    /// Own rectangle in local coordinates, always anchored at the origin.
    pub fn extent(&self, id: ViewId) -> Option<Rectangle> {
        self.get(id).map(|n| n.borders.extent())
    }

    /// Bounding rectangle in global coordinates.
    pub fn global_rect(&self, id: ViewId) -> Option<Rectangle> {
        let extent = self.extent(id)?;
        let origin = self.make_global(id, Point::ZERO)?;
        Some(extent.moved(origin.x, origin.y))
    }

    /// Dynamic state of a view.
    pub fn state(&self, id: ViewId) -> Option<ViewState> {
        self.get(id).map(|n| n.state)
    }

    /// Whether a live view has every bit of `flags` set.
    pub fn has_state(&self, id: ViewId, flags: ViewState) -> bool {
        self.get(id).is_some_and(|n| n.state.contains(flags))
    }

    /// Behaviour options of a view.
    pub fn options(&self, id: ViewId) -> Option<ViewOptions> {
        self.get(id).map(|n| n.options)
    }

    /// Resize mode of a view.
    pub fn resize_mode(&self, id: ViewId) -> Option<ResizeMode> {
        self.get(id).map(|n| n.resize_mode)
    }

    /// Pending change flags of a view.
    pub fn changed(&self, id: ViewId) -> Option<ChangeFlags> {
        self.get(id).map(|n| n.changed)
    }

    /// Whether the view is maximized (has saved geometry to restore).
    pub fn is_maximized(&self, id: ViewId) -> bool {
        self.get(id).is_some_and(|n| n.saved.is_some())
    }

    // --- flags ---

    /// Set or clear state bits. Returns `false` for stale handles.
    ///
    /// Changing `VISIBLE` marks the parent for redraw.
    pub fn set_state(&mut self, id: ViewId, flags: ViewState, enable: bool) -> bool {
        let Some(n) = self.get_mut(id) else {
            return false;
        };
        let before = n.state;
        n.state.set(flags, enable);
        if before != n.state {
            let parent = n.parent.unwrap_or(id);
            self.set_changed(id, ChangeFlags::REDRAW);
            if flags.contains(ViewState::VISIBLE) {
                self.set_changed(parent, ChangeFlags::REDRAW);
            }
        }
        true
    }

    /// Make a view visible.
    pub fn show(&mut self, id: ViewId) -> bool {
        self.set_state(id, ViewState::VISIBLE, true)
    }

    /// Hide a view.
    pub fn hide(&mut self, id: ViewId) -> bool {
        self.set_state(id, ViewState::VISIBLE, false)
    }

    /// Replace the behaviour options.
    pub fn set_options(&mut self, id: ViewId, options: ViewOptions) -> bool {
        self.get_mut(id).map(|n| n.options = options).is_some()
    }

    /// Replace the resize mode.
    pub fn set_resize_mode(&mut self, id: ViewId, mode: ResizeMode) -> bool {
        self.get_mut(id).map(|n| n.resize_mode = mode).is_some()
    }

    /// Raise change flags on a view.
    ///
    /// `REDRAW` also propagates to every ancestor up to the root, so the run
    /// loop only needs to look at the root to know a frame is due.
    pub fn set_changed(&mut self, id: ViewId, flags: ChangeFlags) {
        let Some(n) = self.get_mut(id) else {
            return;
        };
        n.changed |= flags;
        if !flags.contains(ChangeFlags::REDRAW) {
            return;
        }
        let mut cur = n.parent;
        while let Some(p) = cur {
            let Some(pn) = self.get_mut(p) else {
                break;
            };
            pn.changed |= ChangeFlags::REDRAW;
            cur = pn.parent;
        }
    }

    /// Lower change flags on a view.
    pub fn clear_changed(&mut self, id: ViewId, flags: ChangeFlags) {
        if let Some(n) = self.get_mut(id) {
            n.changed.remove(flags);
        }
    }

    /// Mark a view, its ancestors and its whole subtree for redraw.
    pub fn redraw_subtree(&mut self, id: ViewId) {
        self.set_changed(id, ChangeFlags::REDRAW);
        let mut stack: Children = self.children_of(id).iter().copied().collect();
        while let Some(c) = stack.pop() {
            if let Some(n) = self.get_mut(c) {
                n.changed |= ChangeFlags::REDRAW;
            }
            stack.extend(self.children_of(c).iter().copied());
        }
    }

    // --- coordinates ---

    /// Convert a point from `id`'s local space to global space.
    pub fn make_global(&self, id: ViewId, p: Point) -> Option<Point> {
        let mut out = p;
        let mut cur = Some(id);
        let mut first = true;
        while let Some(c) = cur {
            let Some(n) = self.get(c) else {
                // Only the starting handle may be stale; a broken chain above it cannot happen.
                return if first { None } else { Some(out) };
            };
            out += n.borders.ul;
            cur = n.parent;
            first = false;
        }
        Some(out)
    }

    /// Convert a global point to `id`'s local space.
    pub fn make_local(&self, id: ViewId, p: Point) -> Option<Point> {
        let origin = self.make_global(id, Point::ZERO)?;
        Some(p - origin)
    }

    // --- geometry ---

    /// Move and resize a view to `borders` (parent coordinates).
    ///
    /// Rejects sizes outside the view's size limits. When a group changes
    /// size, each child follows according to its [`ResizeMode`].
    pub fn set_location(&mut self, id: ViewId, borders: Rectangle) -> bool {
        let Some(n) = self.get_mut(id) else {
            return false;
        };
        if !size_within(borders.size(), n.min_size, n.max_size) {
            return false;
        }
        let old = n.borders;
        if old == borders {
            return true;
        }
        n.borders = borders;
        let dw = borders.width() - old.width();
        let dh = borders.height() - old.height();
        if dw != 0 || dh != 0 {
            let children: Children = self.children_of(id).iter().copied().collect();
            for child in children {
                self.follow_parent_resize(child, dw, dh);
            }
        }
        if let Some(parent) = self.parent_of(id) {
            self.set_changed(parent, ChangeFlags::REDRAW);
        }
        self.redraw_subtree(id);
        true
    }

    fn follow_parent_resize(&mut self, child: ViewId, dw: i32, dh: i32) {
        let Some(n) = self.get(child) else {
            return;
        };
        let mode = n.resize_mode;
        let mut b = n.borders;
        if mode.contains(ResizeMode::GROW_LO_X) {
            b.ul.x += dw;
        }
        if mode.contains(ResizeMode::GROW_HI_X) {
            b.lr.x += dw;
        }
        if mode.contains(ResizeMode::GROW_LO_Y) {
            b.ul.y += dh;
        }
        if mode.contains(ResizeMode::GROW_HI_Y) {
            b.lr.y += dh;
        }
        if b != n.borders {
            // A child whose limits refuse the new size keeps its old borders.
            let _ = self.set_location(child, b);
        }
    }

    /// Drag a view by `(dx, dy)` without leaving its parent's extent.
    ///
    /// Returns whether the view moved. The root never moves.
    pub fn move_clipped(&mut self, id: ViewId, dx: i32, dy: i32) -> bool {
        let Some(parent) = self.parent_of(id) else {
            return false;
        };
        let Some(clip) = self.extent(parent) else {
            return false;
        };
        let Some(n) = self.get_mut(id) else {
            return false;
        };
        let mut b = n.borders;
        if !b.move_clipped(dx, dy, clip) {
            return false;
        }
        n.borders = b;
        self.set_changed(parent, ChangeFlags::REDRAW);
        self.redraw_subtree(id);
        true
    }

    /// Bring `child` to the front of `parent`'s children.
    ///
    /// Only applies to children with [`ViewOptions::TOP_SELECT`]. The previous
    /// front child loses [`ViewState::FOREGROUND`]. Returns whether the order
    /// changed.
    pub fn to_foreground(&mut self, parent: ViewId, child: ViewId) -> bool {
        if !self.is_child(parent, child)
            || !self
                .options(child)
                .is_some_and(|o| o.contains(ViewOptions::TOP_SELECT))
        {
            return false;
        }
        let children = self.children_of(parent);
        let Some(pos) = children.iter().position(|c| *c == child) else {
            return false;
        };
        if pos == 0 {
            return false;
        }
        let previous = children[0];
        if let Some(n) = self.get_mut(previous) {
            n.state.remove(ViewState::FOREGROUND);
        }
        if let Some(g) = self.group_mut(parent) {
            g.children.remove(pos);
            g.children.insert(0, child);
        }
        if let Some(n) = self.get_mut(child) {
            n.state.insert(ViewState::FOREGROUND);
        }
        self.set_changed(previous, ChangeFlags::REDRAW);
        self.redraw_subtree(child);
        true
    }

    // --- pointer capture ---

    /// Route every pointer event to `id` until released.
    pub fn capture_pointer(&mut self, id: ViewId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        if let Some(prev) = self.capture.take()
            && let Some(n) = self.get_mut(prev)
        {
            n.state.remove(ViewState::DRAGGING);
        }
        self.capture = Some(id);
        if let Some(n) = self.get_mut(id) {
            n.state.insert(ViewState::DRAGGING);
        }
        true
    }

    /// Release the pointer capture held by `id`. Returns whether it held it.
    pub fn release_pointer(&mut self, id: ViewId) -> bool {
        if self.capture != Some(id) {
            return false;
        }
        self.capture = None;
        if let Some(n) = self.get_mut(id) {
            n.state.remove(ViewState::DRAGGING);
        }
        true
    }

    /// The view holding the pointer capture.
    pub fn pointer_capture(&self) -> Option<ViewId> {
        self.capture.filter(|c| self.is_alive(*c))
    }

    // --- posted events ---

    /// Take the oldest event queued while the tree was running.
    pub fn take_posted(&mut self) -> Option<Event> {
        self.posted.pop_front()
    }

    /// Number of queued events.
    pub fn posted_len(&self) -> usize {
        self.posted.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Rectangle {
        Rectangle::from_coords(0, 0, 99, 99)
    }

    fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Rectangle {
        Rectangle::from_coords(x0, y0, x1, y1)
    }

    #[test]
    fn root_starts_focused_and_visible() {
        let tree = ViewTree::new(screen());
        let root = tree.root();
        assert!(tree.has_state(
            root,
            ViewState::VISIBLE | ViewState::SELECTED | ViewState::FOCUSED
        ));
        assert_eq!(tree.parent_of(root), None);
        assert!(tree.is_group(root));
    }

    #[test]
    fn insert_puts_children_in_front() {
        let mut tree = ViewTree::new(screen());
        let root = tree.root();
        let a = tree.insert(root, ViewConfig::new(rect(0, 0, 9, 9)), Plain).unwrap();
        let b = tree.insert(root, ViewConfig::new(rect(0, 0, 9, 9)), Plain).unwrap();
        assert_eq!(tree.children_of(root), &[b, a]);
        assert!(tree.has_state(b, ViewState::FOREGROUND));
        assert!(!tree.has_state(a, ViewState::FOREGROUND));
    }

    #[test]
    fn leaves_cannot_have_children() {
        let mut tree = ViewTree::new(screen());
        let root = tree.root();
        let leaf = tree.insert(root, ViewConfig::new(rect(0, 0, 9, 9)), Plain).unwrap();
        assert!(tree.insert(leaf, ViewConfig::default(), Plain).is_none());
    }

    #[test]
    fn remove_unknown_child_is_rejected() {
        let mut tree = ViewTree::new(screen());
        let root = tree.root();
        let g = tree.insert_group(root, ViewConfig::new(rect(0, 0, 49, 49)), Plain).unwrap();
        let inner = tree.insert(g, ViewConfig::new(rect(0, 0, 9, 9)), Plain).unwrap();
        assert!(!tree.remove(root, inner), "inner is a grandchild of root");
        assert!(tree.is_alive(inner));
        assert_eq!(tree.children_of(g), &[inner]);
    }

    #[test]
    fn remove_destroys_subtree_and_recycles_slots() {
        let mut tree = ViewTree::new(screen());
        let root = tree.root();
        let g = tree.insert_group(root, ViewConfig::new(rect(0, 0, 49, 49)), Plain).unwrap();
        let inner = tree.insert(g, ViewConfig::new(rect(0, 0, 9, 9)), Plain).unwrap();
        assert!(tree.remove(root, g));
        assert!(!tree.is_alive(g));
        assert!(!tree.is_alive(inner));
        assert!(tree.children_of(root).is_empty());

        let again = tree.insert(root, ViewConfig::new(rect(0, 0, 9, 9)), Plain).unwrap();
        assert_ne!(again, g, "recycled slots get a new generation");
        assert!(tree.borders(g).is_none(), "stale handles resolve to nothing");
    }

    #[test]
    fn global_and_local_coordinates() {
        let mut tree = ViewTree::new(screen());
        let root = tree.root();
        let w = tree.insert_group(root, ViewConfig::new(rect(10, 10, 60, 60)), Plain).unwrap();
        let b = tree.insert(w, ViewConfig::new(rect(2, 3, 6, 7)), Plain).unwrap();
        assert_eq!(tree.make_global(b, Point::new(1, 1)), Some(Point::new(13, 14)));
        assert_eq!(tree.make_local(b, Point::new(13, 14)), Some(Point::new(1, 1)));
        assert_eq!(tree.global_rect(b), Some(rect(12, 13, 16, 17)));
        assert_eq!(tree.extent(b), Some(rect(0, 0, 4, 4)));
    }

    #[test]
    fn redraw_bubbles_to_root() {
        let mut tree = ViewTree::new(screen());
        let root = tree.root();
        let w = tree.insert_group(root, ViewConfig::new(rect(10, 10, 60, 60)), Plain).unwrap();
        let b = tree.insert(w, ViewConfig::new(rect(2, 3, 6, 7)), Plain).unwrap();
        for id in [root, w, b] {
            tree.clear_changed(id, ChangeFlags::all());
        }
        tree.set_changed(b, ChangeFlags::REDRAW);
        assert_eq!(tree.changed(w), Some(ChangeFlags::REDRAW));
        assert_eq!(tree.changed(root), Some(ChangeFlags::REDRAW));

        tree.clear_changed(root, ChangeFlags::all());
        tree.set_changed(b, ChangeFlags::DATA);
        assert_eq!(
            tree.changed(root),
            Some(ChangeFlags::empty()),
            "only redraw requests bubble"
        );
    }

    #[test]
    fn set_location_respects_limits_and_resize_modes() {
        let mut tree = ViewTree::new(screen());
        let root = tree.root();
        let w = tree
            .insert_group(
                root,
                ViewConfig::new(rect(0, 0, 39, 39)).size_limits(Point::new(20, 20), Point::new(80, 80)),
                Plain,
            )
            .unwrap();
        let stretch = tree
            .insert(
                w,
                ViewConfig::new(rect(0, 0, 39, 9)).resize_mode(ResizeMode::GROW_HI_X),
                Plain,
            )
            .unwrap();
        let corner = tree
            .insert(
                w,
                ViewConfig::new(rect(30, 30, 39, 39)).resize_mode(ResizeMode::GROW_ALL),
                Plain,
            )
            .unwrap();
        let fixed = tree.insert(w, ViewConfig::new(rect(5, 5, 9, 9)), Plain).unwrap();

        assert!(!tree.set_location(w, rect(0, 0, 9, 9)), "too small");
        assert!(!tree.set_location(w, rect(0, 0, 99, 99)), "too large");
        assert_eq!(tree.borders(w), Some(rect(0, 0, 39, 39)));

        assert!(tree.set_location(w, rect(0, 0, 49, 59)));
        assert_eq!(tree.borders(stretch), Some(rect(0, 0, 49, 9)));
        assert_eq!(tree.borders(corner), Some(rect(40, 50, 49, 59)));
        assert_eq!(tree.borders(fixed), Some(rect(5, 5, 9, 9)));
    }

    #[test]
    fn move_clipped_stays_inside_parent() {
        let mut tree = ViewTree::new(screen());
        let root = tree.root();
        let w = tree.insert_group(root, ViewConfig::new(rect(10, 10, 59, 59)), Plain).unwrap();
        assert!(tree.move_clipped(w, 500, -500));
        assert_eq!(tree.borders(w), Some(rect(50, 0, 99, 49)));
        assert!(!tree.move_clipped(root, 1, 1), "the root never moves");
    }

    #[test]
    fn to_foreground_needs_top_select() {
        let mut tree = ViewTree::new(screen());
        let root = tree.root();
        let a = tree
            .insert(
                root,
                ViewConfig::new(rect(0, 0, 9, 9)).options(ViewOptions::TOP_SELECT),
                Plain,
            )
            .unwrap();
        let b = tree.insert(root, ViewConfig::new(rect(0, 0, 9, 9)), Plain).unwrap();
        let c = tree.insert(root, ViewConfig::new(rect(0, 0, 9, 9)), Plain).unwrap();
        assert_eq!(tree.children_of(root), &[c, b, a]);

        assert!(!tree.to_foreground(root, b), "b does not ask for top-select");
        assert!(tree.to_foreground(root, a));
        assert_eq!(tree.children_of(root), &[a, c, b]);
        assert!(tree.has_state(a, ViewState::FOREGROUND));
        assert!(!tree.has_state(c, ViewState::FOREGROUND), "old front is demoted");
    }

    #[test]
    fn centered_option_centres_on_insert() {
        let mut tree = ViewTree::new(screen());
        let root = tree.root();
        let v = tree
            .insert(
                root,
                ViewConfig::new(rect(0, 0, 9, 9)).options(ViewOptions::CENTERED),
                Plain,
            )
            .unwrap();
        assert_eq!(tree.borders(v), Some(rect(45, 45, 54, 54)));
    }

    #[test]
    fn pointer_capture_tracks_dragging_state() {
        let mut tree = ViewTree::new(screen());
        let root = tree.root();
        let v = tree.insert(root, ViewConfig::new(rect(0, 0, 9, 9)), Plain).unwrap();
        assert!(tree.capture_pointer(v));
        assert!(tree.has_state(v, ViewState::DRAGGING));
        assert_eq!(tree.pointer_capture(), Some(v));
        assert!(!tree.release_pointer(root), "root never held the capture");
        assert!(tree.release_pointer(v));
        assert!(!tree.has_state(v, ViewState::DRAGGING));

        tree.capture_pointer(v);
        tree.remove(root, v);
        assert_eq!(tree.pointer_capture(), None, "destroying a view drops its capture");
    }
}
