// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=casement_view --heading-base-level=0

//! Casement View: a retained-mode view tree with event routing, two-phase
//! focus and occlusion-aware painting.
//!
//! Casement View is the core of the Casement toolkit. An application builds a
//! [`ViewTree`] of rectangular views, attaches behaviour to each one through
//! the [`Widget`] trait, and hands the tree to a [`ViewExec`] that waits for
//! input, routes it and repaints whatever changed.
//!
//! - Views live in an arena and are addressed by generational [`ViewId`]s.
//!   A handle to a destroyed view is stale and every accessor answers `None`
//!   or `false` for it, so a widget may close its own window mid-dispatch.
//! - Pointer input goes to the frontmost view under the pointer (or to the
//!   view holding the pointer capture), keys follow the focus chain, and
//!   [`Command`]s travel to their destination or are broadcast to a subtree.
//! - Focus moves in two phases: every view that would lose focus is asked
//!   first, and nothing changes unless all of them agree.
//! - Before painting, the tree stamps a [`ZBuffer`](casement_zbuffer::ZBuffer)
//!   front to back so fully covered views are skipped. Views marked
//!   [`ViewOptions::BUFFERED`] keep an offscreen surface between frames.
//!
//! ## Example
//!
//! ```rust
//! use casement_geometry::Rectangle;
//! use casement_view::widgets::{Button, Window};
//! use casement_view::{Command, Event, PointerEvent, ViewState, ViewTree};
//!
//! let mut tree = ViewTree::new(Rectangle::from_coords(0, 0, 319, 199));
//! let root = tree.root();
//! let win = Window::build(&mut tree, root, Rectangle::from_coords(20, 20, 219, 119), "Hello")
//!     .unwrap();
//! let ok = tree
//!     .insert(
//!         win.window,
//!         Button::config(Rectangle::from_coords(10, 40, 59, 54)),
//!         Button::new("OK", Command::User(1)),
//!     )
//!     .unwrap();
//!
//! // Clicking the button focuses it, along with every group above it.
//! tree.send_event(Event::pointer(PointerEvent::press(35, 65)));
//! tree.send_event(Event::pointer(PointerEvent::release(35, 65)));
//! assert!(tree.has_state(ok, ViewState::FOCUSED));
//! assert!(tree.has_state(win.window, ViewState::FOCUSED));
//!
//! // The close button sits in the top-right corner of the title bar.
//! tree.send_event(Event::pointer(PointerEvent::press(215, 22)));
//! tree.send_event(Event::pointer(PointerEvent::release(215, 22)));
//! assert!(!tree.is_alive(win.window));
//! assert!(!tree.is_alive(ok));
//! ```
//!
//! ## Running a loop
//!
//! [`ViewExec`] owns the tree together with an [`EventSource`] and a
//! [`Renderer`]. While it runs, events sent into the tree are queued and fed
//! back through the source, so a handler never re-enters dispatch for a view
//! that is still on the stack. [`ChannelEventSource`] lets other threads feed
//! input through a cloneable [`EventSender`]; [`RecordingRenderer`] draws
//! nothing and records every call, which is what the tests use.
//!
//! Logging goes through `tracing`; install a subscriber to see focus moves,
//! closes and loop start/stop.

mod config;
mod dispatch;
mod event;
mod exec;
mod exposure;
mod focus;
mod palette;
mod recording;
mod render;
mod source;
mod tree;
mod types;
mod widget;
pub mod widgets;

pub use config::{ExecConfig, Keymap};
pub use event::{
    Address, BACKWARD, Buttons, Command, CommandEvent, Event, FORWARD, KeyChord, KeyCode,
    KeyEvent, KeyStatus, Modifiers, PointerEvent, PointerStatus,
};
pub use exec::{ExecError, ViewExec};
pub use palette::{ACCENT, BORDER, FACE, Palette, PaletteGroup, TEXT};
pub use recording::{DrawOp, RecordingRenderer};
pub use render::{Color, Painter, RenderContext, Renderer, SurfaceId};
pub use source::{ChannelEventSource, EventSender, EventSource, SourceError};
pub use tree::ViewTree;
pub use types::{ChangeFlags, ResizeMode, ViewConfig, ViewId, ViewOptions, ViewState};
pub use widget::{Plain, Widget};
