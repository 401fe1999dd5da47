// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events: pointer, keyboard and command messages.
//!
//! An [`Event`] holds exactly one payload at a time. Handlers consume an event
//! by calling [`Event::clear`], which resets it to [`Event::Nothing`] and drops
//! the payload; dispatch stops as soon as an event is nothing, so re-entrant
//! handlers never process the same event twice.
//!
//! Command events are addressed: [`CommandEvent::dest`] names the view (or
//! [`Address::Broadcast`] for a whole subtree) that should receive the command,
//! and [`CommandEvent::target`] names the object the command is about. Closing a
//! window, for example, is a [`Command::Close`] sent to the window's parent with
//! the window as target.
//!
//! ```rust
//! use casement_view::{Address, Command, CommandEvent, Event};
//!
//! let mut event = Event::command(CommandEvent::new(Command::Quit).to(Address::Broadcast));
//! assert!(event.as_pointer().is_none());
//! assert_eq!(event.as_command().map(|c| c.command), Some(Command::Quit));
//!
//! event.clear();
//! assert!(event.is_nothing());
//! ```

use casement_geometry::Point;

use crate::types::ViewId;

/// A dispatched event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Event {
    /// No payload; the event was consumed or never set.
    #[default]
    Nothing,
    /// Pointer (mouse) input, in global coordinates.
    Pointer(PointerEvent),
    /// Keyboard input.
    Key(KeyEvent),
    /// A command message between views.
    Command(CommandEvent),
}

impl Event {
    /// Wrap a pointer payload.
    pub fn pointer(p: PointerEvent) -> Self {
        Self::Pointer(p)
    }

    /// Wrap a key payload.
    pub fn key(k: KeyEvent) -> Self {
        Self::Key(k)
    }

    /// Wrap a command payload.
    pub fn command(c: CommandEvent) -> Self {
        Self::Command(c)
    }

    /// Reset to [`Event::Nothing`], dropping any payload.
    pub fn clear(&mut self) {
        *self = Self::Nothing;
    }

    /// Whether the event carries no payload.
    pub fn is_nothing(&self) -> bool {
        matches!(self, Self::Nothing)
    }

    /// The pointer payload, if this is a pointer event.
    pub fn as_pointer(&self) -> Option<&PointerEvent> {
        match self {
            Self::Pointer(p) => Some(p),
            _ => None,
        }
    }

    /// The key payload, if this is a key event.
    pub fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            Self::Key(k) => Some(k),
            _ => None,
        }
    }

    /// The command payload, if this is a command event.
    pub fn as_command(&self) -> Option<&CommandEvent> {
        match self {
            Self::Command(c) => Some(c),
            _ => None,
        }
    }

    /// Mutable command payload, if this is a command event.
    pub fn as_command_mut(&mut self) -> Option<&mut CommandEvent> {
        match self {
            Self::Command(c) => Some(c),
            _ => None,
        }
    }
}

bitflags::bitflags! {
    /// Pointer buttons held during a pointer event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Buttons: u8 {
        /// Primary button.
        const LEFT   = 0b0000_0001;
        /// Middle button or wheel press.
        const MIDDLE = 0b0000_0010;
        /// Secondary button.
        const RIGHT  = 0b0000_0100;
    }
}

bitflags::bitflags! {
    /// What happened in a pointer event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PointerStatus: u8 {
        /// A button went down.
        const PRESSED  = 0b0000_0001;
        /// A button went up.
        const RELEASED = 0b0000_0010;
        /// The pointer moved.
        const MOTION   = 0b0000_0100;
        /// The wheel turned; `yrel` carries the amount.
        const WHEEL    = 0b0000_1000;
    }
}

/// Pointer payload. `x` and `y` are global (screen) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerEvent {
    /// Global horizontal position.
    pub x: i32,
    /// Global vertical position.
    pub y: i32,
    /// Horizontal movement since the previous pointer event.
    pub xrel: i32,
    /// Vertical movement since the previous pointer event.
    pub yrel: i32,
    /// Buttons held.
    pub buttons: Buttons,
    /// Kind of pointer event.
    pub status: PointerStatus,
}

impl PointerEvent {
    /// A left button press at `(x, y)`.
    pub fn press(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            buttons: Buttons::LEFT,
            status: PointerStatus::PRESSED,
            ..Self::default()
        }
    }

    /// A left button release at `(x, y)`.
    pub fn release(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            buttons: Buttons::LEFT,
            status: PointerStatus::RELEASED,
            ..Self::default()
        }
    }

    /// A motion to `(x, y)` by `(xrel, yrel)` with `buttons` held.
    pub fn motion(x: i32, y: i32, xrel: i32, yrel: i32, buttons: Buttons) -> Self {
        Self {
            x,
            y,
            xrel,
            yrel,
            buttons,
            status: PointerStatus::MOTION,
        }
    }

    /// The global position as a point.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Whether a button went down.
    pub fn is_press(&self) -> bool {
        self.status.contains(PointerStatus::PRESSED)
    }

    /// Whether a button went up.
    pub fn is_release(&self) -> bool {
        self.status.contains(PointerStatus::RELEASED)
    }

    /// Whether the pointer moved.
    pub fn is_motion(&self) -> bool {
        self.status.contains(PointerStatus::MOTION)
    }
}

/// Platform-independent key code.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u32);

#[allow(missing_docs, reason = "Key names are self-describing.")]
impl KeyCode {
    pub const UNKNOWN: Self = Self(0);
    pub const BACKSPACE: Self = Self(8);
    pub const TAB: Self = Self(9);
    pub const ENTER: Self = Self(13);
    pub const ESCAPE: Self = Self(27);
    pub const SPACE: Self = Self(32);
    pub const LEFT: Self = Self(0x100);
    pub const RIGHT: Self = Self(0x101);
    pub const UP: Self = Self(0x102);
    pub const DOWN: Self = Self(0x103);
    pub const HOME: Self = Self(0x104);
    pub const END: Self = Self(0x105);
    pub const PAGE_UP: Self = Self(0x106);
    pub const PAGE_DOWN: Self = Self(0x107);
    pub const F1: Self = Self(0x201);
    pub const F2: Self = Self(0x202);
    pub const F3: Self = Self(0x203);
    pub const F4: Self = Self(0x204);
    pub const F5: Self = Self(0x205);
    pub const F6: Self = Self(0x206);
    pub const F10: Self = Self(0x20a);

    /// Key code for an ASCII character; letters map to their lowercase form.
    pub const fn from_char(c: char) -> Self {
        Self(c.to_ascii_lowercase() as u32)
    }
}

bitflags::bitflags! {
    /// Keyboard modifiers held during a key event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Either shift key.
        const SHIFT = 0b0000_0001;
        /// Either control key.
        const CTRL  = 0b0000_0010;
        /// Either alt/option key.
        const ALT   = 0b0000_0100;
        /// Either logo/command key.
        const META  = 0b0000_1000;
    }
}

bitflags::bitflags! {
    /// What happened in a key event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct KeyStatus: u8 {
        /// The key went down.
        const PRESSED  = 0b0000_0001;
        /// The key went up.
        const RELEASED = 0b0000_0010;
        /// Auto-repeat of a held key.
        const REPEAT   = 0b0000_0100;
    }
}

/// Keyboard payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key.
    pub key: KeyCode,
    /// Modifiers held.
    pub modifiers: Modifiers,
    /// Kind of key event.
    pub status: KeyStatus,
}

impl KeyEvent {
    /// A key press with modifiers.
    pub fn press(key: KeyCode, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            status: KeyStatus::PRESSED,
        }
    }

    /// Whether this is a press (or auto-repeat) of exactly `chord`.
    pub fn matches(&self, chord: KeyChord) -> bool {
        self.status.intersects(KeyStatus::PRESSED | KeyStatus::REPEAT)
            && self.key == chord.key
            && self.modifiers == chord.modifiers
    }
}

/// A key together with the exact modifiers that must be held.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyChord {
    /// The key.
    pub key: KeyCode,
    /// Required modifiers.
    pub modifiers: Modifiers,
}

impl KeyChord {
    /// A chord of `key` with `modifiers`.
    pub const fn new(key: KeyCode, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }
}

/// Commands understood by views.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Close the target child (or all children when the target is broadcast).
    Close,
    /// Leave the event loop.
    Quit,
    /// Make the caller the parent's selected child.
    Select,
    /// The caller asks its parent for focus.
    ReqFocus,
    /// The view is asked to give up focus.
    RelFocus,
    /// Repaint the view and everything below it.
    Draw,
    /// Repaint the view (and mark its ancestors).
    Redraw,
    /// Grow the view to fill its parent.
    Maximize,
    /// Undo a previous maximize.
    Restore,
    /// Toggle between maximized and restored.
    Zoom,
    /// Focus the next selectable child (`sub_command` 0) or the previous one (1).
    FocusNext,
    /// Select the next selectable child (`sub_command` 0) or the previous one (1).
    SelectNext,
    /// A button was clicked; `sender` is the button.
    Clicked,
    /// A value-bearing widget changed; the new value is in `payload`.
    ValueChanged,
    /// Application-defined command.
    User(u16),
}

/// `sub_command` value requesting forward traversal.
pub const FORWARD: u32 = 0;
/// `sub_command` value requesting backward traversal.
pub const BACKWARD: u32 = 1;

/// Destination or target of a command.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Address {
    /// Nobody. Commands with no destination are dropped.
    #[default]
    Unset,
    /// Every view in the addressed subtree.
    Broadcast,
    /// A single view.
    View(ViewId),
}

impl Address {
    /// The view handle, if this addresses a single view.
    pub fn view(self) -> Option<ViewId> {
        match self {
            Self::View(id) => Some(id),
            _ => None,
        }
    }
}

impl From<ViewId> for Address {
    fn from(id: ViewId) -> Self {
        Self::View(id)
    }
}

/// Command payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandEvent {
    /// What to do.
    pub command: Command,
    /// Command-specific modifier, for example [`FORWARD`] / [`BACKWARD`].
    pub sub_command: u32,
    /// The view that issued the command, if any.
    pub sender: Option<ViewId>,
    /// Who should execute the command.
    pub dest: Address,
    /// What the command is about.
    pub target: Address,
    /// Command-specific value.
    pub payload: i64,
}

impl CommandEvent {
    /// A command with no sender, destination or target.
    pub fn new(command: Command) -> Self {
        Self {
            command,
            sub_command: 0,
            sender: None,
            dest: Address::Unset,
            target: Address::Unset,
            payload: 0,
        }
    }

    /// Set the destination.
    pub fn to(mut self, dest: impl Into<Address>) -> Self {
        self.dest = dest.into();
        self
    }

    /// Set the target.
    pub fn about(mut self, target: impl Into<Address>) -> Self {
        self.target = target.into();
        self
    }

    /// Set the sender.
    pub fn sent_by(mut self, sender: ViewId) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Set the sub-command.
    pub fn sub(mut self, sub_command: u32) -> Self {
        self.sub_command = sub_command;
        self
    }

    /// Set the payload.
    pub fn payload(mut self, payload: i64) -> Self {
        self.payload = payload;
        self
    }
}
