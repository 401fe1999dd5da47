// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Run loop configuration.

use crate::event::{KeyChord, KeyCode, Modifiers};

/// Key combinations the toolkit reserves for itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Keymap {
    /// Toggles maximize/restore on the focused window.
    pub zoom: KeyChord,
    /// Closes the root's selected child.
    pub close: KeyChord,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            zoom: KeyChord::new(KeyCode::F5, Modifiers::empty()),
            close: KeyChord::new(KeyCode::F4, Modifiers::ALT),
        }
    }
}

/// Settings for a [`ViewExec`](crate::ViewExec).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecConfig {
    /// How long each loop iteration waits for input, in milliseconds.
    ///
    /// Negative blocks until an event arrives, zero polls.
    pub wait_timeout_ms: i32,
    /// Reserved keys.
    pub keymap: Keymap,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            wait_timeout_ms: 50,
            keymap: Keymap::default(),
        }
    }
}

impl ExecConfig {
    /// Set the wait timeout.
    pub fn with_wait_timeout(mut self, ms: i32) -> Self {
        self.wait_timeout_ms = ms;
        self
    }

    /// Set the reserved keys.
    pub fn with_keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }
}
