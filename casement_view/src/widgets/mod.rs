// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stock widgets built on [`Widget`](crate::Widget).
//!
//! - [`Window`]: a selectable group with a [`TitleBar`] and a [`CloseButton`].
//! - [`Button`]: sends a configured command to its parent when clicked.
//! - [`ScrollBar`] and [`ProgressBar`]: value widgets speaking
//!   [`Command::ValueChanged`](crate::Command::ValueChanged).
//! - [`Frame`]: a decorative outline.

mod button;
mod frame;
mod progress_bar;
mod scroll_bar;
mod window;

pub use button::Button;
pub use frame::Frame;
pub use progress_bar::ProgressBar;
pub use scroll_bar::ScrollBar;
pub use window::{CloseButton, TITLE_HEIGHT, TitleBar, Window, WindowParts};
