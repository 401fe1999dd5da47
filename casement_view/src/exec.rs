// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The root run loop.

use casement_geometry::Rectangle;
use tracing::{debug, info};

use crate::config::ExecConfig;
use crate::event::{Command, CommandEvent, Event};
use crate::render::{RenderContext, Renderer};
use crate::source::{EventSource, SourceError};
use crate::tree::ViewTree;
use crate::types::{ChangeFlags, ViewState};

/// Failure of the run loop.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// The event source failed.
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Owns a [`ViewTree`] and drives it: waits for events, dispatches them at the
/// root and renders a frame whenever something asked for a redraw.
#[derive(Debug)]
pub struct ViewExec<S, R> {
    tree: ViewTree,
    source: S,
    render: RenderContext<R>,
    config: ExecConfig,
}

impl<S: EventSource, R: Renderer> ViewExec<S, R> {
    /// A run loop over a fresh tree covering `screen`, with default settings.
    pub fn new(screen: Rectangle, source: S, renderer: R) -> Self {
        Self::with_config(screen, source, renderer, ExecConfig::default())
    }

    /// A run loop over a fresh tree covering `screen`.
    pub fn with_config(screen: Rectangle, source: S, renderer: R, config: ExecConfig) -> Self {
        Self::with_tree(ViewTree::new(screen), source, renderer, config)
    }

    /// A run loop over an existing tree.
    pub fn with_tree(mut tree: ViewTree, source: S, renderer: R, config: ExecConfig) -> Self {
        tree.set_keymap(config.keymap);
        let screen = tree.global_rect(tree.root()).unwrap_or(Rectangle::ZERO);
        Self {
            tree,
            source,
            render: RenderContext::new(renderer, screen),
            config,
        }
    }

    /// The tree.
    pub fn tree(&self) -> &ViewTree {
        &self.tree
    }

    /// The tree, mutably.
    pub fn tree_mut(&mut self) -> &mut ViewTree {
        &mut self.tree
    }

    /// The event source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// The render context.
    pub fn render(&self) -> &RenderContext<R> {
        &self.render
    }

    /// The render context, mutably.
    pub fn render_mut(&mut self) -> &mut RenderContext<R> {
        &mut self.render
    }

    /// Active settings.
    pub fn config(&self) -> &ExecConfig {
        &self.config
    }

    /// Whether the loop is (or would keep) running.
    pub fn is_running(&self) -> bool {
        self.tree.has_state(self.tree.root(), ViewState::RUNNING)
    }

    /// Mark the root running and request a full first frame.
    ///
    /// From here on, events sent into the tree are queued for the loop.
    pub fn start(&mut self) {
        let root = self.tree.root();
        self.tree.set_state(root, ViewState::RUNNING, true);
        self.tree.redraw_subtree(root);
        info!("event loop started");
    }

    /// Run until the root receives [`Command::Quit`].
    pub fn run(&mut self) -> Result<(), ExecError> {
        self.start();
        while self.is_running() {
            self.step(self.config.wait_timeout_ms)?;
        }
        info!("event loop stopped");
        Ok(())
    }

    /// One loop iteration: wait, handle, flush queued events, draw if needed.
    ///
    /// Returns whether an event was handled.
    pub fn step(&mut self, timeout_ms: i32) -> Result<bool, ExecError> {
        let received = self.source.wait(timeout_ms)?;
        let handled = received.is_some();
        if let Some(mut event) = received {
            self.handle_event(&mut event);
        }
        while let Some(event) = self.tree.take_posted() {
            self.source.inject(event)?;
        }
        let root = self.tree.root();
        if self
            .tree
            .changed(root)
            .is_some_and(|c| c.contains(ChangeFlags::REDRAW))
        {
            self.draw();
        }
        Ok(handled)
    }

    /// Dispatch one event at the root, handling the close chord first.
    pub fn handle_event(&mut self, event: &mut Event) {
        if event
            .as_key()
            .is_some_and(|k| k.matches(self.config.keymap.close))
        {
            let root = self.tree.root();
            if let Some(target) = self.tree.actual_of(root) {
                debug!(?target, "close chord");
                let close = CommandEvent::new(Command::Close).to(root).about(target);
                self.tree.send_event(Event::command(close));
            }
            event.clear();
            return;
        }
        let root = self.tree.root();
        self.tree.handle_event(root, event);
    }

    /// Render one frame.
    pub fn draw(&mut self) {
        self.render.frame(&mut self.tree);
    }

    /// Ask the loop to stop after the current iteration.
    pub fn quit(&mut self) {
        let root = self.tree.root();
        self.tree.execute(root, Command::Quit, None);
    }
}
