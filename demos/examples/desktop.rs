// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless desktop: two windows, a scroll bar driving a progress bar, and a
//! window closed through the reserved key chord.
//!
//! Input is produced on another thread and fed through a
//! `ChannelEventSource`; frames go to a `RecordingRenderer`.
//!
//! Run:
//! - `RUST_LOG=casement_view=debug cargo run -p casement_demos --example desktop`

use std::cell::Cell;
use std::time::Duration;

use casement_geometry::{Point, Rectangle};
use casement_view::widgets::{ProgressBar, ScrollBar, Window};
use casement_view::{
    Address, Buttons, ChannelEventSource, Command, CommandEvent, Event, ExecConfig, KeyEvent,
    PointerEvent, RecordingRenderer, ViewConfig, ViewExec, ViewId, ViewTree, Widget,
};
use tracing_subscriber::EnvFilter;

/// Group that forwards scroll bar values to its progress bar.
#[derive(Debug, Default)]
struct Mixer {
    gauge: Cell<Option<ViewId>>,
}

impl Widget for Mixer {
    fn validate_command(&self, tree: &ViewTree, id: ViewId, command: Command) -> bool {
        command == Command::ValueChanged || tree.base_validate_command(id, command)
    }

    fn execute_command(&self, tree: &mut ViewTree, id: ViewId, command: &CommandEvent) -> bool {
        if command.command != Command::ValueChanged {
            return tree.base_execute_command(id, command);
        }
        let Some(gauge) = self.gauge.get() else {
            return false;
        };
        let forward = CommandEvent::new(Command::ValueChanged)
            .to(gauge)
            .sent_by(id)
            .payload(command.payload);
        tree.execute_command(gauge, &forward)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let screen = Rectangle::from_coords(0, 0, 319, 199);
    let source = ChannelEventSource::new();
    let sender = source.sender();
    let mut exec = ViewExec::with_config(
        screen,
        source,
        RecordingRenderer::new(),
        ExecConfig::default().with_wait_timeout(20),
    );

    let tree = exec.tree_mut();
    let root = tree.root();
    let Some(a) = Window::build(tree, root, Rectangle::from_coords(10, 10, 209, 109), "Mixer")
    else {
        return;
    };
    let Some(b) = Window::build(tree, root, Rectangle::from_coords(120, 60, 299, 159), "Notes")
    else {
        return;
    };
    let mixer = Mixer::default();
    let Some(panel) = tree.insert_group(
        a.window,
        ViewConfig::new(Rectangle::from_coords(4, 16, 195, 95)),
        mixer,
    ) else {
        return;
    };
    let bar = tree.insert(
        panel,
        ViewConfig::new(Rectangle::from_coords(4, 4, 103, 13)),
        ScrollBar::new(0, 90, 10),
    );
    let gauge = tree.insert(
        panel,
        ViewConfig::new(Rectangle::from_coords(4, 24, 103, 33)),
        ProgressBar::new(90),
    );
    let (Some(bar), Some(gauge)) = (bar, gauge) else {
        return;
    };
    if let Some(m) = tree.widget_ref::<Mixer>(panel) {
        m.gauge.set(Some(gauge));
    }

    // Positions the scripted user aims at.
    let title = tree
        .global_rect(a.title_bar)
        .map_or(Point::ZERO, |r| r.ul + Point::new(20, 2));
    let thumb = tree
        .global_rect(bar)
        .map_or(Point::ZERO, |r| r.ul + Point::new(2, 2));
    let notes = tree
        .global_rect(b.title_bar)
        .map_or(Point::ZERO, |r| Point::new(r.lr.x - 40, r.ul.y + 2));

    tracing::info!(?a, ?b, "desktop ready");
    let producer = std::thread::spawn(move || {
        let script = [
            // Drag window A by (5, 5); this also brings it to the front.
            Event::pointer(PointerEvent::press(title.x, title.y)),
            Event::pointer(PointerEvent::motion(title.x + 5, title.y + 5, 5, 5, Buttons::LEFT)),
            Event::pointer(PointerEvent::release(title.x + 5, title.y + 5)),
            // Drag the scroll bar thumb half way.
            Event::pointer(PointerEvent::press(thumb.x + 5, thumb.y + 5)),
            Event::pointer(PointerEvent::motion(thumb.x + 50, thumb.y + 5, 45, 0, Buttons::LEFT)),
            Event::pointer(PointerEvent::release(thumb.x + 50, thumb.y + 5)),
        ];
        for event in script {
            if sender.send(event).is_err() {
                return;
            }
        }
        // Focus window B, then close it with the reserved chord.
        let _ = sender.send(Event::pointer(PointerEvent::press(notes.x, notes.y)));
        let _ = sender.send(Event::pointer(PointerEvent::release(notes.x, notes.y)));
        let close = ExecConfig::default().keymap.close;
        let _ = sender.send(Event::key(KeyEvent::press(close.key, close.modifiers)));
        // The close is posted back through the source; give the loop a moment
        // to handle it before asking it to stop.
        std::thread::sleep(Duration::from_millis(200));
        let quit = CommandEvent::new(Command::Quit).to(Address::Broadcast);
        let _ = sender.send(Event::command(quit));
    });

    if let Err(err) = exec.run() {
        tracing::error!(%err, "event loop failed");
    }
    let _ = producer.join();

    let tree = exec.tree();
    println!("window A alive: {}", tree.is_alive(a.window));
    println!("window B alive: {}", tree.is_alive(b.window));
    if let Some(g) = tree.widget_ref::<ProgressBar>(gauge) {
        println!("gauge: {} / {}", g.value(), g.max());
    }
    println!("frames presented: {}", exec.render().renderer.frames());
    let texts: Vec<_> = exec.render().renderer.texts().collect();
    println!("text runs recorded: {texts:?}");
}
