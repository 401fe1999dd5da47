// Copyright 2025 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Where events come from.

use core::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, unbounded};

use crate::event::Event;

/// Failure of an [`EventSource`].
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Every producer is gone; no event will ever arrive again.
    #[error("event source disconnected")]
    Disconnected,
    /// Backend-specific failure.
    #[error("event backend failed: {0}")]
    Backend(String),
}

/// Supplier of input events for a [`ViewExec`](crate::ViewExec).
pub trait EventSource {
    /// Wait for the next event.
    ///
    /// A negative `timeout_ms` blocks until an event arrives, zero polls and a
    /// positive value waits at most that long. `Ok(None)` means the wait
    /// timed out.
    fn wait(&mut self, timeout_ms: i32) -> Result<Option<Event>, SourceError>;

    /// Queue an event to be returned by a later [`wait`](Self::wait).
    fn inject(&mut self, event: Event) -> Result<(), SourceError>;
}

/// Cloneable handle feeding a [`ChannelEventSource`], possibly from another thread.
#[derive(Clone, Debug)]
pub struct EventSender {
    tx: Sender<Event>,
}

impl EventSender {
    /// Queue an event.
    pub fn send(&self, event: Event) -> Result<(), SourceError> {
        self.tx.send(event).map_err(|_| SourceError::Disconnected)
    }
}

/// An [`EventSource`] backed by an unbounded channel.
///
/// The source keeps its own sender for [`inject`](EventSource::inject), so it
/// never reports disconnection while it is alive; hosts detect shutdown by
/// sending [`Command::Quit`](crate::Command::Quit) instead.
#[derive(Debug)]
pub struct ChannelEventSource {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for ChannelEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelEventSource {
    /// A new, empty source.
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// A handle for producers.
    pub fn sender(&self) -> EventSender {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    /// Number of queued events.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl EventSource for ChannelEventSource {
    fn wait(&mut self, timeout_ms: i32) -> Result<Option<Event>, SourceError> {
        match u64::try_from(timeout_ms) {
            Err(_) => self
                .rx
                .recv()
                .map(Some)
                .map_err(|_| SourceError::Disconnected),
            Ok(0) => match self.rx.try_recv() {
                Ok(event) => Ok(Some(event)),
                Err(TryRecvError::Empty) => Ok(None),
                Err(TryRecvError::Disconnected) => Err(SourceError::Disconnected),
            },
            Ok(ms) => match self.rx.recv_timeout(Duration::from_millis(ms)) {
                Ok(event) => Ok(Some(event)),
                Err(RecvTimeoutError::Timeout) => Ok(None),
                Err(RecvTimeoutError::Disconnected) => Err(SourceError::Disconnected),
            },
        }
    }

    fn inject(&mut self, event: Event) -> Result<(), SourceError> {
        self.tx.send(event).map_err(|_| SourceError::Disconnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::PointerEvent;

    #[test]
    fn poll_and_timeout_return_none_when_empty() {
        let mut source = ChannelEventSource::new();
        assert!(source.wait(0).unwrap().is_none());
        assert!(source.wait(1).unwrap().is_none());
    }

    #[test]
    fn events_arrive_in_order_from_any_sender() {
        let mut source = ChannelEventSource::new();
        let sender = source.sender();
        let handle = std::thread::spawn(move || {
            sender.send(Event::pointer(PointerEvent::press(1, 1))).unwrap();
        });
        handle.join().unwrap();
        source.inject(Event::pointer(PointerEvent::release(1, 1))).unwrap();
        assert_eq!(source.pending(), 2);
        assert!(matches!(source.wait(-1).unwrap(), Some(Event::Pointer(p)) if p.is_press()));
        assert!(matches!(source.wait(0).unwrap(), Some(Event::Pointer(p)) if p.is_release()));
    }
}
