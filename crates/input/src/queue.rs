//! Bounded single-producer/single-consumer input queue.
//!
//! Built on a tokio mpsc channel, whose `try_send`/`try_recv` work from plain
//! threads without a runtime.

use tokio::sync::mpsc::{self, error::TryRecvError, error::TrySendError};

use crate::types::InputEvent;

/// Result of [`InputSender::push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pushed {
    Queued,
    /// Queue full; the new event was discarded.
    Dropped,
    /// Consumer is gone.
    Closed,
}

/// Result of [`InputQueue::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polled {
    Event(InputEvent),
    Empty,
    /// Producer is gone and everything it sent has been drained.
    Closed,
}

/// Create a queue holding at most `depth` pending events (minimum 1).
pub fn bounded(depth: usize) -> (InputSender, InputQueue) {
    let (tx, rx) = mpsc::channel(depth.max(1));
    (InputSender { tx }, InputQueue { rx })
}

/// Producer half. Dropping it closes the queue.
#[derive(Debug)]
pub struct InputSender {
    tx: mpsc::Sender<InputEvent>,
}

impl InputSender {
    /// Never blocks: a full queue drops the newest event.
    pub fn push(&self, event: InputEvent) -> Pushed {
        match self.tx.try_send(event) {
            Ok(()) => Pushed::Queued,
            Err(TrySendError::Full(_)) => Pushed::Dropped,
            Err(TrySendError::Closed(_)) => Pushed::Closed,
        }
    }
}

/// Consumer half, owned by the game loop.
#[derive(Debug)]
pub struct InputQueue {
    rx: mpsc::Receiver<InputEvent>,
}

impl InputQueue {
    /// Take at most one event without blocking.
    pub fn poll(&mut self) -> Polled {
        match self.rx.try_recv() {
            Ok(event) => Polled::Event(event),
            Err(TryRecvError::Empty) => Polled::Empty,
            Err(TryRecvError::Disconnected) => Polled::Closed,
        }
    }
}
