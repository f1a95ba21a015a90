//! Where raw input comes from.

use std::collections::VecDeque;
use std::io;
use std::thread;
use std::time::Duration;

use crossterm::event;

use crate::map::normalize_event;
use crate::types::InputEvent;

/// A blocking source of input events, read from the pump thread.
pub trait InputSource: Send {
    /// Wait up to `timeout` for the next event.
    ///
    /// `Ok(None)` means nothing arrived in time (or the raw event has no
    /// engine meaning). End of input is reported as an
    /// [`io::ErrorKind::UnexpectedEof`] error. Implementations must return
    /// within roughly `timeout` so the pump can notice shutdown.
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<InputEvent>>;
}

/// Keyboard and mouse events from the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermSource;

impl CrosstermSource {
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for CrosstermSource {
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<InputEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(normalize_event(event::read()?))
    }
}

/// What a [`ScriptedSource`] does once its events run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterScript {
    /// Report end of input.
    End,
    /// Keep timing out, like a terminal nobody is typing into.
    Idle,
}

/// Replays a fixed list of events. Useful for headless runs and tests.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    events: VecDeque<InputEvent>,
    after: AfterScript,
}

impl ScriptedSource {
    pub fn new(events: impl IntoIterator<Item = InputEvent>, after: AfterScript) -> Self {
        Self {
            events: events.into_iter().collect(),
            after,
        }
    }

    /// A source with nothing to say.
    pub fn idle() -> Self {
        Self::new([], AfterScript::Idle)
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl InputSource for ScriptedSource {
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<InputEvent>> {
        if let Some(event) = self.events.pop_front() {
            return Ok(Some(event));
        }
        match self.after {
            AfterScript::End => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "scripted input exhausted",
            )),
            AfterScript::Idle => {
                thread::sleep(timeout);
                Ok(None)
            }
        }
    }
}
