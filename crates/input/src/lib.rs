//! Terminal input module (engine-facing).
//!
//! A background thread (the pump) reads raw terminal events one at a time,
//! normalizes them into [`types::InputEvent`]s and pushes them into a small
//! bounded queue. The game loop drains that queue without ever blocking.
//!
//! The pump never stops the game itself: when input ends or fails it closes
//! the queue and exits, and the consumer decides what that means.

pub mod map;
pub mod pump;
pub mod queue;
pub mod source;

pub use tui_gg_types as types;

pub use map::{normalize_event, normalize_key};
pub use pump::{InputPump, POLL_INTERVAL};
pub use queue::{bounded, InputQueue, InputSender, Polled, Pushed};
pub use source::{AfterScript, CrosstermSource, InputSource, ScriptedSource};
