use std::io;

use thiserror::Error;

/// Anything that stops the loop other than a quit request or a signal.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to acquire raw terminal mode: {0}")]
    TerminalMode(#[source] io::Error),
    #[error("failed to restore terminal mode: {0}")]
    Restore(#[source] io::Error),
    #[error("failed to subscribe to signals: {0}")]
    Signals(#[source] io::Error),
    #[error("failed to start input pump: {0}")]
    InputSpawn(#[source] io::Error),
    #[error("game failed to initialize: {0:#}")]
    Init(anyhow::Error),
    #[error("input stream closed")]
    InputClosed,
    #[error("game failed: {0:#}")]
    Game(anyhow::Error),
}
