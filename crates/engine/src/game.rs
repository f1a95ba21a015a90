//! The contract between the loop and a hosted game.

use crate::types::{Flow, InputEvent};

/// Everything the loop needs from a game. The loop never knows which concrete
/// game it is driving.
///
/// `update` and `handle_input` return `Ok(Flow::Quit)` to stop normally; an
/// `Err` stops the loop and is reported as a failure after teardown.
pub trait Game {
    /// Called once, after the terminal is in raw mode and before the first
    /// frame. An error aborts startup.
    fn init(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Advance the simulation by `dt` seconds (already time-scaled).
    fn update(&mut self, dt: f64) -> anyhow::Result<Flow>;

    /// Draw and flush one frame. Render errors are the game's to handle.
    fn draw(&mut self);

    fn handle_input(&mut self, event: InputEvent) -> anyhow::Result<Flow>;

    /// The largest `(width, height)` the game draws at, if bounded.
    fn size(&self) -> Option<(u16, u16)> {
        None
    }

    /// The terminal window changed size. Receives the new terminal size,
    /// clamped to [`Game::size`] when the game reports one.
    fn resize(&mut self, _columns: u16, _rows: u16) {}

    /// Called exactly once when the loop stops, whatever stopped it.
    fn cleanup(&mut self) {}
}

impl<G: Game + ?Sized> Game for Box<G> {
    fn init(&mut self) -> anyhow::Result<()> {
        (**self).init()
    }

    fn update(&mut self, dt: f64) -> anyhow::Result<Flow> {
        (**self).update(dt)
    }

    fn draw(&mut self) {
        (**self).draw()
    }

    fn handle_input(&mut self, event: InputEvent) -> anyhow::Result<Flow> {
        (**self).handle_input(event)
    }

    fn size(&self) -> Option<(u16, u16)> {
        (**self).size()
    }

    fn resize(&mut self, columns: u16, rows: u16) {
        (**self).resize(columns, rows)
    }

    fn cleanup(&mut self) {
        (**self).cleanup()
    }
}
