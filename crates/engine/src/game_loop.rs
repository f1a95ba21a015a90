//! The frame loop.
//!
//! Variable timestep with a frame-rate cap: every iteration measures the real
//! time since the previous one, scales it, and hands it to the game once.
//! An iteration that overruns its budget simply doesn't sleep; nothing is
//! caught up.
//!
//! Per iteration:
//! 1. `dt` = wall-clock delta * time scale
//! 2. pending resize -> `Game::resize`
//! 3. pending interrupt/terminate -> stop after this frame
//! 4. at most one input event -> `Game::handle_input`
//! 5. `Game::update(dt)`
//! 6. `Game::draw()`
//! 7. sleep for whatever is left of the frame budget
//!
//! Stopping is cooperative and observed at the top of the next iteration.
//! Teardown (`Game::cleanup`, pump shutdown, terminal restore) runs once on
//! every stop path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::config::LoopConfig;
use crate::context::Context;
use crate::error::EngineError;
use crate::game::Game;
use crate::input::{bounded, CrosstermSource, InputPump, InputQueue, InputSource, Polled};
use crate::signals::{ShutdownSignal, Signals};
use crate::term::{CrosstermTerminal, PanicRestore, RawModeGuard, TerminalMode};
use crate::types::Flow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Initializing,
    Running,
    Stopped,
}

/// Why a run ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The game returned [`Flow::Quit`].
    Quit,
    Signal(ShutdownSignal),
    /// `frame_limit` frames were run.
    FrameLimit,
    /// A [`StopHandle`] was used.
    Requested,
}

/// Stops a running loop from anywhere, including other threads.
#[derive(Debug, Clone)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }
}

enum InputSetup {
    Source(Box<dyn InputSource>),
    Queue(InputQueue),
}

pub struct GameLoop<G: Game> {
    game: G,
    config: LoopConfig,
    dispatch: tracing::Dispatch,
    terminal: Arc<dyn TerminalMode>,
    input: Option<InputSetup>,
    signals: Option<Signals>,
    running: Arc<AtomicBool>,
    state: LoopState,
    frames: u64,
}

impl<G: Game> GameLoop<G> {
    /// A loop for the real terminal: crossterm raw mode, crossterm input, and
    /// OS signals subscribed when [`GameLoop::run`] starts.
    pub fn new(game: G, ctx: &Context) -> Self {
        Self {
            game,
            config: ctx.config.clone(),
            dispatch: ctx.dispatch().clone(),
            terminal: Arc::new(CrosstermTerminal::new()),
            input: None,
            signals: None,
            running: Arc::new(AtomicBool::new(false)),
            state: LoopState::Initializing,
            frames: 0,
        }
    }

    pub fn with_terminal(mut self, terminal: impl TerminalMode + 'static) -> Self {
        self.terminal = Arc::new(terminal);
        self
    }

    /// Read input from `source` on the pump thread.
    pub fn with_input_source(mut self, source: impl InputSource + 'static) -> Self {
        self.input = Some(InputSetup::Source(Box::new(source)));
        self
    }

    /// Drain an already-fed queue instead of starting a pump.
    pub fn with_input_queue(mut self, queue: InputQueue) -> Self {
        self.input = Some(InputSetup::Queue(queue));
        self
    }

    pub fn with_signals(mut self, signals: Signals) -> Self {
        self.signals = Some(signals);
        self
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            running: Arc::clone(&self.running),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frames completed by the last run.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn into_game(self) -> G {
        self.game
    }

    /// Run until quit, a shutdown signal, the frame limit or a fatal error.
    ///
    /// The terminal is in raw mode for the duration and is restored on every
    /// way out, including panics in game code: unwinding drops the guard, and
    /// a panic hook covers `panic = "abort"` builds and restores before the
    /// panic message is printed.
    pub fn run(&mut self) -> Result<StopReason, EngineError> {
        let dispatch = self.dispatch.clone();
        tracing::dispatcher::with_default(&dispatch, || self.run_inner())
    }

    fn run_inner(&mut self) -> Result<StopReason, EngineError> {
        let Self {
            game,
            config,
            dispatch,
            terminal,
            input,
            signals,
            running,
            state,
            frames,
        } = self;

        *state = LoopState::Initializing;
        *frames = 0;
        running.store(true, Ordering::Release);
        info!(
            fps = config.target_fps,
            time_scale = config.time_scale,
            "starting game loop"
        );

        let guard = RawModeGuard::acquire(Arc::clone(terminal)).map_err(|err| {
            error!(%err, "unable to enter raw mode");
            EngineError::TerminalMode(err)
        })?;
        let panic_restore = PanicRestore::install(guard.restorer());

        if let Err(err) = game.init() {
            error!(error = %format!("{err:#}"), "game failed to initialize");
            *state = LoopState::Stopped;
            return Err(EngineError::Init(err));
        }

        let mut signals = match signals.take() {
            Some(signals) => signals,
            None => match Signals::subscribe() {
                Ok(signals) => signals,
                Err(err) => {
                    error!(%err, "unable to subscribe to signals");
                    game.cleanup();
                    *state = LoopState::Stopped;
                    return Err(EngineError::Signals(err));
                }
            },
        };

        let (mut queue, pump) = match input.take() {
            Some(InputSetup::Queue(queue)) => (queue, None),
            setup => {
                let source = match setup {
                    Some(InputSetup::Source(source)) => source,
                    _ => Box::new(CrosstermSource::new()) as Box<dyn InputSource>,
                };
                let (sender, queue) = bounded(config.input_queue_depth);
                match InputPump::spawn(source, sender, dispatch.clone()) {
                    Ok(pump) => (queue, Some(pump)),
                    Err(err) => {
                        error!(%err, "unable to start input pump");
                        game.cleanup();
                        *state = LoopState::Stopped;
                        return Err(EngineError::InputSpawn(err));
                    }
                }
            }
        };

        *state = LoopState::Running;
        let budget = config.target_frame_duration();
        let mut last = Instant::now();
        let mut stop: Option<StopReason> = None;

        let outcome = loop {
            if let Some(reason) = stop {
                break Ok(reason);
            }
            if !running.load(Ordering::Acquire) {
                info!("stop requested");
                break Ok(StopReason::Requested);
            }

            let frame_start = Instant::now();
            let dt = frame_start.duration_since(last).as_secs_f64() * config.time_scale;
            last = frame_start;

            if signals.take_resize() {
                match terminal.size() {
                    Ok((columns, rows)) => {
                        debug!(columns, rows, "terminal resized");
                        let (columns, rows) = match game.size() {
                            Some((width, height)) => (columns.min(width), rows.min(height)),
                            None => (columns, rows),
                        };
                        game.resize(columns, rows);
                    }
                    Err(err) => warn!(%err, "unable to query terminal size"),
                }
            }

            if let Some(signal) = signals.try_shutdown() {
                info!(?signal, "signal received, exiting");
                stop.get_or_insert(StopReason::Signal(signal));
            }

            match queue.poll() {
                Polled::Event(event) => match game.handle_input(event) {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Quit) => {
                        info!("quit requested");
                        stop.get_or_insert(StopReason::Quit);
                    }
                    Err(err) => {
                        error!(error = %format!("{err:#}"), "game failed to handle input, exiting");
                        break Err(EngineError::Game(err));
                    }
                },
                Polled::Empty => {}
                Polled::Closed => {
                    error!("input stream closed, exiting");
                    break Err(EngineError::InputClosed);
                }
            }

            match game.update(dt) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => {
                    info!("quit requested");
                    stop.get_or_insert(StopReason::Quit);
                }
                Err(err) => {
                    error!(error = %format!("{err:#}"), "game failed to update, exiting");
                    break Err(EngineError::Game(err));
                }
            }

            game.draw();

            *frames += 1;
            if config.frame_limit.is_some_and(|limit| *frames >= limit) {
                stop.get_or_insert(StopReason::FrameLimit);
            }

            if stop.is_none() {
                if let Some(rest) = budget.checked_sub(frame_start.elapsed()) {
                    thread::sleep(rest);
                }
            }
        };

        *state = LoopState::Stopped;
        running.store(false, Ordering::Release);
        game.cleanup();
        if let Some(pump) = pump {
            pump.stop();
        }
        drop(signals);

        drop(panic_restore);
        let restored = guard.release();
        info!(frames = *frames, "game loop stopped");
        match (outcome, restored) {
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(restore_err)) => {
                warn!(err = %restore_err, "unable to restore terminal after failure");
                Err(err)
            }
            (Ok(_), Err(err)) => {
                error!(%err, "unable to restore terminal");
                Err(EngineError::Restore(err))
            }
            (Ok(reason), Ok(())) => Ok(reason),
        }
    }
}
