//! Engine module - the frame loop and the scene state machine
//!
//! A hosted game implements [`Game`]; [`GameLoop`] drives it at a capped frame
//! rate against a raw-mode terminal, feeding it at most one input event per
//! frame from the input pump and reacting to interrupt, terminate and resize
//! signals. Games that are organised as a set of modes (menu, play, pause,
//! game over) delegate to a [`SceneManager`].
//!
//! # Module Structure
//!
//! - [`config`]: loop settings, from defaults or `GG_*` environment variables
//! - [`context`]: the explicit per-process context (config, palette, logging)
//! - [`error`]: engine error type
//! - [`game`]: the contract a hosted game implements
//! - [`game_loop`]: the loop itself
//! - [`logging`]: file-backed `tracing` setup with size-based rotation
//! - [`scene`]: scene trait, scene manager and the blink helper
//! - [`signals`]: OS signal subscription bridged into pollable channels
//!
//! # Example
//!
//! ```no_run
//! use tui_gg_engine::{Context, Game, GameLoop, LoopConfig};
//! use tui_gg_engine::types::{Flow, InputEvent};
//!
//! struct Idle;
//!
//! impl Game for Idle {
//!     fn update(&mut self, _dt: f64) -> anyhow::Result<Flow> {
//!         Ok(Flow::Continue)
//!     }
//!     fn draw(&mut self) {}
//!     fn handle_input(&mut self, event: InputEvent) -> anyhow::Result<Flow> {
//!         Ok(if event.is_char('q') { Flow::Quit } else { Flow::Continue })
//!     }
//! }
//!
//! let ctx = Context::silent(LoopConfig::default());
//! let reason = GameLoop::new(Idle, &ctx).run()?;
//! println!("stopped: {reason:?}");
//! # Ok::<(), tui_gg_engine::EngineError>(())
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod game;
pub mod game_loop;
pub mod logging;
pub mod scene;
pub mod signals;

pub use tui_gg_input as input;
pub use tui_gg_term as term;
pub use tui_gg_types as types;

pub use config::LoopConfig;
pub use context::Context;
pub use error::EngineError;
pub use game::Game;
pub use game_loop::{GameLoop, LoopState, StopHandle, StopReason};
pub use logging::LogConfig;
pub use scene::{Blink, Scene, SceneError, SceneManager, Transition};
pub use signals::{ShutdownSignal, SignalTrigger, Signals};
