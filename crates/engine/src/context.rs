//! The explicit process context.
//!
//! Built once at startup and passed by reference to the loop and the game,
//! instead of reaching for global logger or config singletons. Tests build
//! their own isolated instances.

use std::io;
use std::sync::Arc;

use tracing::Dispatch;

use crate::config::LoopConfig;
use crate::logging::{self, LogConfig};
use crate::term::{Palette, RenderError, Renderer};

#[derive(Debug, Clone)]
pub struct Context {
    pub config: LoopConfig,
    palette: Arc<Palette>,
    dispatch: Dispatch,
}

impl Context {
    pub fn new(config: LoopConfig, dispatch: Dispatch) -> Self {
        Self {
            config,
            palette: Arc::new(Palette::ansi16()),
            dispatch,
        }
    }

    /// A context that discards all log records.
    pub fn silent(config: LoopConfig) -> Self {
        Self::new(config, Dispatch::none())
    }

    /// Loop and logging settings from `GG_*` variables, logging to a file.
    pub fn from_env() -> io::Result<Self> {
        let dispatch = logging::dispatch(&LogConfig::from_env())?;
        Ok(Self::new(LoopConfig::from_env(), dispatch))
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = Arc::new(palette);
        self
    }

    /// The process-wide palette, shared by every renderer.
    pub fn palette(&self) -> Arc<Palette> {
        Arc::clone(&self.palette)
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run `f` with this context's logger as the current one.
    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// A renderer sized from the config, sharing this context's palette.
    pub fn renderer(&self) -> Result<Renderer, RenderError> {
        Renderer::new(self.config.width, self.config.height, self.palette())
    }
}
