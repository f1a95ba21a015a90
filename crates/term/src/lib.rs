//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal gameplay. Games draw
//! into a character-cell framebuffer every frame and flush it to the terminal
//! as a single batched write of VT100 escape sequences.
//!
//! Goals:
//! - Keep drawing pure and testable (no I/O until [`Renderer::render`])
//! - Emit as few bytes and syscalls per frame as possible
//! - Always give the terminal back in the state we found it

pub mod fb;
pub mod palette;
pub mod renderer;
pub mod terminal;

pub use tui_gg_types as types;

pub use fb::{Cell, FrameBuffer};
pub use palette::{Palette, PaletteEntry};
pub use renderer::{encode_frame_into, show_cursor, RenderError, Renderer};
pub use terminal::{CrosstermTerminal, PanicRestore, RawModeGuard, Restorer, TerminalMode};
