//! tui-gg (workspace facade crate).
//!
//! Re-exports the engine crates under one name so games can depend on a
//! single package: `tui_gg::{types, term, input, engine}`. The implementation
//! lives in dedicated crates under `crates/`.

pub use tui_gg_engine as engine;
pub use tui_gg_input as input;
pub use tui_gg_term as term;
pub use tui_gg_types as types;
