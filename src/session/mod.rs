//! Session management module.
//!
//! This module provides the [`Session`] that drives the read/execute loop,
//! its lifecycle state, its exit hooks and the alert handle.

mod alert;
mod hooks;
mod shell;
mod state;

pub use alert::AlertHandle;
pub use hooks::{ExitHook, ExitHooks};
pub use shell::{
    tokenize, Session, SessionOptions, DEFAULT_BANNER, DEFAULT_NAME, DEFAULT_PROMPT,
};
pub use state::SessionState;
