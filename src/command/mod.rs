//! Commands and the command namespace.
//!
//! A [`CommandSpec`] describes one invocable command: its name, help text,
//! aliases, arity and [`CommandHandler`]. The [`CommandNamespace`] is the
//! flat table of commands that can currently be resolved from input.

mod handler;
mod namespace;
mod spec;

pub use handler::CommandHandler;
pub use namespace::CommandNamespace;
pub use spec::{Arity, CommandSpec};
