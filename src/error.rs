//! Error types for modshell.

use thiserror::Error;

/// Main error type for shell operations.
#[derive(Error, Debug)]
pub enum ShellError {
    /// No module with the given name was registered.
    #[error("module not found: {0}")]
    ModuleNotFound(String),

    /// The module cannot be disabled.
    #[error("cannot disable {0} module")]
    ProtectedModule(String),

    /// A module with the given name is already registered.
    #[error("module already registered: {0}")]
    DuplicateModule(String),

    /// No command with the given name or alias is currently resolvable.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A command name or alias is already claimed by another module.
    #[error("command '{command}' already provided by module '{owner}'")]
    CommandConflict { command: String, owner: String },

    /// The argument count did not match the command's arity.
    #[error("invalid arguments for '{command}', usage: {usage}")]
    InvalidArguments { command: String, usage: String },

    /// A command handler or module hook reported a failure.
    #[error("{0}")]
    CommandFailed(String),

    /// Invalid session state transition attempted.
    #[error("invalid state transition from {from:?} to {to:?}")]
    InvalidStateTransition {
        from: crate::session::SessionState,
        to: crate::session::SessionState,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The other end of a channel (input or alerts) is gone.
    #[error("{0} channel closed")]
    ChannelClosed(&'static str),
}

impl ShellError {
    /// Build a [`ShellError::CommandFailed`] from any displayable message.
    pub fn failed(message: impl std::fmt::Display) -> Self {
        Self::CommandFailed(message.to_string())
    }
}

/// Convenience Result type for shell operations.
pub type Result<T> = std::result::Result<T, ShellError>;
