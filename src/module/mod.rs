//! Command modules and the module registry.
//!
//! A [`Module`] is a named bundle of commands with an initialization hook.
//! The [`ModuleRegistry`] tracks which modules are registered and enabled
//! and keeps the command namespace in sync with that state.

mod builtin;
mod registry;

pub use builtin::CoreModule;
pub use registry::{ModuleInfo, ModuleRegistry, CORE_MODULE};

use crate::api::ShellApi;
use crate::command::CommandSpec;
use crate::Result;

/// A named unit of shell functionality.
pub trait Module: Send + Sync {
    /// Unique module name.
    fn name(&self) -> &str;

    /// Commands this module contributes, in display order.
    ///
    /// Called once, at registration.
    fn commands(&self) -> Vec<CommandSpec>;

    /// Called once after the module's commands have been added to the shell.
    fn initialize(&self, shell: &mut dyn ShellApi) -> Result<()> {
        let _ = shell;
        Ok(())
    }
}
