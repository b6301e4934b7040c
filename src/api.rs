//! Capability interface handed to modules and command handlers.
//!
//! Module code only ever sees `&mut dyn ShellApi`, never the concrete
//! [`Session`](crate::Session), so modules stay decoupled from the shell's
//! internals.

use std::sync::Arc;

use crate::command::CommandSpec;
use crate::module::ModuleInfo;
use crate::session::AlertHandle;
use crate::state::{StateStore, StateValue};
use crate::Result;

/// Operations a module may perform on the running shell.
pub trait ShellApi {
    /// Enable a registered module, adding its commands back to the shell.
    fn enable_module(&mut self, name: &str) -> Result<()>;

    /// Disable a module, removing its commands from the shell.
    fn disable_module(&mut self, name: &str) -> Result<()>;

    /// Check whether a module is enabled. Unknown modules are not.
    fn is_module_enabled(&self, name: &str) -> bool;

    /// Names of all registered modules, in registration order.
    fn modules(&self) -> Vec<String>;

    /// Names of enabled modules, in registration order.
    fn enabled_modules(&self) -> Vec<String>;

    /// Every registered module with the commands it contributes.
    fn module_commands(&self) -> Vec<ModuleInfo>;

    /// Commands that can currently be invoked, sorted by name.
    fn commands(&self) -> Vec<Arc<CommandSpec>>;

    /// Resolve a command by name or alias.
    fn resolve(&self, token: &str) -> Option<Arc<CommandSpec>>;

    /// The shell's name.
    fn shell_name(&self) -> &str;

    /// Handle to the shared state store.
    ///
    /// The handle may be moved to background threads.
    fn state(&self) -> Arc<StateStore>;

    /// Store an untyped value in shared state.
    fn set_state(&self, key: &str, value: StateValue) {
        self.state().set_value(key, value);
    }

    /// Read an untyped value from shared state.
    fn get_state(&self, key: &str) -> Option<StateValue> {
        self.state().get_value(key)
    }

    /// Replace the prompt. A trailing space is added when displayed.
    fn set_prompt(&mut self, prompt: &str);

    /// The current prompt without surrounding whitespace.
    fn prompt(&self) -> String;

    /// Print a line to the user immediately, outside normal command output.
    fn print_alert(&mut self, message: &str);

    /// Sender for alerts from background tasks and threads.
    ///
    /// Alerts are printed while the shell waits for input, and the prompt
    /// is shown again afterwards.
    fn alerter(&self) -> AlertHandle;

    /// Print a line of command output.
    fn print(&mut self, text: &str);

    /// Ask the shell to terminate with `code` once the current command
    /// returns. Exit hooks run before this call returns.
    fn request_exit(&mut self, code: i32);
}
