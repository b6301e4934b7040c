//! The core module: essential shell commands.

use super::{Module, CORE_MODULE};
use crate::api::ShellApi;
use crate::command::{Arity, CommandSpec};
use crate::error::ShellError;
use crate::Result;

/// Provides `exit`, `modules`, `enable` and `disable`.
///
/// Registered by every session and cannot be disabled.
#[derive(Debug, Default)]
pub struct CoreModule;

impl CoreModule {
    /// Create the core module.
    pub fn new() -> Self {
        Self
    }
}

impl Module for CoreModule {
    fn name(&self) -> &str {
        CORE_MODULE
    }

    fn commands(&self) -> Vec<CommandSpec> {
        vec![
            CommandSpec::new("exit", exit)
                .short("Exit the shell")
                .arity(Arity::None),
            CommandSpec::new("modules", list_modules)
                .short("List available modules")
                .arity(Arity::None),
            CommandSpec::new("enable", enable)
                .usage("enable [module]")
                .short("Enable a module")
                .arity(Arity::Exact(1)),
            CommandSpec::new("disable", disable)
                .usage("disable [module]")
                .short("Disable a module")
                .arity(Arity::Exact(1)),
        ]
    }
}

fn exit(shell: &mut dyn ShellApi, _args: &[String]) -> Result<()> {
    shell.request_exit(0);
    shell.print("Goodbye!");
    Ok(())
}

fn list_modules(shell: &mut dyn ShellApi, _args: &[String]) -> Result<()> {
    shell.print("Available modules:");
    for name in shell.modules() {
        let status = if shell.is_module_enabled(&name) {
            "enabled"
        } else {
            "disabled"
        };
        shell.print(&format!("  {name:<15} [{status}]"));
    }
    Ok(())
}

fn module_arg<'a>(command: &str, args: &'a [String]) -> Result<&'a str> {
    args.first()
        .map(String::as_str)
        .ok_or_else(|| ShellError::InvalidArguments {
            command: command.to_string(),
            usage: format!("{command} [module]"),
        })
}

// Failures are reported inline so the command itself always succeeds.
fn enable(shell: &mut dyn ShellApi, args: &[String]) -> Result<()> {
    let name = module_arg("enable", args)?;
    match shell.enable_module(name) {
        Ok(()) => shell.print(&format!("Module '{name}' enabled")),
        Err(e) => shell.print(&format!("Error: {e}")),
    }
    Ok(())
}

fn disable(shell: &mut dyn ShellApi, args: &[String]) -> Result<()> {
    let name = module_arg("disable", args)?;
    match shell.disable_module(name) {
        Ok(()) => shell.print(&format!("Module '{name}' disabled")),
        Err(e) => shell.print(&format!("Error: {e}")),
    }
    Ok(())
}
