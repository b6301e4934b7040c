//! Module-grouped help.
//!
//! The namespace is a flat table; this module joins it with the registry to
//! show commands under the module that contributed them. `help` itself is a
//! shell built-in, so it is appended to the core group by hand.

use std::sync::Arc;

use crate::api::ShellApi;
use crate::command::{Arity, CommandSpec};
use crate::module::CORE_MODULE;
use crate::Result;

/// Name of the built-in help command.
pub const HELP_COMMAND: &str = "help";

/// Width of the command-name column in listings.
const NAME_WIDTH: usize = 15;

/// Build the built-in `help` command.
pub fn help_command() -> CommandSpec {
    CommandSpec::new(HELP_COMMAND, run)
        .usage("help [command]")
        .short("Help about any command")
        .long("Help provides help for any command in the shell.\nSimply type help [command] for full details.")
        .arity(Arity::AtMost(1))
}

fn run(shell: &mut dyn ShellApi, args: &[String]) -> Result<()> {
    let text = match args.first() {
        None => render_overview(shell),
        Some(name) => match find_command(shell, name) {
            Some(spec) => render_detail(&spec),
            None => format!("Unknown command: {name}"),
        },
    };
    shell.print(&text);
    Ok(())
}

/// Find a resolvable command whose name or an alias equals `token`.
pub fn find_command(shell: &dyn ShellApi, token: &str) -> Option<Arc<CommandSpec>> {
    shell.commands().into_iter().find(|spec| spec.matches(token))
}

/// Render the grouped listing of every enabled module's commands, followed
/// by the names of disabled modules.
pub fn render_overview(shell: &dyn ShellApi) -> String {
    let mut lines = vec!["Available commands:".to_string()];

    let modules = shell.module_commands();
    for info in modules.iter().filter(|m| m.enabled) {
        // Skip anything removed from the namespace by other means
        let mut commands: Vec<Arc<CommandSpec>> = info
            .commands
            .iter()
            .filter(|spec| {
                shell
                    .resolve(&spec.name)
                    .is_some_and(|current| Arc::ptr_eq(&current, spec))
            })
            .cloned()
            .collect();

        if info.name == CORE_MODULE {
            if let Some(help) = shell.resolve(HELP_COMMAND) {
                commands.push(help);
            }
        }

        if commands.is_empty() {
            continue;
        }

        lines.push(String::new());
        lines.push(format!("[{}]", info.name));
        for spec in &commands {
            lines.push(format!("  {:<NAME_WIDTH$} {}", spec.name, spec.short));
        }
    }

    let disabled: Vec<&str> = modules
        .iter()
        .filter(|m| !m.enabled)
        .map(|m| m.name.as_str())
        .collect();
    if !disabled.is_empty() {
        lines.push(String::new());
        lines.push("Disabled modules:".to_string());
        for name in disabled {
            lines.push(format!("  {name}"));
        }
    }

    lines.join("\n")
}

/// Render the detail view of a single command.
pub fn render_detail(spec: &CommandSpec) -> String {
    let mut lines = vec![
        format!("Command: {}", spec.name),
        format!("Usage: {}", spec.usage),
    ];
    if !spec.short.is_empty() {
        lines.push(String::new());
        lines.push(spec.short.clone());
    }
    if !spec.long.is_empty() {
        lines.push(String::new());
        lines.push(spec.long.clone());
    }
    if !spec.aliases.is_empty() {
        lines.push(String::new());
        lines.push(format!("Aliases: {}", spec.aliases.join(", ")));
    }
    lines.join("\n")
}

/// Render the default usage text shown for `<command> --help`.
pub fn render_usage(shell_name: &str, spec: &CommandSpec) -> String {
    let description = if spec.long.is_empty() {
        &spec.short
    } else {
        &spec.long
    };

    let mut lines = Vec::new();
    if !description.is_empty() {
        lines.push(description.clone());
        lines.push(String::new());
    }
    lines.push("Usage:".to_string());
    lines.push(format!("  {}", spec.usage));
    if !spec.aliases.is_empty() {
        lines.push(String::new());
        lines.push("Aliases:".to_string());
        lines.push(format!("  {}", spec.names().collect::<Vec<_>>().join(", ")));
    }
    lines.push(String::new());
    lines.push(format!("Run 'help {}' in {shell_name} for details.", spec.name));
    lines.join("\n")
}
