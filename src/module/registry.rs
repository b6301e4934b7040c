//! Module registration and enablement.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use super::Module;
use crate::command::{CommandNamespace, CommandSpec};
use crate::error::ShellError;
use crate::Result;

/// Name of the module carrying the essential shell commands.
///
/// It is always enabled and cannot be disabled.
pub const CORE_MODULE: &str = "core";

/// Read-only view of a registered module.
#[derive(Debug, Clone)]
pub struct ModuleInfo {
    /// Module name.
    pub name: String,
    /// Whether the module's commands are currently in the namespace.
    pub enabled: bool,
    /// Commands the module contributed, in the order it declared them.
    pub commands: Vec<Arc<CommandSpec>>,
}

struct ModuleEntry {
    name: String,
    module: Arc<dyn Module>,
    commands: Vec<Arc<CommandSpec>>,
    enabled: bool,
}

/// Tracks registered modules and owns the command namespace.
///
/// The namespace always holds exactly the built-in commands plus the
/// commands of every enabled module. Command names and aliases are unique
/// across all registered modules, enabled or not, so enabling a module can
/// never shadow another module's command.
#[derive(Default)]
pub struct ModuleRegistry {
    entries: Vec<ModuleEntry>,
    builtins: Vec<Arc<CommandSpec>>,
    namespace: CommandNamespace,
}

impl ModuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module and add its commands to the namespace.
    ///
    /// The module starts enabled. Its initialization hook is not called
    /// here; the session does that once the commands are resolvable.
    pub fn register(&mut self, module: Arc<dyn Module>) -> Result<()> {
        let name = module.name().to_string();
        if self.find(&name).is_some() {
            return Err(ShellError::DuplicateModule(name));
        }

        let commands: Vec<Arc<CommandSpec>> =
            module.commands().into_iter().map(Arc::new).collect();
        self.check_conflicts(&name, &commands)?;

        for command in &commands {
            self.namespace.add(Arc::clone(command));
        }
        debug!(module = %name, commands = commands.len(), "module registered");

        self.entries.push(ModuleEntry {
            name,
            module,
            commands,
            enabled: true,
        });
        Ok(())
    }

    /// Add a command that belongs to the shell itself rather than a module.
    ///
    /// Built-ins are always resolvable.
    pub fn add_builtin(&mut self, spec: CommandSpec) -> Result<Arc<CommandSpec>> {
        let spec = Arc::new(spec);
        self.check_conflicts(CORE_MODULE, std::slice::from_ref(&spec))?;
        self.namespace.add(Arc::clone(&spec));
        self.builtins.push(Arc::clone(&spec));
        Ok(spec)
    }

    /// Remove a module and its commands entirely.
    pub(crate) fn unregister(&mut self, name: &str) -> Option<Arc<dyn Module>> {
        let index = self.entries.iter().position(|e| e.name == name)?;
        let entry = self.entries.remove(index);
        for command in &entry.commands {
            self.namespace.remove(command);
        }
        debug!(module = %name, "module unregistered");
        Some(entry.module)
    }

    /// Enable a module, adding its commands back to the namespace.
    ///
    /// Enabling an enabled module is a no-op.
    pub fn enable(&mut self, name: &str) -> Result<()> {
        let entry = self
            .find_mut(name)
            .ok_or_else(|| ShellError::ModuleNotFound(name.to_string()))?;
        if entry.enabled {
            return Ok(());
        }

        entry.enabled = true;
        let commands = entry.commands.clone();
        for command in commands {
            self.namespace.add(command);
        }
        debug!(module = %name, "module enabled");
        Ok(())
    }

    /// Disable a module, removing its commands from the namespace.
    ///
    /// Disabling a disabled module is a no-op. The core module is protected.
    pub fn disable(&mut self, name: &str) -> Result<()> {
        if name == CORE_MODULE {
            return Err(ShellError::ProtectedModule(name.to_string()));
        }
        let entry = self
            .find_mut(name)
            .ok_or_else(|| ShellError::ModuleNotFound(name.to_string()))?;
        if !entry.enabled {
            return Ok(());
        }

        entry.enabled = false;
        let commands = entry.commands.clone();
        for command in &commands {
            self.namespace.remove(command);
        }
        debug!(module = %name, "module disabled");
        Ok(())
    }

    /// Check whether a module is enabled. Unknown modules are not.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.find(name).is_some_and(|e| e.enabled)
    }

    /// Check whether a module is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Names of all modules, in registration order.
    pub fn list(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    /// Names of enabled modules, in registration order.
    pub fn list_enabled(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.enabled)
            .map(|e| e.name.clone())
            .collect()
    }

    /// Get a registered module by name.
    pub fn module(&self, name: &str) -> Option<Arc<dyn Module>> {
        self.find(name).map(|e| Arc::clone(&e.module))
    }

    /// Commands a module contributed, whether or not it is enabled.
    pub fn commands_of(&self, name: &str) -> Option<&[Arc<CommandSpec>]> {
        self.find(name).map(|e| e.commands.as_slice())
    }

    /// Snapshot of every module, in registration order.
    pub fn module_info(&self) -> Vec<ModuleInfo> {
        self.entries
            .iter()
            .map(|e| ModuleInfo {
                name: e.name.clone(),
                enabled: e.enabled,
                commands: e.commands.clone(),
            })
            .collect()
    }

    /// Built-in commands.
    pub fn builtins(&self) -> &[Arc<CommandSpec>] {
        &self.builtins
    }

    /// The command namespace.
    pub fn namespace(&self) -> &CommandNamespace {
        &self.namespace
    }

    /// Number of registered modules.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether no modules are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find(&self, name: &str) -> Option<&ModuleEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut ModuleEntry> {
        self.entries.iter_mut().find(|e| e.name == name)
    }

    /// Owner of a command name or alias, if any.
    fn claimed_by(&self, token: &str) -> Option<&str> {
        if self.builtins.iter().any(|b| b.matches(token)) {
            return Some(CORE_MODULE);
        }
        self.entries
            .iter()
            .find(|e| e.commands.iter().any(|c| c.matches(token)))
            .map(|e| e.name.as_str())
    }

    fn check_conflicts(&self, owner: &str, commands: &[Arc<CommandSpec>]) -> Result<()> {
        let mut seen = HashSet::new();
        for command in commands {
            for token in command.names() {
                if let Some(existing) = self.claimed_by(token) {
                    return Err(ShellError::CommandConflict {
                        command: token.to_string(),
                        owner: existing.to_string(),
                    });
                }
                if !seen.insert(token) {
                    return Err(ShellError::CommandConflict {
                        command: token.to_string(),
                        owner: owner.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.list())
            .field("enabled", &self.list_enabled())
            .field("namespace", &self.namespace.names())
            .finish()
    }
}
