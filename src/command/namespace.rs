//! The flat table of currently resolvable commands.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::CommandSpec;

/// Maps command names and aliases to their descriptors.
///
/// Mutated only by the module registry, which keeps it equal to the union
/// of the commands of all enabled modules plus the shell's built-ins.
#[derive(Debug, Default)]
pub struct CommandNamespace {
    commands: BTreeMap<String, Arc<CommandSpec>>,
    aliases: HashMap<String, String>,
}

impl CommandNamespace {
    /// Create an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command, replacing any command with the same name.
    pub(crate) fn add(&mut self, spec: Arc<CommandSpec>) {
        if let Some(previous) = self.commands.remove(&spec.name) {
            self.drop_aliases(&previous);
        }
        for alias in &spec.aliases {
            self.aliases.insert(alias.clone(), spec.name.clone());
        }
        self.commands.insert(spec.name.clone(), spec);
    }

    /// Remove a command. Removing a command that is not present is a no-op.
    pub(crate) fn remove(&mut self, spec: &Arc<CommandSpec>) {
        let present = self
            .commands
            .get(&spec.name)
            .is_some_and(|current| Arc::ptr_eq(current, spec));
        if present {
            self.commands.remove(&spec.name);
            self.drop_aliases(spec);
        }
    }

    fn drop_aliases(&mut self, spec: &CommandSpec) {
        for alias in &spec.aliases {
            if self.aliases.get(alias) == Some(&spec.name) {
                self.aliases.remove(alias);
            }
        }
    }

    /// Look up a command by name, then by alias.
    pub fn resolve(&self, token: &str) -> Option<Arc<CommandSpec>> {
        self.commands
            .get(token)
            .or_else(|| {
                self.aliases
                    .get(token)
                    .and_then(|name| self.commands.get(name))
            })
            .cloned()
    }

    /// Check whether a command with exactly this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Check whether this exact descriptor is present.
    pub fn contains_spec(&self, spec: &Arc<CommandSpec>) -> bool {
        self.commands
            .get(&spec.name)
            .is_some_and(|current| Arc::ptr_eq(current, spec))
    }

    /// Command names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.commands.keys().cloned().collect()
    }

    /// Command names and aliases, sorted.
    pub fn tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self
            .commands
            .keys()
            .chain(self.aliases.keys())
            .cloned()
            .collect();
        tokens.sort();
        tokens
    }

    /// All commands, sorted by name.
    pub fn commands(&self) -> Vec<Arc<CommandSpec>> {
        self.commands.values().cloned().collect()
    }

    /// Number of commands (aliases not counted).
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check whether the namespace is empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str) -> Arc<CommandSpec> {
        Arc::new(CommandSpec::new(name, |_, _| Ok(())))
    }

    #[test]
    fn test_add_and_resolve() {
        let mut ns = CommandNamespace::new();
        let time = Arc::new(CommandSpec::new("time", |_, _| Ok(())).alias("t"));
        ns.add(Arc::clone(&time));

        assert!(ns.contains("time"));
        assert!(Arc::ptr_eq(&ns.resolve("time").unwrap(), &time));
        assert!(Arc::ptr_eq(&ns.resolve("t").unwrap(), &time));
        assert!(ns.resolve("tim").is_none());
        assert_eq!(ns.len(), 1);
    }

    #[test]
    fn test_tokens_include_aliases() {
        let mut ns = CommandNamespace::new();
        ns.add(Arc::new(CommandSpec::new("echo", |_, _| Ok(())).alias("say")));
        ns.add(spec("exit"));

        assert_eq!(ns.names(), vec!["echo", "exit"]);
        assert_eq!(ns.tokens(), vec!["echo", "exit", "say"]);
    }

    #[test]
    fn test_add_overwrites() {
        let mut ns = CommandNamespace::new();
        let first = Arc::new(CommandSpec::new("reset", |_, _| Ok(())).alias("r"));
        let second = spec("reset");
        ns.add(first);
        ns.add(Arc::clone(&second));

        assert_eq!(ns.len(), 1);
        assert!(Arc::ptr_eq(&ns.resolve("reset").unwrap(), &second));
        // The replaced command's alias no longer resolves
        assert!(ns.resolve("r").is_none());
    }

    #[test]
    fn test_remove() {
        let mut ns = CommandNamespace::new();
        let quit = Arc::new(CommandSpec::new("quit", |_, _| Ok(())).alias("q"));
        ns.add(Arc::clone(&quit));
        ns.remove(&quit);

        assert!(ns.is_empty());
        assert!(ns.resolve("q").is_none());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut ns = CommandNamespace::new();
        let kept = spec("kept");
        ns.add(Arc::clone(&kept));

        ns.remove(&spec("missing"));
        // Same name, different descriptor
        ns.remove(&spec("kept"));

        assert!(ns.contains_spec(&kept));
        assert_eq!(ns.len(), 1);
    }

    #[test]
    fn test_names_sorted() {
        let mut ns = CommandNamespace::new();
        for name in ["modules", "exit", "help", "disable"] {
            ns.add(spec(name));
        }
        assert_eq!(ns.names(), vec!["disable", "exit", "help", "modules"]);
        assert_eq!(
            ns.commands().iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["disable", "exit", "help", "modules"]
        );
    }
}
