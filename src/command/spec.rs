//! Command descriptors.

use std::fmt;
use std::sync::Arc;

use super::CommandHandler;
use crate::api::ShellApi;
use crate::error::ShellError;
use crate::Result;

/// Number of positional arguments a command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Arity {
    /// Any number of arguments.
    #[default]
    Any,
    /// No arguments.
    None,
    /// Exactly `n` arguments.
    Exact(usize),
    /// At least `n` arguments.
    AtLeast(usize),
    /// At most `n` arguments.
    AtMost(usize),
    /// Between `min` and `max` arguments, inclusive.
    Range(usize, usize),
}

impl Arity {
    /// Check whether `count` arguments satisfy this arity.
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Any => true,
            Arity::None => count == 0,
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
            Arity::AtMost(n) => count <= n,
            Arity::Range(min, max) => (min..=max).contains(&count),
        }
    }
}

/// A named, invocable shell command.
///
/// Built with a fluent API:
///
/// ```
/// use modshell::{Arity, CommandSpec};
///
/// let greet = CommandSpec::new("greet", |shell, args| {
///     shell.print(&format!("hello, {}", args[0]));
///     Ok(())
/// })
/// .usage("greet [name]")
/// .short("Say hello")
/// .alias("hi")
/// .arity(Arity::Exact(1));
///
/// assert!(greet.matches("hi"));
/// ```
#[derive(Clone)]
pub struct CommandSpec {
    /// The name the command is invoked by.
    pub name: String,
    /// One-line usage, e.g. `enable [module]`.
    pub usage: String,
    /// Short description shown in listings.
    pub short: String,
    /// Long description shown in the detail view.
    pub long: String,
    /// Alternative names.
    pub aliases: Vec<String>,
    /// Accepted argument count.
    pub arity: Arity,
    handler: Arc<dyn CommandHandler>,
}

impl CommandSpec {
    /// Create a command from a closure.
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut dyn ShellApi, &[String]) -> Result<()> + Send + Sync + 'static,
    {
        Self::with_handler(name, Arc::new(handler))
    }

    /// Create a command from a shared handler.
    pub fn with_handler(name: impl Into<String>, handler: Arc<dyn CommandHandler>) -> Self {
        let name = name.into();
        Self {
            usage: name.clone(),
            name,
            short: String::new(),
            long: String::new(),
            aliases: Vec::new(),
            arity: Arity::Any,
            handler,
        }
    }

    /// Set the usage line.
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    /// Set the short description.
    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.short = short.into();
        self
    }

    /// Set the long description.
    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long = long.into();
        self
    }

    /// Add an alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Add multiple aliases.
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Set the accepted argument count.
    pub fn arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    /// Get the command's handler.
    pub fn handler(&self) -> Arc<dyn CommandHandler> {
        Arc::clone(&self.handler)
    }

    /// Iterate over the name followed by all aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Check whether `token` is this command's name or one of its aliases.
    pub fn matches(&self, token: &str) -> bool {
        self.names().any(|name| name == token)
    }

    /// Validate the argument count against the command's arity.
    pub fn check_args(&self, args: &[String]) -> Result<()> {
        if self.arity.accepts(args.len()) {
            Ok(())
        } else {
            Err(ShellError::InvalidArguments {
                command: self.name.clone(),
                usage: self.usage.clone(),
            })
        }
    }

    /// Validate arguments and run the handler.
    pub fn invoke(&self, shell: &mut dyn ShellApi, args: &[String]) -> Result<()> {
        self.check_args(args)?;
        self.handler.run(shell, args)
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("short", &self.short)
            .field("aliases", &self.aliases)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}
