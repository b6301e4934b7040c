//! Command handler trait.

use crate::api::ShellApi;
use crate::Result;

/// Something that can be invoked as a shell command.
///
/// Handlers receive the shell's capability interface and the arguments
/// that followed the command name. Closures with the matching signature
/// implement this trait.
pub trait CommandHandler: Send + Sync {
    /// Run the command.
    fn run(&self, shell: &mut dyn ShellApi, args: &[String]) -> Result<()>;
}

impl<F> CommandHandler for F
where
    F: Fn(&mut dyn ShellApi, &[String]) -> Result<()> + Send + Sync,
{
    fn run(&self, shell: &mut dyn ShellApi, args: &[String]) -> Result<()> {
        self(shell, args)
    }
}
