//! # modshell
//!
//! Interactive command shell assembled from pluggable modules.
//!
//! A host program creates a [`Session`], registers [`Module`]s and runs the
//! read/execute loop. Each module contributes a set of commands; modules can
//! be enabled and disabled at runtime, and only the commands of enabled
//! modules are resolvable. Modules share data through a thread-safe
//! [`StateStore`] and talk to the shell through the [`ShellApi`] capability.
//!
//! ## Features
//!
//! - **Module registry**: register, enable and disable command groups at runtime
//! - **Shared state**: typed, lock-guarded key/value store for module data
//! - **Grouped help**: `help` lists commands per enabled module
//! - **Exit hooks**: cleanup callbacks run once before termination
//! - **History and completion**: persisted command history, Tab completion
//!   and Up/Down recall in the terminal line editor
//! - **Alerts**: background tasks notify the user through an [`AlertHandle`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use modshell::{CommandSpec, LineReader, Module, Session, SessionOptions, StdioFrontend};
//!
//! struct Greeter;
//!
//! impl Module for Greeter {
//!     fn name(&self) -> &str {
//!         "greeter"
//!     }
//!
//!     fn commands(&self) -> Vec<CommandSpec> {
//!         vec![CommandSpec::new("hello", |shell, _args| {
//!             shell.print("Hello!");
//!             Ok(())
//!         })
//!         .short("Say hello")]
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> modshell::Result<()> {
//!     modshell::logging::try_init().ok();
//!
//!     let frontend = StdioFrontend::new();
//!     let mut input = LineReader::terminal(frontend.editor());
//!     let mut session = Session::new(SessionOptions::default(), frontend)?;
//!     session.register_module(Greeter)?;
//!
//!     let code = session.run(&mut input).await?;
//!     std::process::exit(code);
//! }
//! ```

pub mod api;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod frontend;
pub mod help;
pub mod logging;
pub mod module;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use api::ShellApi;
pub use command::{Arity, CommandHandler, CommandNamespace, CommandSpec};
pub use config::Config;
pub use error::{Result, ShellError};
pub use frontend::{
    CaptureFrontend, Completion, EditorHandle, Frontend, History, InputSanitizer, LineBuffer,
    LineEditor, LineFeed, LineReader, PrefixCompleter, ReadOutcome, StdioFrontend,
};
pub use module::{CoreModule, Module, ModuleInfo, ModuleRegistry, CORE_MODULE};
pub use session::{AlertHandle, Session, SessionOptions, SessionState};
pub use state::{StateKey, StateStore, StateValue};
