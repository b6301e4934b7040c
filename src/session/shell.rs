//! The interactive session: registry, state, UI and the read/execute loop.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{AlertHandle, ExitHooks, SessionState};
use crate::api::ShellApi;
use crate::command::CommandSpec;
use crate::error::ShellError;
use crate::frontend::{Frontend, InputSanitizer, LineReader, PrefixCompleter, ReadOutcome};
use crate::help;
use crate::module::{CoreModule, Module, ModuleInfo, ModuleRegistry};
use crate::state::StateStore;
use crate::Result;

/// Shell name used when none is configured.
pub const DEFAULT_NAME: &str = "shell";

/// Prompt used when none is configured.
pub const DEFAULT_PROMPT: &str = ">";

/// Banner printed when no banner is configured.
pub const DEFAULT_BANNER: &str = "Interactive shell started. Type 'help' for available commands.";

/// Options for creating a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Shell name, shown in default help output.
    pub name: String,
    /// Initial prompt, without the trailing space.
    pub prompt: String,
    /// Banner printed when the loop starts.
    pub banner: Option<String>,
    /// Where to persist command history.
    pub history_file: Option<PathBuf>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            banner: None,
            history_file: None,
        }
    }
}

/// Split a command line into tokens on whitespace.
///
/// There is no quoting or escaping.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// A running shell.
///
/// Owns the module registry (and through it the command namespace), the
/// shared state store, the exit hooks and the front end. Module code sees
/// it only through [`ShellApi`].
pub struct Session {
    name: String,
    banner: Option<String>,
    prompt: String,
    registry: ModuleRegistry,
    state: Arc<StateStore>,
    exit_hooks: ExitHooks,
    frontend: Box<dyn Frontend>,
    completer: PrefixCompleter,
    alerts: AlertHandle,
    alert_rx: mpsc::UnboundedReceiver<String>,
    status: SessionState,
    exit_code: Option<i32>,
}

impl Session {
    /// Create a session with the core module and `help` registered.
    pub fn new<F>(options: SessionOptions, frontend: F) -> Result<Self>
    where
        F: Frontend + 'static,
    {
        let name = if options.name.trim().is_empty() {
            DEFAULT_NAME.to_string()
        } else {
            options.name
        };

        let (alert_tx, alert_rx) = mpsc::unbounded_channel();
        let mut session = Self {
            name,
            banner: options.banner,
            prompt: String::new(),
            registry: ModuleRegistry::new(),
            state: Arc::new(StateStore::new()),
            exit_hooks: ExitHooks::new(),
            frontend: Box::new(frontend),
            completer: PrefixCompleter::default(),
            alerts: AlertHandle::new(alert_tx),
            alert_rx,
            status: SessionState::Idle,
            exit_code: None,
        };

        session.set_prompt(&options.prompt);
        session.registry.add_builtin(help::help_command())?;
        session.register_module(CoreModule::new())?;

        if let Some(path) = options.history_file {
            session.set_history_file(path)?;
        }

        Ok(session)
    }

    /// Register a module.
    ///
    /// The module's commands become resolvable before its initialization
    /// hook runs. If the hook fails, the module is removed again and the
    /// error returned.
    pub fn register_module<M>(&mut self, module: M) -> Result<()>
    where
        M: Module + 'static,
    {
        self.register_shared(Arc::new(module))
    }

    /// Register a module that is shared with other owners.
    pub fn register_shared(&mut self, module: Arc<dyn Module>) -> Result<()> {
        let name = module.name().to_string();
        self.registry.register(Arc::clone(&module))?;
        self.refresh_completions();

        if let Err(e) = module.initialize(self) {
            warn!(module = %name, "module initialization failed: {}", e);
            self.registry.unregister(&name);
            self.refresh_completions();
            return Err(e);
        }

        info!(module = %name, "module registered");
        Ok(())
    }

    /// Register a hook to run once before the shell terminates.
    ///
    /// Hooks run in registration order when `exit` is executed, or when
    /// the loop ends on end of input. A failing hook is logged and does
    /// not prevent the others from running or the shell from exiting.
    pub fn on_exit<F>(&mut self, hook: F)
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        self.exit_hooks.push(Box::new(hook));
    }

    /// Change where command history is persisted.
    pub fn set_history_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.frontend.set_history_path(path)?;
        debug!(path = %path.display(), "history file set");
        Ok(())
    }

    /// Command names and aliases starting with `prefix`.
    pub fn complete(&self, prefix: &str) -> Vec<String> {
        self.completer.complete(prefix)
    }

    /// The module registry.
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// The shell's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The configured banner, if any.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Current state of the read/execute loop.
    pub fn status(&self) -> SessionState {
        self.status
    }

    /// Exit code requested by `exit`, if it has run.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Execute one command line.
    ///
    /// Blank lines do nothing. `<command> --help` (or `-h`) prints the
    /// command's usage instead of running it.
    pub fn execute(&mut self, line: &str) -> Result<()> {
        let tokens = tokenize(line);
        let Some((name, args)) = tokens.split_first() else {
            return Ok(());
        };

        let spec = self
            .registry
            .namespace()
            .resolve(name)
            .ok_or_else(|| ShellError::UnknownCommand(name.clone()))?;

        if args.iter().any(|arg| arg == "--help" || arg == "-h") {
            let usage = help::render_usage(&self.name, &spec);
            self.emit(&usage);
            return Ok(());
        }

        debug!(command = %spec.name, ?args, "executing");
        spec.invoke(self, args)
    }

    /// Run the read/execute loop until `exit`, end of input or Ctrl-C.
    ///
    /// Command errors are printed and never end the loop. Returns the exit
    /// code: the one passed to `exit`, or 0 when input ended.
    pub async fn run(&mut self, input: &mut LineReader) -> Result<i32> {
        if self.status.is_terminal() {
            return Err(ShellError::InvalidStateTransition {
                from: self.status,
                to: SessionState::Reading,
            });
        }

        let banner = self.banner.as_deref().unwrap_or(DEFAULT_BANNER).to_string();
        self.emit(&banner);
        info!(shell = %self.name, "session started");

        while self.exit_code.is_none() {
            self.status.transition_to(SessionState::Reading)?;
            self.flush_alerts();
            if let Err(e) = self.frontend.show_prompt(&self.prompt) {
                warn!("failed to show prompt: {}", e);
            }

            let raw = match self.read_input(input).await {
                ReadOutcome::Line(line) => line,
                ReadOutcome::Eof => {
                    debug!("end of input");
                    break;
                }
                ReadOutcome::Interrupted => {
                    debug!("interrupted");
                    break;
                }
            };

            let cleaned = InputSanitizer::clean_str(&raw);
            let line = cleaned.trim();
            if line.is_empty() {
                self.status.transition_to(SessionState::Idle)?;
                continue;
            }

            if let Err(e) = self.frontend.record_history(line) {
                warn!("failed to record history: {}", e);
            }

            self.status.transition_to(SessionState::Executing)?;
            if let Err(e) = self.execute(line) {
                self.emit(&format!("Error: {e}"));
            }

            if self.exit_code.is_none() {
                self.status.transition_to(SessionState::Idle)?;
            }
        }

        // Covers end of input; after `exit` the hooks have already run
        self.exit_hooks.run_all();
        self.status.transition_to(SessionState::Terminated)?;

        let code = self.exit_code.unwrap_or(0);
        info!(shell = %self.name, code, "session terminated");
        Ok(code)
    }

    /// Wait for the next input line, printing alerts as they arrive.
    async fn read_input(&mut self, input: &mut LineReader) -> ReadOutcome {
        enum Wake {
            Alert(String),
            Input(ReadOutcome),
        }

        loop {
            let wake = tokio::select! {
                biased;
                Some(text) = self.alert_rx.recv() => Wake::Alert(text),
                outcome = input.next_line() => Wake::Input(outcome),
            };

            match wake {
                Wake::Alert(text) => {
                    if let Err(e) = self.frontend.alert_while_reading(&text, &self.prompt) {
                        warn!("failed to write alert: {}", e);
                    }
                }
                Wake::Input(outcome) => return outcome,
            }
        }
    }

    /// Print alerts queued while a command was running.
    fn flush_alerts(&mut self) {
        while let Ok(text) = self.alert_rx.try_recv() {
            self.print_alert(&text);
        }
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.frontend.write_line(text) {
            warn!("failed to write output: {}", e);
        }
    }

    fn refresh_completions(&mut self) {
        self.completer = PrefixCompleter::new(self.registry.namespace().tokens());
        self.frontend.set_completions(&self.completer);
    }
}

impl ShellApi for Session {
    fn enable_module(&mut self, name: &str) -> Result<()> {
        self.registry.enable(name)?;
        self.refresh_completions();
        Ok(())
    }

    fn disable_module(&mut self, name: &str) -> Result<()> {
        self.registry.disable(name)?;
        self.refresh_completions();
        Ok(())
    }

    fn is_module_enabled(&self, name: &str) -> bool {
        self.registry.is_enabled(name)
    }

    fn modules(&self) -> Vec<String> {
        self.registry.list()
    }

    fn enabled_modules(&self) -> Vec<String> {
        self.registry.list_enabled()
    }

    fn module_commands(&self) -> Vec<ModuleInfo> {
        self.registry.module_info()
    }

    fn commands(&self) -> Vec<Arc<CommandSpec>> {
        self.registry.namespace().commands()
    }

    fn resolve(&self, token: &str) -> Option<Arc<CommandSpec>> {
        self.registry.namespace().resolve(token)
    }

    fn shell_name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> Arc<StateStore> {
        Arc::clone(&self.state)
    }

    fn set_prompt(&mut self, prompt: &str) {
        self.prompt = format!("{prompt} ");
    }

    fn prompt(&self) -> String {
        self.prompt.trim().to_string()
    }

    fn print_alert(&mut self, message: &str) {
        if let Err(e) = self.frontend.alert(message) {
            warn!("failed to write alert: {}", e);
        }
    }

    fn alerter(&self) -> AlertHandle {
        self.alerts.clone()
    }

    fn print(&mut self, text: &str) {
        self.emit(text);
    }

    fn request_exit(&mut self, code: i32) {
        if self.exit_code.is_some() {
            return;
        }
        self.exit_code = Some(code);
        self.exit_hooks.run_all();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("name", &self.name)
            .field("prompt", &self.prompt)
            .field("status", &self.status)
            .field("registry", &self.registry)
            .field("state", &self.state)
            .field("exit_hooks", &self.exit_hooks)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Arity;
    use crate::frontend::CaptureFrontend;

    struct EchoModule;

    impl Module for EchoModule {
        fn name(&self) -> &str {
            "echo"
        }

        fn commands(&self) -> Vec<CommandSpec> {
            vec![CommandSpec::new("echo", |shell, args| {
                shell.print(&args.join(" "));
                Ok(())
            })
            .alias("say")
            .short("Print the arguments")]
        }
    }

    struct FailingInit;

    impl Module for FailingInit {
        fn name(&self) -> &str {
            "broken"
        }

        fn commands(&self) -> Vec<CommandSpec> {
            vec![CommandSpec::new("broken", |_, _| Ok(()))]
        }

        fn initialize(&self, shell: &mut dyn ShellApi) -> Result<()> {
            // The command is already resolvable while initializing
            assert!(shell.resolve("broken").is_some());
            Err(ShellError::failed("no backend"))
        }
    }

    fn session() -> (Session, CaptureFrontend) {
        let capture = CaptureFrontend::new();
        let session = Session::new(SessionOptions::default(), capture.clone()).unwrap();
        (session, capture)
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("  enable   timer "), vec!["enable", "timer"]);
        assert_eq!(tokenize("a\tb"), vec!["a", "b"]);
        assert!(tokenize("   ").is_empty());
        // No quoting support
        assert_eq!(tokenize("say \"a b\""), vec!["say", "\"a", "b\""]);
    }

    #[test]
    fn test_new_session_defaults() {
        let (session, _) = session();
        assert_eq!(session.name(), "shell");
        assert_eq!(session.prompt(), ">");
        assert_eq!(session.modules(), vec!["core"]);
        assert_eq!(session.status(), SessionState::Idle);
        assert!(session.resolve("help").is_some());
        assert!(session.resolve("exit").is_some());
    }

    #[test]
    fn test_blank_name_falls_back() {
        let options = SessionOptions {
            name: "  ".into(),
            ..SessionOptions::default()
        };
        let session = Session::new(options, CaptureFrontend::new()).unwrap();
        assert_eq!(session.name(), DEFAULT_NAME);
    }

    #[test]
    fn test_prompt_gets_trailing_space() {
        let (mut session, capture) = session();
        session.set_prompt("(12s)");
        assert_eq!(session.prompt(), "(12s)");
        assert_eq!(session.prompt, "(12s) ");

        let mut input = LineReader::from_lines(Vec::<String>::new());
        tokio_test::block_on(session.run(&mut input)).unwrap();
        assert_eq!(capture.prompts(), vec!["(12s) "]);
    }

    #[test]
    fn test_execute_resolves_alias() {
        let (mut session, capture) = session();
        session.register_module(EchoModule).unwrap();

        session.execute("say hello world").unwrap();
        assert_eq!(capture.lines(), vec!["hello world"]);
    }

    #[test]
    fn test_execute_unknown_command() {
        let (mut session, _) = session();
        let err = session.execute("frobnicate now").unwrap_err();
        assert!(matches!(err, ShellError::UnknownCommand(ref name) if name == "frobnicate"));
    }

    #[test]
    fn test_execute_blank_line() {
        let (mut session, capture) = session();
        session.execute("   ").unwrap();
        assert!(capture.lines().is_empty());
    }

    #[test]
    fn test_execute_checks_arity() {
        let (mut session, _) = session();
        let err = session.execute("enable").unwrap_err();
        assert!(matches!(err, ShellError::InvalidArguments { .. }));
    }

    #[test]
    fn test_dash_help_renders_usage() {
        let (mut session, capture) = session();
        session.execute("enable --help").unwrap();

        let output = capture.output();
        assert!(output.contains("Usage:\n  enable [module]"));
        // The module was not touched
        assert!(!output.contains("Error"));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let (mut session, _) = session();
        session.register_module(EchoModule).unwrap();

        let err = session.register_module(EchoModule).unwrap_err();
        assert!(matches!(err, ShellError::DuplicateModule(_)));
        assert_eq!(session.modules(), vec!["core", "echo"]);
    }

    #[test]
    fn test_failed_initialization_rolls_back() {
        let (mut session, capture) = session();
        let err = session.register_module(FailingInit).unwrap_err();

        assert_eq!(err.to_string(), "no backend");
        assert_eq!(session.modules(), vec!["core"]);
        assert!(session.resolve("broken").is_none());
        assert!(!capture.completions().contains(&"broken".to_string()));
    }

    #[test]
    fn test_completions_follow_namespace() {
        let (mut session, capture) = session();
        session.register_module(EchoModule).unwrap();
        assert_eq!(session.complete("e"), vec!["echo", "enable", "exit"]);

        session.disable_module("echo").unwrap();
        assert_eq!(session.complete("e"), vec!["enable", "exit"]);
        assert!(!capture.completions().contains(&"echo".to_string()));

        session.enable_module("echo").unwrap();
        assert!(capture.completions().contains(&"echo".to_string()));
    }

    #[test]
    fn test_completions_include_aliases() {
        let (mut session, capture) = session();
        session.register_module(EchoModule).unwrap();

        assert_eq!(session.complete("sa"), vec!["say"]);
        assert!(capture.completions().contains(&"say".to_string()));

        session.disable_module("echo").unwrap();
        assert!(session.complete("sa").is_empty());
    }

    #[test]
    fn test_request_exit_runs_hooks_once() {
        let (mut session, _) = session();
        let count = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        {
            let count = Arc::clone(&count);
            session.on_exit(move || {
                count.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Ok(())
            });
        }

        session.request_exit(3);
        session.request_exit(4);

        assert_eq!(count.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(session.exit_code(), Some(3));
    }

    #[test]
    fn test_set_history_file_reaches_frontend() {
        let capture = CaptureFrontend::new();
        let options = SessionOptions {
            history_file: Some(PathBuf::from("/tmp/modshell-test-history")),
            ..SessionOptions::default()
        };
        let mut session = Session::new(options, capture.clone()).unwrap();
        assert_eq!(
            capture.history_path(),
            Some(PathBuf::from("/tmp/modshell-test-history"))
        );

        session.set_history_file("/tmp/other").unwrap();
        assert_eq!(capture.history_path(), Some(PathBuf::from("/tmp/other")));
    }

    #[test]
    fn test_print_alert() {
        let (mut session, capture) = session();
        session.print_alert("timer fired");
        assert_eq!(capture.alerts(), vec!["timer fired"]);
        assert!(capture.lines().is_empty());
    }

    #[test]
    fn test_alert_queued_before_run_is_printed_before_prompt() {
        let (mut session, capture) = session();
        session.alerter().send("timer fired").unwrap();

        let mut input = LineReader::from_lines(["exit"]);
        tokio_test::block_on(session.run(&mut input)).unwrap();

        assert_eq!(capture.alerts(), vec!["timer fired"]);
        assert_eq!(capture.prompts(), vec!["> "]);
    }

    #[test]
    fn test_alerter_fails_after_session_dropped() {
        let (session, _) = session();
        let alerts = session.alerter();
        assert!(!alerts.is_closed());

        drop(session);
        let err = alerts.send("late").unwrap_err();
        assert!(matches!(err, ShellError::ChannelClosed("alert")));
    }

    #[test]
    fn test_handler_error_propagates_from_execute() {
        struct Failing;
        impl Module for Failing {
            fn name(&self) -> &str {
                "failing"
            }
            fn commands(&self) -> Vec<CommandSpec> {
                vec![CommandSpec::new("fail", |_, _| Err(ShellError::failed("boom")))
                    .arity(Arity::None)]
            }
        }

        let (mut session, _) = session();
        session.register_module(Failing).unwrap();
        assert_eq!(session.execute("fail").unwrap_err().to_string(), "boom");
    }
}
