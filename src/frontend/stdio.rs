//! Standard output front end.

use std::io::{self, Stdout, Write};
use std::path::Path;

use super::{EditorHandle, Frontend, History, PrefixCompleter};

/// Writes to stdout and optionally persists history to a file.
///
/// Completion candidates, history and the prompt are shared with the line
/// editor through [`StdioFrontend::editor`].
pub struct StdioFrontend {
    stdout: Stdout,
    history: Option<History>,
    editor: EditorHandle,
}

impl StdioFrontend {
    /// Create a front end without history.
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            history: None,
            editor: EditorHandle::new(),
        }
    }

    /// Persist history to `path`.
    pub fn with_history(mut self, path: impl AsRef<Path>) -> Self {
        self.history = Some(History::new(path.as_ref()));
        self
    }

    /// The history, if enabled.
    pub fn history(&self) -> Option<&History> {
        self.history.as_ref()
    }

    /// Handle for a [`LineReader::terminal`](super::LineReader::terminal)
    /// reading input for this front end.
    pub fn editor(&self) -> EditorHandle {
        self.editor.clone()
    }
}

impl Default for StdioFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl Frontend for StdioFrontend {
    fn write_line(&mut self, text: &str) -> io::Result<()> {
        let mut out = self.stdout.lock();
        writeln!(out, "{text}")?;
        out.flush()
    }

    fn show_prompt(&mut self, prompt: &str) -> io::Result<()> {
        self.editor.set_prompt(prompt);
        let mut out = self.stdout.lock();
        write!(out, "{prompt}")?;
        out.flush()
    }

    fn alert(&mut self, text: &str) -> io::Result<()> {
        let mut out = self.stdout.lock();
        self.editor.print_above(&mut out, text).map(|_| ())
    }

    fn alert_while_reading(&mut self, text: &str, prompt: &str) -> io::Result<()> {
        let redrawn = {
            let mut out = self.stdout.lock();
            self.editor.print_above(&mut out, text)?
        };
        // Without the line editor nothing redraws the prompt for us
        if redrawn {
            Ok(())
        } else {
            self.show_prompt(prompt)
        }
    }

    fn set_completions(&mut self, completer: &PrefixCompleter) {
        self.editor.set_completer(completer);
    }

    fn record_history(&mut self, line: &str) -> io::Result<()> {
        self.editor.push_history(line);
        match self.history.as_mut() {
            Some(history) => history.append(line),
            None => Ok(()),
        }
    }

    fn set_history_path(&mut self, path: &Path) -> io::Result<()> {
        let history = match self.history.as_mut() {
            Some(history) => {
                history.set_path(path);
                history
            }
            None => self.history.insert(History::new(path)),
        };
        self.editor.set_history(history.load()?);
        Ok(())
    }
}
