//! Terminal front end.
//!
//! The session only needs a handful of operations from the terminal:
//! render a line, render the prompt, show an alert, remember history and
//! accept completion candidates. [`Frontend`] captures those; input comes
//! separately through a [`LineReader`], which on a terminal edits lines
//! with a [`LineEditor`] sharing an [`EditorHandle`] with the front end.

mod capture;
mod completion;
mod editor;
mod history;
mod reader;
mod sanitize;
mod stdio;

pub use capture::CaptureFrontend;
pub use completion::PrefixCompleter;
pub use editor::{Completion, EditorHandle, LineBuffer, LineEditor};
pub use history::History;
pub use reader::{LineFeed, LineReader, ReadOutcome};
pub use sanitize::InputSanitizer;
pub use stdio::StdioFrontend;

use std::io;
use std::path::Path;

/// Output side of the terminal.
pub trait Frontend: Send {
    /// Render one line of output.
    fn write_line(&mut self, text: &str) -> io::Result<()>;

    /// Render the prompt before waiting for input.
    fn show_prompt(&mut self, prompt: &str) -> io::Result<()>;

    /// Render an alert immediately.
    fn alert(&mut self, text: &str) -> io::Result<()> {
        self.write_line(text)
    }

    /// Render an alert that arrived while waiting for input, then restore
    /// the prompt and whatever was typed so far.
    fn alert_while_reading(&mut self, text: &str, prompt: &str) -> io::Result<()> {
        self.alert(text)?;
        self.show_prompt(prompt)
    }

    /// Receive the current completion candidates.
    fn set_completions(&mut self, completer: &PrefixCompleter) {
        let _ = completer;
    }

    /// Remember an executed command line.
    fn record_history(&mut self, line: &str) -> io::Result<()> {
        let _ = line;
        Ok(())
    }

    /// Change where history is persisted.
    fn set_history_path(&mut self, path: &Path) -> io::Result<()> {
        let _ = path;
        Ok(())
    }
}
