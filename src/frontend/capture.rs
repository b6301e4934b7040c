//! In-memory front end.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{Frontend, PrefixCompleter};

#[derive(Debug, Default)]
struct Captured {
    lines: Vec<String>,
    alerts: Vec<String>,
    prompts: Vec<String>,
    history: Vec<String>,
    history_path: Option<PathBuf>,
    completions: Vec<String>,
}

/// Records everything the session renders.
///
/// Clones share the same buffer, so one clone can be handed to a session
/// while another is kept to inspect the output. Useful for embedding a
/// session without a terminal, and for testing modules.
#[derive(Debug, Clone, Default)]
pub struct CaptureFrontend {
    inner: Arc<Mutex<Captured>>,
}

impl CaptureFrontend {
    /// Create an empty capture.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Captured> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All output lines joined with newlines.
    pub fn output(&self) -> String {
        self.lock().lines.join("\n")
    }

    /// Output lines in order.
    pub fn lines(&self) -> Vec<String> {
        self.lock().lines.clone()
    }

    /// Alerts in order.
    pub fn alerts(&self) -> Vec<String> {
        self.lock().alerts.clone()
    }

    /// Every prompt shown, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.lock().prompts.clone()
    }

    /// Recorded history lines.
    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    /// The last history path set.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.lock().history_path.clone()
    }

    /// The last completion candidates received.
    pub fn completions(&self) -> Vec<String> {
        self.lock().completions.clone()
    }

    /// Forget captured output and alerts.
    pub fn clear(&self) {
        let mut captured = self.lock();
        captured.lines.clear();
        captured.alerts.clear();
    }
}

impl Frontend for CaptureFrontend {
    fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.lock()
            .lines
            .extend(text.split('\n').map(str::to_string));
        Ok(())
    }

    fn show_prompt(&mut self, prompt: &str) -> io::Result<()> {
        self.lock().prompts.push(prompt.to_string());
        Ok(())
    }

    fn alert(&mut self, text: &str) -> io::Result<()> {
        self.lock().alerts.push(text.to_string());
        Ok(())
    }

    fn set_completions(&mut self, completer: &PrefixCompleter) {
        self.lock().completions = completer.candidates().to_vec();
    }

    fn record_history(&mut self, line: &str) -> io::Result<()> {
        self.lock().history.push(line.to_string());
        Ok(())
    }

    fn set_history_path(&mut self, path: &Path) -> io::Result<()> {
        self.lock().history_path = Some(path.to_path_buf());
        Ok(())
    }
}
