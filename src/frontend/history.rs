//! Append-only command history file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

/// Persists executed command lines, one per line.
///
/// The file is opened lazily on first append and reopened whenever the path
/// changes.
#[derive(Debug)]
pub struct History {
    path: PathBuf,
    file: Option<File>,
}

impl History {
    /// Create a history backed by `path`. Nothing is touched on disk yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
        }
    }

    /// The history file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move history to a new file. Later appends go to `path`.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
        self.file = None;
        debug!(path = %self.path.display(), "history path changed");
    }

    /// Append one line to the history file.
    pub fn append(&mut self, line: &str) -> io::Result<()> {
        let file = match self.file.take() {
            Some(file) => file,
            None => {
                if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)?
            }
        };
        let file = self.file.insert(file);
        writeln!(file, "{line}")?;
        file.flush()
    }

    /// Read all recorded lines. A missing file is an empty history.
    pub fn load(&self) -> io::Result<Vec<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content.lines().map(str::to_string).collect()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}
