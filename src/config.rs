//! Configuration management for modshell.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::session::{SessionOptions, DEFAULT_NAME, DEFAULT_PROMPT};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Shell presentation.
    pub shell: ShellSection,
    /// Command history.
    pub history: HistorySection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Shell configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellSection {
    /// Shell name, shown in help output.
    pub name: String,
    /// Initial prompt.
    pub prompt: String,
    /// Banner printed at startup.
    pub banner: Option<String>,
}

impl Default for ShellSection {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            banner: None,
        }
    }
}

/// History configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySection {
    /// Persist executed commands.
    pub enabled: bool,
    /// History file location.
    pub path: PathBuf,
}

impl Default for HistorySection {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_history_path(),
        }
    }
}

/// Default history location, in the system temporary directory.
pub fn default_history_path() -> PathBuf {
    std::env::temp_dir().join("modshell_history")
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace) or a full filter.
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    fn apply_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(prompt) = var("MODSHELL_PROMPT") {
            self.shell.prompt = prompt;
        }

        if let Some(banner) = var("MODSHELL_BANNER") {
            self.shell.banner = Some(banner);
        }

        if let Some(path) = var("MODSHELL_HISTORY_FILE") {
            if !path.is_empty() {
                self.history.path = PathBuf::from(path);
            }
        }

        if let Some(level) = var("MODSHELL_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Some(level) = var("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(ref name) = args.name {
            self.shell.name = name.clone();
        }

        if let Some(ref prompt) = args.prompt {
            self.shell.prompt = prompt.clone();
        }

        if let Some(ref banner) = args.banner {
            self.shell.banner = Some(banner.clone());
        }

        if let Some(ref path) = args.history_file {
            self.history.enabled = true;
            self.history.path = path.clone();
        }

        if args.no_history {
            self.history.enabled = false;
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(ref path) = args.config {
            config = Config::from_file(path)?;
        }

        config.apply_env();
        config.apply_args(args);

        Ok(config)
    }

    /// Convert to options for creating a session.
    pub fn to_session_options(&self) -> SessionOptions {
        SessionOptions {
            name: self.shell.name.clone(),
            prompt: self.shell.prompt.clone(),
            banner: self.shell.banner.clone(),
            history_file: self.history.enabled.then(|| self.history.path.clone()),
        }
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
