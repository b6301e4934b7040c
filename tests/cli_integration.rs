//! CLI integration tests.
//!
//! These tests verify the CLI argument parsing and configuration loading.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

use modshell::cli::{parse_args_from, Args};
use modshell::config::Config;
use modshell::{CaptureFrontend, Session, ShellApi};

fn args(args: &[&str]) -> Vec<OsString> {
    std::iter::once("modshell")
        .chain(args.iter().copied())
        .map(OsString::from)
        .collect()
}

// ============================================================================
// CLI Argument Tests
// ============================================================================

#[test]
fn test_cli_defaults() {
    let result = parse_args_from(args(&[])).unwrap();

    assert!(result.config.is_none());
    assert!(result.name.is_none());
    assert!(result.prompt.is_none());
    assert!(result.banner.is_none());
    assert!(result.history_file.is_none());
    assert!(!result.no_history);
    assert!(!result.version);
}

#[test]
fn test_cli_full_options() {
    let result = parse_args_from(args(&[
        "-n",
        "timer-demo",
        "-p",
        "$",
        "-b",
        "Hello",
        "-l",
        "debug",
        "--no-history",
    ]))
    .unwrap();

    assert_eq!(result.name, Some("timer-demo".to_string()));
    assert_eq!(result.prompt, Some("$".to_string()));
    assert_eq!(result.banner, Some("Hello".to_string()));
    assert_eq!(result.log_level, Some("debug".to_string()));
    assert!(result.no_history);
}

#[test]
fn test_cli_config_file() {
    let result = parse_args_from(args(&["-c", "/etc/modshell.json"])).unwrap();

    assert!(result.config.is_some());
    assert_eq!(
        result.config.unwrap().to_str().unwrap(),
        "/etc/modshell.json"
    );
}

#[test]
fn test_cli_unknown_flag() {
    let result = parse_args_from(args(&["--port", "3000"]));
    assert!(result.is_err());
}

// ============================================================================
// Configuration Loading Tests
// ============================================================================

#[test]
fn test_config_from_json_file() {
    let json = r#"{
        "shell": {
            "name": "timer-demo",
            "prompt": "timer>",
            "banner": "Welcome to the Timer Demo Shell!"
        },
        "history": {
            "enabled": true,
            "path": "/tmp/timer-demo-history"
        },
        "logging": {
            "level": "debug"
        }
    }"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.shell.name, "timer-demo");
    assert_eq!(config.shell.prompt, "timer>");
    assert_eq!(
        config.shell.banner.as_deref(),
        Some("Welcome to the Timer Demo Shell!")
    );
    assert!(config.history.enabled);
    assert_eq!(config.history.path, PathBuf::from("/tmp/timer-demo-history"));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_config_priority_cli_over_file() {
    let json = r#"{
        "shell": {
            "name": "from-file",
            "prompt": "file>"
        }
    }"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let args = Args {
        name: Some("from-cli".to_string()),
        prompt: Some("cli>".to_string()),
        config: Some(file.path().to_path_buf()),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();

    // CLI values should win
    assert_eq!(config.shell.name, "from-cli");
    assert_eq!(config.shell.prompt, "cli>");
}

#[test]
fn test_config_no_history_overrides_file() {
    let json = r#"{
        "history": {
            "enabled": true,
            "path": "/tmp/somewhere"
        }
    }"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let args = Args {
        config: Some(file.path().to_path_buf()),
        no_history: true,
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();

    // --no-history should disable even if config has it enabled
    assert!(!config.history.enabled);
    assert!(config.to_session_options().history_file.is_none());
}

#[test]
fn test_config_missing_file_is_error() {
    let args = Args {
        config: Some(PathBuf::from("/nonexistent/modshell.json")),
        ..Args::default()
    };

    assert!(Config::load(&args).is_err());
}

#[test]
fn test_config_builds_session() {
    let json = r#"{
        "shell": { "name": "demo", "prompt": "demo>" },
        "history": { "enabled": false }
    }"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let args = Args {
        config: Some(file.path().to_path_buf()),
        ..Args::default()
    };
    let config = Config::load(&args).unwrap();

    let capture = CaptureFrontend::new();
    let session = Session::new(config.to_session_options(), capture.clone()).unwrap();

    assert_eq!(session.shell_name(), "demo");
    assert_eq!(session.prompt(), "demo>");
    assert!(capture.history_path().is_none());
}
