//! Command-line interface for modshell.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Shell name.
    pub name: Option<String>,
    /// Initial prompt.
    pub prompt: Option<String>,
    /// Banner printed at startup.
    pub banner: Option<String>,
    /// History file location.
    pub history_file: Option<PathBuf>,
    /// Disable history persistence.
    pub no_history: bool,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('n') | Long("name") => {
                let value: String = parser.value()?.parse()?;
                if value.trim().is_empty() {
                    return Err(ArgsError::InvalidValue("name", value));
                }
                result.name = Some(value);
            }
            Short('p') | Long("prompt") => {
                result.prompt = Some(parser.value()?.parse()?);
            }
            Short('b') | Long("banner") => {
                result.banner = Some(parser.value()?.parse()?);
            }
            Long("history-file") => {
                result.history_file = Some(parser.value()?.parse()?);
            }
            Long("no-history") => {
                result.no_history = true;
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"modshell {version}
Interactive command shell built from pluggable modules

USAGE:
    modshell [OPTIONS]

OPTIONS:
    -c, --config <FILE>       Path to configuration file (JSON)
    -n, --name <NAME>         Shell name [default: shell]
    -p, --prompt <TEXT>       Initial prompt [default: >]
    -b, --banner <TEXT>       Banner printed at startup
        --history-file <FILE> Command history location
        --no-history          Do not persist command history
    -l, --log-level <LVL>     Log level (error, warn, info, debug, trace)
    -h, --help                Print help
    -V, --version             Print version

ENVIRONMENT VARIABLES:
    MODSHELL_PROMPT           Prompt (overrides config)
    MODSHELL_BANNER           Banner (overrides config)
    MODSHELL_HISTORY_FILE     History location (overrides config)
    MODSHELL_LOG_LEVEL        Log level (overrides config)
    RUST_LOG                  Alternative log level setting

BUILT-IN COMMANDS:
    help [command]            List commands by module, or describe one
    modules                   List modules and whether they are enabled
    enable <module>           Enable a module
    disable <module>          Disable a module
    exit                      Leave the shell

EXAMPLES:
    # Start with defaults
    modshell

    # Custom prompt, history in the home directory
    modshell -p 'demo>' --history-file ~/.modshell_history

    # Start with config file
    modshell -c ~/.config/modshell.json
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("modshell {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    UnexpectedArgument(String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for --{}: '{}'", name, value)
            }
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: '{}'", arg)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(args: &[&str]) -> Vec<OsString> {
        std::iter::once("modshell")
            .chain(args.iter().copied())
            .map(OsString::from)
            .collect()
    }

    #[test]
    fn test_default_args() {
        let result = parse_args_from(args(&[])).unwrap();
        assert!(result.config.is_none());
        assert!(result.prompt.is_none());
        assert!(!result.no_history);
        assert!(!result.help);
    }

    #[test]
    fn test_prompt_and_name() {
        let result = parse_args_from(args(&["-p", "demo>", "-n", "demo"])).unwrap();
        assert_eq!(result.prompt.as_deref(), Some("demo>"));
        assert_eq!(result.name.as_deref(), Some("demo"));
    }

    #[test]
    fn test_long_options() {
        let result = parse_args_from(args(&[
            "--prompt",
            "$",
            "--banner",
            "Welcome",
            "--history-file",
            "/tmp/h",
        ]))
        .unwrap();
        assert_eq!(result.prompt.as_deref(), Some("$"));
        assert_eq!(result.banner.as_deref(), Some("Welcome"));
        assert_eq!(result.history_file, Some(PathBuf::from("/tmp/h")));
    }

    #[test]
    fn test_config_file() {
        let result = parse_args_from(args(&["-c", "/etc/modshell.json"])).unwrap();
        assert_eq!(result.config, Some(PathBuf::from("/etc/modshell.json")));
    }

    #[test]
    fn test_no_history() {
        let result = parse_args_from(args(&["--no-history"])).unwrap();
        assert!(result.no_history);
    }

    #[test]
    fn test_help_flag() {
        let result = parse_args_from(args(&["-h"])).unwrap();
        assert!(result.help);

        let result = parse_args_from(args(&["--help"])).unwrap();
        assert!(result.help);
    }

    #[test]
    fn test_version_flag() {
        let result = parse_args_from(args(&["-V"])).unwrap();
        assert!(result.version);

        let result = parse_args_from(args(&["--version"])).unwrap();
        assert!(result.version);
    }

    #[test]
    fn test_log_level() {
        let result = parse_args_from(args(&["-l", "debug"])).unwrap();
        assert_eq!(result.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_blank_name_rejected() {
        let result = parse_args_from(args(&["--name", " "]));
        assert!(matches!(result, Err(ArgsError::InvalidValue("name", _))));
    }

    #[test]
    fn test_unexpected_positional() {
        let result = parse_args_from(args(&["stray"]));
        assert!(matches!(result, Err(ArgsError::UnexpectedArgument(_))));
    }

    #[test]
    fn test_unknown_option() {
        assert!(parse_args_from(args(&["--port", "80"])).is_err());
    }

    #[test]
    fn test_missing_value() {
        assert!(parse_args_from(args(&["--prompt"])).is_err());
    }
}
