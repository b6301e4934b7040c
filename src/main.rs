//! modshell binary entry point.

use std::io::IsTerminal;

use modshell::cli::{parse_args, print_help, print_version};
use modshell::config::Config;
use modshell::{logging, LineReader, Session, StdioFrontend};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Run 'modshell --help' for usage information.");
            std::process::exit(2);
        }
    };

    if args.help {
        print_help();
        return;
    }

    if args.version {
        print_version();
        return;
    }

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init_with_filter(config.log_filter()) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }
    info!("modshell v{}", env!("CARGO_PKG_VERSION"));

    let code = match run(&config).await {
        Ok(code) => code,
        Err(e) => {
            error!("shell failed: {}", e);
            eprintln!("Error: {}", e);
            1
        }
    };

    std::process::exit(code);
}

async fn run(config: &Config) -> modshell::Result<i32> {
    let frontend = StdioFrontend::new();
    let mut input = if std::io::stdin().is_terminal() {
        LineReader::terminal(frontend.editor())
    } else {
        LineReader::stdin()
    };
    let mut session = Session::new(config.to_session_options(), frontend)?;
    session.run(&mut input).await
}
