//! ruleshift - convert rule files between Cursor and Windsurf
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error, or a batch in which some file failed

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ruleshift_cli::commands::{batch, convert, detect};
use ruleshift_cli::{error_code, Cli, Commands, Settings};

/// Exit code for any failure
const ERROR_EXIT_CODE: i32 = 1;

fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("ruleshift=debug,ruleshift_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = dispatch_command(cli);
    std::process::exit(exit_code);
}

/// Load settings and run the requested subcommand
fn dispatch_command(cli: Cli) -> i32 {
    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => return report_error(&anyhow::Error::from(e)),
    };

    let result = match cli.command {
        Commands::Convert(args) => convert::run(args, &settings),
        Commands::Batch(args) => batch::run(args, &settings),
        Commands::Detect(args) => detect::run(args),
    };
    result_to_exit(result)
}

/// Convert a command result to an exit code, printing any error
fn result_to_exit(result: anyhow::Result<i32>) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => report_error(&e),
    }
}

fn report_error(error: &anyhow::Error) -> i32 {
    tracing::debug!(?error, "Command failed");
    eprintln!("Error [{}]: {:#}", error_code(error), error);
    ERROR_EXIT_CODE
}
