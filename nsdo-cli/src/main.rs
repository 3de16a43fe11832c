//! nsdo - run a command inside a named network namespace
//!
//! Installed setuid root so unprivileged users can enter namespaces an
//! administrator registered in `/var/run/netns`, without keeping root.

use clap::Parser;
use clap::error::ErrorKind;
use nsdo_core::ExitStatus;
use std::process::ExitCode;
use tracing::Level;

mod cli;
mod run;

use cli::Cli;

/// Program name used in diagnostics
pub const PROGRAM: &str = "nsdo";

fn main() -> ExitCode {
    // Parse command-line arguments
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return parse_failure(&e).into(),
    };

    if cli.version {
        print_version();
        return ExitStatus::Ok.into();
    }

    // Setup logging based on verbosity. Never from the environment: we run setuid.
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    run::execute(&cli).into()
}

fn parse_failure(e: &clap::Error) -> ExitStatus {
    // help goes to stdout, everything else to stderr with the usage line
    let _ = e.print();
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitStatus::Ok,
        _ => ExitStatus::BadInvocation,
    }
}

fn print_version() {
    println!("{PROGRAM} version {}", env!("CARGO_PKG_VERSION"));
}
