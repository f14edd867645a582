//! AutoScience: project-centric orchestrator for agent-driven research.
//!
//! This is the main entry point for the `autoscience` CLI. It parses
//! arguments, sets up logging, dispatches to the selected action, and maps
//! errors to exit codes.

mod agent;
mod cli;
mod commands;
pub mod config;
pub mod env_file;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod fs;
mod logging;
pub mod process;
pub mod project;
pub mod scripts;
pub mod state;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init_logging(cli.verbose);

    match commands::dispatch(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
