//! # rtree CLI
//!
//! This is the binary entry point for the `rtree` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Translating errors into a diagnostic on stderr and an exit code.
//!
//! The core application logic is defined in the `lib.rs` library crate, ensuring
//! that the binary is a thin wrapper around the reusable library functionality.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;

use rtree::output;

/// Exit code after the user interrupted a prompt, as for SIGINT.
const EXIT_INTERRUPTED: u8 = 130;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let interrupted = err
                .downcast_ref::<rtree::Error>()
                .is_some_and(rtree::Error::is_interrupted);
            if interrupted {
                return ExitCode::from(EXIT_INTERRUPTED);
            }
            eprintln!("{} {err:#}", output::error_label());
            ExitCode::FAILURE
        }
    }
}
