//! # Each Command Implementation
//!
//! `rtree each <command>...` runs a command in every tracked checkout, in
//! index order. A failure in one checkout is reported and the loop goes on;
//! the command fails at the end if any checkout failed.

use anyhow::{bail, Result};
use clap::Args;

use rtree::index::Index;
use rtree::output;

use super::Session;

/// Arguments for the `each` command
#[derive(Args, Debug)]
pub struct EachArgs {
    /// The command to run, with its arguments
    #[arg(
        value_name = "COMMAND",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

/// Execute the `each` command.
pub fn execute(args: EachArgs, session: &Session, index: &Index) -> Result<()> {
    let ws = session.workspace();

    let mut failed = 0;
    for repo in &index.repos {
        if let Err(err) = repo.exec(&ws, &args.command) {
            eprintln!("{} {err}", output::error_label());
            failed += 1;
        }
    }

    if failed > 0 {
        bail!(
            "`{}` failed in {failed} of {} repos",
            args.command.join(" "),
            index.repos.len()
        );
    }
    Ok(())
}
