//! # Get Command Implementation
//!
//! `rtree get <url>` prints the absolute path of the checkout that has the
//! given remote, cloning it first if it is not tracked yet. The path is the
//! only thing written to stdout, so the command can be used as
//! `cd "$(rtree get gh:git/git)"`.

use anyhow::Result;
use clap::Args;

use rtree::index::Index;

use super::Session;

/// Arguments for the `get` command
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Remote URL, optionally using an alias from `url.<base>.insteadOf`
    pub url: String,
}

/// Execute the `get` command.
pub fn execute(args: GetArgs, session: &Session, mut index: Index) -> Result<()> {
    let ws = session.workspace();
    let repo = index.find_repo(&ws, &args.url, true)?;
    println!("{}", repo.absolute_path(ws.root()).display());
    Ok(())
}
