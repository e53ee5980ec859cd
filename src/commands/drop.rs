//! # Drop Command Implementation
//!
//! `rtree drop <url>` deletes the checkout with the given remote from disk
//! and from the index, after showing its `git status` and asking for
//! confirmation. The repo must already be tracked.

use anyhow::Result;
use clap::Args;
use log::info;

use rtree::index::Index;

use super::Session;

/// Arguments for the `drop` command
#[derive(Args, Debug)]
pub struct DropArgs {
    /// Remote URL of the checkout to delete
    pub url: String,
}

/// Execute the `drop` command.
pub fn execute(args: DropArgs, session: &Session, mut index: Index) -> Result<()> {
    let ws = session.workspace();
    let repo = index.find_repo(&ws, &args.url, false)?;
    if !index.drop_repo(&ws, &repo)? {
        info!("keeping {}", repo.absolute_path(ws.root()).display());
    }
    Ok(())
}
