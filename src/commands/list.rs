//! # Listing Commands
//!
//! `rtree repos` and `rtree remotes` print the tracked checkout paths and
//! remote URLs, one per line and sorted. Both are read-only.

use anyhow::Result;

use rtree::index::Index;

/// Execute the `repos` command.
pub fn execute_repos(index: &Index) -> Result<()> {
    for path in index.repo_paths() {
        println!("{path}");
    }
    Ok(())
}

/// Execute the `remotes` command.
pub fn execute_remotes(index: &Index) -> Result<()> {
    for url in index.remote_urls() {
        println!("{url}");
    }
    Ok(())
}
