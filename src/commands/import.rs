//! # Import Command Implementation
//!
//! `rtree import <path>` moves a checkout from somewhere outside the root to
//! its place in the tree, leaves a symlink at the old location, and adds it
//! to the index.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use log::info;

use rtree::index::Index;

use super::Session;

/// Arguments for the `import` command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Directory of the checkout to import
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

/// Execute the `import` command.
pub fn execute(args: ImportArgs, session: &Session, mut index: Index) -> Result<()> {
    let ws = session.workspace();
    let target = index.import_repo(&ws, &args.path)?;
    index.persist(session.config())?;
    info!("moved {} to {}", args.path.display(), target.display());
    Ok(())
}
