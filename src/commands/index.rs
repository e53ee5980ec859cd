//! # Index Command Implementation
//!
//! `rtree index` reconciles the index with the checkouts on disk and writes
//! the result back.

use anyhow::Result;

use rtree::index::Index;

use super::Session;

/// Execute the `index` command.
pub fn execute(session: &Session, mut index: Index) -> Result<()> {
    let ws = session.workspace();
    index.rebuild(&ws)?;
    index.persist(session.config())?;
    Ok(())
}
