//! # Index Reconciliation
//!
//! `rtree index` brings the index in line with the checkouts that actually
//! exist below the root. It runs in two passes:
//!
//! 1. Each indexed repo is checked on disk. When its checkout is gone, the
//!    user decides whether to restore it from its remotes, to delete it from
//!    the index, or to keep the entry as is.
//! 2. The root is scanned for checkouts. Indexed repos that are found get
//!    their remotes refreshed from the git config; unknown checkouts are
//!    added to the index.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use log::{info, warn};

use crate::error::{Error, Result};
use crate::index::Index;
use crate::prompt::Choice;
use crate::repository::{for_each_physical_repo, Repo};
use crate::workspace::Workspace;

/// How many entries ended up in which state during a rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildSummary {
    pub kept: usize,
    pub restored: usize,
    pub deleted: usize,
    pub skipped: usize,
    pub discovered: usize,
}

impl fmt::Display for RebuildSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} present, {} restored, {} deleted, {} skipped, {} newly discovered",
            self.kept, self.restored, self.deleted, self.skipped, self.discovered
        )
    }
}

/// What the `.git` entry of an indexed repo looks like on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckoutState {
    Present,
    Missing,
    Ambiguous,
}

fn checkout_state(repo: &Repo, root: &Path) -> Result<CheckoutState> {
    match fs::metadata(repo.marker_path(root)) {
        Ok(meta) if meta.is_dir() || meta.is_file() => Ok(CheckoutState::Present),
        Ok(_) => Ok(CheckoutState::Ambiguous),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(CheckoutState::Missing),
        Err(err) => Err(err.into()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Restore,
    Delete,
    Skip,
}

/// Asks what to do about a repo whose checkout has disappeared.
fn ask_about_deleted(ws: &Workspace<'_>, repo: &Repo) -> Result<Decision> {
    let path = repo.absolute_path(ws.root());
    let sources: Vec<String> = match repo.origin() {
        Some(origin) => vec![ws.aliases().compact(&origin.url)],
        None => repo
            .remotes
            .iter()
            .map(|r| ws.aliases().compact(&r.url))
            .collect(),
    };

    let mut options = Vec::new();
    let question = if sources.is_empty() {
        format!(
            "repository {} has been deleted; no remote to restore from",
            path.display()
        )
    } else {
        options.push((
            Decision::Restore,
            Choice::new(format!("restore from {}", sources.join(" and "))).with_shortcut('r'),
        ));
        format!("repository {} has been deleted", path.display())
    };
    options.push((
        Decision::Delete,
        Choice::new("delete from index").with_shortcut('d'),
    ));
    options.push((Decision::Skip, Choice::new("skip").with_shortcut('s')));

    let choices: Vec<Choice> = options.iter().map(|(_, c)| c.clone()).collect();
    let selected = ws.prompt().select(&question, &choices)?;
    Ok(options[selected].0)
}

impl Index {
    /// Reconciles the index with the checkouts below the root.
    ///
    /// The index is only modified if the whole rebuild succeeds. It is not
    /// persisted.
    pub fn rebuild(&mut self, ws: &Workspace<'_>) -> Result<RebuildSummary> {
        let root = ws.root();
        let mut summary = RebuildSummary::default();
        let mut kept: Vec<Repo> = Vec::with_capacity(self.repos.len());

        for repo in &self.repos {
            match checkout_state(repo, root)? {
                CheckoutState::Present => {
                    summary.kept += 1;
                    kept.push(repo.clone());
                }
                CheckoutState::Ambiguous => {
                    return Err(Error::AmbiguousCheckout {
                        path: repo.marker_path(root),
                    });
                }
                CheckoutState::Missing => match ask_about_deleted(ws, repo)? {
                    Decision::Restore => {
                        repo.checkout(ws)?;
                        summary.restored += 1;
                        kept.push(repo.clone());
                    }
                    Decision::Delete => summary.deleted += 1,
                    Decision::Skip => {
                        summary.skipped += 1;
                        kept.push(repo.clone());
                    }
                },
            }
        }

        let mut positions = HashMap::new();
        for (pos, repo) in kept.iter().enumerate() {
            positions.entry(repo.checkout_path.clone()).or_insert(pos);
        }

        let mut discovered = Vec::new();
        for_each_physical_repo(ws, |found| {
            let path = found.absolute_path(root);
            match positions.get(&found.checkout_path) {
                Some(_) if found.remotes.is_empty() => {
                    warn!(
                        "repository {} has no remotes; keeping the remotes from the index",
                        path.display()
                    );
                }
                Some(&pos) => kept[pos].remotes = found.remotes,
                None if found.remotes.is_empty() => {
                    warn!("repository {} has no remotes; skipping", path.display());
                }
                None => {
                    info!("found new repository {}", path.display());
                    discovered.push(found);
                }
            }
            Ok(())
        })?;

        summary.discovered = discovered.len();
        kept.extend(discovered);
        self.repos = kept;
        info!("index rebuilt: {summary}");
        Ok(summary)
    }
}
