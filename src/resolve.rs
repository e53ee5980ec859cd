//! # Finding Repos by Remote URL
//!
//! [`Index::find_repo`] is the heart of `rtree get` and `rtree drop`: it maps
//! a remote URL (possibly written with an alias) to the tracked repo it
//! belongs to. When no tracked repo has this remote, other repos with the
//! same basename are offered as fork candidates, so that the URL can be added
//! as an additional remote to an existing checkout instead of creating a
//! second clone.

use std::fs;
use std::io;
use std::path::Path;

use log::info;

use crate::error::{Error, Result};
use crate::exec::git_in;
use crate::index::Index;
use crate::prompt::Choice;
use crate::remote::RemoteUrl;
use crate::repository::{Remote, Repo};
use crate::workspace::Workspace;

/// Upper bound for the number of fork candidates offered in one prompt.
pub const MAX_FORK_CANDIDATES: usize = 10;

impl Index {
    /// Finds the repo that has `raw_url` as a remote.
    ///
    /// If there is none and `allow_clone` is set, the URL is either added to
    /// a fork candidate chosen by the user or cloned into a new checkout. The
    /// index is persisted after each such change.
    ///
    /// The result of this operation is usually printed for consumption by
    /// other programs, so stdout is protected from here on.
    pub fn find_repo(
        &mut self,
        ws: &Workspace<'_>,
        raw_url: &str,
        allow_clone: bool,
    ) -> Result<Repo> {
        ws.protect_stdout();

        let url = ws.aliases().expand(raw_url);
        let basename = url.basename();

        let mut candidates = Vec::new();
        for (pos, repo) in self.repos.iter().enumerate() {
            if repo.remotes.iter().any(|r| r.url.matches(&url)) {
                return Ok(repo.clone());
            }
            if repo.remotes.iter().any(|r| r.url.basename() == basename) {
                candidates.push(pos);
            }
        }

        // the index may be stale
        let fresh = Repo::from_remote_url(url.clone())?;
        let fresh_path = fresh.absolute_path(ws.root());
        ensure_absent(&fresh_path)?;

        if !allow_clone {
            return Err(Error::NoSuchRemote {
                url: ws.aliases().compact(&url),
            });
        }

        if candidates.is_empty() {
            return self.clone_fresh(ws, fresh);
        }

        candidates.truncate(MAX_FORK_CANDIDATES);
        let mut choices: Vec<Choice> = candidates
            .iter()
            .map(|&pos| {
                Choice::new(format!(
                    "add as remote to {}",
                    self.repos[pos].absolute_path(ws.root()).display()
                ))
            })
            .collect();
        choices.push(Choice::new(format!("clone to {}", fresh_path.display())).with_shortcut('n'));

        let selected = ws
            .prompt()
            .select("Found possible fork candidates. What to do?", &choices)?;
        match candidates.get(selected) {
            Some(&pos) => self.add_fork_remote(ws, pos, url),
            None => self.clone_fresh(ws, fresh),
        }
    }

    fn clone_fresh(&mut self, ws: &Workspace<'_>, repo: Repo) -> Result<Repo> {
        repo.checkout(ws)?;
        self.repos.push(repo.clone());
        self.persist(ws.config())?;
        info!("cloned {}", repo.absolute_path(ws.root()).display());
        Ok(repo)
    }

    fn add_fork_remote(&mut self, ws: &Workspace<'_>, pos: usize, url: RemoteUrl) -> Result<Repo> {
        let target = &self.repos[pos];
        let path = target.absolute_path(ws.root());

        let mut question = String::from("Existing remotes:\n");
        for remote in &target.remotes {
            question.push_str(&format!(
                "\t({}) {}\n",
                remote.name,
                ws.aliases().compact(&remote.url)
            ));
        }
        question.push_str(&format!(
            "Enter remote name for {}:",
            ws.aliases().compact(&url)
        ));

        let name = ws.prompt().read_line(&question)?;
        validate_remote_name(&name, target, &path)?;

        ws.run(&git_in(&path, ["remote", "add", name.as_str(), url.as_str()]))?;
        ws.run(&git_in(&path, ["remote", "update", name.as_str()]))?;

        self.repos[pos].remotes.push(Remote::new(name, url));
        let repo = self.repos[pos].clone();
        self.persist(ws.config())?;
        Ok(repo)
    }
}

/// Fails if anything exists at `path`.
fn ensure_absent(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(_) => Err(Error::AlreadyCheckedOut {
            path: path.to_path_buf(),
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn validate_remote_name(name: &str, repo: &Repo, path: &Path) -> Result<()> {
    let problem = if name.is_empty() {
        "remote name must not be empty"
    } else if repo.remote(name).is_some() {
        "a remote with this name already exists"
    } else {
        return Ok(());
    };
    Err(Error::InvalidRemoteName {
        name: name.to_string(),
        path: path.to_path_buf(),
        message: problem.to_string(),
    })
}
