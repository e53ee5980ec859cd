//! # The Index
//!
//! The index file lists every tracked checkout with its remotes:
//!
//! ```yaml
//! repos:
//! - path: github.com/git/git
//!   remotes:
//!   - name: origin
//!     url: https://github.com/git/git
//! ```
//!
//! It is read once when an rtree command starts and written back at most
//! once when the command has changed it. Entries are always kept sorted by
//! absolute path.
//!
//! The reconciliation of the index with the checkouts on disk lives in
//! [`crate::reconcile`], the lookup of a repo by remote URL in
//! [`crate::resolve`].

use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::prompt::Choice;
use crate::remote::AliasTable;
use crate::repository::{scan_remotes, Remote, RemoteRecord, Repo, ORIGIN};
use crate::workspace::Workspace;

/// Top-level structure of the index file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct IndexFile {
    #[serde(default)]
    repos: Option<Vec<RepoRecord>>,
}

/// A repo as stored in the index file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RepoRecord {
    #[serde(default)]
    path: String,
    #[serde(default)]
    remotes: Option<Vec<RemoteRecord>>,
}

/// The set of tracked checkouts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    pub repos: Vec<Repo>,
}

impl Index {
    pub fn new(repos: Vec<Repo>) -> Self {
        Self { repos }
    }

    /// Reads the index file. A missing or empty file is an empty index.
    ///
    /// Every invalid entry is reported in the returned
    /// [`Error::InvalidIndex`], not just the first one.
    pub fn load(config: &Config) -> Result<Self> {
        let text = match fs::read_to_string(&config.index_path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(err.into()),
        };
        Self::from_yaml(&text, config)
    }

    /// Parses and validates the contents of an index file.
    pub fn from_yaml(text: &str, config: &Config) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let file: IndexFile = serde_yaml::from_str(text)?;

        let mut problems = Vec::new();
        let mut repos = Vec::new();
        for (idx, record) in file.repos.unwrap_or_default().into_iter().enumerate() {
            let path = normalize_checkout_path(&record.path);
            if path.is_empty() {
                problems.push(format!("missing \"repos[{idx}].path\""));
            } else if path.split('/').any(|segment| segment == "..") {
                problems.push(format!("\"repos[{idx}].path\" leaves the root"));
            }
            let remotes = record.remotes.unwrap_or_default();
            if remotes.is_empty() {
                problems.push(format!("missing \"repos[{idx}].remotes\""));
            }
            for (idx2, remote) in remotes.iter().enumerate() {
                if remote.name.is_empty() {
                    problems.push(format!("missing \"repos[{idx}].remotes[{idx2}].name\""));
                } else if remote.url.is_empty() {
                    problems.push(format!("missing \"repos[{idx}].remotes[{idx2}].url\""));
                }
            }

            let remotes = remotes
                .into_iter()
                .map(|r| Remote::decode(r, &config.aliases))
                .collect();
            repos.push(Repo::new(path, remotes));
        }

        if !problems.is_empty() {
            return Err(Error::InvalidIndex {
                path: config.index_path.clone(),
                problems,
            });
        }

        let mut index = Self::new(repos);
        index.sort(&config.root);
        Ok(index)
    }

    /// Serializes the index in its on-disk format, in its current order.
    pub fn to_yaml(&self, aliases: &AliasTable) -> Result<String> {
        let file = IndexFile {
            repos: Some(
                self.repos
                    .iter()
                    .map(|repo| RepoRecord {
                        path: repo.checkout_path.clone(),
                        remotes: Some(repo.remotes.iter().map(|r| r.encode(aliases)).collect()),
                    })
                    .collect(),
            ),
        };
        Ok(serde_yaml::to_string(&file)?)
    }

    /// Orders the entries by absolute path. Entries with equal paths keep
    /// their relative order.
    pub fn sort(&mut self, root: &Path) {
        self.repos
            .sort_by_cached_key(|repo| repo.absolute_path(root).to_string_lossy().into_owned());
    }

    /// Sorts the index and writes it to the index file.
    ///
    /// The file is replaced atomically, so readers see either the previous
    /// or the new contents.
    pub fn persist(&mut self, config: &Config) -> Result<()> {
        self.sort(&config.root);
        let yaml = self.to_yaml(&config.aliases)?;

        let path = &config.index_path;
        let dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(yaml.as_bytes())?;
        file.as_file().sync_all()?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.as_file()
                .set_permissions(fs::Permissions::from_mode(0o644))?;
        }
        file.persist(path).map_err(|err| err.error)?;

        self.warn_about_duplicates(&config.root);
        Ok(())
    }

    fn warn_about_duplicates(&self, root: &Path) {
        let mut seen = HashSet::new();
        let mut warned = HashSet::new();
        for repo in &self.repos {
            let path = repo.checkout_path.as_str();
            if !seen.insert(path) && warned.insert(path) {
                warn!(
                    "repo {} appears multiple times in the index file!",
                    repo.absolute_path(root).display()
                );
            }
        }
    }

    /// Checkout paths of all tracked repos, sorted.
    pub fn repo_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.repos.iter().map(|r| r.checkout_path.as_str()).collect();
        paths.sort_unstable();
        paths
    }

    /// URLs of all remotes of all tracked repos, sorted.
    pub fn remote_urls(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = self
            .repos
            .iter()
            .flat_map(|repo| repo.remotes.iter().map(|r| r.url.as_str()))
            .collect();
        urls.sort_unstable();
        urls
    }

    /// Shows the status of the checkout, and after confirmation deletes it
    /// from disk and from the index. Returns whether the repo was dropped.
    pub fn drop_repo(&mut self, ws: &Workspace<'_>, repo: &Repo) -> Result<bool> {
        repo.exec(ws, &["git".to_string(), "status".to_string()])?;
        if !ws.prompt().confirm(">> Drop this repo?")? {
            return Ok(false);
        }

        let path = repo.absolute_path(ws.root());
        fs::remove_dir_all(&path)?;
        self.repos.retain(|r| r.checkout_path != repo.checkout_path);
        self.persist(ws.config())?;
        info!("dropped {}", path.display());
        Ok(true)
    }

    /// Moves the checkout at `dir`, which must be outside the root, to the
    /// place below the root matching its remotes, and starts tracking it.
    /// A symlink is left behind at the old location.
    ///
    /// The index is not persisted. Returns the new location.
    pub fn import_repo(&mut self, ws: &Workspace<'_>, dir: &Path) -> Result<PathBuf> {
        // both sides resolved, so `..` and symlinks cannot hide the location
        let dir = fs::canonicalize(dir)?;
        if dir.starts_with(fs::canonicalize(ws.root())?) {
            return Err(Error::AlreadyInsideRoot {
                path: dir,
                root: ws.root().to_path_buf(),
            });
        }

        let remotes = scan_remotes(ws, &dir)?;
        let checkout_path = match remotes.iter().find(|r| r.name == ORIGIN) {
            Some(origin) => origin.url.checkout_path()?,
            None => choose_checkout_path(ws, &dir, &remotes)?,
        };

        if let Some(other) = self.repos.iter().find(|r| r.checkout_path == checkout_path) {
            return Err(Error::AlreadyTracked {
                path: other.absolute_path(ws.root()),
            });
        }

        let mut repo = Repo::new(String::new(), remotes);
        repo.relocate(ws.root(), &dir, &checkout_path, true)?;
        let target = repo.absolute_path(ws.root());
        self.repos.push(repo);
        Ok(target)
    }
}

/// Drops empty and `.` segments, so `./github.com/foo/bar/` and
/// `github.com/foo/bar` name the same checkout.
fn normalize_checkout_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Lets the user pick one of the checkout paths derived from `remotes`.
fn choose_checkout_path(ws: &Workspace<'_>, dir: &Path, remotes: &[Remote]) -> Result<String> {
    if remotes.is_empty() {
        return Err(Error::NoRemotes {
            path: dir.to_path_buf(),
        });
    }

    let paths = remotes
        .iter()
        .map(|r| r.url.checkout_path())
        .collect::<Result<Vec<_>>>()?;
    let choices: Vec<Choice> = paths.iter().map(|p| Choice::new(p.as_str())).collect();
    let question = format!(
        "Repo has multiple remotes. Where to put below {}?",
        ws.root().display()
    );
    let selected = ws.prompt().select(&question, &choices)?;
    Ok(paths[selected].clone())
}
