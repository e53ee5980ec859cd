//! # Repository Entities
//!
//! A [`Repo`] is one tracked checkout: its path relative to the root and the
//! remotes configured in it. A `Repo` is created either by scanning an
//! existing checkout ([`Repo::from_absolute_path`]) or from a remote URL
//! before anything exists on disk ([`Repo::from_remote_url`]).
//!
//! This module also contains the operations that act on a single checkout:
//! cloning it ([`Repo::checkout`]), moving it ([`Repo::move_to`]), running a
//! command in it ([`Repo::exec`]), and the walk over all checkouts below the
//! root ([`for_each_physical_repo`]).

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::exec::{git_in, Command};
use crate::remote::{AliasTable, RemoteUrl, PERSISTED_URL_FORM};
use crate::workspace::Workspace;

/// Name of the remote that a checkout is cloned from.
pub const ORIGIN: &str = "origin";

/// Entry whose presence marks a directory as a git checkout. It is a
/// directory in a regular checkout and a file for submodules with an
/// absorbed git dir.
pub const GIT_MARKER: &str = ".git";

/// Matches `remote.<name>.url=<url>` in `git config -l` output.
static REMOTE_URL_CONFIG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^remote\.([^=]+)\.url=(.+)$").expect("remote url regex is valid")
});

/// A remote as stored in the index file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// A named remote of a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub url: RemoteUrl,
}

impl Remote {
    pub fn new(name: impl Into<String>, url: RemoteUrl) -> Self {
        Self {
            name: name.into(),
            url,
        }
    }

    /// Converts this remote into its on-disk representation.
    pub fn encode(&self, aliases: &AliasTable) -> RemoteRecord {
        RemoteRecord {
            name: self.name.clone(),
            url: aliases.render(&self.url, PERSISTED_URL_FORM),
        }
    }

    /// Reads a remote from its on-disk representation, expanding aliases.
    pub fn decode(record: RemoteRecord, aliases: &AliasTable) -> Self {
        Self {
            url: aliases.expand(&record.url),
            name: record.name,
        }
    }
}

/// A tracked checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repo {
    /// Path of the checkout relative to the root, with `/` separators.
    pub checkout_path: String,
    pub remotes: Vec<Remote>,
}

impl Repo {
    pub fn new(checkout_path: impl Into<String>, remotes: Vec<Remote>) -> Self {
        Self {
            checkout_path: checkout_path.into(),
            remotes,
        }
    }

    pub fn absolute_path(&self, root: &Path) -> PathBuf {
        root.join(&self.checkout_path)
    }

    /// Location of the `.git` entry of this checkout.
    pub fn marker_path(&self, root: &Path) -> PathBuf {
        self.absolute_path(root).join(GIT_MARKER)
    }

    pub fn remote(&self, name: &str) -> Option<&Remote> {
        self.remotes.iter().find(|remote| remote.name == name)
    }

    pub fn origin(&self) -> Option<&Remote> {
        self.remote(ORIGIN)
    }

    /// Scans the existing checkout at `path`, which must be below the root.
    pub fn from_absolute_path(ws: &Workspace<'_>, path: &Path) -> Result<Self> {
        let relative = path.strip_prefix(ws.root()).map_err(|_| Error::OutsideRoot {
            path: path.to_path_buf(),
            root: ws.root().to_path_buf(),
        })?;
        let checkout_path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let remotes = scan_remotes(ws, path)?;
        Ok(Self::new(checkout_path, remotes))
    }

    /// Prepares the entry for a first-time checkout of `url` as `origin`.
    /// Nothing happens on disk until [`Repo::checkout`] is called.
    pub fn from_remote_url(url: RemoteUrl) -> Result<Self> {
        let checkout_path = url.checkout_path()?;
        Ok(Self::new(checkout_path, vec![Remote::new(ORIGIN, url)]))
    }

    /// Creates the checkout with all of its remotes. The working copy is
    /// only populated if there is an `origin` remote to clone from.
    pub fn checkout(&self, ws: &Workspace<'_>) -> Result<()> {
        let path = self.absolute_path(ws.root());
        let target = path.to_string_lossy().into_owned();

        match self.origin() {
            Some(origin) => {
                ws.run(&Command::git(["clone", origin.url.as_str(), target.as_str()]))?;
            }
            None => {
                ws.run(&Command::git(["init", target.as_str()]))?;
                warn!("will not checkout anything since there is no remote named \"{ORIGIN}\"");
            }
        }

        let mut added = false;
        for remote in self.remotes.iter().filter(|r| r.name != ORIGIN) {
            ws.run(&git_in(
                &path,
                ["remote", "add", remote.name.as_str(), remote.url.as_str()],
            ))?;
            added = true;
        }
        if added {
            ws.run(&git_in(&path, ["remote", "update"]))?;
        }
        Ok(())
    }

    /// Runs an arbitrary command inside the checkout.
    pub fn exec(&self, ws: &Workspace<'_>, argv: &[String]) -> Result<()> {
        let path = self.absolute_path(ws.root());
        info!(">> {}", path.display());
        ws.run(&Command::new(argv.iter().cloned()).in_dir(path))
    }

    /// Moves the checkout to `checkout_path` below the root. With
    /// `make_symlink`, the old location becomes a symlink to the new one.
    pub fn move_to(&mut self, root: &Path, checkout_path: &str, make_symlink: bool) -> Result<()> {
        let source = self.absolute_path(root);
        self.relocate(root, &source, checkout_path, make_symlink)
    }

    /// Moves the checkout currently located at `source` (which may be outside
    /// the root) to `checkout_path` below the root.
    pub fn relocate(
        &mut self,
        root: &Path,
        source: &Path,
        checkout_path: &str,
        make_symlink: bool,
    ) -> Result<()> {
        let target = root.join(checkout_path);

        match fs::symlink_metadata(&target) {
            Ok(_) => {
                return Err(Error::TargetExists {
                    from: source.to_path_buf(),
                    to: target,
                })
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(source, &target)?;
        self.checkout_path = checkout_path.to_string();

        if make_symlink {
            symlink_dir(&target, source)?;
        }
        Ok(())
    }
}

/// Lists the remotes configured in the checkout at `dir`.
///
/// When git reports several URLs for one remote name, the first one wins.
pub(crate) fn scan_remotes(ws: &Workspace<'_>, dir: &Path) -> Result<Vec<Remote>> {
    let listing = ws.capture_stdout(&git_in(dir, ["config", "-l"]))?;

    let mut seen = HashSet::new();
    let mut remotes = Vec::new();
    for caps in listing
        .lines()
        .filter_map(|line| REMOTE_URL_CONFIG.captures(line.trim_end()))
    {
        let name = &caps[1];
        if !seen.insert(name.to_string()) {
            debug!("ignoring additional URL for remote {name} in {}", dir.display());
            continue;
        }
        remotes.push(Remote::new(name, ws.aliases().expand(&caps[2])));
    }
    Ok(remotes)
}

/// Whether `dir` contains a `.git` directory or file.
fn has_git_marker(dir: &Path) -> bool {
    fs::metadata(dir.join(GIT_MARKER)).is_ok()
}

/// Walks the tree below the root and calls `visit` for every checkout
/// found, in file name order.
///
/// The walk does not descend into checkouts, so submodules and other
/// nested repositories are not reported. Symlinks are not followed.
pub fn for_each_physical_repo<F>(ws: &Workspace<'_>, mut visit: F) -> Result<()>
where
    F: FnMut(Repo) -> Result<()>,
{
    let mut walker = WalkDir::new(ws.root()).sort_by_file_name().into_iter();
    while let Some(entry) = walker.next() {
        let entry = entry?;
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            continue;
        }
        if !has_git_marker(entry.path()) {
            continue;
        }

        walker.skip_current_dir();
        let repo = Repo::from_absolute_path(ws, entry.path())?;
        visit(repo)?;
    }
    Ok(())
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}
