//! # Runtime Configuration
//!
//! All process-wide settings of rtree live in one [`Config`] value that is
//! built once at startup and passed to every operation. Nothing in the
//! library reads the environment behind the caller's back, so tests can
//! construct a `Config` pointing at a temporary directory.

use std::path::{Path, PathBuf};

use crate::defaults;
use crate::error::{Error, Result};
use crate::exec::CommandRunner;
use crate::remote::AliasTable;

/// Settings for one rtree invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory below which all checkouts live.
    pub root: PathBuf,
    /// Location of the index file.
    pub index_path: PathBuf,
    /// Remote URL aliases from the global git config.
    pub aliases: AliasTable,
}

/// Explicitly requested locations, typically from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub root: Option<PathBuf>,
    pub index_path: Option<PathBuf>,
}

impl Config {
    pub fn new(root: impl Into<PathBuf>, index_path: impl Into<PathBuf>, aliases: AliasTable) -> Self {
        Self {
            root: root.into(),
            index_path: index_path.into(),
            aliases,
        }
    }

    /// Builds the configuration from overrides, falling back to the
    /// environment defaults, and loads the alias table through `runner`.
    ///
    /// All missing settings are reported at once.
    pub fn from_env(overrides: Overrides, runner: &dyn CommandRunner) -> Result<Self> {
        let mut problems = Vec::new();

        let index_path = overrides.index_path.or_else(defaults::default_index_path);
        if index_path.is_none() {
            problems.push(
                "$HOME is not set (rtree needs the HOME variable to locate its index file)"
                    .to_string(),
            );
        }

        let root = overrides.root.or_else(defaults::default_root);
        if root.is_none() {
            problems.push(
                "$GOPATH is not set (rtree needs the GOPATH variable to know where to look for and place repos)"
                    .to_string(),
            );
        }

        match (root, index_path) {
            (Some(root), Some(index_path)) => {
                // commands run with explicit work dirs, so relative
                // locations are resolved once here
                let root = std::path::absolute(root)?;
                let index_path = std::path::absolute(index_path)?;
                Ok(Self::new(root, index_path, AliasTable::load(runner)))
            }
            _ => Err(Error::Environment { problems }),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
