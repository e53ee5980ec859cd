//! # Error Handling
//!
//! This module defines the centralized error type for `rtree`. It uses the
//! `thiserror` library to build one `Error` enum covering every failure the
//! library can report, grouped roughly as follows:
//!
//! - **Validation errors**: a malformed index file or an incomplete
//!   environment. These carry the full list of problems so that all of them
//!   can be reported in one pass.
//! - **I/O errors**: filesystem access failures while scanning the tree,
//!   moving checkouts or writing the index.
//! - **Subprocess errors**: a `git` (or `rtree each`) command that could not
//!   be started or exited unsuccessfully, together with its command line and
//!   working directory.
//! - **User interaction errors**: an interrupted prompt, or an answer that
//!   does not match any of the offered choices.
//! - **Logical conflicts**: a destination that already exists, an ambiguous
//!   `.git` entry, a checkout that the index does not know about yet, etc.
//!
//! The `Result` type alias is used throughout the library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for rtree operations
#[derive(Error, Debug)]
pub enum Error {
    /// The index file exists but contains invalid entries.
    ///
    /// All problems are collected before this error is raised.
    #[error("index file {} is invalid:{}", path.display(), bullet_list(problems))]
    InvalidIndex {
        path: PathBuf,
        problems: Vec<String>,
    },

    /// Required environment variables are missing.
    #[error("cannot determine rtree configuration:{}", bullet_list(problems))]
    Environment { problems: Vec<String> },

    /// An external command could not be started or exited unsuccessfully.
    #[error("exec `{command}`{}: {message}", work_dir.as_ref().map(|d| format!(" in {}", d.display())).unwrap_or_default())]
    Command {
        command: String,
        work_dir: Option<PathBuf>,
        message: String,
    },

    /// The user interrupted a prompt (Ctrl-C, Esc, or end of input).
    #[error("interrupted")]
    Interrupted,

    /// The answer given to a selection prompt matches none of the choices.
    #[error("cannot match input {input:?} with available choices")]
    InvalidChoice { input: String },

    /// A remote name entered by the user cannot be used.
    #[error("invalid remote name {name:?} for {}: {message}", path.display())]
    InvalidRemoteName {
        name: String,
        path: PathBuf,
        message: String,
    },

    /// No checkout path can be derived from a remote URL.
    #[error("cannot derive checkout path from remote URL {url}: {message}")]
    InvalidRemoteUrl { url: String, message: String },

    /// Something already exists where a checkout should be moved to.
    #[error("cannot move {} to {}: target exists in filesystem", from.display(), to.display())]
    TargetExists { from: PathBuf, to: PathBuf },

    /// The `.git` entry of an indexed checkout is neither a directory nor a file.
    #[error("expected repository at {}, but is not a directory or file", path.display())]
    AmbiguousCheckout { path: PathBuf },

    /// The checkout for a requested remote exists on disk but is not indexed.
    #[error("{} already exists\n  hint: if there is a repo there, run `rtree index`", path.display())]
    AlreadyCheckedOut { path: PathBuf },

    /// The requested remote is not known to the index, and cloning is not allowed.
    #[error("no such remote in index: {url}\n  hint: you can validate the index with `rtree index`")]
    NoSuchRemote { url: String },

    /// A checkout that should be below the root is somewhere else.
    #[error("{} is not below {}", path.display(), root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },

    /// A directory to be imported is already below the root.
    #[error("{} is already inside {}\n  hint: run `rtree index` to track it", path.display(), root.display())]
    AlreadyInsideRoot { path: PathBuf, root: PathBuf },

    /// An imported repository would land on a checkout path that is already tracked.
    #[error("will not overwrite existing checkout at {}", path.display())]
    AlreadyTracked { path: PathBuf },

    /// A repository has no remotes, so no checkout path can be chosen for it.
    #[error("repository at {} has no remotes", path.display())]
    NoRemotes { path: PathBuf },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error while walking the checkout tree, wrapped from `walkdir::Error`.
    #[error("cannot scan checkout tree: {0}")]
    Walk(#[from] walkdir::Error),

    /// A YAML (de)serialization error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Whether this error means the user cancelled an interactive prompt.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Error::Interrupted)
    }
}

fn bullet_list(items: &[String]) -> String {
    items.iter().map(|item| format!("\n  - {item}")).collect()
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
