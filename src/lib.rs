//! # rtree
//!
//! rtree keeps all git checkouts of a user in one tree below a root
//! directory (by default `$GOPATH/src`). The location of each checkout is
//! derived from its remote URL, so `https://github.com/git/git` lives at
//! `<root>/github.com/git/git`. An index file records which checkouts exist
//! and which remotes they have, so that the tree can be restored on another
//! machine.
//!
//! This library implements everything the `rtree` binary does. It is
//! organized around a few concepts:
//!
//! - **Remote URLs (`remote`)**: Expansion and contraction of URL aliases
//!   (git's `url.<base>.insteadOf`) and derivation of checkout paths.
//! - **Repositories (`repository`)**: One tracked checkout with its remotes,
//!   and the operations acting on it (clone, move, run a command).
//! - **The index (`index`)**: Loading, validating and persisting the index
//!   file, plus dropping and importing checkouts.
//! - **Reconciliation (`reconcile`)**: Aligning the index with the checkouts
//!   found on disk.
//! - **Resolution (`resolve`)**: Finding (or cloning) the checkout for a
//!   remote URL, including detection of forks.
//!
//! All side effects on the outside world go through two traits:
//! [`exec::CommandRunner`] runs subprocesses and [`prompt::Prompt`] asks the
//! user questions. Both are bundled with the [`config::Config`] into a
//! [`workspace::Workspace`] that every operation receives.
//!
//! ## Quick Example
//!
//! ```
//! use rtree::remote::{AliasTable, RemoteAlias};
//!
//! let aliases = AliasTable::new(vec![RemoteAlias::new("gh:", "https://github.com/")]);
//! let url = aliases.expand("gh:git/git");
//! assert_eq!(url.as_str(), "https://github.com/git/git");
//! assert_eq!(url.checkout_path().unwrap(), "github.com/git/git");
//! assert_eq!(aliases.compact(&url), "gh:git/git");
//! ```

pub mod config;
pub mod defaults;
pub mod error;
pub mod exec;
pub mod index;
pub mod output;
pub mod prompt;
pub mod reconcile;
pub mod remote;
pub mod repository;
pub mod resolve;
pub mod workspace;

pub use error::{Error, Result};

#[cfg(test)]
mod remote_proptest;
#[cfg(test)]
mod test_support;
