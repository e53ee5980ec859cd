//! Default values for rtree configuration.
//!
//! This module derives the default locations of the tracked root and the
//! index file from the environment, so that the binary and the tests agree
//! on them.

use std::env;
use std::path::PathBuf;

/// Location of the index file below the home directory.
pub const INDEX_FILE_IN_HOME: &str = ".rtree/index.yaml";

/// Returns the default index file location, `$HOME/.rtree/index.yaml`.
///
/// Returns `None` if no home directory can be determined.
///
/// This can be overridden by the `--index-file` CLI flag or the
/// `RTREE_INDEX` environment variable.
pub fn default_index_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(INDEX_FILE_IN_HOME))
}

/// Returns the default tracked root, `$GOPATH/src`, matching the layout
/// that `go get` used to create.
///
/// Returns `None` if `GOPATH` is unset or empty.
///
/// This can be overridden by the `--root` CLI flag or the `RTREE_ROOT`
/// environment variable.
pub fn default_root() -> Option<PathBuf> {
    env::var_os("GOPATH")
        .filter(|gopath| !gopath.is_empty())
        .map(|gopath| PathBuf::from(gopath).join("src"))
}
