//! Shared test utilities for E2E tests.
//!
//! This module provides a fixture with an isolated home directory, root and
//! index file, so that the `rtree` binary never touches the real ones.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_index(indexes::TWO_REPOS);
//!     fixture.command().arg("repos").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::indexes;
    #[allow(unused_imports)]
    pub use super::run_git;
    pub use super::TestFixture;
}

/// Index file contents for testing.
#[allow(dead_code)]
pub mod indexes {
    /// Two repos with an origin each.
    pub const TWO_REPOS: &str = "repos:
- path: github.com/git/git
  remotes:
  - name: origin
    url: https://github.com/git/git
- path: github.com/foo/bar
  remotes:
  - name: origin
    url: https://github.com/foo/bar
  - name: mine
    url: git@git.example.com:bar.git
";

    /// Two entries with every kind of structural problem.
    pub const BROKEN: &str = "repos:
- remotes:
  - name: origin
    url: https://github.com/a/b
- path: github.com/c/d
  remotes:
  - name: origin
";
}

/// A temporary directory with `home/` (also `$HOME`, with an empty
/// `.gitconfig`), `src/` (the root) and `home/.rtree/index.yaml` (the index
/// file).
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new fixture with an empty root and no index file.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("home")
            .create_dir_all()
            .expect("Failed to create home directory");
        temp_dir
            .child("src")
            .create_dir_all()
            .expect("Failed to create root directory");
        // an empty global config keeps `git config --global -l` quiet
        temp_dir
            .child("home/.gitconfig")
            .touch()
            .expect("Failed to create git config");
        Self { temp_dir }
    }

    /// Write the index file.
    pub fn with_index(self, content: &str) -> Self {
        self.temp_dir
            .child("home/.rtree/index.yaml")
            .write_str(content)
            .expect("Failed to write index file");
        self
    }

    /// Create a directory below the root that looks like a checkout.
    #[allow(dead_code)]
    pub fn with_checkout(self, checkout_path: &str) -> Self {
        self.temp_dir
            .child("src")
            .child(checkout_path)
            .child(".git")
            .create_dir_all()
            .expect("Failed to create checkout");
        self
    }

    /// Write the global git config of the fixture's home directory.
    #[allow(dead_code)]
    pub fn with_gitconfig(self, content: &str) -> Self {
        self.temp_dir
            .child("home/.gitconfig")
            .write_str(content)
            .expect("Failed to write git config");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn home(&self) -> PathBuf {
        self.path().join("home")
    }

    pub fn root(&self) -> PathBuf {
        self.path().join("src")
    }

    pub fn index_path(&self) -> PathBuf {
        self.home().join(".rtree/index.yaml")
    }

    #[allow(dead_code)]
    pub fn read_index(&self) -> String {
        std::fs::read_to_string(self.index_path()).expect("Failed to read index file")
    }

    /// Create a command for the rtree binary, isolated from the user's
    /// environment and git configuration.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rtree");
        cmd.current_dir(self.path())
            .env("HOME", self.home())
            .env("XDG_CONFIG_HOME", self.home().join(".config"))
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env("RTREE_ROOT", self.root())
            .env("RTREE_INDEX", self.index_path())
            .env("NO_COLOR", "1")
            .env_remove("GIT_CONFIG_GLOBAL")
            .env_remove("RTREE_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs git in `dir` with the fixture's isolated environment and panics if
/// it fails.
#[allow(dead_code)]
pub fn run_git(fixture: &TestFixture, dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("HOME", fixture.home())
        .env("XDG_CONFIG_HOME", fixture.home().join(".config"))
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env_remove("GIT_CONFIG_GLOBAL")
        .status()
        .expect("Failed to run git");
    assert!(status.success(), "git {args:?} failed in {}", dir.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_layout() {
        let fixture = TestFixture::new().with_index(indexes::TWO_REPOS);
        assert!(fixture.root().is_dir());
        assert!(fixture.index_path().is_file());
    }

    #[test]
    fn test_indexes_are_valid_yaml() {
        for index in [indexes::TWO_REPOS, indexes::BROKEN] {
            serde_yaml::from_str::<serde_yaml::Value>(index).expect("Index should be valid YAML");
        }
    }
}
