//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the `rtree`
//! command-line tool. Each subcommand is defined in its own file to keep the
//! logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments, derived
//!   using `clap` (commands without arguments have none).
//! - An `execute` function that takes the parsed `Args`, the [`Session`] and
//!   the loaded index, and calls into the `rtree` library.
//!
//! The index is loaded before any command runs, so that a broken index file
//! is reported no matter which command was requested.

pub mod drop;
pub mod each;
pub mod get;
pub mod import;
pub mod index;
pub mod list;

use anyhow::Result;

use rtree::config::{Config, Overrides};
use rtree::exec::SystemRunner;
use rtree::index::Index;
use rtree::prompt::{self, Prompt};
use rtree::workspace::Workspace;

use crate::cli::GlobalArgs;

/// Everything a command needs besides the index.
pub struct Session {
    config: Config,
    runner: SystemRunner,
    prompt: Box<dyn Prompt>,
}

impl Session {
    /// Builds the configuration and loads the index.
    pub fn open(globals: &GlobalArgs) -> Result<(Self, Index)> {
        let runner = SystemRunner;
        let overrides = Overrides {
            root: globals.root.clone(),
            index_path: globals.index_file.clone(),
        };
        let config = Config::from_env(overrides, &runner)?;
        let index = Index::load(&config)?;

        let session = Self {
            config,
            runner,
            prompt: prompt::for_stdin(),
        };
        Ok((session, index))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn workspace(&self) -> Workspace<'_> {
        Workspace::new(&self.config, &self.runner, self.prompt.as_ref())
    }
}
