//! # Workspace Context
//!
//! A [`Workspace`] bundles what one rtree invocation works with: the
//! [`Config`], the command runner and the prompt. Library operations take a
//! `&Workspace` instead of reaching for globals, which keeps them testable in
//! isolation.

use std::cell::Cell;
use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::exec::{Command, CommandRunner, StdoutMode};
use crate::prompt::Prompt;
use crate::remote::AliasTable;

pub struct Workspace<'a> {
    config: &'a Config,
    runner: &'a dyn CommandRunner,
    prompt: &'a dyn Prompt,
    stdout_protected: Cell<bool>,
}

impl<'a> Workspace<'a> {
    pub fn new(config: &'a Config, runner: &'a dyn CommandRunner, prompt: &'a dyn Prompt) -> Self {
        Self {
            config,
            runner,
            prompt,
            stdout_protected: Cell::new(false),
        }
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.config.aliases
    }

    pub fn prompt(&self) -> &dyn Prompt {
        self.prompt
    }

    /// From now on, commands started through this workspace write their
    /// stdout to stderr. Used when stdout carries a result that another
    /// program consumes.
    pub fn protect_stdout(&self) {
        self.stdout_protected.set(true);
    }

    pub fn is_stdout_protected(&self) -> bool {
        self.stdout_protected.get()
    }

    /// Runs a command, honoring stdout protection.
    pub fn run(&self, command: &Command) -> Result<()> {
        let mode = if self.is_stdout_protected() {
            StdoutMode::Stderr
        } else {
            StdoutMode::Inherit
        };
        self.runner.run(command, mode)
    }

    /// Runs a command and returns what it printed to stdout.
    pub fn capture_stdout(&self, command: &Command) -> Result<String> {
        self.runner.capture_stdout(command)
    }
}
