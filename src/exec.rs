//! # External Commands
//!
//! Every subprocess rtree starts (mostly `git`, plus whatever the user passes
//! to `rtree each`) is described by a [`Command`] and executed through the
//! [`CommandRunner`] trait. The default [`SystemRunner`] spawns real
//! processes; tests substitute a scripted runner that checks the exact
//! sequence of commands instead.
//!
//! A command always names its working directory explicitly. rtree never
//! relies on (or changes) the working directory of its own process.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{self, Stdio};

use log::debug;

use crate::error::{Error, Result};

/// A command line together with the directory to run it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub program: Vec<String>,
    pub work_dir: Option<PathBuf>,
}

impl Command {
    pub fn new<I, S>(program: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into_iter().map(Into::into).collect(),
            work_dir: None,
        }
    }

    /// A `git` invocation with the given arguments.
    pub fn git<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut program = vec!["git".to_string()];
        program.extend(args.into_iter().map(Into::into));
        Self {
            program,
            work_dir: None,
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    /// The command line joined by spaces, for diagnostics.
    pub fn command_line(&self) -> String {
        self.program.join(" ")
    }

    /// Builds an [`Error::Command`] describing a failure of this command.
    pub fn error(&self, message: impl Into<String>) -> Error {
        Error::Command {
            command: self.command_line(),
            work_dir: self.work_dir.clone(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`", self.command_line())?;
        if let Some(dir) = &self.work_dir {
            write!(f, " in {}", dir.display())?;
        }
        Ok(())
    }
}

/// Where the standard output of a non-captured command goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdoutMode {
    /// Share rtree's stdout.
    #[default]
    Inherit,
    /// Send it to rtree's stderr, keeping stdout free for results.
    Stderr,
}

/// Trait for running external commands - allows scripting in tests
pub trait CommandRunner {
    /// Runs the command with inherited stdin and stderr.
    fn run(&self, command: &Command, stdout: StdoutMode) -> Result<()>;

    /// Runs the command with inherited stdin and stderr and returns its stdout.
    fn capture_stdout(&self, command: &Command) -> Result<String>;
}

/// The default implementation of `CommandRunner`, which spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn prepare(command: &Command) -> Result<process::Command> {
        let (program, args) = command
            .program
            .split_first()
            .ok_or_else(|| command.error("empty command line"))?;
        let mut cmd = process::Command::new(program);
        cmd.args(args);
        if let Some(dir) = command.work_dir.as_deref() {
            cmd.current_dir(dir);
        }
        debug!("running {command}");
        Ok(cmd)
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, command: &Command, stdout: StdoutMode) -> Result<()> {
        let mut cmd = Self::prepare(command)?;
        if stdout == StdoutMode::Stderr {
            cmd.stdout(Stdio::from(io::stderr()));
        }
        let status = cmd.status().map_err(|e| command.error(e.to_string()))?;
        if !status.success() {
            return Err(command.error(status.to_string()));
        }
        Ok(())
    }

    fn capture_stdout(&self, command: &Command) -> Result<String> {
        let mut cmd = Self::prepare(command)?;
        let output = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| command.error(e.to_string()))?;
        if !output.status.success() {
            return Err(command.error(output.status.to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Shorthand for the directory-bound `git` commands used on checkouts.
pub fn git_in<I, S>(dir: &Path, args: I) -> Command
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Command::git(args).in_dir(dir)
}
