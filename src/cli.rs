//! CLI argument parsing and command dispatch

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use rtree::output::{self, OutputConfig};

use crate::commands::{self, Session};

const USAGE: &str = "rtree [get|drop] <url>
       rtree [index|repos|remotes]
       rtree import <path>
       rtree each <command>";

/// rtree - Keep all your git checkouts in one tree
#[derive(Parser, Debug)]
#[command(name = "rtree")]
#[command(version, about, long_about = None, override_usage = USAGE)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    globals: GlobalArgs,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level
    #[arg(long, global = true, value_name = "LEVEL", value_enum, default_value = "info", env = "RTREE_LOG")]
    log_level: LogLevel,
}

/// Verbosity of the diagnostics on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Locations that override the defaults derived from the environment.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// The directory below which all checkouts live.
    ///
    /// Defaults to `$GOPATH/src`.
    #[arg(long, global = true, value_name = "DIR", env = "RTREE_ROOT")]
    pub root: Option<PathBuf>,

    /// The index file.
    ///
    /// Defaults to `$HOME/.rtree/index.yaml`.
    #[arg(long, global = true, value_name = "FILE", env = "RTREE_INDEX")]
    pub index_file: Option<PathBuf>,
}

// every subcommand shows the same synopsis in its errors
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the checkout path for a remote URL, cloning it if necessary
    #[command(override_usage = USAGE)]
    Get(commands::get::GetArgs),

    /// Delete the checkout for a remote URL from disk and from the index
    #[command(override_usage = USAGE)]
    Drop(commands::drop::DropArgs),

    /// Reconcile the index with the checkouts on disk
    #[command(override_usage = USAGE)]
    Index,

    /// List the checkout paths of all tracked repos
    #[command(override_usage = USAGE)]
    Repos,

    /// List the remote URLs of all tracked repos
    #[command(override_usage = USAGE)]
    Remotes,

    /// Move an existing checkout into the tree and track it
    #[command(override_usage = USAGE)]
    Import(commands::import::ImportArgs),

    /// Run a command in every tracked checkout
    #[command(override_usage = USAGE)]
    Each(commands::each::EachArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let output = OutputConfig::from_env_and_flag(&self.color);
        output.apply();
        init_logging(self.log_level.into());

        let (session, index) = Session::open(&self.globals)?;
        match self.command {
            Commands::Get(args) => commands::get::execute(args, &session, index),
            Commands::Drop(args) => commands::drop::execute(args, &session, index),
            Commands::Index => commands::index::execute(&session, index),
            Commands::Repos => commands::list::execute_repos(&index),
            Commands::Remotes => commands::list::execute_remotes(&index),
            Commands::Import(args) => commands::import::execute(args, &session, index),
            Commands::Each(args) => commands::each::execute(args, &session, &index),
        }
    }
}

/// Sends log records to stderr, without timestamps or module names. Info
/// records are progress messages and are printed without a level label.
fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .format(|buf, record| match output::level_label(record.level()) {
            Some(label) => writeln!(buf, "{label} {}", record.args()),
            None => writeln!(buf, "{}", record.args()),
        })
        .init();
}
