//! Helpers shared by the unit tests: a command runner that replays a
//! recorded command sequence, scripted prompts, and a temporary root.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::Config;
use crate::error::Result;
use crate::exec::{Command, CommandRunner, StdoutMode};
use crate::index::Index;
use crate::prompt::LinePrompt;
use crate::remote::{AliasTable, RemoteAlias, RemoteUrl};
use crate::repository::{Remote, Repo};

/// One command the code under test is expected to run next.
#[derive(Debug)]
pub struct Recorded {
    command: Command,
    stdout: String,
    fails: bool,
}

impl Recorded {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            stdout: String::new(),
            fails: false,
        }
    }

    pub fn with_stdout(mut self, stdout: &str) -> Self {
        self.stdout = stdout.to_string();
        self
    }

    pub fn failing(mut self) -> Self {
        self.fails = true;
        self
    }
}

/// Runner that checks every command against a recorded sequence instead of
/// executing it.
#[derive(Debug, Default)]
pub struct ReplayRunner {
    expected: RefCell<VecDeque<Recorded>>,
    modes: RefCell<Vec<StdoutMode>>,
}

impl ReplayRunner {
    pub fn new(expected: Vec<Recorded>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
            modes: RefCell::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The stdout modes of all `run` calls so far.
    pub fn stdout_modes(&self) -> Vec<StdoutMode> {
        self.modes.borrow().clone()
    }

    pub fn assert_exhausted(&self) {
        let left = self.expected.borrow();
        assert!(left.is_empty(), "recorded commands were not run: {left:?}");
    }

    fn replay(&self, command: &Command) -> Result<String> {
        let next = self.expected.borrow_mut().pop_front();
        match next {
            None => Err(command.error("unexpected command, all recorded commands were replayed")),
            Some(recorded) if recorded.command != *command => {
                Err(command.error(format!("expected {} instead", recorded.command)))
            }
            Some(recorded) if recorded.fails => Err(command.error("exit status: 1")),
            Some(recorded) => Ok(recorded.stdout),
        }
    }
}

impl CommandRunner for ReplayRunner {
    fn run(&self, command: &Command, stdout: StdoutMode) -> Result<()> {
        self.modes.borrow_mut().push(stdout);
        self.replay(command).map(|_| ())
    }

    fn capture_stdout(&self, command: &Command) -> Result<String> {
        self.replay(command)
    }
}

pub type ScriptedPrompt = LinePrompt<Cursor<Vec<u8>>, Vec<u8>>;

/// A prompt answering with the given lines.
pub fn scripted(input: &str) -> ScriptedPrompt {
    LinePrompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

/// `gh:` for GitHub over HTTPS and `my/` for a private SSH host.
pub fn test_aliases() -> AliasTable {
    AliasTable::new(vec![
        RemoteAlias::new("gh:", "https://github.com/"),
        RemoteAlias::new("my/", "git@git.example.com:"),
    ])
}

pub fn remote(name: &str, url: &str) -> Remote {
    Remote::new(name, RemoteUrl::from_canonical(url))
}

pub fn origin_only(checkout_path: &str, url: &str) -> Repo {
    Repo::new(checkout_path, vec![remote("origin", url)])
}

/// A temporary directory holding a root (`src/`) and an index file location.
pub struct Fixture {
    pub temp: TempDir,
    pub config: Config,
}

impl Fixture {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("create temp dir");
        let root = temp.path().join("src");
        fs::create_dir_all(&root).expect("create root");
        let index_path = temp.path().join("home/.rtree/index.yaml");
        let config = Config::new(root, index_path, test_aliases());
        Self { temp, config }
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    pub fn abs(&self, checkout_path: &str) -> PathBuf {
        self.config.root.join(checkout_path)
    }

    /// Creates a directory with an empty `.git` directory below the root.
    pub fn make_checkout(&self, checkout_path: &str) -> PathBuf {
        let path = self.abs(checkout_path);
        fs::create_dir_all(path.join(".git")).expect("create checkout");
        path
    }

    pub fn write_index(&self, yaml: &str) {
        let path = &self.config.index_path;
        fs::create_dir_all(path.parent().expect("index has parent")).expect("create index dir");
        fs::write(path, yaml).expect("write index");
    }

    pub fn read_index(&self) -> String {
        fs::read_to_string(&self.config.index_path).expect("read index")
    }

    /// `github.com/foo/bar` and `github.com/git/git`, both with an origin.
    pub fn sample_index(&self) -> Index {
        Index::new(vec![
            origin_only("github.com/foo/bar", "https://github.com/foo/bar"),
            origin_only("github.com/git/git", "https://github.com/git/git"),
        ])
    }
}
