//! # Interactive Prompts
//!
//! Some operations need a decision from the user: what to do about a
//! checkout that disappeared, whether a URL is a fork of a tracked repo,
//! which name a new remote should get. These questions go through the
//! [`Prompt`] trait so that they can be answered by a human on a terminal
//! ([`TerminalPrompt`], built on `dialoguer`) or by a line-oriented script
//! ([`LinePrompt`], used when stdin is a pipe and in tests).
//!
//! Prompts never write to stdout.

use std::cell::RefCell;
use std::io::{self, BufRead, IsTerminal, Write};

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

use crate::error::{Error, Result};

/// One of the answers offered by [`Prompt::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Single key that picks this choice, if any.
    pub shortcut: Option<char>,
    pub text: String,
}

impl Choice {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            shortcut: None,
            text: text.into(),
        }
    }

    pub fn with_shortcut(mut self, shortcut: char) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    fn label(&self) -> String {
        match self.shortcut {
            Some(key) => format!("[{key}] {}", self.text),
            None => self.text.clone(),
        }
    }
}

/// Trait for asking the user questions - allows scripting in tests
pub trait Prompt {
    /// Reads one line of free-form input.
    fn read_line(&self, prompt: &str) -> Result<String>;

    /// Asks a yes/no question.
    fn confirm(&self, question: &str) -> Result<bool>;

    /// Lets the user pick one of `choices` and returns its position.
    fn select(&self, prompt: &str, choices: &[Choice]) -> Result<usize>;
}

/// Picks the prompt implementation fitting the process's stdin.
pub fn for_stdin() -> Box<dyn Prompt> {
    if io::stdin().is_terminal() {
        Box::new(TerminalPrompt::default())
    } else {
        Box::new(LinePrompt::new(io::stdin().lock(), io::stderr()))
    }
}

/// Prompts rendered with `dialoguer` on the terminal (stderr).
#[derive(Default)]
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl TerminalPrompt {
    /// Prints every line but the last one of a multi-line prompt and
    /// returns the last line, which dialoguer shows next to the input.
    fn split_prompt(prompt: &str) -> String {
        let mut lines: Vec<&str> = prompt.trim_end().lines().collect();
        let last = lines.pop().unwrap_or_default();
        for line in lines {
            eprintln!("{line}");
        }
        last.trim_end_matches(':').to_string()
    }
}

fn from_dialoguer(err: dialoguer::Error) -> Error {
    let dialoguer::Error::IO(err) = err;
    if err.kind() == io::ErrorKind::Interrupted {
        Error::Interrupted
    } else {
        Error::Io(err)
    }
}

impl Prompt for TerminalPrompt {
    fn read_line(&self, prompt: &str) -> Result<String> {
        let prompt = Self::split_prompt(prompt);
        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(from_dialoguer)?;
        Ok(answer.trim().to_string())
    }

    fn confirm(&self, question: &str) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(question.trim())
            .interact_opt()
            .map_err(from_dialoguer)?
            .ok_or(Error::Interrupted)
    }

    fn select(&self, prompt: &str, choices: &[Choice]) -> Result<usize> {
        let items: Vec<String> = choices.iter().map(Choice::label).collect();
        Select::with_theme(&self.theme)
            .with_prompt(prompt.trim_end())
            .items(&items)
            .default(0)
            .interact_opt()
            .map_err(from_dialoguer)?
            .ok_or(Error::Interrupted)
    }
}

/// Prompts answered line by line from a reader.
///
/// Each question and its answer are echoed to `echo`, so that a transcript
/// of the session remains visible even though the input is not typed.
pub struct LinePrompt<R, W> {
    input: RefCell<R>,
    echo: RefCell<W>,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, echo: W) -> Self {
        Self {
            input: RefCell::new(input),
            echo: RefCell::new(echo),
        }
    }

    fn next_line(&self) -> Result<String> {
        let mut line = String::new();
        let read = self.input.borrow_mut().read_line(&mut line)?;
        if read == 0 {
            return Err(Error::Interrupted);
        }
        Ok(line.trim().to_string())
    }

    fn say(&self, text: &str) -> Result<()> {
        writeln!(self.echo.borrow_mut(), "{text}")?;
        Ok(())
    }
}

impl<R> LinePrompt<R, Vec<u8>> {
    /// Everything echoed so far.
    pub fn transcript(&self) -> String {
        String::from_utf8_lossy(&self.echo.borrow()).into_owned()
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn read_line(&self, prompt: &str) -> Result<String> {
        let answer = self.next_line()?;
        self.say(&format!("{} {answer}", prompt.trim()))?;
        Ok(answer)
    }

    fn confirm(&self, question: &str) -> Result<bool> {
        let answer = self.next_line()?;
        let yes = matches!(
            answer.to_ascii_lowercase().as_str(),
            "y" | "yes" | "t" | "true" | "1"
        );
        self.say(&format!(
            "{} -> {} ({answer})",
            question.trim(),
            if yes { "yes" } else { "no" }
        ))?;
        Ok(yes)
    }

    fn select(&self, prompt: &str, choices: &[Choice]) -> Result<usize> {
        let answer = self.next_line()?;
        let prompt = prompt.trim_end();

        let by_text = choices.iter().position(|c| c.text.trim() == answer);
        let by_shortcut = || {
            let mut chars = answer.chars();
            match (chars.next(), chars.next()) {
                (Some(key), None) => choices.iter().position(|c| c.shortcut == Some(key)),
                _ => None,
            }
        };

        match by_text.or_else(by_shortcut) {
            Some(idx) => {
                self.say(&format!("{prompt} -> {}", choices[idx].text.trim()))?;
                Ok(idx)
            }
            None => {
                self.say(&format!("{prompt} -> [{answer}]"))?;
                Err(Error::InvalidChoice { input: answer })
            }
        }
    }
}
