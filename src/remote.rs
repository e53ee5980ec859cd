//! # Remote URLs and Aliases
//!
//! Git allows abbreviating remote URLs with `url.<base>.insteadOf` directives
//! (see `man git-config`). For example, with
//!
//! ```text
//! [url "https://github.com/"]
//!     insteadOf = gh:
//! ```
//!
//! the remote `gh:foo/bar` is fetched from `https://github.com/foo/bar`.
//! rtree keeps every [`RemoteUrl`] in this fully expanded *canonical* form
//! and uses the [`AliasTable`] to move between the two representations:
//!
//! - [`AliasTable::expand`] turns user input into a canonical URL.
//! - [`AliasTable::compact`] turns a canonical URL into its shortest alias
//!   form for display.
//!
//! Both directions substitute exactly once, using the longest matching
//! prefix. A canonical URL also determines where a checkout lives below the
//! root, see [`RemoteUrl::checkout_path`].

use std::fmt;
use std::sync::LazyLock;

use log::warn;
use regex::Regex;
use url::Url;

use crate::error::{Error, Result};
use crate::exec::{Command, CommandRunner};

/// Suffix that git remote URLs conventionally carry.
pub const GIT_SUFFIX: &str = ".git";

/// Which representation of a remote URL is written into the index file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlForm {
    /// The fully expanded URL, independent of the user's git config.
    Canonical,
    /// The shortest alias form according to the current alias table.
    Compact,
}

/// The URL form used when persisting the index.
///
/// Canonical URLs make the index file independent of the `insteadOf` rules
/// that happen to be configured, so a rewrite never changes entries that
/// were not touched.
pub const PERSISTED_URL_FORM: UrlForm = UrlForm::Canonical;

/// Recognizes the scp-like syntax `[user@]example.org:path/to/repo` described
/// in the "GIT URLS" section of `man git-clone`.
static SCP_SYNTAX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[^/@:]+@)?([^/:]+\.[^/:]+):(.+)$").expect("scp syntax regex is valid")
});

/// Matches `url.<replacement>.insteadof=<alias>` in `git config -l` output.
static INSTEAD_OF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^url\.([^=]+)\.insteadof=(.+)$").expect("insteadof regex is valid")
});

/// A rewrite rule from `url.<replacement>.insteadOf = <alias>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAlias {
    pub alias: String,
    pub replacement: String,
}

impl RemoteAlias {
    pub fn new(alias: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            replacement: replacement.into(),
        }
    }
}

/// The set of alias rules in effect for one rtree invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    rules: Vec<RemoteAlias>,
}

impl AliasTable {
    pub fn new(rules: Vec<RemoteAlias>) -> Self {
        Self { rules }
    }

    /// Extracts alias rules from the output of `git config -l`.
    pub fn from_git_config(listing: &str) -> Self {
        let rules = listing
            .lines()
            .filter_map(|line| INSTEAD_OF.captures(line.trim_end()))
            .map(|caps| RemoteAlias::new(&caps[2], &caps[1]))
            .collect();
        Self { rules }
    }

    /// Reads the alias rules from the user's global git config.
    ///
    /// A global config that cannot be listed (because it does not exist, or
    /// because git is missing) is not fatal; rtree then works without
    /// aliases.
    pub fn load(runner: &dyn CommandRunner) -> Self {
        match runner.capture_stdout(&Command::git(["config", "--global", "-l"])) {
            Ok(listing) => Self::from_git_config(&listing),
            Err(err) => {
                warn!("cannot read remote aliases from global git config: {err}");
                Self::default()
            }
        }
    }

    pub fn rules(&self) -> &[RemoteAlias] {
        &self.rules
    }

    /// Expands the longest matching alias prefix of `input`.
    ///
    /// The substitution is applied once: `gh:gh:foo` with the rule
    /// `gh: -> https://github.com/` yields `https://github.com/gh:foo`.
    pub fn expand(&self, input: &str) -> RemoteUrl {
        let best = longest_match(&self.rules, |rule| &rule.alias, input);
        match best {
            Some(rule) => RemoteUrl(format!(
                "{}{}",
                rule.replacement,
                &input[rule.alias.len()..]
            )),
            None => RemoteUrl(input.to_string()),
        }
    }

    /// Substitutes the longest matching replacement prefix by its alias.
    pub fn compact(&self, url: &RemoteUrl) -> String {
        let canonical = url.as_str();
        match longest_match(&self.rules, |rule| &rule.replacement, canonical) {
            Some(rule) => format!("{}{}", rule.alias, &canonical[rule.replacement.len()..]),
            None => canonical.to_string(),
        }
    }

    /// Renders a URL in the given form.
    pub fn render(&self, url: &RemoteUrl, form: UrlForm) -> String {
        match form {
            UrlForm::Canonical => url.as_str().to_string(),
            UrlForm::Compact => self.compact(url),
        }
    }
}

/// Finds the rule whose key is the longest prefix of `input`. On ties, the
/// rule listed first wins.
fn longest_match<'a, F>(rules: &'a [RemoteAlias], key: F, input: &str) -> Option<&'a RemoteAlias>
where
    F: Fn(&RemoteAlias) -> &String,
{
    let mut best: Option<&RemoteAlias> = None;
    for rule in rules {
        let prefix = key(rule);
        if !input.starts_with(prefix.as_str()) {
            continue;
        }
        if best.is_none_or(|b| key(b).len() < prefix.len()) {
            best = Some(rule);
        }
    }
    best
}

/// A remote URL in canonical (alias-free) form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RemoteUrl(String);

impl RemoteUrl {
    /// Wraps a string that is already canonical.
    pub fn from_canonical(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The URL without a trailing `.git`.
    pub fn without_suffix(&self) -> &str {
        self.0.strip_suffix(GIT_SUFFIX).unwrap_or(&self.0)
    }

    /// Whether both URLs denote the same remote, allowing one of them to
    /// carry a trailing `.git` that the other lacks.
    pub fn matches(&self, other: &RemoteUrl) -> bool {
        let (a, b) = (self.as_str(), other.as_str());
        a == b
            || a.strip_suffix(GIT_SUFFIX) == Some(b)
            || b.strip_suffix(GIT_SUFFIX) == Some(a)
    }

    /// The last path element, without a trailing `.git`.
    ///
    /// `git@example.org:foo/bar.git` and `https://example.org/bar` both have
    /// the basename `bar`.
    pub fn basename(&self) -> &str {
        let trimmed = self.0.trim_end_matches('/');
        let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
        last.strip_suffix(GIT_SUFFIX).unwrap_or(last)
    }

    /// Derives the checkout path (relative to the root) for this remote.
    ///
    /// ```
    /// use rtree::remote::RemoteUrl;
    ///
    /// let https = RemoteUrl::from_canonical("https://example.org/foo/bar");
    /// assert_eq!(https.checkout_path().unwrap(), "example.org/foo/bar");
    ///
    /// let scp = RemoteUrl::from_canonical("git@example.org:foo/bar.git");
    /// assert_eq!(scp.checkout_path().unwrap(), "example.org/foo/bar");
    /// ```
    pub fn checkout_path(&self) -> Result<String> {
        let stripped = self.without_suffix();

        if let Some(caps) = SCP_SYNTAX.captures(stripped) {
            return self.join_segments(&caps[1], &caps[2]);
        }

        let parsed = Url::parse(stripped)?;
        self.join_segments(parsed.host_str().unwrap_or_default(), parsed.path())
    }

    /// Joins host and path into a clean relative path. Empty and `.` segments
    /// are dropped; `..` would leave the root and is rejected.
    fn join_segments(&self, host: &str, path: &str) -> Result<String> {
        let mut segments = Vec::new();
        for segment in host.split('/').chain(path.split('/')) {
            match segment {
                "" | "." => {}
                ".." => {
                    return Err(Error::InvalidRemoteUrl {
                        url: self.0.clone(),
                        message: "path must not contain \"..\"".to_string(),
                    })
                }
                _ => segments.push(segment),
            }
        }
        if segments.is_empty() {
            return Err(Error::InvalidRemoteUrl {
                url: self.0.clone(),
                message: "neither host nor path given".to_string(),
            });
        }
        Ok(segments.join("/"))
    }
}

impl fmt::Display for RemoteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
