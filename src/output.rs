//! # Output Configuration
//!
//! rtree writes results (paths, URL listings) to stdout and everything else
//! to stderr. This module decides whether the stderr side gets colors and
//! provides the styled labels used for diagnostics.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use std::env;

use console::{style, StyledObject};
use log::Level;

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether diagnostics should be colored.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// # Arguments
    /// * `color_flag` - The value of the --color CLI flag: "always", "never", or "auto"
    ///
    /// In auto mode, colors are disabled if:
    /// - `NO_COLOR` environment variable is set (any value, including empty)
    /// - `CLICOLOR=0` is set
    /// - `TERM=dumb` is set
    /// - stderr is not a TTY (unless `CLICOLOR_FORCE=1`)
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // presence alone disables, see https://no-color.org/
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stderr().features().colors_supported()
    }

    /// Makes `console` (and thus dialoguer) follow this configuration.
    pub fn apply(&self) {
        console::set_colors_enabled(self.use_color);
        console::set_colors_enabled_stderr(self.use_color);
    }
}

/// The `error:` prefix of fatal diagnostics.
pub fn error_label() -> StyledObject<&'static str> {
    style("error:").red().bold().for_stderr()
}

/// The prefix shown before a log message, if any. Info messages are
/// progress output and are shown without a prefix.
pub fn level_label(level: Level) -> Option<StyledObject<&'static str>> {
    match level {
        Level::Error => Some(error_label()),
        Level::Warn => Some(style("warning:").yellow().bold().for_stderr()),
        Level::Info => None,
        Level::Debug => Some(style("debug:").dim().for_stderr()),
        Level::Trace => Some(style("trace:").dim().for_stderr()),
    }
}
