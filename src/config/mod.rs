//! Configuration management for yard
//!
//! Settings that seed the command context before any command-line flag is
//! applied. Values are layered from built-in defaults, the user's
//! `~/.yard/config.toml`, the repository's `yard.toml`, and `YARD_`
//! environment variables, in increasing priority.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::logging::Severity;
use crate::parser::ParserType;

mod core;

pub use self::core::{REPO_CONFIG_FILE, user_config_path};

/// Main configuration structure for yard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YardConfig {
    /// Initial log severity
    pub log_level: Severity,

    /// Show backtraces when reporting errors
    pub backtrace: bool,

    /// Source parser used by the documentation pipeline
    pub parser: ParserType,

    /// Extra directories searched by `--load`, before the working directory
    pub load_path: Vec<PathBuf>,
}

impl YardConfig {
    /// Load path handed to the script loader; the working directory is always last
    pub fn effective_load_path(&self) -> Vec<PathBuf> {
        let mut load_path = self.load_path.clone();
        load_path.push(PathBuf::from("."));
        load_path
    }
}
