//! Configuration loading and merging
//!
//! Handles loading from config files, environment variables, and CLI arguments
//! with proper precedence (CLI > Env > File > Defaults).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod loader;
pub mod merge;

pub use loader::load_config;
pub use merge::{merge_cli_with_config, CliOverrides};

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_IGNORE_FILE: &str = ".gitignore";
pub const DEFAULT_MATCH_MIME: &str = "text/.*";
pub const DEFAULT_MILESTONE_EVERY: u64 = 100;

/// Settings for one counting run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Model identifier resolved to a token encoding
    pub model: String,
    /// Ignore-pattern file, relative to the target directory
    pub ignore_file: PathBuf,
    /// Regex tested against each file's content-type label
    pub match_mime: String,
    /// Worker threads; 0 uses the available parallelism
    pub jobs: usize,
    /// Log every Nth handled file of a content type; 0 disables
    pub milestone_every: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            ignore_file: PathBuf::from(DEFAULT_IGNORE_FILE),
            match_mime: DEFAULT_MATCH_MIME.to_string(),
            jobs: 0,
            milestone_every: DEFAULT_MILESTONE_EVERY,
        }
    }
}
