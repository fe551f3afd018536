//! Error types for tokencount
//!
//! Only conditions that end a run live here: a bad `--match-mime` pattern, a
//! model the tokenizer does not know, and traversal failures. Per-file read
//! errors are contained inside their task and never surface as a `CountError`.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal error for a counting run
#[derive(Error, Debug)]
pub enum CountError {
    /// The content-type filter did not compile
    #[error("invalid match pattern '{pattern}': {source}")]
    InvalidMimePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The tokenizer has no encoding for this model identifier
    #[error("unknown model '{model}' (run `tokencount models` for the list)")]
    UnknownModel { model: String },

    /// The target is missing or is not a directory
    #[error("not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// Traversal failed at the root or any subdirectory
    #[error("walk failed at {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// The worker pool could not be started
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, CountError>;
