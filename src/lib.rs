//! tokencount: count language-model tokens across a directory tree
//!
//! Walks a directory, classifies every non-ignored file by content, and sums
//! the token counts of the files whose content type matches a filter. File
//! tasks run concurrently on a bounded worker pool and report into a shared
//! [`pipeline::Aggregator`].

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod scan;
pub mod utils;

pub use config::Config;
pub use error::{CountError, Result};
pub use pipeline::{Aggregator, RunCoordinator, RunState, Snapshot};
