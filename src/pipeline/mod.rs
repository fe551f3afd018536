//! Concurrent counting pipeline
//!
//! Walker -> one task per file on a bounded pool -> Aggregator -> Snapshot.

pub mod aggregate;
pub mod dispatch;
pub mod run;

pub use aggregate::{Aggregator, Snapshot};
pub use dispatch::{Dispatcher, FileOutcome};
pub use run::{compile_mime_pattern, RunCoordinator, RunState};
