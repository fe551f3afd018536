//! Output rendering (summary lines, JSON report)

pub mod report;

pub use report::{write_json_report, write_summary};
