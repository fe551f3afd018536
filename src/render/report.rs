//! Final run report.
//!
//! The human-readable summary goes to stderr next to the log output; the JSON
//! report is meant for stdout so it can be piped.

use crate::config::Config;
use crate::pipeline::Snapshot;
use anyhow::Result;
use serde_json::{json, Value};
use std::io::Write;
use std::path::Path;

/// Write per-type tallies and the final token total, one fact per line.
///
/// The last line is always `total tokens: N`.
pub fn write_summary<W: Write>(out: &mut W, snapshot: &Snapshot) -> Result<()> {
    for (label, count) in &snapshot.skipped_by_type {
        writeln!(out, "skipped {:?} {} times", label, count)?;
    }
    for (label, count) in &snapshot.handled_by_type {
        writeln!(out, "handled {:?} {} times", label, count)?;
    }
    writeln!(out, "total tokens: {}", snapshot.total_tokens)?;
    Ok(())
}

pub fn json_report(root: &Path, config: &Config, snapshot: &Snapshot) -> Value {
    json!({
        "root": root.display().to_string(),
        "model": config.model,
        "match_mime": config.match_mime,
        "files_handled": snapshot.files_handled(),
        "files_skipped": snapshot.files_skipped(),
        "total_tokens": snapshot.total_tokens,
        "handled_by_type": snapshot.handled_by_type,
        "skipped_by_type": snapshot.skipped_by_type,
    })
}

pub fn write_json_report<W: Write>(
    out: &mut W,
    root: &Path,
    config: &Config,
    snapshot: &Snapshot,
) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, &json_report(root, config, snapshot))?;
    writeln!(out)?;
    Ok(())
}
