//! tokencount: estimate the model-context cost of a codebase
//!
//! Prints per-type tallies and the total token count of every text file under a
//! directory, honouring an ignore file and a content-type filter.

use anyhow::Result;

fn main() -> Result<()> {
    tokencount::cli::run()
}
