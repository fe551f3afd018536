//! Models command implementation

use anyhow::Result;
use std::io::{self, Write};

use crate::utils::known_models;

pub fn run() -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for model in known_models() {
        writeln!(out, "{}", model)?;
    }
    Ok(())
}
