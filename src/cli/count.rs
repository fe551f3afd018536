//! Count command implementation

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::pipeline::RunCoordinator;
use crate::render::{write_json_report, write_summary};

#[derive(Args, Debug, Default)]
pub struct CountArgs {
    /// Directory to count [default: current directory]
    #[arg(value_name = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Model to use for tokenization [default: gpt-4]
    #[arg(short, long, env = "TOKENCOUNT_MODEL", value_name = "MODEL")]
    pub model: Option<String>,

    /// File with patterns to ignore, relative to DIRECTORY [default: .gitignore]
    #[arg(short = 'i', long, env = "TOKENCOUNT_IGNORE_FILE", value_name = "FILE")]
    pub ignore_file: Option<PathBuf>,

    /// Only process files whose detected MIME type matches this regex [default: text/.*]
    #[arg(long, env = "TOKENCOUNT_MATCH_MIME", value_name = "REGEX")]
    pub match_mime: Option<String>,

    /// Path to config file (tokencount.toml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Worker threads [default: available parallelism]
    #[arg(short = 'j', long, env = "TOKENCOUNT_JOBS", value_name = "N")]
    pub jobs: Option<usize>,

    /// Also print the result as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Disable the progress spinner
    #[arg(long)]
    pub no_progress: bool,
}

pub fn run(args: CountArgs, verbose: bool) -> Result<()> {
    let root = match args.directory {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let config = load_config(&root, args.config.as_deref())?;
    let config = merge_cli_with_config(
        config,
        &CliOverrides {
            model: args.model,
            ignore_file: args.ignore_file,
            match_mime: args.match_mime,
            jobs: args.jobs,
        },
    );

    let mut coordinator = RunCoordinator::new(root.clone(), config.clone());
    if !args.no_progress && !verbose && io::stderr().is_terminal() {
        coordinator = coordinator.progress(spinner());
    }

    let snapshot = coordinator.run()?;

    write_summary(&mut io::stderr().lock(), &snapshot)?;
    if args.json {
        write_json_report(&mut io::stdout().lock(), &root, &config, &snapshot)?;
    }

    Ok(())
}

fn spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {pos} done, {msg}")
    {
        bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
    }
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
