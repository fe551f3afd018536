//! Apply command-line overrides on top of file configuration

use super::Config;
use std::path::PathBuf;

/// Values given on the command line or through the environment.
///
/// `None` leaves the file/default value in place.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub model: Option<String>,
    pub ignore_file: Option<PathBuf>,
    pub match_mime: Option<String>,
    pub jobs: Option<usize>,
}

pub fn merge_cli_with_config(mut config: Config, cli: &CliOverrides) -> Config {
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if let Some(ignore_file) = &cli.ignore_file {
        config.ignore_file = ignore_file.clone();
    }
    if let Some(match_mime) = &cli.match_mime {
        config.match_mime = match_mime.clone();
    }
    if let Some(jobs) = cli.jobs {
        config.jobs = jobs;
    }
    config
}
