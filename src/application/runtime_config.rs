use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub config: Option<PathBuf>,
    pub seed: Option<u64>,
    pub color: bool,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            config: cli.config,
            seed: cli.seed,
            color: !cli.no_color,
        }
    }
}
