use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Simulated shell over a volatile in-memory filesystem.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// YAML file describing the initial tree and game settings
    #[clap(long, short)]
    pub config: Option<PathBuf>,

    /// Seed for the game's level generator
    #[clap(long)]
    pub seed: Option<u64>,

    /// Never color the output
    #[clap(long)]
    pub no_color: bool,
}
