use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[arg(short, long, help = "Window start: unix timestamp of the first block to consider")]
    pub timestamp: u64,

    #[arg(short = 'n', long, help = "Number of consecutive blocks in the window")]
    pub blocks: u64,

    #[arg(short = 'p', long, help = "Top fraction of transactions kept per block, in (0, 1]")]
    pub fraction: f64,

    #[arg(long, default_value = "f_values.json", help = "Path of the persistent F value cache")]
    pub cache: PathBuf,

    #[arg(long, help = "Append the query result to this CSV file")]
    pub results_csv: Option<PathBuf>,

    #[arg(long, default_value = "bitcoin-cli", help = "bitcoin-cli binary to invoke")]
    pub bitcoin_cli: String,

    #[arg(long = "cli-arg", help = "Extra argument passed through to bitcoin-cli (repeatable)")]
    pub cli_args: Vec<String>,
}

pub fn parse_config() -> Config {
    let config = Config::parse();
    let mut cmd = Config::command();

    if config.blocks == 0 {
        cmd.error(ErrorKind::InvalidValue, "--blocks must be at least 1")
            .exit();
    }
    if !(config.fraction > 0.0 && config.fraction <= 1.0) {
        cmd.error(ErrorKind::InvalidValue, "--fraction must be in (0, 1]")
            .exit();
    }

    config
}
