mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use tracklet_core::{TrackletConfig, init_logging, runtime};

use crate::cli::Cli;

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = TrackletConfig::load(cli.config.as_deref()).context("could not load configuration")?;

    runtime::block_on(commands::run(cli.command, &config)).context("could not start runtime")?
}
