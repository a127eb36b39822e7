//! EEPROM Settings CLI Tool - Main Entry Point

use anyhow::Result;
use clap::Parser;

use nvsettings_cli::cli;

fn main() -> Result<()> {
    env_logger::init();
    let cli = cli::Cli::parse();
    cli::run(cli, &mut std::io::stdout().lock())
}
