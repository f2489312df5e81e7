mod app;
mod cli;
mod config;
mod render;

use anyhow::Context;
use clap::Parser;
use engine_logging::LevelFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    engine_logging::initialize(cli.log_destination(), LevelFilter::Info);

    let config = config::load(cli.config.as_deref()).context("loading config")?;
    app::run(&cli, config).await
}
