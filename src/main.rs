mod app;

use anyhow::Result;
use app::{Cli, GameMode};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // initialize tracing; `log` records from the engine are forwarded too
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = cli.engine.load()?;
    tracing::debug!(max_depth = config.max_depth, time_limit_ms = config.time_limit_ms, "starting");

    match &cli.mode {
        GameMode::SelfPlay(args) => app::self_play::run(args, &config),
        GameMode::Play(args) => app::human::run(args, &config),
    }
}
