#![warn(clippy::all, clippy::pedantic)]

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use synthlead::{Cli, Config};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_init()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.tracing_level())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    synthlead::app::dispatch::dispatch(cli, Arc::new(config)).await
}
