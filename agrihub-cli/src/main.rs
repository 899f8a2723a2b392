//! AgriHub command-line client.
//!
//! Usage:
//!   agrihub --api-url https://api.example.com/api list crops
//!   agrihub --token-file ~/.agrihub/session.json login --email a@b.c --password ...

use agrihub_cli::{Cli, run};
use anyhow::Result;
use clap::Parser;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let ctx = cli.context()?;
    debug!("Using API at {}", ctx.config().api.base_url);

    let mut stdout = std::io::stdout().lock();
    run(&ctx, cli.command.clone(), &mut stdout).await
}
