//! CLI entry point for the harvester.

use clap::Parser;
use rera_harvester::cli::{self, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // WARN by default (INFO with --verbose), respecting RUST_LOG
    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
