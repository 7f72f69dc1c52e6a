use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use finhealth::api::{Cli, Commands, run_analyze, run_http_server};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose, which wins over the info default.
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    match cli.command {
        Commands::Serve {
            host,
            port,
            cache_ttl_secs,
        } => {
            run_http_server(&host, port, Duration::from_secs(cache_ttl_secs)).await?;
            Ok(())
        }
        Commands::Analyze(args) => run_analyze(args),
    }
}
