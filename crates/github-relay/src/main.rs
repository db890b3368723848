use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use github_relay::env::SystemEnv;
use github_relay::{RelayConfig, serve};
use tracing::{info, warn};

/// GitHub webhook relay for IRC and Discord
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "GITHUB_RELAY_CONFIG",
        default_value = "config/github-relay.toml"
    )]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = if args.config.exists() {
        info!(path = %args.config.display(), "Loading config from file");
        RelayConfig::from_file(&args.config, &SystemEnv)
            .with_context(|| format!("Failed to load {}", args.config.display()))?
    } else {
        warn!(
            path = %args.config.display(),
            "Config file not found, no routes configured"
        );
        RelayConfig::from_env(&SystemEnv)
    };

    serve(config)
        .await
        .map_err(|e| anyhow::anyhow!(e))
        .context("Server failed")
}
