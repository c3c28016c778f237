use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::level_filters::LevelFilter;

use healthbot::{Config, Orchestrator};

/// Domain availability monitor controlled over Telegram
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to a TOML config file (defaults to $XDG_CONFIG_HOME/healthbot/config.toml)
    #[arg(short, long, env = "HEALTHBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Write the effective configuration to this path and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    logger::init(if args.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO });

    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    config.apply_env().context("Invalid environment configuration")?;

    if args.print_config {
        println!("{config}");
        return Ok(());
    }
    if let Some(path) = args.write_config {
        config.write_config(&path).context("Failed to write configuration")?;
        println!("Configuration written to {}", path.display());
        return Ok(());
    }

    config.validate().context("Incomplete configuration")?;
    Orchestrator::start(config).await
}
