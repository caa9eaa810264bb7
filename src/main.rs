//! gifslicer command-line entry point
//!
//! # Usage
//!
//! ```bash
//! gifslicer convert --input videos/ --output gifs/ --start 2.5 --duration 5
//! gifslicer plan --input videos/ --output gifs/ --count 4 --json
//! gifslicer inspect --input videos/holiday.mp4
//! gifslicer frame --input videos/holiday.mp4 --at 0:12.5 --output preview.png
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;

use gifslicer::adapters::TomlConfigAdapter;
use gifslicer::app::DefaultAppContainer;
use gifslicer::cli::{commands, Cli, Commands, LogFormat};
use gifslicer::config;

/// Main entry point for the gifslicer CLI application
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_port = TomlConfigAdapter::new()?;
    let settings = {
        // The configured level is unknown until loading finishes
        let _bootstrap = tracing::subscriber::set_default(build_subscriber(
            cli.log_level.as_deref().unwrap_or("info"),
            cli.log_format,
        ));
        config::initialize_configuration_hierarchy(&config_port, &cli, |key| {
            std::env::var(key).ok()
        })
        .await
        .context("Failed to load configuration")?
    };

    tracing::subscriber::set_global_default(build_subscriber(&settings.log_level, cli.log_format))
        .context("Failed to install the log subscriber")?;

    let container = DefaultAppContainer::new(&settings.ffmpeg_binary)?;

    match cli.command {
        Commands::Convert(args) => {
            commands::convert(&container, &settings, args).await?;
        }
        Commands::Plan(args) => commands::plan(&container, &settings, args).await?,
        Commands::Inspect(args) => commands::inspect(&container, args).await?,
        Commands::Frame(args) => commands::frame(&container, args).await?,
    }

    Ok(())
}

/// `RUST_LOG` wins over the configured level
fn build_subscriber(level: &str, format: LogFormat) -> Box<dyn Subscriber + Send + Sync> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Pretty => Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .finish(),
        ),
        LogFormat::Json => Box::new(
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .finish(),
        ),
    }
}
