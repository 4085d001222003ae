//! flightchat - flight log chat client
//!
#![doc = "Main entry point for the flightchat application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use flightchat::cli::{Cli, Commands};
use flightchat::commands;
use flightchat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration; it decides the log format
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Initialize tracing
    init_tracing(cli.verbose, config.logging.json);
    tracing::debug!(config = %config_path, "Configuration loaded");

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat {
            flight_data,
            upload,
            session,
            ..
        } => {
            tracing::info!("Starting interactive chat mode");
            if let Some(path) = &flight_data {
                tracing::debug!("Loading flight data from: {}", path.display());
            }
            if let Some(path) = &upload {
                tracing::debug!("Uploading log: {}", path.display());
            }
            commands::chat::run_chat(config, flight_data, upload, session).await?;
            Ok(())
        }
        Commands::Summary {
            flight_data,
            since,
            json,
        } => {
            commands::run_summary(&flight_data, since, json)?;
            Ok(())
        }
        Commands::Anomalies {
            flight_data,
            session,
            since,
            json,
        } => {
            commands::run_anomalies(config, flight_data.as_deref(), session, since, json).await?;
            Ok(())
        }
    }
}

/// Initialize tracing on stderr so logs never mix with the transcript
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug. `json`
/// comes from `logging.json` after env and CLI overrides.
fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "flightchat=debug" } else { "flightchat=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
