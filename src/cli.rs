//! Command-line interface definition for flightchat
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// flightchat - chat with an AI analyst about a flight log
///
/// Loads decoded MAVLink/Dataflash telemetry, shows summary statistics and
/// forwards questions to the flight analysis backend.
#[derive(Parser, Debug, Clone)]
#[command(name = "flightchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "FLIGHTCHAT_CONFIG", default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines (overrides `logging.json`)
    #[arg(long)]
    pub log_json: bool,

    /// Override the backend base URL (e.g. http://localhost:8001)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Backend request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat about a flight
    Chat {
        /// Decoded flight data (JSON) to load at startup
        #[arg(short, long, conflicts_with = "upload")]
        flight_data: Option<PathBuf>,

        /// Raw log to upload to the backend for decoding at startup
        #[arg(short, long)]
        upload: Option<PathBuf>,

        /// Reuse an existing session id instead of generating one
        #[arg(long)]
        session: Option<String>,

        /// Full chat endpoint URL (e.g. http://localhost:8001/chat)
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Print the flight summary
    Summary {
        /// Decoded flight data (JSON)
        #[arg(short, long)]
        flight_data: PathBuf,

        /// Ignore records stamped before this time (seconds)
        #[arg(long)]
        since: Option<f64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List anomalies in a flight
    Anomalies {
        /// Decoded flight data (JSON) to scan locally
        #[arg(short, long, required_unless_present = "session", conflicts_with = "session")]
        flight_data: Option<PathBuf>,

        /// Ask the backend for the anomalies of an existing session instead
        #[arg(long)]
        session: Option<String>,

        /// Ignore records stamped before this time (seconds)
        #[arg(long)]
        since: Option<f64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
