//! flightchat - flight log chat client library
//!
//! This library provides the pieces behind the `flightchat` binary: the
//! decoded telemetry model, summary statistics, a local anomaly scan, and a
//! chat session that forwards questions to the flight analysis backend.
//!
//! # Architecture
//!
//! - `flight_data`: decoded telemetry series keyed by message type
//! - `summary`: duration, altitude and battery badges plus flight context
//! - `anomalies`: heuristic scan for attitude jumps, GPS loss, low battery, weak RC
//! - `chat`: messages, session ids, the backend client and the chat panel state
//! - `render`: terminal formatting
//! - `commands`: CLI command handlers
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use flightchat::chat::{ChatPanel, HttpChatClient};
//! use flightchat::config::Config;
//! use flightchat::flight_data::FlightData;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let client = HttpChatClient::new(config.backend)?;
//!     let mut panel = ChatPanel::new();
//!     panel.set_flight_data(FlightData::load("flight.json")?);
//!     panel.set_input("Were there any GPS issues?");
//!     panel.send_message(&client).await;
//!     Ok(())
//! }
//! ```

pub mod anomalies;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod flight_data;
pub mod render;
pub mod summary;

// Re-export commonly used types
pub use chat::{ChatPanel, HttpChatClient};
pub use config::Config;
pub use error::{FlightChatError, Result};
pub use flight_data::FlightData;
pub use summary::FlightSummary;
