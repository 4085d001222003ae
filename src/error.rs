//! Error types for flightchat
//!
//! This module defines the error types used throughout the crate,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for flightchat operations
///
/// Covers configuration loading, flight data loading, and interactions
/// with the remote chat backend.
#[derive(Error, Debug)]
pub enum FlightChatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Flight data could not be loaded or has an unexpected shape
    #[error("Flight data error: {0}")]
    FlightData(String),

    /// The chat backend rejected a request or returned an unusable body
    #[error("Backend error: {0}")]
    Backend(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for flightchat operations
///
/// Uses `anyhow::Error` so callers can attach context while still being
/// able to downcast to [`FlightChatError`].
pub type Result<T> = anyhow::Result<T>;
