//! Configuration management for flightchat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//! Precedence, lowest to highest: built-in defaults, YAML file,
//! `FLIGHTCHAT_*` environment variables, command-line flags.

use crate::error::{FlightChatError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Chat backend location and HTTP behaviour
    #[serde(default)]
    pub backend: BackendConfig,
    /// Interactive chat settings
    #[serde(default)]
    pub chat: ChatConfig,
    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chat backend configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Scheme, host and port of the backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the chat endpoint
    #[serde(default = "default_chat_path")]
    pub chat_path: String,

    /// Path of the log upload endpoint
    #[serde(default = "default_upload_path")]
    pub upload_path: String,

    /// Path of the anomaly endpoint
    #[serde(default = "default_anomalies_path")]
    pub anomalies_path: String,

    /// Request timeout in seconds; unset means no client-side timeout
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_chat_path() -> String {
    "/chat".to_string()
}

fn default_upload_path() -> String {
    "/upload-log".to_string()
}

fn default_anomalies_path() -> String {
    "/anomalies".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_path: default_chat_path(),
            upload_path: default_upload_path(),
            anomalies_path: default_anomalies_path(),
            request_timeout_seconds: None,
        }
    }
}

/// Interactive chat configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Print the summary badges whenever flight data is (re)loaded
    #[serde(default = "default_show_badges")]
    pub show_badges: bool,

    /// Maximum number of input lines kept in the line editor history
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

fn default_show_badges() -> bool {
    true
}

fn default_max_history() -> usize {
    500
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            show_badges: default_show_badges(),
            max_history: default_max_history(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit log events as JSON lines instead of human-readable text
    #[serde(default)]
    pub json: bool,
}

impl BackendConfig {
    /// Point the chat endpoint at a full URL
    ///
    /// The scheme and authority become `base_url` and the remainder
    /// `chat_path` (`/` when the URL has no path).
    ///
    /// # Examples
    ///
    /// ```
    /// use flightchat::config::BackendConfig;
    ///
    /// let mut backend = BackendConfig::default();
    /// backend.set_chat_endpoint("https://analysis.example.com/api/chat");
    /// assert_eq!(backend.base_url, "https://analysis.example.com");
    /// assert_eq!(backend.chat_path, "/api/chat");
    /// ```
    pub fn set_chat_endpoint(&mut self, endpoint: &str) {
        let endpoint = endpoint.trim();
        let authority_start = endpoint.find("://").map_or(0, |i| i + 3);
        match endpoint[authority_start..].find('/') {
            Some(i) => {
                let (base, path) = endpoint.split_at(authority_start + i);
                self.base_url = base.to_string();
                self.chat_path = path.to_string();
            }
            None => {
                self.base_url = endpoint.to_string();
                self.chat_path = "/".to_string();
            }
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| FlightChatError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| FlightChatError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("FLIGHTCHAT_BASE_URL") {
            tracing::debug!(base_url = %base_url, "Env override: FLIGHTCHAT_BASE_URL");
            self.backend.base_url = base_url;
        }

        if let Ok(chat_path) = std::env::var("FLIGHTCHAT_CHAT_PATH") {
            tracing::debug!(chat_path = %chat_path, "Env override: FLIGHTCHAT_CHAT_PATH");
            self.backend.chat_path = chat_path;
        }

        if let Ok(timeout) = std::env::var("FLIGHTCHAT_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.backend.request_timeout_seconds = Some(value);
            } else {
                tracing::warn!("Invalid FLIGHTCHAT_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(show) = std::env::var("FLIGHTCHAT_SHOW_BADGES") {
            match parse_flag(&show) {
                Some(value) => self.chat.show_badges = value,
                None => tracing::warn!("Invalid FLIGHTCHAT_SHOW_BADGES: {}", show),
            }
        }

        if let Ok(json) = std::env::var("FLIGHTCHAT_LOG_JSON") {
            match parse_flag(&json) {
                Some(value) => self.logging.json = value,
                None => tracing::warn!("Invalid FLIGHTCHAT_LOG_JSON: {}", json),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(base_url) = &cli.base_url {
            tracing::debug!(base_url = %base_url, "CLI override: --base-url");
            self.backend.base_url = base_url.clone();
        }
        if let Some(timeout) = cli.timeout {
            self.backend.request_timeout_seconds = Some(timeout);
        }
        if cli.log_json {
            self.logging.json = true;
        }
        if let crate::cli::Commands::Chat {
            endpoint: Some(endpoint),
            ..
        } = &cli.command
        {
            tracing::debug!(endpoint = %endpoint, "CLI override: --endpoint");
            self.backend.set_chat_endpoint(endpoint);
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the backend URL is unusable, an endpoint path is not
    /// absolute, or the timeout is zero
    pub fn validate(&self) -> Result<()> {
        let base_url = self.backend.base_url.trim();
        if base_url.is_empty() {
            return Err(
                FlightChatError::Config("backend.base_url cannot be empty".to_string()).into(),
            );
        }

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(FlightChatError::Config(format!(
                "backend.base_url must start with http:// or https://, got {}",
                base_url
            ))
            .into());
        }

        for (name, path) in [
            ("chat_path", &self.backend.chat_path),
            ("upload_path", &self.backend.upload_path),
            ("anomalies_path", &self.backend.anomalies_path),
        ] {
            if !path.starts_with('/') {
                return Err(FlightChatError::Config(format!(
                    "backend.{} must start with '/', got {}",
                    name, path
                ))
                .into());
            }
        }

        if self.backend.request_timeout_seconds == Some(0) {
            return Err(FlightChatError::Config(
                "backend.request_timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use serial_test::serial;

    const ENV_VARS: [&str; 5] = [
        "FLIGHTCHAT_BASE_URL",
        "FLIGHTCHAT_CHAT_PATH",
        "FLIGHTCHAT_TIMEOUT_SECONDS",
        "FLIGHTCHAT_SHOW_BADGES",
        "FLIGHTCHAT_LOG_JSON",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, "http://localhost:8001");
        assert_eq!(config.backend.chat_path, "/chat");
        assert_eq!(config.backend.request_timeout_seconds, None);
        assert!(config.chat.show_badges);
        assert_eq!(config.chat.max_history, 500);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_set_chat_endpoint() {
        let mut backend = BackendConfig::default();
        backend.set_chat_endpoint("http://h:1/api/chat");
        assert_eq!(backend.base_url, "http://h:1");
        assert_eq!(backend.chat_path, "/api/chat");

        backend.set_chat_endpoint("https://analysis.example.com");
        assert_eq!(backend.base_url, "https://analysis.example.com");
        assert_eq!(backend.chat_path, "/");
        assert_eq!(backend.upload_path, "/upload-log");
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_base_url() {
        let mut config = Config::default();
        config.backend.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_scheme() {
        let mut config = Config::default();
        config.backend.base_url = "ftp://localhost".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn test_config_validation_relative_path() {
        let mut config = Config::default();
        config.backend.chat_path = "chat".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = Config::default();
        config.backend.request_timeout_seconds = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
backend:
  base_url: https://analysis.example.com
  chat_path: /api/chat
  request_timeout_seconds: 30
chat:
  show_badges: false
logging:
  json: true
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.backend.base_url, "https://analysis.example.com");
        assert_eq!(config.backend.chat_path, "/api/chat");
        assert_eq!(config.backend.upload_path, "/upload-log");
        assert_eq!(config.backend.request_timeout_seconds, Some(30));
        assert!(!config.chat.show_badges);
        assert_eq!(config.chat.max_history, 500);
        assert!(config.logging.json);
    }

    #[test]
    fn test_example_config_parses() {
        let contents = std::fs::read_to_string("config/config.yaml")
            .expect("Failed to read example config/config.yaml");
        let config: Config = serde_yaml::from_str(&contents).expect("Failed to parse config.yaml");
        assert_eq!(config.backend, BackendConfig::default());
        assert_eq!(config.chat, ChatConfig::default());
        assert_eq!(config.logging, LoggingConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_document_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.backend, BackendConfig::default());
    }

    #[test]
    #[serial]
    fn test_load_nonexistent_file_uses_defaults() {
        clear_env();
        let cli = Cli::try_parse_from(["flightchat", "summary", "--flight-data", "f.json"]).unwrap();
        let config = Config::load("nonexistent.yaml", &cli).unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:8001");
    }

    #[test]
    #[serial]
    fn test_load_from_file() {
        clear_env();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "backend:\n  base_url: http://10.0.0.5:8001\n").unwrap();
        let cli = Cli::try_parse_from(["flightchat", "chat"]).unwrap();
        let config = Config::load(path.to_str().unwrap(), &cli).unwrap();
        assert_eq!(config.backend.base_url, "http://10.0.0.5:8001");
    }

    #[test]
    #[serial]
    fn test_load_invalid_yaml_errors() {
        clear_env();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "backend: [unclosed").unwrap();
        let cli = Cli::try_parse_from(["flightchat", "chat"]).unwrap();
        let err = Config::load(path.to_str().unwrap(), &cli).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    #[serial]
    fn test_env_overrides_file_and_cli_overrides_env() {
        clear_env();
        std::env::set_var("FLIGHTCHAT_BASE_URL", "http://env-host:8001");
        std::env::set_var("FLIGHTCHAT_CHAT_PATH", "/v2/chat");
        std::env::set_var("FLIGHTCHAT_TIMEOUT_SECONDS", "15");
        std::env::set_var("FLIGHTCHAT_SHOW_BADGES", "off");

        let cli = Cli::try_parse_from(["flightchat", "chat"]).unwrap();
        let config = Config::load("nonexistent.yaml", &cli).unwrap();
        assert_eq!(config.backend.base_url, "http://env-host:8001");
        assert_eq!(config.backend.chat_path, "/v2/chat");
        assert_eq!(config.backend.request_timeout_seconds, Some(15));
        assert!(!config.chat.show_badges);

        let cli = Cli::try_parse_from([
            "flightchat",
            "--base-url",
            "http://cli-host:9000",
            "--timeout",
            "5",
            "chat",
        ])
        .unwrap();
        let config = Config::load("nonexistent.yaml", &cli).unwrap();
        assert_eq!(config.backend.base_url, "http://cli-host:9000");
        assert_eq!(config.backend.request_timeout_seconds, Some(5));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_log_json_from_file_env_and_cli() {
        clear_env();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "logging:\n  json: true\n").unwrap();
        let cli = Cli::try_parse_from(["flightchat", "chat"]).unwrap();
        assert!(Config::load(path.to_str().unwrap(), &cli).unwrap().logging.json);

        std::env::set_var("FLIGHTCHAT_LOG_JSON", "false");
        assert!(!Config::load(path.to_str().unwrap(), &cli).unwrap().logging.json);

        let cli = Cli::try_parse_from(["flightchat", "--log-json", "chat"]).unwrap();
        assert!(Config::load(path.to_str().unwrap(), &cli).unwrap().logging.json);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_chat_endpoint_overrides_base_url_and_path() {
        clear_env();
        std::env::set_var("FLIGHTCHAT_CHAT_PATH", "/v2/chat");
        let cli = Cli::try_parse_from([
            "flightchat",
            "--base-url",
            "http://ignored:1",
            "chat",
            "--endpoint",
            "http://h:1/api/chat",
        ])
        .unwrap();
        let config = Config::load("nonexistent.yaml", &cli).unwrap();
        assert_eq!(config.backend.base_url, "http://h:1");
        assert_eq!(config.backend.chat_path, "/api/chat");
        assert!(config.validate().is_ok());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_timeout_env_is_ignored() {
        clear_env();
        std::env::set_var("FLIGHTCHAT_TIMEOUT_SECONDS", "soon");
        let cli = Cli::try_parse_from(["flightchat", "chat"]).unwrap();
        let config = Config::load("nonexistent.yaml", &cli).unwrap();
        assert_eq!(config.backend.request_timeout_seconds, None);
        clear_env();
    }
}
