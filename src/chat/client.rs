//! Chat backend client
//!
//! [`ChatBackend`] is the seam between the chat panel and the remote
//! service; [`HttpChatClient`] implements it over HTTP with reqwest and also
//! exposes the backend's log upload and anomaly endpoints.

use crate::anomalies::Anomaly;
use crate::chat::session::SessionId;
use crate::config::BackendConfig;
use crate::error::{FlightChatError, Result};
use crate::flight_data::FlightData;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Body of a chat request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(rename = "sessionId")]
    pub session_id: SessionId,
}

/// Body of a successful chat response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// Something that answers chat messages
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use flightchat::chat::{ChatBackend, ChatReply, ChatRequest};
/// use flightchat::error::Result;
///
/// struct Echo;
///
/// #[async_trait]
/// impl ChatBackend for Echo {
///     async fn send(&self, request: &ChatRequest) -> Result<ChatReply> {
///         Ok(ChatReply { response: request.message.clone() })
///     }
/// }
/// ```
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one message and wait for the reply
    ///
    /// # Errors
    ///
    /// Returns error on any transport, status or decoding failure
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply>;
}

/// Envelope returned by the anomalies endpoint
#[derive(Debug, Deserialize)]
struct AnomaliesResponse {
    anomalies: Vec<Anomaly>,
}

/// HTTP client for the flight analysis backend
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    client: Client,
    config: BackendConfig,
}

impl HttpChatClient {
    /// Create a client for the configured backend
    ///
    /// No request timeout is set unless `request_timeout_seconds` is
    /// configured; a hung request then only ends when the connection does.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use flightchat::chat::HttpChatClient;
    /// use flightchat::config::BackendConfig;
    ///
    /// let client = HttpChatClient::new(BackendConfig::default()).unwrap();
    /// assert_eq!(client.chat_url(), "http://localhost:8001/chat");
    /// ```
    pub fn new(config: BackendConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!("flightchat/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| FlightChatError::Backend(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            base_url = %config.base_url,
            chat_path = %config.chat_path,
            "Initialized chat backend client"
        );

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Full URL of the chat endpoint
    pub fn chat_url(&self) -> String {
        self.url(&self.config.chat_path)
    }

    /// Upload a raw log so the backend can decode it and attach it to the session
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, the request fails, or the
    /// response does not carry flight data
    pub async fn upload_log(&self, path: &Path, session_id: &SessionId) -> Result<FlightData> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "flight.log".to_string());

        tracing::info!(file = %file_name, size = bytes.len(), session = %session_id, "Uploading log");

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));
        let response = self
            .client
            .post(self.url(&self.config.upload_path))
            .query(&[("session_id", session_id.as_str())])
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(FlightChatError::Backend(format!(
                "Log upload returned {}: {}",
                status, error_text
            ))
            .into());
        }

        let envelope: serde_json::Value = response.json().await.map_err(|e| {
            FlightChatError::Backend(format!("Failed to parse upload response: {}", e))
        })?;
        FlightData::from_value(envelope)
    }

    /// Ask the backend for the anomalies it found in the session's log
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the session has no log
    pub async fn fetch_anomalies(&self, session_id: &SessionId) -> Result<Vec<Anomaly>> {
        let response = self
            .client
            .get(self.url(&self.config.anomalies_path))
            .query(&[("session_id", session_id.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(FlightChatError::Backend(format!(
                "Anomaly request returned {}: {}",
                status, error_text
            ))
            .into());
        }

        let body: AnomaliesResponse = response.json().await.map_err(|e| {
            FlightChatError::Backend(format!("Failed to parse anomalies response: {}", e))
        })?;
        Ok(body.anomalies)
    }
}

#[async_trait]
impl ChatBackend for HttpChatClient {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply> {
        let url = self.chat_url();
        tracing::debug!(url = %url, session = %request.session_id, "Sending chat message");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| FlightChatError::Backend(format!("Chat request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(FlightChatError::Backend(format!(
                "Chat backend returned {}: {}",
                status, error_text
            ))
            .into());
        }

        let reply: ChatReply = response.json().await.map_err(|e| {
            FlightChatError::Backend(format!("Failed to parse chat response: {}", e))
        })?;

        tracing::debug!(chars = reply.response.len(), "Received chat reply");
        Ok(reply)
    }
}
