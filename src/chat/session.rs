//! Chat session identifiers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Client-generated token correlating the turns of one conversation
///
/// Derived from the creation time and generated once per [`ChatPanel`];
/// the backend uses it to look up the uploaded log and earlier turns.
/// It is not a verified identity and never expires on the client side.
///
/// [`ChatPanel`]: crate::chat::ChatPanel
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate an id from the current time
    pub fn generate() -> Self {
        Self::from_time(Utc::now())
    }

    /// Id for a given creation time, `session_<unix millis>`
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use flightchat::chat::SessionId;
    ///
    /// let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
    /// assert_eq!(SessionId::from_time(at).as_str(), "session_1700000000123");
    /// ```
    pub fn from_time(created_at: DateTime<Utc>) -> Self {
        Self(format!("session_{}", created_at.timestamp_millis()))
    }

    /// Wrap an existing id, e.g. one supplied on the command line
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
