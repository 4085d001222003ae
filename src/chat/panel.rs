//! Chat panel state
//!
//! [`ChatPanel`] holds everything the chat view shows: the transcript, the
//! pending input, the summary badges and the busy flag that allows at most
//! one request in flight. Rendering lives elsewhere; this type only owns the
//! state transitions.
//!
//! Sending is split in two so the optimistic update is explicit:
//! [`ChatPanel::begin_send`] records the user's message synchronously, and
//! [`ChatPanel::complete_send`] records whatever the backend answered (or the
//! fallback). [`ChatPanel::send_message`] runs both around one backend call.

use crate::chat::client::{ChatBackend, ChatReply, ChatRequest};
use crate::chat::message::Message;
use crate::chat::session::SessionId;
use crate::error::Result;
use crate::flight_data::FlightData;
use crate::summary::FlightSummary;

/// Assistant message posted when flight data is first loaded
pub const GREETING: &str = "Flight data loaded! You can ask me questions like:\n\
- What was the maximum altitude reached?\n\
- Were there any GPS issues during the flight?\n\
- How did the battery voltage change over the flight?\n\
- Were there any unusual events or errors?";

/// Assistant message posted when the backend call fails for any reason
pub const FALLBACK_REPLY: &str = "Sorry, there was an error processing your message.";

/// A send that has been recorded locally but not yet answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    request: ChatRequest,
}

impl PendingSend {
    /// Request to hand to the backend
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }
}

/// State behind the chat view
#[derive(Debug)]
pub struct ChatPanel {
    session_id: SessionId,
    flight_data: FlightData,
    summary: FlightSummary,
    messages: Vec<Message>,
    input: String,
    busy: bool,
    scroll_requested: bool,
}

impl Default for ChatPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatPanel {
    /// Create an empty panel with a freshly generated session id
    pub fn new() -> Self {
        Self::with_session(SessionId::generate())
    }

    /// Create an empty panel bound to an existing session id
    pub fn with_session(session_id: SessionId) -> Self {
        tracing::debug!(session = %session_id, "Created chat panel");
        Self {
            session_id,
            flight_data: FlightData::default(),
            summary: FlightSummary::default(),
            messages: Vec::new(),
            input: String::new(),
            busy: false,
            scroll_requested: false,
        }
    }

    /// Replace the flight data
    ///
    /// Non-empty data recomputes the summary badges and, when the transcript
    /// is still empty, posts the greeting. Empty data clears the badges.
    pub fn set_flight_data(&mut self, data: FlightData) {
        self.flight_data = data;

        if self.flight_data.is_empty() {
            self.summary = FlightSummary::default();
            return;
        }

        self.summary = FlightSummary::compute(&self.flight_data);
        tracing::debug!(summary = ?self.summary, "Recomputed flight summary");

        if self.messages.is_empty() {
            self.messages.push(Message::assistant(GREETING));
        }
    }

    pub fn flight_data(&self) -> &FlightData {
        &self.flight_data
    }

    pub fn has_flight_data(&self) -> bool {
        !self.flight_data.is_empty()
    }

    pub fn summary(&self) -> &FlightSummary {
        &self.summary
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the pending input text
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Whether a request is in flight
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether a send would currently be accepted
    pub fn can_send(&self) -> bool {
        !self.input.trim().is_empty() && !self.busy && self.has_flight_data()
    }

    /// Record the user's message and mark the panel busy
    ///
    /// Returns `None` without touching any state when the input is blank, a
    /// request is already in flight, or no flight data is loaded.
    pub fn begin_send(&mut self) -> Option<PendingSend> {
        if !self.can_send() {
            tracing::debug!(
                busy = self.busy,
                has_flight_data = self.has_flight_data(),
                "Ignoring send"
            );
            return None;
        }

        let message = std::mem::take(&mut self.input);
        self.messages.push(Message::user(message.clone()));
        self.busy = true;

        Some(PendingSend {
            request: ChatRequest {
                message,
                session_id: self.session_id.clone(),
            },
        })
    }

    /// Record the outcome of a pending send and clear the busy flag
    ///
    /// Failures of any kind become [`FALLBACK_REPLY`]; the error itself is
    /// only logged.
    pub fn complete_send(&mut self, _pending: PendingSend, outcome: Result<ChatReply>) {
        match outcome {
            Ok(reply) => {
                self.messages.push(Message::assistant(reply.response));
                self.scroll_requested = true;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Chat request failed");
                self.messages.push(Message::assistant(FALLBACK_REPLY));
            }
        }
        self.busy = false;
    }

    /// Send the pending input to the backend and record the reply
    ///
    /// Returns `true` if a request was issued.
    pub async fn send_message(&mut self, backend: &dyn ChatBackend) -> bool {
        let Some(pending) = self.begin_send() else {
            return false;
        };
        let outcome = backend.send(pending.request()).await;
        self.complete_send(pending, outcome);
        true
    }

    /// Consume the pending scroll-to-bottom request, if any
    ///
    /// Raised after each successful reply; the renderer calls this once per
    /// pass.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }
}
