//! Chat session with the flight analysis backend
//!
//! - `message`: conversation entries
//! - `session`: per-panel correlation token
//! - `client`: the [`ChatBackend`] seam and its HTTP implementation
//! - `panel`: [`ChatPanel`], the state behind the chat view

pub mod client;
pub mod message;
pub mod panel;
pub mod session;

pub use client::{ChatBackend, ChatReply, ChatRequest, HttpChatClient};
pub use message::{Message, Role};
pub use panel::{ChatPanel, PendingSend, FALLBACK_REPLY, GREETING};
pub use session::SessionId;
