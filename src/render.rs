//! Terminal rendering of the chat panel
//!
//! Formatting only; all state lives in [`ChatPanel`].

use crate::anomalies::{Anomaly, Severity};
use crate::chat::{ChatPanel, Message, Role};
use crate::summary::FlightSummary;
use colored::Colorize;

/// Summary badges on one line, or `None` when no badge has a value
pub fn badges(summary: &FlightSummary) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(duration) = summary.duration_label() {
        parts.push(format!("[Duration: {}]", duration).cyan().to_string());
    }
    if let Some(altitude) = summary.altitude_label() {
        parts.push(format!("[Altitude: {}]", altitude).cyan().to_string());
    }
    if let Some(battery) = summary.battery_label() {
        parts.push(format!("[Battery: {}]", battery).cyan().to_string());
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// One transcript entry, prefixed with its author
pub fn message(message: &Message) -> String {
    match message.role {
        Role::User => format!("{} {}", "you>".bold().blue(), message.content),
        Role::Assistant => format!("{} {}", "assistant>".bold().green(), message.content),
    }
}

/// One anomaly as a single line
pub fn anomaly(anomaly: &Anomaly) -> String {
    // Pad before colouring; escape codes would count toward the width.
    let padded = format!("{:<8}", anomaly.severity.to_string());
    let severity = match anomaly.severity {
        Severity::High => padded.red().bold(),
        Severity::Medium => padded.yellow(),
    };
    format!(
        "{:>12.2}s  {} {:<24} {}",
        anomaly.timestamp,
        severity,
        anomaly.kind.to_string(),
        anomaly.description
    )
}

/// Incremental view over a panel's transcript
///
/// Keeps track of how much of the transcript has been printed so each
/// render pass only emits new messages.
#[derive(Debug, Default)]
pub struct TranscriptView {
    rendered: usize,
}

/// Output of one render pass
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RenderPass {
    /// Lines for messages appended since the previous pass
    pub lines: Vec<String>,
    /// The panel asked for the view to follow the newest message
    pub scroll_to_bottom: bool,
}

impl TranscriptView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render messages appended since the last pass
    pub fn render(&mut self, panel: &mut ChatPanel) -> RenderPass {
        let messages = panel.messages();
        let lines = messages[self.rendered.min(messages.len())..]
            .iter()
            .map(message)
            .collect();
        self.rendered = messages.len();

        RenderPass {
            lines,
            scroll_to_bottom: panel.take_scroll_request(),
        }
    }
}
