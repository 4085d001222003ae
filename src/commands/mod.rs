/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `chat`: Interactive chat about a flight
- `summary`: One-shot flight summary
- `anomalies`: One-shot anomaly listing, local or from the backend
*/

use crate::anomalies::{detect_anomalies, Anomaly};
use crate::chat::{HttpChatClient, SessionId};
use crate::config::Config;
use crate::error::Result;
use crate::flight_data::FlightData;
use crate::render;
use crate::summary::{flight_context, FlightSummary};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

// Special commands parser for the chat loop
pub mod special_commands;

/// Load flight data from disk, optionally dropping early records
fn load_flight_data(path: &Path, since: Option<f64>) -> Result<FlightData> {
    let data = FlightData::load(path)?;
    Ok(match since {
        Some(start) => data.trimmed_from(start),
        None => data,
    })
}

#[derive(Serialize)]
struct SummaryReport<'a> {
    summary: &'a FlightSummary,
    context: String,
}

/// Render the summary of a flight, as text or JSON
///
/// # Errors
///
/// Returns error if JSON serialization fails
pub fn summary_report(data: &FlightData, json: bool) -> Result<String> {
    let summary = FlightSummary::compute(data);
    let context = flight_context(data);

    if json {
        return Ok(serde_json::to_string_pretty(&SummaryReport {
            summary: &summary,
            context,
        })?);
    }

    let mut out = Vec::new();
    match render::badges(&summary) {
        Some(badges) => out.push(badges),
        None => out.push("No GPS, ATT or BAT data to summarize".to_string()),
    }
    if !context.is_empty() {
        out.push(String::new());
        out.push(context);
    }
    Ok(out.join("\n"))
}

/// Render a list of anomalies, as text or JSON
///
/// # Errors
///
/// Returns error if JSON serialization fails
pub fn anomaly_report(anomalies: &[Anomaly], json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(anomalies)?);
    }
    if anomalies.is_empty() {
        return Ok("No anomalies found".to_string());
    }

    let mut out = vec![format!("{} anomalies found", anomalies.len())];
    out.extend(anomalies.iter().map(render::anomaly));
    Ok(out.join("\n"))
}

/// Print the summary of a flight
///
/// # Errors
///
/// Returns error if the flight data cannot be loaded
pub fn run_summary(flight_data: &Path, since: Option<f64>, json: bool) -> Result<()> {
    let data = load_flight_data(flight_data, since)?;
    println!("{}", summary_report(&data, json)?);
    Ok(())
}

/// Print the anomalies of a flight
///
/// Scans a local file, or asks the backend when a session id is given.
///
/// # Errors
///
/// Returns error if the flight data cannot be loaded or the backend call fails
pub async fn run_anomalies(
    config: Config,
    flight_data: Option<&Path>,
    session: Option<String>,
    since: Option<f64>,
    json: bool,
) -> Result<()> {
    let anomalies = match (flight_data, session) {
        (Some(path), _) => detect_anomalies(&load_flight_data(path, since)?),
        (None, Some(session)) => {
            let client = HttpChatClient::new(config.backend)?;
            let anomalies = client
                .fetch_anomalies(&SessionId::from_string(session))
                .await?;
            match since {
                Some(start) => anomalies.into_iter().filter(|a| a.timestamp >= start).collect(),
                None => anomalies,
            }
        }
        (None, None) => {
            return Err(crate::error::FlightChatError::Config(
                "either --flight-data or --session is required".to_string(),
            )
            .into())
        }
    };

    println!("{}", anomaly_report(&anomalies, json)?);
    Ok(())
}

/// Push buffered transcript lines out so the newest message is on screen
///
/// Returns `false` when the writer could not be flushed.
fn follow_transcript(out: &mut impl Write) -> bool {
    match out.flush() {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("Failed to flush transcript: {}", e);
            false
        }
    }
}

// Chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Creates the backend client and a [`ChatPanel`], then runs a
    //! readline-based loop that sends each line to the backend and prints
    //! the transcript as it grows.

    use super::*;
    use crate::chat::ChatPanel;
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use crate::render::TranscriptView;
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::{Config as EditorConfig, DefaultEditor};
    use std::path::PathBuf;

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `flight_data` - Decoded flight data to load before the first prompt
    /// * `upload` - Raw log to upload for decoding before the first prompt
    /// * `session` - Existing session id to reuse
    pub async fn run_chat(
        config: Config,
        flight_data: Option<PathBuf>,
        upload: Option<PathBuf>,
        session: Option<String>,
    ) -> Result<()> {
        let client = HttpChatClient::new(config.backend.clone())?;
        let mut panel = match session {
            Some(id) => ChatPanel::with_session(SessionId::from_string(id)),
            None => ChatPanel::new(),
        };
        let mut view = TranscriptView::new();

        print_welcome_banner(&panel, &client);

        if let Some(path) = flight_data {
            load_file(&mut panel, &path, &config);
        }
        if let Some(path) = upload {
            upload_file(&mut panel, &client, &path, &config).await;
        }
        print_new_messages(&mut view, &mut panel);

        let editor_config = EditorConfig::builder()
            .max_history_size(config.chat.max_history)?
            .auto_add_history(false)
            .build();
        let mut rl = DefaultEditor::with_config(editor_config)?;

        loop {
            match rl.readline(&format!("{} ", "flight>".bold())) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    let command = match parse_special_command(trimmed) {
                        Ok(command) => command,
                        Err(e) => {
                            println!("{}\n", e.to_string().red());
                            continue;
                        }
                    };

                    match command {
                        SpecialCommand::Load(path) => {
                            load_file(&mut panel, &path, &config);
                        }
                        SpecialCommand::Upload(path) => {
                            upload_file(&mut panel, &client, &path, &config).await;
                        }
                        SpecialCommand::Summary => {
                            print_summary(&panel);
                        }
                        SpecialCommand::Anomalies => {
                            print_local_anomalies(&panel)?;
                        }
                        SpecialCommand::History => {
                            for message in panel.messages() {
                                println!("{}", render::message(message));
                            }
                            println!();
                        }
                        SpecialCommand::Session => {
                            println!("Session: {}\n", panel.session_id());
                        }
                        SpecialCommand::Help => print_help(),
                        SpecialCommand::Exit => break,
                        SpecialCommand::None => {
                            rl.add_history_entry(trimmed)?;
                            send_line(&mut panel, &client, trimmed).await;
                        }
                    }
                    print_new_messages(&mut view, &mut panel);
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            }
        }

        tracing::info!(
            session = %panel.session_id(),
            messages = panel.messages().len(),
            "Chat session ended"
        );
        Ok(())
    }

    async fn send_line(panel: &mut ChatPanel, client: &HttpChatClient, line: &str) {
        if !panel.has_flight_data() {
            println!(
                "{}\n",
                "Load a flight first: /load <flight_data.json> or /upload <log_file>".yellow()
            );
            return;
        }

        panel.set_input(line);
        println!("{}", "thinking...".dimmed());
        panel.send_message(client).await;
    }

    fn load_file(panel: &mut ChatPanel, path: &Path, config: &Config) {
        match FlightData::load(path) {
            Ok(data) => {
                panel.set_flight_data(data);
                println!("{}", format!("Loaded {}", path.display()).green());
                if config.chat.show_badges {
                    print_badges(panel);
                }
            }
            Err(e) => println!("{}\n", format!("Could not load {}: {}", path.display(), e).red()),
        }
    }

    async fn upload_file(panel: &mut ChatPanel, client: &HttpChatClient, path: &Path, config: &Config) {
        println!("{}", format!("Uploading {}", path.display()).cyan());
        match client.upload_log(path, panel.session_id()).await {
            Ok(data) => {
                panel.set_flight_data(data);
                println!("{}", format!("Decoded {}", path.display()).green());
                if config.chat.show_badges {
                    print_badges(panel);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Log upload failed");
                println!("{}\n", format!("Upload failed: {}", e).red());
            }
        }
    }

    fn print_badges(panel: &ChatPanel) {
        if let Some(badges) = render::badges(panel.summary()) {
            println!("{}\n", badges);
        }
    }

    fn print_summary(panel: &ChatPanel) {
        if !panel.has_flight_data() {
            println!("{}\n", "No flight data loaded".yellow());
            return;
        }
        print_badges(panel);
        let context = flight_context(panel.flight_data());
        if !context.is_empty() {
            println!("{}\n", context);
        }
    }

    fn print_local_anomalies(panel: &ChatPanel) -> Result<()> {
        if !panel.has_flight_data() {
            println!("{}\n", "No flight data loaded".yellow());
            return Ok(());
        }
        let anomalies = detect_anomalies(panel.flight_data());
        println!("{}\n", anomaly_report(&anomalies, false)?);
        Ok(())
    }

    fn print_new_messages(view: &mut TranscriptView, panel: &mut ChatPanel) {
        let pass = view.render(panel);
        for line in &pass.lines {
            println!("{}\n", line);
        }
        if pass.scroll_to_bottom {
            follow_transcript(&mut std::io::stdout());
        }
    }

    fn print_welcome_banner(panel: &ChatPanel, client: &HttpChatClient) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║               flightchat - Flight Log Analyst                ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Backend: {}", client.chat_url());
        println!("Session: {}\n", panel.session_id());
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }
}
