//! Special commands parser for interactive chat mode
//!
//! Special commands act on the session instead of being sent to the
//! backend:
//! - Load or upload a flight log
//! - Show the flight summary and local anomaly scan
//! - Show the transcript and session id
//! - Display help information
//! - Exit the session
//!
//! Commands are prefixed with `/` and are case-insensitive; file arguments
//! keep their original case.

use colored::Colorize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Replace the flight data with a decoded JSON file
    Load(PathBuf),

    /// Upload a raw log to the backend and use the decoded result
    Upload(PathBuf),

    /// Show the summary badges and flight context
    Summary,

    /// Run the anomaly scan over the loaded flight data
    Anomalies,

    /// Print the whole transcript
    History,

    /// Print the session id
    Session,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent to the backend as a chat message.
    None,
}

fn path_argument(
    trimmed: &str,
    command: &str,
    usage: &str,
) -> Result<PathBuf, CommandError> {
    let arg = trimmed[command.len()..].trim();
    if arg.is_empty() {
        Err(CommandError::MissingArgument {
            command: command.to_string(),
            usage: usage.to_string(),
        })
    } else {
        Ok(PathBuf::from(arg))
    }
}

/// Parse user input into a special command
///
/// # Errors
///
/// Returns [`CommandError`] for unknown commands or missing arguments
///
/// # Examples
///
/// ```
/// use flightchat::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/summary").unwrap(), SpecialCommand::Summary);
/// assert_eq!(parse_special_command("How high did we fly?").unwrap(), SpecialCommand::None);
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    // If input doesn't start with "/", it's not a command (except exit/quit)
    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let word = lower.split_whitespace().next().unwrap_or_default();
    match word {
        "/load" => path_argument(trimmed, "/load", "/load <flight_data.json>").map(SpecialCommand::Load),
        "/upload" => path_argument(trimmed, "/upload", "/upload <log_file>").map(SpecialCommand::Upload),
        "/summary" => Ok(SpecialCommand::Summary),
        "/anomalies" => Ok(SpecialCommand::Anomalies),
        "/history" => Ok(SpecialCommand::History),
        "/session" => Ok(SpecialCommand::Session),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" | "exit" | "quit" => Ok(SpecialCommand::Exit),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Print the list of special commands
pub fn print_help() {
    println!("\n{}", "Special commands".bold());
    println!("  /load <file>     Load decoded flight data (JSON)");
    println!("  /upload <file>   Upload a raw log to the backend for decoding");
    println!("  /summary         Show flight summary");
    println!("  /anomalies       Scan the loaded flight for anomalies");
    println!("  /history         Show the conversation so far");
    println!("  /session         Show the session id");
    println!("  /help            Show this help");
    println!("  /exit, exit      Leave the chat\n");
    println!("Anything else is sent to the flight analyst.\n");
}
