//! Terminal rendering of session state
//!
//! Formatting plus the single output loop; the session owns every state
//! change.

use crate::session::{Author, Message, Mood, SessionEvent};
use chrono::TimeZone;
use std::fmt::Display;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;

pub const HELP: &str = "Type a message and press Enter. Commands: /reset, /mood, /history, /help, /quit";

/// One line of user input, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Prompt(String),
    Reset,
    Mood,
    History,
    Help,
    Quit,
}

/// Slash commands are matched on the trimmed line; anything else is a prompt
/// and goes to the session untouched.
pub fn parse_input(line: &str) -> Input {
    match line.trim() {
        "/reset" => Input::Reset,
        "/mood" => Input::Mood,
        "/history" => Input::History,
        "/help" => Input::Help,
        "/quit" | "/exit" => Input::Quit,
        _ => Input::Prompt(line.to_string()),
    }
}

pub fn format_message<Tz>(message: &Message, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let time = message.timestamp.with_timezone(tz).format("%H:%M");
    let who = match message.author {
        Author::User => "You",
        Author::Assistant => "BMO",
    };
    format!("[{time}] {who}: {}", message.text)
}

pub fn format_mood(mood: Mood) -> String {
    format!("{} ({})", mood.caption(), mood.face_asset())
}

/// Lines to print for a session change; `None` when there is nothing to show
pub fn format_event<Tz>(event: &SessionEvent, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match event {
        // The user just typed it
        SessionEvent::MessageAppended { message } if message.author == Author::User => None,
        SessionEvent::MessageAppended { message } => Some(format_message(message, tz)),
        SessionEvent::TranscriptReplaced { messages } => {
            let mut lines = vec!["--- conversation reset ---".to_string()];
            lines.extend(messages.iter().map(|m| format_message(m, tz)));
            Some(lines.join("\n"))
        }
        SessionEvent::StateChanged { pending: true } => Some("beep boop... thinking...".to_string()),
        SessionEvent::StateChanged { pending: false } => None,
        SessionEvent::MoodChanged { mood } => Some(format!("* BMO is {} *", mood.caption().to_lowercase())),
    }
}

/// Emit session events and command output from one place.
///
/// Events already queued win over command output, so a command answered
/// after a reply never prints ahead of it. Returns once the session is gone.
pub async fn run_printer<Tz>(
    mut events: broadcast::Receiver<SessionEvent>,
    mut commands: mpsc::UnboundedReceiver<String>,
    tz: Tz,
    mut emit: impl FnMut(String),
) where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    loop {
        tokio::select! {
            biased;
            event = events.recv() => match event {
                Ok(event) => {
                    if let Some(text) = format_event(&event, &tz) {
                        emit(text);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Renderer fell behind");
                }
                Err(RecvError::Closed) => break,
            },
            Some(text) = commands.recv() => emit(text),
        }
    }
    while let Ok(text) = commands.try_recv() {
        emit(text);
    }
}
