//! Effects produced by state transitions

use crate::backend::PromptRequest;
use crate::session::Message;
use chrono::{DateTime, Utc};

/// Effects to be executed after state transition, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append to the transcript (persists)
    AppendMessage(Message),

    /// Replace the whole transcript (persists)
    ReplaceTranscript(Vec<Message>),

    /// Remove the persisted transcript entry
    ClearPersisted,

    /// Offer a backend mood label to the mood state
    SetMood(String),

    /// Return mood to its default
    ResetMood,

    /// Issue the outbound chat request
    SendPrompt(PromptRequest),
}

impl Effect {
    pub fn append_user(text: impl Into<String>, now: DateTime<Utc>) -> Self {
        Effect::AppendMessage(Message::user(text, now))
    }

    pub fn append_assistant(text: impl Into<String>, now: DateTime<Utc>) -> Self {
        Effect::AppendMessage(Message::assistant(text, now))
    }
}
