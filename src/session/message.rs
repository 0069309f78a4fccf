//! Transcript message types and fixed texts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Seed message when there is no usable saved transcript
pub const GREETING_TEXT: &str = "Hello! I am BMO. What's on your mind?";
/// Reply stand-in when the backend answered without text
pub const NO_REPLY_TEXT: &str = "Hmm, I didn't catch that!";
/// Reply stand-in when the chat request failed
pub const SEND_ERROR_TEXT: &str = "Error talking to BMO!";
/// Reseed text when the backend acknowledged a reset without a message
pub const RESET_FALLBACK_TEXT: &str = "BMO's memory has been refreshed! Ready for new adventures!";
/// Reseed text when the reset call failed
pub const RESET_ERROR_TEXT: &str = "Error resetting BMO!";

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    /// Older saved transcripts label BMO's messages "bmo"
    #[serde(alias = "bmo")]
    Assistant,
}

/// One transcript entry; never mutated after creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub author: Author,
    pub text: String,
    #[serde(default = "Utc::now", deserialize_with = "timestamp_or_now")]
    pub timestamp: DateTime<Utc>,
}

/// Saved timestamps can be null or garbled; those entries take the restore time
fn timestamp_or_now<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|text| text.parse::<DateTime<Utc>>().ok())
        .unwrap_or_else(Utc::now))
}

impl Message {
    pub fn new(author: Author, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            author,
            text: text.into(),
            timestamp,
        }
    }

    pub fn user(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self::new(Author::User, text, timestamp)
    }

    pub fn assistant(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self::new(Author::Assistant, text, timestamp)
    }

    pub fn greeting() -> Self {
        Self::assistant(GREETING_TEXT, Utc::now())
    }
}
