//! Wire types for the chat backend
//!
//! Every response field is optional; fallbacks are applied by the session,
//! not here.

use serde::{Deserialize, Serialize};

/// Generation parameters sent with every prompt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 150,
            temperature: 0.8,
        }
    }
}

/// Body of `POST /chat/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub reset_conversation: bool,
}

impl PromptRequest {
    pub fn new(prompt: impl Into<String>, params: GenerationParams) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            reset_conversation: false,
        }
    }
}

/// Response of `POST /chat/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub bmo_mood: Option<String>,
    #[serde(default)]
    pub tokens_used: Option<u64>,
    #[serde(default)]
    pub conversation_length: Option<u64>,
}

impl ChatReply {
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_mood(mut self, mood: impl Into<String>) -> Self {
        self.bmo_mood = Some(mood.into());
        self
    }

    /// Reply text, or `None` when the field is absent or empty
    pub fn reply_text(&self) -> Option<&str> {
        self.response.as_deref().filter(|text| !text.is_empty())
    }
}

/// Response of `POST /chat/reset`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetAck {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
}

impl ResetAck {
    /// Confirmation text, or `None` when the field is absent or empty
    pub fn confirmation(&self) -> Option<&str> {
        self.message.as_deref().filter(|text| !text.is_empty())
    }
}

/// Response of `GET /chat/status`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub mood: Option<String>,
}
