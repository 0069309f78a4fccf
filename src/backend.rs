//! Chat backend abstraction
//!
//! The remote BMO service owns all language-model logic; this module only
//! moves prompts and replies across the wire.

mod error;
mod http;
mod types;

pub use error::{BackendError, BackendErrorKind};
pub use http::HttpBackend;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for chat backends
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send a prompt and wait for the reply
    async fn send_prompt(&self, request: &PromptRequest) -> Result<ChatReply, BackendError>;

    /// Ask the backend to forget the conversation
    async fn reset(&self) -> Result<ResetAck, BackendError>;

    /// Readiness probe
    async fn status(&self) -> Result<BackendStatus, BackendError>;

    /// Where requests go, for logging
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl<T: ChatBackend + ?Sized> ChatBackend for Arc<T> {
    async fn send_prompt(&self, request: &PromptRequest) -> Result<ChatReply, BackendError> {
        (**self).send_prompt(request).await
    }

    async fn reset(&self) -> Result<ResetAck, BackendError> {
        (**self).reset().await
    }

    async fn status(&self) -> Result<BackendStatus, BackendError> {
        (**self).status().await
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}

/// Logging wrapper for chat backends
pub struct LoggingBackend {
    inner: Arc<dyn ChatBackend>,
    endpoint: String,
}

impl LoggingBackend {
    pub fn new(inner: Arc<dyn ChatBackend>) -> Self {
        let endpoint = inner.endpoint().to_string();
        Self { inner, endpoint }
    }

    fn log_failure(&self, call: &str, duration_ms: u128, error: &BackendError) {
        tracing::error!(
            endpoint = %self.endpoint,
            call,
            duration_ms = %duration_ms,
            error = %error.message,
            kind = error.kind.as_str(),
            "Backend call failed"
        );
    }
}

#[async_trait]
impl ChatBackend for LoggingBackend {
    async fn send_prompt(&self, request: &PromptRequest) -> Result<ChatReply, BackendError> {
        let start = std::time::Instant::now();
        let result = self.inner.send_prompt(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    endpoint = %self.endpoint,
                    duration_ms = %duration.as_millis(),
                    prompt_chars = request.prompt.chars().count(),
                    mood = reply.bmo_mood.as_deref().unwrap_or("-"),
                    tokens_used = reply.tokens_used,
                    conversation_length = reply.conversation_length,
                    "Chat request completed"
                );
            }
            Err(e) => self.log_failure("chat", duration.as_millis(), e),
        }

        result
    }

    async fn reset(&self) -> Result<ResetAck, BackendError> {
        let start = std::time::Instant::now();
        let result = self.inner.reset().await;
        let duration = start.elapsed();

        match &result {
            Ok(ack) => {
                tracing::info!(
                    endpoint = %self.endpoint,
                    duration_ms = %duration.as_millis(),
                    status = ack.status.as_deref().unwrap_or("-"),
                    "Backend conversation reset"
                );
            }
            Err(e) => self.log_failure("reset", duration.as_millis(), e),
        }

        result
    }

    async fn status(&self) -> Result<BackendStatus, BackendError> {
        let result = self.inner.status().await;
        match &result {
            Ok(status) => {
                tracing::debug!(endpoint = %self.endpoint, ready = status.ready, "Backend status");
            }
            Err(e) => self.log_failure("status", 0, e),
        }
        result
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
