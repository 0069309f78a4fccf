//! HTTP implementation of the chat backend

use super::types::{BackendStatus, ChatReply, PromptRequest, ResetAck};
use super::{BackendError, ChatBackend};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Talks to the BMO service at `{base}/chat/...`
pub struct HttpBackend {
    client: Client,
    chat_url: String,
    reset_url: String,
    status_url: String,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            chat_url: format!("{base_url}/chat/"),
            reset_url: format!("{base_url}/chat/reset"),
            status_url: format!("{base_url}/chat/status"),
            base_url,
        })
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(BackendError::from_status(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            BackendError::decode(format!("Failed to parse response: {e} - body: {body}"))
        })
    }
}

fn classify_transport_error(e: &reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::timeout(format!("Request timeout: {e}"))
    } else if e.is_connect() {
        BackendError::network(format!("Connection failed: {e}"))
    } else if e.is_request() || e.is_body() {
        BackendError::network(format!("Request failed: {e}"))
    } else {
        BackendError::unknown(format!("Request failed: {e}"))
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send_prompt(&self, request: &PromptRequest) -> Result<ChatReply, BackendError> {
        let response = self
            .client
            .post(&self.chat_url)
            .json(request)
            .send()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        Self::read_json(response).await
    }

    async fn reset(&self) -> Result<ResetAck, BackendError> {
        let response = self
            .client
            .post(&self.reset_url)
            .send()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        Self::read_json(response).await
    }

    async fn status(&self) -> Result<BackendStatus, BackendError> {
        let response = self
            .client
            .get(&self.status_url)
            .send()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        Self::read_json(response).await
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}
