//! Mock implementations for testing
//!
//! These mocks enable session testing without real I/O.

#![allow(dead_code)]

use super::traits::KeyValueStore;
use crate::backend::{
    BackendError, BackendStatus, ChatBackend, ChatReply, PromptRequest, ResetAck,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

// ============================================================================
// In-memory key-value store
// ============================================================================

/// Key-value store backed by a map, with switchable failures
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Direct read, bypassing failure injection
    pub fn value(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err("storage unavailable".to_string());
        }
        Ok(self.value(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err("quota exceeded".to_string());
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err("storage unavailable".to_string());
        }
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

// ============================================================================
// Mock chat backend
// ============================================================================

/// Mock backend that returns queued outcomes
///
/// An empty queue behaves like an unreachable server.
#[derive(Default)]
pub struct MockBackend {
    replies: Mutex<VecDeque<Result<ChatReply, BackendError>>>,
    resets: Mutex<VecDeque<Result<ResetAck, BackendError>>>,
    /// Record of all prompts sent
    pub requests: Mutex<Vec<PromptRequest>>,
    /// Number of reset calls made
    pub reset_calls: Mutex<usize>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, reply: ChatReply) {
        self.replies.lock().unwrap().push_back(Ok(reply));
    }

    /// Queue a failed chat call
    pub fn queue_error(&self, error: BackendError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn queue_reset(&self, result: Result<ResetAck, BackendError>) {
        self.resets.lock().unwrap().push_back(result);
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<PromptRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn reset_count(&self) -> usize {
        *self.reset_calls.lock().unwrap()
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn send_prompt(&self, request: &PromptRequest) -> Result<ChatReply, BackendError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::network("No mock reply queued")))
    }

    async fn reset(&self) -> Result<ResetAck, BackendError> {
        *self.reset_calls.lock().unwrap() += 1;
        self.resets
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::network("No mock reset queued")))
    }

    async fn status(&self) -> Result<BackendStatus, BackendError> {
        Ok(BackendStatus {
            status: "ready".to_string(),
            message: "BMO is ready for adventure!".to_string(),
            ready: true,
            mood: Some("happy".to_string()),
        })
    }

    fn endpoint(&self) -> &str {
        "mock://bmo"
    }
}

// ============================================================================
// Delayed Mock Backend (for abandoned-request testing)
// ============================================================================

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Mock backend whose chat calls take `delay` to answer
pub struct DelayedMockBackend {
    inner: MockBackend,
    delay: Duration,
    /// Notified when a request starts (for test synchronization)
    pub request_started: Arc<Notify>,
}

impl DelayedMockBackend {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MockBackend::new(),
            delay,
            request_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue_reply(&self, reply: ChatReply) {
        self.inner.queue_reply(reply);
    }
}

#[async_trait]
impl ChatBackend for DelayedMockBackend {
    async fn send_prompt(&self, request: &PromptRequest) -> Result<ChatReply, BackendError> {
        self.request_started.notify_waiters();
        tokio::time::sleep(self.delay).await;
        self.inner.send_prompt(request).await
    }

    async fn reset(&self) -> Result<ResetAck, BackendError> {
        self.inner.reset().await
    }

    async fn status(&self) -> Result<BackendStatus, BackendError> {
        self.inner.status().await
    }

    fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }
}
