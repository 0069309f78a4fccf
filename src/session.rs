//! Conversation session manager
//!
//! Owns the transcript, mood and request lifecycle for one chat session.
//! Events go through the pure transition function; this module executes
//! the resulting effects and tells the renderer what changed.

pub mod message;
mod mood;
pub mod traits;
mod transcript;

#[cfg(test)]
pub mod testing;

pub use message::{Author, Message};
pub use mood::{Mood, MoodState};
pub use traits::KeyValueStore;
#[allow(unused_imports)] // Public API re-exports
pub use transcript::{restore_messages, Transcript, TRANSCRIPT_KEY};

use crate::backend::{
    BackendError, ChatBackend, ChatReply, GenerationParams, LoggingBackend, PromptRequest,
};
use crate::db::Database;
use crate::state_machine::{transition, Effect, Event, RequestState, TransitionContext};
use chrono::Utc;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Session wired to the real backend and database
pub type ProductionSession = Session<LoggingBackend, Database>;

/// Change notifications for the renderer
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    MessageAppended { message: Message },
    TranscriptReplaced { messages: Vec<Message> },
    StateChanged { pending: bool },
    MoodChanged { mood: Mood },
}

pub struct Session<B: ChatBackend, S: KeyValueStore> {
    id: Uuid,
    params: GenerationParams,
    state: RequestState,
    transcript: Transcript<S>,
    mood: MoodState,
    backend: B,
    events: broadcast::Sender<SessionEvent>,
}

impl<B: ChatBackend, S: KeyValueStore> Session<B, S> {
    /// Restore the saved transcript (or seed the greeting); mood and request
    /// state start from their defaults. Makes no backend call.
    pub fn bootstrap(backend: B, store: S, params: GenerationParams) -> Self {
        let transcript = Transcript::restore(store);
        let (events, _) = broadcast::channel(64);
        let id = Uuid::new_v4();

        tracing::info!(
            session_id = %id,
            messages = transcript.len(),
            endpoint = backend.endpoint(),
            "Session started"
        );

        Self {
            id,
            params,
            state: RequestState::Idle,
            transcript,
            mood: MoodState::default(),
            backend,
            events,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn messages(&self) -> &[Message] {
        self.transcript.messages()
    }

    pub fn mood(&self) -> Mood {
        self.mood.current()
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[allow(dead_code)] // Used in tests
    pub fn store(&self) -> &S {
        self.transcript.store()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    // ==================== Request Orchestration ====================

    /// Start a request: appends the user message and goes pending.
    ///
    /// Returns the payload to send, or `None` when the prompt is blank or a
    /// request is already in flight (nothing changes in that case).
    pub fn submit(&mut self, text: &str) -> Option<PromptRequest> {
        self.dispatch(Event::UserSubmit {
            text: text.to_string(),
        })
    }

    /// Finish the in-flight request with its outcome.
    ///
    /// Appends exactly one assistant message and releases pending. Outcomes
    /// arriving with nothing in flight are dropped.
    pub fn resolve(&mut self, outcome: Result<ChatReply, BackendError>) {
        let event = match outcome {
            Ok(reply) => Event::ReplyReceived { reply },
            Err(e) => {
                tracing::debug!(
                    session_id = %self.id,
                    kind = e.kind.as_str(),
                    error = %e.message,
                    "Chat request failed"
                );
                Event::RequestFailed
            }
        };
        self.dispatch(event);
    }

    /// Submit, call the backend, resolve. Failures end up in the transcript;
    /// nothing is returned to the caller.
    pub async fn send(&mut self, text: &str) {
        let Some(request) = self.submit(text) else {
            return;
        };

        let in_flight = InFlight::new(self);
        let outcome = in_flight.session.backend.send_prompt(&request).await;
        in_flight.finish(outcome);
    }

    // ==================== Reset ====================

    /// Ask the backend to forget, then reseed locally whatever it answered.
    pub async fn reset(&mut self) {
        let event = match self.backend.reset().await {
            Ok(ack) => Event::ResetAcknowledged { ack },
            Err(e) => {
                tracing::debug!(
                    session_id = %self.id,
                    kind = e.kind.as_str(),
                    error = %e.message,
                    "Backend reset failed"
                );
                Event::ResetFailed
            }
        };
        self.dispatch(event);
        tracing::info!(session_id = %self.id, "Session reset");
    }

    // ==================== Effect Execution ====================

    fn dispatch(&mut self, event: Event) -> Option<PromptRequest> {
        let context = TransitionContext::new(self.params, Utc::now());
        let result = match transition(self.state, &context, event) {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!(session_id = %self.id, error = %e, "Event ignored");
                return None;
            }
        };

        let mut outbound = None;
        for effect in result.effects {
            if let Some(request) = self.execute_effect(effect) {
                outbound = Some(request);
            }
        }
        // Committed after the effects so a new message is in place before
        // pending flips either way
        self.set_state(result.new_state);
        outbound
    }

    fn execute_effect(&mut self, effect: Effect) -> Option<PromptRequest> {
        match effect {
            Effect::AppendMessage(message) => {
                self.transcript.append(message.clone());
                self.notify(SessionEvent::MessageAppended { message });
            }
            Effect::ReplaceTranscript(messages) => {
                self.transcript.replace_all(messages.clone());
                self.notify(SessionEvent::TranscriptReplaced { messages });
            }
            Effect::ClearPersisted => self.transcript.clear_persisted(),
            Effect::SetMood(label) => {
                let before = self.mood.current();
                if self.mood.set(&label) && self.mood.current() != before {
                    self.notify(SessionEvent::MoodChanged {
                        mood: self.mood.current(),
                    });
                }
            }
            Effect::ResetMood => {
                let before = self.mood.current();
                self.mood.reset();
                if before != self.mood.current() {
                    self.notify(SessionEvent::MoodChanged {
                        mood: self.mood.current(),
                    });
                }
            }
            Effect::SendPrompt(request) => return Some(request),
        }
        None
    }

    fn set_state(&mut self, state: RequestState) {
        if self.state == state {
            return;
        }
        tracing::debug!(session_id = %self.id, from = ?self.state, to = ?state, "Request state changed");
        self.state = state;
        self.notify(SessionEvent::StateChanged {
            pending: state.is_pending(),
        });
    }

    fn notify(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

/// Releases pending if a send is abandoned before its outcome arrives
struct InFlight<'a, B: ChatBackend, S: KeyValueStore> {
    session: &'a mut Session<B, S>,
    finished: bool,
}

impl<'a, B: ChatBackend, S: KeyValueStore> InFlight<'a, B, S> {
    fn new(session: &'a mut Session<B, S>) -> Self {
        Self {
            session,
            finished: false,
        }
    }

    fn finish(mut self, outcome: Result<ChatReply, BackendError>) {
        self.finished = true;
        self.session.resolve(outcome);
    }
}

impl<B: ChatBackend, S: KeyValueStore> Drop for InFlight<'_, B, S> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!(session_id = %self.session.id, "Send abandoned before completion");
            self.session
                .resolve(Err(BackendError::unknown("request abandoned")));
        }
    }
}
