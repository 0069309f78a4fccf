//! Pure state transition function
//!
//! Given the same state, context and event this always produces the same
//! result and performs no I/O.

use super::{Effect, Event, RequestState, TransitionContext};
use crate::backend::PromptRequest;
use crate::session::message::{
    NO_REPLY_TEXT, RESET_ERROR_TEXT, RESET_FALLBACK_TEXT, SEND_ERROR_TEXT,
};
use crate::session::Message;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: RequestState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: RequestState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Rejected events; the session treats all of these as silent no-ops
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Prompt is empty")]
    EmptyPrompt,
    #[error("A request is already pending")]
    RequestPending,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

pub fn transition(
    state: RequestState,
    context: &TransitionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Prompt submission
        // ============================================================

        // Pending + UserSubmit -> Reject
        (RequestState::Pending, Event::UserSubmit { .. }) => Err(TransitionError::RequestPending),

        // Idle + UserSubmit -> Pending
        (RequestState::Idle, Event::UserSubmit { text }) => {
            let prompt = text.trim();
            if prompt.is_empty() {
                return Err(TransitionError::EmptyPrompt);
            }

            // User message goes in before the request leaves
            Ok(TransitionResult::new(RequestState::Pending)
                .with_effect(Effect::append_user(prompt, context.now))
                .with_effect(Effect::SendPrompt(PromptRequest::new(
                    prompt,
                    context.params,
                ))))
        }

        // ============================================================
        // Request resolution
        // ============================================================

        // Pending + ReplyReceived -> Idle
        (RequestState::Pending, Event::ReplyReceived { reply }) => {
            let text = reply.reply_text().unwrap_or(NO_REPLY_TEXT);
            let mut result = TransitionResult::new(RequestState::Idle)
                .with_effect(Effect::append_assistant(text, context.now));
            if let Some(mood) = reply.bmo_mood {
                result = result.with_effect(Effect::SetMood(mood));
            }
            Ok(result)
        }

        // Pending + RequestFailed -> Idle, failure absorbed into one message
        (RequestState::Pending, Event::RequestFailed) => Ok(
            TransitionResult::new(RequestState::Idle)
                .with_effect(Effect::append_assistant(SEND_ERROR_TEXT, context.now)),
        ),

        // Stale outcome, e.g. a reply landing after a reset
        (RequestState::Idle, Event::ReplyReceived { .. } | Event::RequestFailed) => Err(
            TransitionError::InvalidTransition("no request in flight".to_string()),
        ),

        // ============================================================
        // Reset (allowed from any state)
        // ============================================================
        (_, Event::ResetAcknowledged { ack }) => {
            let text = ack.confirmation().unwrap_or(RESET_FALLBACK_TEXT);
            Ok(reseed(Message::assistant(text, context.now)))
        }

        (_, Event::ResetFailed) => {
            Ok(reseed(Message::assistant(RESET_ERROR_TEXT, context.now)))
        }
    }
}

fn reseed(seed: Message) -> TransitionResult {
    TransitionResult::new(RequestState::Idle).with_effects([
        Effect::ReplaceTranscript(vec![seed]),
        Effect::ClearPersisted,
        Effect::ResetMood,
    ])
}
