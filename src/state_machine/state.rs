//! Request state types

use crate::backend::GenerationParams;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of the single outbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestState {
    /// Ready for input
    #[default]
    Idle,
    /// Exactly one prompt is outstanding
    Pending,
}

impl RequestState {
    pub fn is_pending(self) -> bool {
        matches!(self, RequestState::Pending)
    }
}

/// Inputs a transition needs besides state and event
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext {
    pub params: GenerationParams,
    /// Timestamp stamped on any message the transition creates
    pub now: DateTime<Utc>,
}

impl TransitionContext {
    pub fn new(params: GenerationParams, now: DateTime<Utc>) -> Self {
        Self { params, now }
    }
}
