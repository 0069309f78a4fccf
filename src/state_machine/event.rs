//! Events that can occur in a session

use crate::backend::{ChatReply, ResetAck};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    UserSubmit {
        text: String,
    },

    // Backend events
    ReplyReceived {
        reply: ChatReply,
    },
    /// Details are logged where the failure is observed
    RequestFailed,

    // Reset events
    ResetAcknowledged {
        ack: ResetAck,
    },
    ResetFailed,
}
