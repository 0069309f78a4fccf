//! Message store: the ordered transcript and its persisted copy

use super::message::Message;
use super::traits::KeyValueStore;

/// Storage key holding the serialized transcript
pub const TRANSCRIPT_KEY: &str = "bmoChatHistory";

/// Ordered transcript that writes itself through to a key-value store
///
/// Persistence failures are logged and absorbed; the in-memory sequence
/// stays authoritative for the rest of the session.
pub struct Transcript<S: KeyValueStore> {
    messages: Vec<Message>,
    store: S,
}

impl<S: KeyValueStore> Transcript<S> {
    /// Load the saved transcript, or the single greeting when there is none
    pub fn restore(store: S) -> Self {
        let messages = restore_messages(&store);
        Self { messages, store }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[allow(dead_code)] // API completeness
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        self.persist();
    }

    pub fn replace_all(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.persist();
    }

    /// Drop the persisted copy; the in-memory transcript is untouched
    pub fn clear_persisted(&self) {
        if let Err(e) = self.store.remove(TRANSCRIPT_KEY) {
            tracing::warn!(error = %e, "Failed to clear saved transcript");
        }
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.messages) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize transcript");
                return;
            }
        };
        if let Err(e) = self.store.set(TRANSCRIPT_KEY, &json) {
            tracing::warn!(error = %e, messages = self.messages.len(), "Failed to save transcript");
        }
    }
}

/// Read the saved transcript without failing
///
/// Absent, unreadable, unparseable or empty content all yield the greeting.
pub fn restore_messages<S: KeyValueStore + ?Sized>(store: &S) -> Vec<Message> {
    let saved = match store.get(TRANSCRIPT_KEY) {
        Ok(Some(saved)) => saved,
        Ok(None) => return vec![Message::greeting()],
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read saved transcript");
            return vec![Message::greeting()];
        }
    };

    match serde_json::from_str::<Vec<Message>>(&saved) {
        Ok(messages) if !messages.is_empty() => {
            tracing::info!(messages = messages.len(), "Restored saved transcript");
            messages
        }
        Ok(_) => vec![Message::greeting()],
        Err(e) => {
            tracing::warn!(error = %e, "Saved transcript is corrupt, starting fresh");
            vec![Message::greeting()]
        }
    }
}
