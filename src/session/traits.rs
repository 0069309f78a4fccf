//! Trait abstractions for session I/O
//!
//! These traits enable testing the session with in-memory implementations.

use crate::db::Database;
use std::sync::Arc;

/// Durable string key-value store, the role browser local storage plays
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when absent
    fn get(&self, key: &str) -> Result<Option<String>, String>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<(), String>;

    /// Delete a value; deleting a missing key succeeds
    fn remove(&self, key: &str) -> Result<(), String>;
}

// ============================================================================
// Arc implementation for trait objects
// ============================================================================

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        (**self).remove(key)
    }
}

// ============================================================================
// Production Adapter
// ============================================================================

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        self.get_value(key).map_err(|e| e.to_string())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.set_value(key, value).map_err(|e| e.to_string())
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        self.remove_value(key).map_err(|e| e.to_string())
    }
}
