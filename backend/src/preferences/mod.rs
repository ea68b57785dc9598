//! Preference store collaborator
//!
//! The presentation layer remembers a few user choices between sessions.
//! The engine treats the store as an opaque key-value dependency and only
//! uses it to remember the playback rate.

use std::collections::HashMap;

/// Key under which the chosen playback multiplier is stored
pub const PLAYBACK_RATE_KEY: &str = "playback_rate";

/// String key-value storage
pub trait PreferenceStore: Send {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String);
}

/// Process-local store, used by tests and the headless CLI
#[derive(Debug, Clone, Default)]
pub struct InMemoryPreferences {
    values: HashMap<String, String>,
}

impl InMemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for InMemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
}
