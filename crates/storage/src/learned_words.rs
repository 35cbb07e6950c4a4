use std::sync::Arc;

use lingo_core::model::{LearnedSet, WordEntry};
use tracing::{debug, warn};

use crate::repository::{KeyValueStore, StorageError};

/// Key under which the learned-word snapshot is stored.
pub const LEARNED_WORDS_KEY: &str = "lingoboost-learned-words";

/// Persists the learned set as a single JSON array under a fixed key.
///
/// Reads and writes are whole snapshots. Failures are logged and swallowed by
/// `load`/`save`; the in-memory set stays authoritative for the session.
#[derive(Clone)]
pub struct LearnedWordStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl LearnedWordStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            key: LEARNED_WORDS_KEY.to_owned(),
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Load the persisted set, or an empty one if nothing usable is stored.
    pub async fn load(&self) -> LearnedSet {
        match self.try_load().await {
            Ok(set) => set,
            Err(err) => {
                warn!(key = %self.key, error = %err, "failed to load learned words; starting empty");
                LearnedSet::new()
            }
        }
    }

    /// Overwrite the persisted snapshot with `learned`.
    pub async fn save(&self, learned: &LearnedSet) {
        if let Err(err) = self.try_save(learned).await {
            warn!(key = %self.key, error = %err, count = learned.len(), "failed to save learned words");
        }
    }

    /// Like `load`, but reports failures.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the backend cannot be read, or
    /// `StorageError::Serialization` if the stored payload is not a word array.
    pub async fn try_load(&self) -> Result<LearnedSet, StorageError> {
        let Some(raw) = self.kv.get(&self.key).await? else {
            debug!(key = %self.key, "no learned words stored yet");
            return Ok(LearnedSet::new());
        };

        let entries: Vec<WordEntry> = serde_json::from_str(&raw)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        Ok(LearnedSet::from_entries(entries))
    }

    /// Like `save`, but reports failures.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or writing fails.
    pub async fn try_save(&self, learned: &LearnedSet) -> Result<(), StorageError> {
        let payload = serde_json::to_string(learned.entries())
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.kv.put(&self.key, &payload).await
    }
}
