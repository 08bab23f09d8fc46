use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::types::{History, RepeatGuard, VocabularyEntry, WordStore};
use crate::error::RotatorError;

/// Keeps everything in process memory. Nothing survives a restart.
pub struct MemoryStore {
    guard: RepeatGuard,
    vocabulary: RwLock<Vec<VocabularyEntry>>,
    history: RwLock<History>,
}

impl MemoryStore {
    pub fn new(words: &[&str]) -> Self {
        Self::with_entries(
            words.iter().map(|word| VocabularyEntry::new(word)).collect(),
            RepeatGuard::History,
        )
    }

    pub fn with_entries(vocabulary: Vec<VocabularyEntry>, guard: RepeatGuard) -> Self {
        Self {
            guard,
            vocabulary: RwLock::new(vocabulary),
            history: RwLock::new(History::default()),
        }
    }

    pub fn with_history(self, history: History) -> Self {
        if let Ok(mut current) = self.history.write() {
            *current = history;
        }
        self
    }

    pub fn history(&self) -> History {
        match self.history.read() {
            Ok(lock) => lock.clone(),
            Err(_) => History::default(),
        }
    }

    pub fn vocabulary(&self) -> Vec<VocabularyEntry> {
        match self.vocabulary.read() {
            Ok(lock) => lock.clone(),
            Err(_) => vec![],
        }
    }
}

fn lock_error() -> RotatorError {
    RotatorError::StorageUnavailable("memory store lock poisoned".to_string())
}

#[async_trait]
impl WordStore for MemoryStore {
    async fn load_vocabulary(&self) -> Result<Vec<VocabularyEntry>, RotatorError> {
        let vocabulary = self.vocabulary.read().map_err(|_| lock_error())?;
        Ok(vocabulary.clone())
    }

    async fn load_history(&self) -> Result<History, RotatorError> {
        let history = self.history.read().map_err(|_| lock_error())?;
        Ok(history.clone())
    }

    async fn append_history(&self, word: &str, at: DateTime<Utc>) -> Result<(), RotatorError> {
        let mut history = self.history.write().map_err(|_| lock_error())?;
        history.push(word, at);
        Ok(())
    }

    async fn mark_used(&self, word: &str) -> Result<(), RotatorError> {
        let mut vocabulary = self.vocabulary.write().map_err(|_| lock_error())?;
        for entry in vocabulary.iter_mut().filter(|entry| entry.word == word) {
            entry.used = true;
        }
        Ok(())
    }

    fn repeat_guard(&self) -> RepeatGuard {
        self.guard
    }
}
