use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RotatorError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub word: String,
    pub common: bool,
    pub used: bool,
}

impl VocabularyEntry {
    pub fn new(word: &str) -> Self {
        Self {
            word: word.to_string(),
            common: true,
            used: false,
        }
    }
}

/// Previously selected words, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    pub words: Vec<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl History {
    pub fn current(&self) -> Option<&str> {
        self.words.last().map(String::as_str)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|seen| seen == word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn push(&mut self, word: &str, at: DateTime<Utc>) {
        self.words.push(word.to_string());
        self.last_updated = Some(at);
    }
}

/// How a store keeps a word from being picked twice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepeatGuard {
    /// Skip anything already present in the history.
    History,
    /// Skip vocabulary entries flagged as used.
    UsedFlag,
}

#[async_trait]
pub trait WordStore: Send + Sync {
    async fn load_vocabulary(&self) -> Result<Vec<VocabularyEntry>, RotatorError>;

    async fn load_history(&self) -> Result<History, RotatorError>;

    async fn append_history(&self, word: &str, at: DateTime<Utc>) -> Result<(), RotatorError>;

    async fn mark_used(&self, _word: &str) -> Result<(), RotatorError> {
        Ok(())
    }

    fn repeat_guard(&self) -> RepeatGuard;
}
