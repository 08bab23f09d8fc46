use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use rand::seq::IndexedRandom;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::clock::{same_local_day, Clock};
use super::types::{Snapshot, TickOutcome};
use crate::error::RotatorError;
use crate::store::{History, RepeatGuard, VocabularyEntry, WordStore};

struct RotationState {
    vocabulary: Vec<VocabularyEntry>,
    history: History,
}

impl RotationState {
    fn candidates(&self, guard: RepeatGuard) -> Vec<&str> {
        let seen: HashSet<&str> = match guard {
            RepeatGuard::History => self.history.words.iter().map(String::as_str).collect(),
            RepeatGuard::UsedFlag => HashSet::new(),
        };
        self.vocabulary
            .iter()
            .filter(|entry| entry.common)
            .filter(|entry| match guard {
                RepeatGuard::History => !seen.contains(entry.word.as_str()),
                RepeatGuard::UsedFlag => !entry.used,
            })
            .map(|entry| entry.word.as_str())
            .collect()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            word: self.history.current().map(str::to_string),
            last_updated: self.history.last_updated,
            history_length: self.history.len(),
        }
    }
}

/// Owns the word of the day and decides when it changes.
///
/// Rotations are serialised through an async mutex; readers only touch the
/// snapshot, which is swapped once a rotation has been persisted.
pub struct WordRotator {
    store: Arc<dyn WordStore>,
    clock: Arc<dyn Clock>,
    guard: RepeatGuard,
    valid_words: Vec<String>,
    state: Mutex<RotationState>,
    snapshot: RwLock<Snapshot>,
}

impl WordRotator {
    pub async fn load(store: Arc<dyn WordStore>, clock: Arc<dyn Clock>) -> Result<Self, RotatorError> {
        let vocabulary = store.load_vocabulary().await?;
        let history = store.load_history().await?;
        let guard = store.repeat_guard();
        debug!(
            vocabulary = vocabulary.len(),
            history = history.len(),
            ?guard,
            "loaded rotation state"
        );

        let state = RotationState { vocabulary, history };
        let snapshot = state.snapshot();
        let valid_words = state.vocabulary.iter().map(|entry| entry.word.clone()).collect();

        Ok(Self {
            store,
            clock,
            guard,
            valid_words,
            state: Mutex::new(state),
            snapshot: RwLock::new(snapshot),
        })
    }

    /// Loads state and makes sure there is a current word.
    pub async fn bootstrap(store: Arc<dyn WordStore>, clock: Arc<dyn Clock>) -> Result<Arc<Self>, RotatorError> {
        let rotator = Self::load(store, clock).await?;
        if rotator.snapshot().history_length == 0 {
            info!("history is empty, picking a first word");
            rotator.advance().await?;
        }
        Ok(Arc::new(rotator))
    }

    pub async fn advance(&self) -> Result<String, RotatorError> {
        let mut state = self.state.lock().await;
        self.advance_locked(&mut state).await
    }

    /// Advances when the local calendar day of the last rotation is not today.
    pub async fn check_and_maybe_advance(&self) -> Result<TickOutcome, RotatorError> {
        let mut state = self.state.lock().await;
        let now = self.clock.now();
        if let Some(last) = state.history.last_updated {
            if same_local_day(last, now) {
                return Ok(TickOutcome::Unchanged);
            }
        }
        let word = self.advance_locked(&mut state).await?;
        Ok(TickOutcome::Advanced(word))
    }

    pub fn current_word(&self) -> Option<String> {
        self.snapshot().word
    }

    pub fn snapshot(&self) -> Snapshot {
        match self.snapshot.read() {
            Ok(lock) => lock.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn publish(&self, snapshot: Snapshot) {
        let mut current = match self.snapshot.write() {
            Ok(lock) => lock,
            Err(poisoned) => {
                warn!("snapshot lock poisoned, overwriting");
                poisoned.into_inner()
            }
        };
        *current = snapshot;
    }

    pub fn valid_words(&self) -> &[String] {
        &self.valid_words
    }

    pub async fn history(&self) -> History {
        self.state.lock().await.history.clone()
    }

    async fn advance_locked(&self, state: &mut RotationState) -> Result<String, RotatorError> {
        let picked = {
            let candidates = state.candidates(self.guard);
            let mut rng = rand::rng();
            candidates.choose(&mut rng).map(|word| word.to_string())
        };
        let word = picked.ok_or(RotatorError::VocabularyExhausted {
            vocabulary: state.vocabulary.len(),
        })?;
        let now = self.clock.now();

        if self.guard == RepeatGuard::UsedFlag {
            self.store.mark_used(&word).await?;
        }
        self.store.append_history(&word, now).await?;

        if self.guard == RepeatGuard::UsedFlag {
            for entry in state.vocabulary.iter_mut().filter(|entry| entry.word == word) {
                entry.used = true;
            }
        }
        state.history.push(&word, now);

        self.publish(state.snapshot());

        info!(history = state.history.len(), "rotated word of the day");
        debug!(%word, "new word");
        Ok(word)
    }
}
