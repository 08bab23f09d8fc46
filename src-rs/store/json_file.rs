use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use super::types::{History, RepeatGuard, VocabularyEntry, WordStore};
use crate::error::RotatorError;

/// On-disk history document. `words[0]` is the current word.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryDocument {
    #[serde(default)]
    words: Vec<String>,
    #[serde(default)]
    last_updated: Option<f64>,
}

impl HistoryDocument {
    fn into_history(self) -> Result<History, RotatorError> {
        let last_updated = match self.last_updated {
            Some(secs) => Some(from_unix_seconds(secs).ok_or_else(|| {
                RotatorError::MalformedPersistedState(format!("lastUpdated out of range: {}", secs))
            })?),
            None => None,
        };
        let mut words = self.words;
        words.reverse();
        Ok(History { words, last_updated })
    }
}

fn from_unix_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((secs * 1000.0).round() as i64)
}

fn to_unix_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / 1000.0
}

/// Vocabulary in a flat JSON array, history in a JSON document next to it.
/// Repeats are prevented by scanning the history.
pub struct JsonFileStore {
    vocabulary_path: PathBuf,
    history_path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(vocabulary_path: impl Into<PathBuf>, history_path: impl Into<PathBuf>) -> Self {
        Self {
            vocabulary_path: vocabulary_path.into(),
            history_path: history_path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_document(&self) -> Result<HistoryDocument, RotatorError> {
        let raw = match fs::read_to_string(&self.history_path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.history_path.display(), "no history file yet, starting empty");
                return Ok(HistoryDocument::default());
            }
            Err(err) => {
                return Err(RotatorError::storage(&self.history_path.display().to_string(), err))
            }
        };
        serde_json::from_str(&raw)
            .map_err(|err| RotatorError::malformed(&self.history_path.display().to_string(), err))
    }

    async fn write_document(&self, document: &HistoryDocument) -> Result<(), RotatorError> {
        let context = self.history_path.display().to_string();
        let serialized =
            serde_json::to_string_pretty(document).map_err(|err| RotatorError::malformed(&context, err))?;

        let mut tmp = self.history_path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, serialized)
            .await
            .map_err(|err| RotatorError::storage(&context, err))?;
        if let Err(err) = fs::rename(&tmp, &self.history_path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(RotatorError::storage(&context, err));
        }
        Ok(())
    }
}

#[async_trait]
impl WordStore for JsonFileStore {
    async fn load_vocabulary(&self) -> Result<Vec<VocabularyEntry>, RotatorError> {
        let context = self.vocabulary_path.display().to_string();
        let raw = fs::read_to_string(&self.vocabulary_path)
            .await
            .map_err(|err| RotatorError::storage(&context, err))?;
        let words: Vec<String> =
            serde_json::from_str(&raw).map_err(|err| RotatorError::malformed(&context, err))?;
        Ok(words.iter().map(|word| VocabularyEntry::new(word)).collect())
    }

    async fn load_history(&self) -> Result<History, RotatorError> {
        self.read_document().await?.into_history()
    }

    async fn append_history(&self, word: &str, at: DateTime<Utc>) -> Result<(), RotatorError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        document.words.insert(0, word.to_string());
        document.last_updated = Some(to_unix_seconds(at));
        self.write_document(&document).await
    }

    fn repeat_guard(&self) -> RepeatGuard {
        RepeatGuard::History
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::path::Path;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn reads_vocabulary_as_common_unused_entries() {
        let dir = tempfile::tempdir().unwrap();
        let vocab = write(dir.path(), "words.json", r#"["cat", "dog"]"#);
        let store = JsonFileStore::new(vocab, dir.path().join("history.json"));

        let entries = store.load_vocabulary().await.unwrap();

        assert_eq!(entries, vec![VocabularyEntry::new("cat"), VocabularyEntry::new("dog")]);
    }

    #[tokio::test]
    async fn missing_vocabulary_is_storage_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nope.json"), dir.path().join("history.json"));

        let err = store.load_vocabulary().await.unwrap_err();

        assert!(matches!(err, RotatorError::StorageUnavailable(_)));
    }

    #[tokio::test]
    async fn missing_history_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let vocab = write(dir.path(), "words.json", r#"["cat"]"#);
        let store = JsonFileStore::new(vocab, dir.path().join("history.json"));

        let history = store.load_history().await.unwrap();

        assert!(history.is_empty());
        assert_eq!(history.last_updated, None);
    }

    #[tokio::test]
    async fn most_recent_first_on_disk_becomes_current() {
        let dir = tempfile::tempdir().unwrap();
        let vocab = write(dir.path(), "words.json", r#"["cat", "dog"]"#);
        let hist = write(
            dir.path(),
            "history.json",
            r#"{"words": ["dog", "cat"], "lastUpdated": 1700000000.5}"#,
        );
        let store = JsonFileStore::new(vocab, hist);

        let history = store.load_history().await.unwrap();

        assert_eq!(history.words, vec!["cat", "dog"]);
        assert_eq!(history.current(), Some("dog"));
        assert_eq!(
            history.last_updated,
            Some(Utc.timestamp_millis_opt(1_700_000_000_500).unwrap())
        );
    }

    #[tokio::test]
    async fn malformed_history_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let vocab = write(dir.path(), "words.json", r#"["cat"]"#);
        let hist = write(dir.path(), "history.json", r#"{"words": "cat""#);
        let store = JsonFileStore::new(vocab, hist);

        let err = store.load_history().await.unwrap_err();

        assert!(matches!(err, RotatorError::MalformedPersistedState(_)));
    }

    #[tokio::test]
    async fn append_prepends_and_stamps_document() {
        let dir = tempfile::tempdir().unwrap();
        let vocab = write(dir.path(), "words.json", r#"["cat", "dog"]"#);
        let hist = write(dir.path(), "history.json", r#"{"words": ["cat"], "lastUpdated": 0}"#);
        let store = JsonFileStore::new(vocab, hist.clone());
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();

        store.append_history("dog", at).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&hist).unwrap()).unwrap();
        assert_eq!(raw["words"], serde_json::json!(["dog", "cat"]));
        assert_eq!(raw["lastUpdated"].as_f64(), Some(at.timestamp() as f64));

        let history = store.load_history().await.unwrap();
        assert_eq!(history.current(), Some("dog"));
        assert_eq!(history.last_updated, Some(at));
        assert!(!dir.path().join("history.json.tmp").exists());
    }

    #[tokio::test]
    async fn failed_rename_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory cannot be replaced by a file.
        let hist = dir.path().join("history.json");
        std::fs::create_dir(&hist).unwrap();
        std::fs::write(hist.join("keep"), "x").unwrap();
        let store = JsonFileStore::new(dir.path().join("words.json"), hist);

        let err = store.write_document(&HistoryDocument::default()).await.unwrap_err();

        assert!(matches!(err, RotatorError::StorageUnavailable(_)));
        assert!(!dir.path().join("history.json.tmp").exists());
    }
}
