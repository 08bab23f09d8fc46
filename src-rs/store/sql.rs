use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use super::types::{History, RepeatGuard, VocabularyEntry, WordStore};
use crate::error::RotatorError;

/// SQLite-backed store. Repeats are prevented by the `used` column of `words`.
#[derive(Clone)]
pub struct SqlStore {
    pool: SqlitePool,
}

impl SqlStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, RotatorError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|err| RotatorError::storage(database_url, err))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|err| RotatorError::storage(database_url, err))?;
        Ok(Self { pool })
    }

    pub async fn init_schema(&self) -> Result<(), RotatorError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS words (
                word TEXT NOT NULL,
                common BOOLEAN NOT NULL DEFAULT 1,
                used BOOLEAN NOT NULL DEFAULT 0
            )",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS wordsHistory (
                word TEXT NOT NULL,
                time INTEGER NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Fills `words` from `entries` unless the table already has rows.
    /// Returns how many rows were inserted.
    pub async fn seed_vocabulary(&self, entries: &[VocabularyEntry]) -> Result<usize, RotatorError> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM words")
            .fetch_one(&self.pool)
            .await?;
        if existing > 0 {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        for entry in entries {
            sqlx::query("INSERT INTO words (word, common, used) VALUES (?, ?, ?)")
                .bind(&entry.word)
                .bind(entry.common)
                .bind(entry.used)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        info!(count = entries.len(), "seeded vocabulary table");
        Ok(entries.len())
    }
}

#[async_trait]
impl WordStore for SqlStore {
    async fn load_vocabulary(&self) -> Result<Vec<VocabularyEntry>, RotatorError> {
        let rows: Vec<(String, bool, bool)> =
            sqlx::query_as("SELECT word, common, used FROM words ORDER BY rowid")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(word, common, used)| VocabularyEntry { word, common, used })
            .collect())
    }

    async fn load_history(&self) -> Result<History, RotatorError> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT word, time FROM wordsHistory ORDER BY time ASC, rowid ASC")
                .fetch_all(&self.pool)
                .await?;

        let mut history = History::default();
        for (word, time) in rows {
            let at = DateTime::from_timestamp_millis(time).ok_or_else(|| {
                RotatorError::MalformedPersistedState(format!("wordsHistory time out of range: {}", time))
            })?;
            history.push(&word, at);
        }
        Ok(history)
    }

    async fn append_history(&self, word: &str, at: DateTime<Utc>) -> Result<(), RotatorError> {
        sqlx::query("INSERT INTO wordsHistory (word, time) VALUES (?, ?)")
            .bind(word)
            .bind(at.timestamp_millis())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn mark_used(&self, word: &str) -> Result<(), RotatorError> {
        sqlx::query("UPDATE words SET used = 1 WHERE word = ?")
            .bind(word)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn repeat_guard(&self) -> RepeatGuard {
        RepeatGuard::UsedFlag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    async fn memory_store() -> SqlStore {
        let store = SqlStore::connect("sqlite::memory:").await.unwrap();
        store.init_schema().await.unwrap();
        store
    }

    #[tokio::test]
    async fn seeding_only_fills_an_empty_table() {
        let store = memory_store().await;
        let entries = vec![VocabularyEntry::new("cat"), VocabularyEntry::new("dog")];

        assert_eq!(store.seed_vocabulary(&entries).await.unwrap(), 2);
        assert_eq!(store.seed_vocabulary(&entries).await.unwrap(), 0);

        let loaded = store.load_vocabulary().await.unwrap();
        assert_eq!(loaded, entries);
    }

    #[tokio::test]
    async fn mark_used_flags_the_row() {
        let store = memory_store().await;
        store
            .seed_vocabulary(&[VocabularyEntry::new("cat"), VocabularyEntry::new("dog")])
            .await
            .unwrap();

        store.mark_used("dog").await.unwrap();

        let loaded = store.load_vocabulary().await.unwrap();
        assert!(!loaded[0].used);
        assert!(loaded[1].used);
    }

    #[tokio::test]
    async fn history_is_ordered_by_time() {
        let store = memory_store().await;
        let earlier = Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 5, 2, 8, 0, 0).unwrap();

        store.append_history("dog", later).await.unwrap();
        store.append_history("cat", earlier).await.unwrap();

        let history = store.load_history().await.unwrap();
        assert_eq!(history.words, vec!["cat", "dog"]);
        assert_eq!(history.current(), Some("dog"));
        assert_eq!(history.last_updated, Some(later));
    }

    #[tokio::test]
    async fn missing_tables_are_reported() {
        let store = SqlStore::connect("sqlite::memory:").await.unwrap();

        let err = store.load_vocabulary().await.unwrap_err();

        assert!(matches!(err, RotatorError::StorageUnavailable(_)));
    }

    #[tokio::test]
    async fn out_of_range_history_time_is_malformed() {
        let store = memory_store().await;
        sqlx::query("INSERT INTO wordsHistory (word, time) VALUES (?, ?)")
            .bind("cat")
            .bind(i64::MAX)
            .execute(&store.pool)
            .await
            .unwrap();

        let err = store.load_history().await.unwrap_err();

        assert!(matches!(err, RotatorError::MalformedPersistedState(_)));
    }
}
