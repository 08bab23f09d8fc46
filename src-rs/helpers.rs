use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{ServerConfig, StorageBackend};
use crate::error::RotatorError;
use crate::store::{JsonFileStore, SqlStore, WordStore};

pub fn env_or(key: &str, fallback: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => fallback.to_string(),
    }
}

pub fn env_parse<T>(key: &str, fallback: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    let raw = match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw,
        _ => return fallback,
    };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(err) => {
            warn!("invalid {} value {:?}: {}, using default", key, raw, err);
            fallback
        }
    }
}

/// Pretty logs by default, JSON when `WOTD_LOG_FORMAT=json`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if env_or("WOTD_LOG_FORMAT", "pretty").eq_ignore_ascii_case("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

pub async fn build_store(cfg: &ServerConfig) -> Result<Arc<dyn WordStore>, RotatorError> {
    match cfg.backend {
        StorageBackend::Json => {
            info!(
                vocabulary = %cfg.vocabulary_path.display(),
                history = %cfg.history_path.display(),
                "using json file storage"
            );
            Ok(Arc::new(JsonFileStore::new(&cfg.vocabulary_path, &cfg.history_path)))
        }
        StorageBackend::Sqlite => {
            info!(url = %cfg.database_url, "using sqlite storage");
            let store = SqlStore::connect(&cfg.database_url).await?;
            store.init_schema().await?;
            if cfg.vocabulary_path.exists() {
                // Only the word list is read here; the history path is not touched.
                let seed = JsonFileStore::new(&cfg.vocabulary_path, &cfg.history_path)
                    .load_vocabulary()
                    .await?;
                store.seed_vocabulary(&seed).await?;
            }
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_variables_fall_back() {
        assert_eq!(env_or("WOTD_TEST_SURELY_UNSET", "static"), "static");
        assert_eq!(env_parse("WOTD_TEST_SURELY_UNSET_PORT", 8080u16), 8080);
    }

    #[tokio::test]
    async fn sqlite_backend_is_seeded_from_the_word_list() {
        let dir = tempfile::tempdir().unwrap();
        let vocabulary_path = dir.path().join("words.json");
        std::fs::write(&vocabulary_path, r#"["cat", "dog"]"#).unwrap();
        let cfg = ServerConfig {
            backend: StorageBackend::Sqlite,
            vocabulary_path,
            database_url: "sqlite::memory:".to_string(),
            ..ServerConfig::default()
        };

        let store = build_store(&cfg).await.unwrap();

        let words: Vec<String> = store
            .load_vocabulary()
            .await
            .unwrap()
            .into_iter()
            .map(|entry| entry.word)
            .collect();
        assert_eq!(words, vec!["cat", "dog"]);
        assert_eq!(store.repeat_guard(), crate::store::RepeatGuard::UsedFlag);
    }
}
