use std::path::PathBuf;
use std::time::Duration;

use crate::helpers::{env_or, env_parse};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Json,
    Sqlite,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" | "file" => Ok(Self::Json),
            "sqlite" | "sql" => Ok(Self::Sqlite),
            other => Err(format!("unknown storage backend: {}", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub backend: StorageBackend,
    pub vocabulary_path: PathBuf,
    pub history_path: PathBuf,
    pub database_url: String,
    pub tick_interval: Duration,
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            backend: StorageBackend::Json,
            vocabulary_path: PathBuf::from("static/words.json"),
            history_path: PathBuf::from("wordsHistory.json"),
            database_url: "sqlite://words.db".to_string(),
            tick_interval: Duration::from_secs(60),
            static_dir: Some(PathBuf::from("static")),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let tick_secs: u64 = env_parse("WOTD_TICK_SECS", defaults.tick_interval.as_secs());
        let tick_interval = if tick_secs == 0 {
            tracing::warn!("WOTD_TICK_SECS must be positive, using default");
            defaults.tick_interval
        } else {
            Duration::from_secs(tick_secs)
        };

        let static_dir = match std::env::var("WOTD_STATIC_DIR") {
            Ok(raw) if raw.trim().is_empty() => None,
            Ok(raw) => Some(PathBuf::from(raw)),
            Err(_) => defaults.static_dir,
        };

        Self {
            port: env_parse("PORT", defaults.port),
            backend: env_parse("WOTD_BACKEND", defaults.backend),
            vocabulary_path: PathBuf::from(env_or("WOTD_VOCABULARY", &defaults.vocabulary_path.to_string_lossy())),
            history_path: PathBuf::from(env_or("WOTD_HISTORY", &defaults.history_path.to_string_lossy())),
            database_url: env_or("WOTD_DATABASE_URL", &defaults.database_url),
            tick_interval,
            static_dir,
        }
    }
}
