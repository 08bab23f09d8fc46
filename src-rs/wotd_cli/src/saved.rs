use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The game in progress, kept between runs so a finished day stays finished.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    pub answer: String,
    pub guesses: Vec<String>,
}

pub fn default_path() -> PathBuf {
    if let Ok(path) = env::var("WOTD_STATE") {
        if !path.trim().is_empty() {
            return PathBuf::from(path.trim());
        }
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wotd")
        .join("game.json")
}

/// Missing or unreadable files count as no saved game.
pub fn load(path: &Path) -> Option<SavedGame> {
    let raw = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}

pub fn save(path: &Path, game: &SavedGame) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|err| format!("creating {}: {}", parent.display(), err))?;
        }
    }
    let json = serde_json::to_string_pretty(game).map_err(|err| err.to_string())?;
    std::fs::write(path, json).map_err(|err| format!("writing {}: {}", path.display(), err))
}
