use std::path::PathBuf;

use serde::Deserialize;

#[derive(Clone, Debug)]
pub struct CLIConfig {
    pub base_url: String,
    pub max_tries: usize,
    pub state_path: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthInfo {
    pub status: String,
    pub version: String,
    pub history_length: usize,
    pub last_updated: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LetterScore {
    Correct,
    Present,
    Absent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoredGuess {
    pub word: String,
    pub scores: Vec<LetterScore>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}
