use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::api::error::AppError;
use crate::rotation::WordRotator;

pub async fn handle_health(State(rotator): State<Arc<WordRotator>>) -> Json<serde_json::Value> {
    let snapshot = rotator.snapshot();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "historyLength": snapshot.history_length,
        "lastUpdated": snapshot.last_updated,
    }))
}

/// The word of the day as plain text.
pub async fn handle_word(State(rotator): State<Arc<WordRotator>>) -> Result<String, AppError> {
    rotator.current_word().ok_or(AppError::NoCurrentWord)
}

pub async fn handle_valid_words(State(rotator): State<Arc<WordRotator>>) -> Json<Vec<String>> {
    Json(rotator.valid_words().to_vec())
}
