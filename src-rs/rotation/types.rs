use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced(String),
    Unchanged,
}

/// What request handlers see of the rotator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub word: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub history_length: usize,
}
