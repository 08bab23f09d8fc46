use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RotatorError {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("malformed persisted state: {0}")]
    MalformedPersistedState(String),

    #[error("vocabulary exhausted: none of the {vocabulary} words is left to pick")]
    VocabularyExhausted { vocabulary: usize },
}

impl RotatorError {
    pub fn storage(context: &str, err: impl std::fmt::Display) -> Self {
        Self::StorageUnavailable(format!("{}: {}", context, err))
    }

    pub fn malformed(context: &str, err: impl std::fmt::Display) -> Self {
        Self::MalformedPersistedState(format!("{}: {}", context, err))
    }
}

impl From<sqlx::Error> for RotatorError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) | sqlx::Error::ColumnNotFound(_) => {
                Self::malformed("database row", err)
            }
            other => Self::storage("database", other),
        }
    }
}
