pub mod json_file;
pub mod memory;
pub mod sql;
pub mod types;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use sql::SqlStore;
pub use types::{History, RepeatGuard, VocabularyEntry, WordStore};
