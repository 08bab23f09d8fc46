pub use crate::config::ServerConfig;
pub use crate::rotation::{Snapshot, WordRotator};

pub mod error;
pub mod handlers;
pub mod server;
