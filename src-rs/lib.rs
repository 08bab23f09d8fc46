pub mod config;
pub mod error;
pub mod helpers;

#[path = "store/lib.rs"]
pub mod store;
#[path = "rotation/lib.rs"]
pub mod rotation;
#[path = "api/lib.rs"]
pub mod api;

pub use config::ServerConfig;
pub use error::RotatorError;
pub use rotation::WordRotator;
