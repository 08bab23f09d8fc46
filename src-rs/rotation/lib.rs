pub mod clock;
pub mod rotator;
pub mod scheduler;
pub mod types;

pub use clock::{Clock, SystemClock};
pub use rotator::WordRotator;
pub use scheduler::{spawn_rotation_task, RotationTask};
pub use types::{Snapshot, TickOutcome};
