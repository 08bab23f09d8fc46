use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use super::rotator::WordRotator;
use super::types::TickOutcome;
use crate::error::RotatorError;

/// Handle to the background task that checks for a new day every `period`.
pub struct RotationTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<Result<(), RotatorError>>,
}

pub fn spawn_rotation_task(rotator: Arc<WordRotator>, period: Duration) -> RotationTask {
    let (shutdown, mut stopped) = watch::channel(false);

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = stopped.changed() => {
                    debug!("rotation task stopping");
                    return Ok(());
                }
            }

            match rotator.check_and_maybe_advance().await {
                Ok(TickOutcome::Advanced(_)) => info!("new day, word rotated"),
                Ok(TickOutcome::Unchanged) => debug!("same day, nothing to rotate"),
                Err(err) => {
                    error!(error = %err, "rotation tick failed");
                    return Err(err);
                }
            }
        }
    });

    RotationTask { shutdown, handle }
}

impl RotationTask {
    /// Resolves once the task ends on its own, which only happens on error.
    pub async fn finished(&mut self) -> Result<(), RotatorError> {
        join(&mut self.handle).await
    }

    pub async fn stop(mut self) -> Result<(), RotatorError> {
        let _ = self.shutdown.send(true);
        join(&mut self.handle).await
    }
}

async fn join(handle: &mut JoinHandle<Result<(), RotatorError>>) -> Result<(), RotatorError> {
    match handle.await {
        Ok(result) => result,
        Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
        Err(_) => Ok(()),
    }
}
