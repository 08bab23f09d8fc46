use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use word_of_the_day_rs::api::server::WordServer;
use word_of_the_day_rs::helpers::{build_store, init_tracing};
use word_of_the_day_rs::rotation::{spawn_rotation_task, SystemClock};
use word_of_the_day_rs::{ServerConfig, WordRotator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = ServerConfig::from_env();

    let store = build_store(&config).await.context("opening storage")?;
    let rotator = WordRotator::bootstrap(store, Arc::new(SystemClock))
        .await
        .context("loading word of the day")?;
    let mut rotation = spawn_rotation_task(rotator.clone(), config.tick_interval);

    let server = WordServer::new(config.port, rotator, config.static_dir.clone());
    tokio::select! {
        served = server.start(shutdown_signal()) => served.map_err(anyhow::Error::msg)?,
        failed = rotation.finished() => {
            failed.context("rotating word of the day")?;
            return Ok(());
        }
    }

    rotation.stop().await.context("stopping rotation task")?;
    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!("failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
