//! Server lifecycle.

use posecoach_core::{Error, Result};
use tracing::info;

use crate::config::ApiConfig;
use crate::routes::router;
use crate::state::AppState;

/// Bind, serve until Ctrl+C, then drain the dataset and voice queues.
pub async fn serve(config: ApiConfig) -> Result<()> {
    let addr = config.http.bind_addr;
    let state = AppState::from_config(config);
    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Config(format!("failed to bind {addr}: {e}")))?;
    info!("Pose Coach API listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Config(format!("server error: {e}")))?;

    if let Some(recorder) = state.recorder() {
        recorder.shutdown().await;
    }
    if let Some(voice) = state.voice() {
        voice.shutdown().await;
    }
    info!("Pose Coach API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
