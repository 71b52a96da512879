//! Observer server startup helper for embedding in the engine binary.
//!
//! Provides [`spawn_observer`] which launches the Observer HTTP +
//! `WebSocket` server on a background Tokio task so it runs alongside
//! the governor ingest loop.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vigil_observer::{AppState, spawn_observer};
//!
//! let state = Arc::new(AppState::from_shared(engine.clone()));
//! let handle = spawn_observer(8080, state)?;
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the Observer server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Spawn the Observer HTTP server on a background Tokio task.
///
/// Binds to `0.0.0.0:{port}`. The server runs until the runtime shuts
/// down or the returned handle is aborted.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the address cannot be parsed.
/// Bind failures surface later as an error log from the task.
pub fn spawn_observer(port: u16, state: Arc<AppState>) -> Result<JoinHandle<()>, StartupError> {
    let config = ServerConfig {
        host: String::from("0.0.0.0"),
        port,
    };
    config.addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = crate::server::start_server(&config, state).await {
            tracing::error!(error = %e, "observer server exited with error");
        }
    });

    tracing::info!(port, "observer server spawned on background task");

    Ok(handle)
}
