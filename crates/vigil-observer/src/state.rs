//! Shared application state for the Observer API server.
//!
//! [`AppState`] holds the one [`SceneSyncEngine`] the process owns. The
//! ingest task and every HTTP handler go through the same mutex, which
//! serializes ingest, capture and navigation calls.

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast};
use vigil_core::SceneSyncEngine;
use vigil_types::SceneUpdate;

/// The engine as shared between the ingest task and the server.
pub type SharedEngine = Arc<Mutex<SceneSyncEngine>>;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The scene engine.
    pub engine: SharedEngine,
}

impl AppState {
    /// Wrap a freshly built engine.
    pub fn new(engine: SceneSyncEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    /// Share an engine that another task already holds.
    pub const fn from_shared(engine: SharedEngine) -> Self {
        Self { engine }
    }

    /// Subscribe to scene updates.
    ///
    /// Returns a receiver that yields every [`SceneUpdate`] published
    /// after this call.
    pub async fn subscribe(&self) -> broadcast::Receiver<SceneUpdate> {
        self.engine.lock().await.subscribe()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SceneSyncEngine::default())
    }
}
