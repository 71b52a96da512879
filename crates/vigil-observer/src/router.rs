//! Axum router construction for the Observer API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS enabled for cross-origin dashboard access and request
//! tracing on every route.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, history, ws};

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /ws/scene` -- `WebSocket` scene update stream
/// - `GET /api/world` -- realtime world-view
/// - `GET /api/scene` -- derived presentation state
/// - `GET /api/events` -- recent normalized events
/// - `GET /api/zones/{name}/tooltip` -- zone catalog tooltip
/// - `GET /api/history` -- history summary
/// - `GET /api/history/current` -- entry at the cursor
/// - `GET /api/history/entries/{id}` -- entry by capture id
/// - `POST /api/history/capture` -- capture the live state
/// - `POST /api/history/undo` / `redo` / `clear` -- navigation
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket
        .route("/ws/scene", get(ws::ws_scene))
        // Live state
        .route("/api/world", get(handlers::get_world))
        .route("/api/scene", get(handlers::get_scene))
        .route("/api/events", get(handlers::list_events))
        .route("/api/zones/{name}/tooltip", get(handlers::zone_tooltip))
        // History
        .route("/api/history", get(history::list_history))
        .route("/api/history/current", get(history::get_current))
        .route("/api/history/entries/{id}", get(history::get_entry))
        .route("/api/history/capture", post(history::capture))
        .route("/api/history/undo", post(history::undo))
        .route("/api/history/redo", post(history::redo))
        .route("/api/history/clear", post(history::clear))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
