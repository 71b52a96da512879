//! `WebSocket` handler for real-time scene update streaming.
//!
//! Clients connect to `GET /ws/scene` and receive a JSON-encoded
//! [`SceneUpdate`](vigil_types::SceneUpdate) each time the engine applies
//! an event or moves through history. Every client subscribes to the same
//! broadcast channel.
//!
//! If a client falls behind, lagged messages are skipped and the client
//! resumes from the most recent update.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming scene updates.
///
/// # Route
///
/// `GET /ws/scene`
pub async fn ws_scene(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("scene WebSocket client connected");

    let mut rx = state.subscribe().await;

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(update) => {
                        let json = match serde_json::to_string(&update) {
                            Ok(j) => j,
                            Err(e) => {
                                warn!(error = %e, "failed to serialize scene update");
                                continue;
                            }
                        };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            debug!("scene WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        debug!(skipped = n, "scene WebSocket client lagged, skipping ahead");
                    }
                    Err(RecvError::Closed) => {
                        debug!("scene channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("scene WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("scene WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!(error = %e, "scene WebSocket error");
                        return;
                    }
                    // Clients have nothing to say on this channel.
                    _ => {}
                }
            }
        }
    }
}
