//! Read-only REST endpoint handlers for the Observer server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/world` | Current realtime world-view |
//! | `GET` | `/api/scene` | Current presentation state |
//! | `GET` | `/api/events` | Recent normalized events, newest first |
//! | `GET` | `/api/zones/{name}/tooltip` | Catalog tooltip for a zone |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use vigil_events::LoggedEvent;
use vigil_world::tooltip;

use crate::error::ObserverError;
use crate::state::AppState;

/// Default number of events returned by `GET /api/events`.
const DEFAULT_EVENT_LIMIT: usize = 50;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for the `GET /api/events` endpoint.
#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    /// Maximum number of events to return (default 50).
    pub limit: Option<usize>,
    /// Only return events of this dotted kind, e.g. `zone.changed`.
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
struct EventsResponse<'a> {
    count: usize,
    total_seen: u64,
    events: Vec<&'a LoggedEvent>,
}

// ---------------------------------------------------------------------------
// GET /api/world
// ---------------------------------------------------------------------------

/// Return the current realtime world-view.
pub async fn get_world(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let engine = state.engine.lock().await;
    Json(engine.world_view().clone())
}

// ---------------------------------------------------------------------------
// GET /api/scene
// ---------------------------------------------------------------------------

/// Return the presentation state derived from the current world-view.
pub async fn get_scene(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let engine = state.engine.lock().await;
    Json(engine.presentation())
}

// ---------------------------------------------------------------------------
// GET /api/events
// ---------------------------------------------------------------------------

/// List recent events, newest first.
///
/// Supports `?limit=N` (must be positive) and `?kind=zone.changed`.
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventsQuery>,
) -> Result<impl IntoResponse, ObserverError> {
    let limit = params.limit.unwrap_or(DEFAULT_EVENT_LIMIT);
    if limit == 0 {
        return Err(ObserverError::InvalidQuery(
            "limit must be positive".to_owned(),
        ));
    }

    let engine = state.engine.lock().await;
    let events = engine.recent_events(limit, params.kind.as_deref());
    let body = serde_json::to_value(EventsResponse {
        count: events.len(),
        total_seen: engine.event_log().total_seen(),
        events,
    })?;
    Ok(Json(body))
}

// ---------------------------------------------------------------------------
// GET /api/zones/{name}/tooltip
// ---------------------------------------------------------------------------

/// Describe a zone using the catalog and its live modifiers.
///
/// Zones the engine has never seen get catalog text with no modifiers;
/// names that are neither live nor catalogued are a 404.
pub async fn zone_tooltip(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ObserverError> {
    let engine = state.engine.lock().await;
    let live = engine.world_view().zone(&name);
    let tip = tooltip(
        &name,
        live.into_iter()
            .flat_map(|zone| zone.modifiers.iter().map(String::as_str)),
    );
    if live.is_none() && !tip.catalogued {
        return Err(ObserverError::NotFound(format!("zone {name}")));
    }
    Ok(Json(tip))
}
