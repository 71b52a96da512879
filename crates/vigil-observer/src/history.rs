//! History REST API handlers: capture snapshots and navigate undo/redo.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/history` | Entry summaries and cursor state |
//! | `GET` | `/api/history/current` | Current entry |
//! | `GET` | `/api/history/entries/{id}` | Entry by capture id |
//! | `POST` | `/api/history/capture` | Capture the live state |
//! | `POST` | `/api/history/undo` | Step back |
//! | `POST` | `/api/history/redo` | Step forward |
//! | `POST` | `/api/history/clear` | Drop every entry |
//!
//! Navigation never touches the live world-view; it only moves the
//! history cursor.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vigil_core::{HistoryStack, PushOutcome, SceneSyncEngine};
use vigil_types::{CaptureId, HistoryEntry};

use crate::error::ObserverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/history/capture`.
#[derive(Debug, Default, Deserialize)]
pub struct CaptureRequest {
    /// Checkpoint to attach to the entry.
    pub checkpoint: Option<String>,
    /// Overwrite the current entry instead of pushing a new one.
    #[serde(default)]
    pub replace: bool,
    /// Attach the most recent saved checkpoint when `checkpoint` is absent.
    #[serde(default)]
    pub at_latest_checkpoint: bool,
}

/// One line of `GET /api/history`.
#[derive(Debug, Serialize)]
struct EntrySummary<'a> {
    index: usize,
    id: CaptureId,
    timestamp: DateTime<Utc>,
    checkpoint: Option<&'a str>,
    active_zone: Option<&'a str>,
    is_paused: bool,
    is_current: bool,
}

/// Cursor state returned by every navigation endpoint.
#[derive(Debug, Serialize)]
struct NavigationResponse<'a> {
    size: usize,
    cursor: Option<usize>,
    can_undo: bool,
    can_redo: bool,
    entry: Option<&'a HistoryEntry>,
}

impl<'a> NavigationResponse<'a> {
    fn of(history: &'a HistoryStack<HistoryEntry>) -> Self {
        Self {
            size: history.len(),
            cursor: history.cursor(),
            can_undo: history.can_undo(),
            can_redo: history.can_redo(),
            entry: history.current(),
        }
    }
}

fn ensure_live(engine: &SceneSyncEngine) -> Result<(), ObserverError> {
    if engine.is_torn_down() {
        return Err(ObserverError::Unavailable(
            "scene engine has been torn down".to_owned(),
        ));
    }
    Ok(())
}

fn parse_uuid(s: &str) -> Result<Uuid, ObserverError> {
    Uuid::parse_str(s).map_err(|e| ObserverError::InvalidUuid(format!("{s}: {e}")))
}

// ---------------------------------------------------------------------------
// GET /api/history
// ---------------------------------------------------------------------------

/// List every entry in chronological order with the cursor state.
pub async fn list_history(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let engine = state.engine.lock().await;
    let history = engine.history();

    let entries: Vec<EntrySummary<'_>> = history
        .iter()
        .enumerate()
        .map(|(index, entry)| EntrySummary {
            index,
            id: entry.id,
            timestamp: entry.timestamp,
            checkpoint: entry.checkpoint.as_deref(),
            active_zone: entry.world_view.active_zone.as_deref(),
            is_paused: entry.world_view.governor.is_paused,
            is_current: history.cursor() == Some(index),
        })
        .collect();

    Json(serde_json::json!({
        "size": history.len(),
        "cursor": history.cursor(),
        "can_undo": history.can_undo(),
        "can_redo": history.can_redo(),
        "latest_checkpoint": engine.latest_checkpoint(),
        "entries": entries,
    }))
}

// ---------------------------------------------------------------------------
// GET /api/history/current
// ---------------------------------------------------------------------------

/// Return the entry at the cursor, or 404 when the history is empty.
pub async fn get_current(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let engine = state.engine.lock().await;
    let entry = engine
        .history()
        .current()
        .ok_or_else(|| ObserverError::NotFound("history is empty".to_owned()))?;
    Ok(Json(serde_json::to_value(entry)?))
}

// ---------------------------------------------------------------------------
// GET /api/history/entries/{id}
// ---------------------------------------------------------------------------

/// Return one entry by capture id.
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ObserverError> {
    let id = CaptureId::from(parse_uuid(&id_str)?);
    let engine = state.engine.lock().await;
    let entry = engine
        .history()
        .iter()
        .find(|entry| entry.id == id)
        .ok_or_else(|| ObserverError::NotFound(format!("history entry {id}")))?;
    Ok(Json(serde_json::to_value(entry)?))
}

// ---------------------------------------------------------------------------
// POST /api/history/capture
// ---------------------------------------------------------------------------

/// Capture the live state onto the history stack.
pub async fn capture(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CaptureRequest>,
) -> Result<impl IntoResponse, ObserverError> {
    let mut engine = state.engine.lock().await;
    ensure_live(&engine)?;

    let checkpoint = match body.checkpoint {
        Some(checkpoint) => Some(checkpoint),
        None if body.at_latest_checkpoint => engine.latest_checkpoint().map(str::to_owned),
        None => None,
    };
    let outcome = if body.replace {
        engine.capture_replace(checkpoint)
    } else {
        engine.capture(checkpoint)
    }
    .ok_or_else(|| ObserverError::Unavailable("scene engine has been torn down".to_owned()))?;

    let (kind, discarded_redo, evicted) = match outcome {
        PushOutcome::Replaced => ("replaced", 0, 0),
        PushOutcome::Appended {
            discarded_redo,
            evicted,
        } => ("appended", discarded_redo, evicted),
    };

    let navigation = serde_json::to_value(NavigationResponse::of(engine.history()))?;
    Ok(Json(serde_json::json!({
        "outcome": kind,
        "discarded_redo": discarded_redo,
        "evicted": evicted,
        "history": navigation,
    })))
}

// ---------------------------------------------------------------------------
// POST /api/history/undo, /api/history/redo
// ---------------------------------------------------------------------------

/// Step the cursor back. A no-op at the oldest entry.
pub async fn undo(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let mut engine = state.engine.lock().await;
    ensure_live(&engine)?;
    engine.undo();
    Ok(Json(serde_json::to_value(NavigationResponse::of(
        engine.history(),
    ))?))
}

/// Step the cursor forward. A no-op at the newest entry.
pub async fn redo(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let mut engine = state.engine.lock().await;
    ensure_live(&engine)?;
    engine.redo();
    Ok(Json(serde_json::to_value(NavigationResponse::of(
        engine.history(),
    ))?))
}

// ---------------------------------------------------------------------------
// POST /api/history/clear
// ---------------------------------------------------------------------------

/// Drop every history entry.
pub async fn clear(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let mut engine = state.engine.lock().await;
    ensure_live(&engine)?;
    let cleared = engine.history().len();
    engine.clear_history();
    Ok(Json(serde_json::json!({
        "ok": true,
        "cleared": cleared,
    })))
}
