//! Captured history entries and their canonical snapshot shapes.
//!
//! Snapshots are the canonical (sorted, minimal) form of the live state.
//! Two captures of the same state produce byte-identical snapshot JSON,
//! which is what the entry signature is built from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::CaptureId;
use crate::scene::PresentationState;

/// Kind of a governor incident in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum IncidentKind {
    /// A policy violation.
    PolicyViolation,
    /// A rollback.
    Rollback,
}

/// Minimal canonical form of a violation or rollback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct IncidentSnapshot {
    /// Incident kind.
    pub kind: IncidentKind,
    /// Producer timestamp in seconds.
    pub timestamp: f64,
    /// Zone attribution (violations only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_name: Option<String>,
    /// Checkpoint (rollbacks only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<String>,
}

/// Canonical zone record: modifiers as a sorted list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ZoneSnapshot {
    /// Zone name.
    pub name: String,
    /// Whether the zone has been visited.
    pub is_explored: bool,
    /// Modifiers, sorted lexically.
    pub modifiers: Vec<String>,
}

/// Canonical governor status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GovernorSnapshot {
    /// Whether the governor was paused.
    pub is_paused: bool,
    /// Latest violation, reduced to its minimal shape.
    pub last_violation: Option<IncidentSnapshot>,
    /// Latest rollback, reduced to its minimal shape.
    pub last_rollback: Option<IncidentSnapshot>,
}

/// Canonical world-view: zones as a list sorted by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldViewSnapshot {
    /// Active zone at capture time.
    pub active_zone: Option<String>,
    /// Zones sorted by name.
    pub zones: Vec<ZoneSnapshot>,
    /// Governor status.
    pub governor: GovernorSnapshot,
}

/// One immutable captured (presentation, world-view) pair.
///
/// The `signature` is derived from the two snapshots only. It does not
/// depend on `id`, `timestamp` or `checkpoint`, so re-capturing an
/// unchanged state yields the same signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HistoryEntry {
    /// Capture identifier.
    pub id: CaptureId,
    /// Wall-clock capture time.
    pub timestamp: DateTime<Utc>,
    /// Canonical signature of the captured state.
    pub signature: String,
    /// Presentation state at capture time.
    pub presentation: PresentationState,
    /// Canonical world-view at capture time.
    pub world_view: WorldViewSnapshot,
    /// Backend checkpoint correlated with this capture.
    pub checkpoint: Option<String>,
}
