//! The realtime world-view folded from normalized events.
//!
//! [`RealtimeWorldView`] is owned by a single writer (the reducer in
//! `vigil-world`); every other consumer receives it by shared reference
//! or as a serialized snapshot.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A named partition of the simulated world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Zone {
    /// Unique zone name.
    pub name: String,
    /// Whether the simulation has visited this zone. Never reverts to `false`.
    pub is_explored: bool,
    /// Modifier tags attached to the zone.
    pub modifiers: BTreeSet<String>,
}

impl Zone {
    /// A zone known only by reference, not yet visited.
    pub fn unexplored(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_explored: false,
            modifiers: BTreeSet::new(),
        }
    }
}

/// The most recent policy violation reported by the governor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ViolationRecord {
    /// Producer timestamp in seconds.
    pub timestamp: f64,
    /// Zone the violation is attributed to.
    pub zone_name: Option<String>,
    /// Name of the violated policy.
    pub policy_name: Option<String>,
    /// Numeric metrics reported with the violation.
    pub metrics: BTreeMap<String, f64>,
}

/// The most recent rollback performed by the governor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RollbackRecord {
    /// Producer timestamp in seconds.
    pub timestamp: f64,
    /// Checkpoint the simulation returned to.
    pub checkpoint: Option<String>,
}

/// Live governor status. Only the latest violation and rollback are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GovernorStatus {
    /// Whether the governor has paused the simulation.
    pub is_paused: bool,
    /// Most recent policy violation.
    pub last_violation: Option<ViolationRecord>,
    /// Most recent rollback.
    pub last_rollback: Option<RollbackRecord>,
}

/// Canonical realtime view of the simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RealtimeWorldView {
    /// Zone the simulation is currently in.
    pub active_zone: Option<String>,
    /// Every zone referenced so far, keyed by name.
    pub zones: BTreeMap<String, Zone>,
    /// Governor status.
    pub governor: GovernorStatus,
}

impl RealtimeWorldView {
    /// An empty world-view, as at engine start.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a zone by name.
    pub fn zone(&self, name: &str) -> Option<&Zone> {
        self.zones.get(name)
    }

    /// The active zone's record, if the active zone is known.
    pub fn active(&self) -> Option<&Zone> {
        self.active_zone.as_deref().and_then(|name| self.zones.get(name))
    }
}
