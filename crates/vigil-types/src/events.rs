//! Telemetry event types.
//!
//! A [`RawEvent`] is what the transport hands over: a timestamp, an
//! open-vocabulary tag, and an untyped JSON payload. The normalizer in
//! `vigil-events` maps every raw event onto exactly one [`EventKind`]
//! variant. Untyped JSON survives past that boundary only inside
//! [`EventKind::Unknown`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Raw events
// ---------------------------------------------------------------------------

/// A telemetry event as received from the governor connection.
///
/// Immutable once received. `timestamp` is in seconds and may be `NaN`
/// when the producer omitted it or sent something that is not a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawEvent {
    /// Producer timestamp in seconds (`NaN` tolerated).
    #[serde(rename = "t")]
    pub timestamp: f64,
    /// Wire event tag (e.g. `zone_changed`).
    #[serde(rename = "event")]
    pub tag: String,
    /// Arbitrary JSON payload, `null` when absent.
    pub payload: serde_json::Value,
}

impl RawEvent {
    /// Build a raw event from its parts.
    pub fn new(timestamp: f64, tag: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            timestamp,
            tag: tag.into(),
            payload,
        }
    }
}

// ---------------------------------------------------------------------------
// Normalized events
// ---------------------------------------------------------------------------

/// The closed set of event variants the reducer understands.
///
/// Serialized with an internal `kind` tag whose values are the dotted
/// variant names (`zone.changed`, `governor.pause`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind")]
#[ts(export, export_to = "bindings/")]
pub enum EventKind {
    /// The governor moved the simulation into a zone.
    #[serde(rename = "zone.changed")]
    ZoneChanged {
        /// Name of the zone now active, if the producer sent one.
        zone_name: Option<String>,
        /// Whether the producer flagged the zone as newly created.
        is_new: bool,
    },

    /// A modifier was attached to a zone.
    #[serde(rename = "zone.modifier_added")]
    ZoneModifierAdded {
        /// Zone receiving the modifier.
        zone_name: Option<String>,
        /// Modifier name.
        modifier: Option<String>,
    },

    /// The governor paused the simulation.
    #[serde(rename = "governor.pause")]
    GovernorPause,

    /// The governor resumed the simulation.
    #[serde(rename = "governor.resume")]
    GovernorResume,

    /// A governor policy was violated.
    #[serde(rename = "governor.policy_violation")]
    PolicyViolation {
        /// Name of the violated policy.
        policy_name: Option<String>,
        /// Zone the violation was reported in, when the payload names one.
        zone_name: Option<String>,
        /// Numeric metrics attached to the violation.
        metrics: BTreeMap<String, f64>,
    },

    /// The governor rolled the simulation back.
    #[serde(rename = "governor.rollback")]
    Rollback {
        /// Checkpoint the simulation was rolled back to.
        checkpoint: Option<String>,
    },

    /// A checkpoint was scheduled.
    #[serde(rename = "checkpoint.scheduled")]
    CheckpointScheduled {
        /// Checkpoint identifier.
        checkpoint: Option<String>,
        /// Remaining payload members as text; non-strings as compact JSON.
        details: BTreeMap<String, String>,
    },

    /// A checkpoint was written by the backend.
    #[serde(rename = "checkpoint.saved")]
    CheckpointSaved {
        /// Checkpoint identifier.
        checkpoint: Option<String>,
        /// Remaining payload members as text; non-strings as compact JSON.
        details: BTreeMap<String, String>,
    },

    /// Any tag outside the recognized vocabulary, preserved verbatim.
    #[serde(rename = "unknown")]
    Unknown {
        /// The original wire tag.
        event: String,
        /// The original payload.
        payload: serde_json::Value,
    },
}

impl EventKind {
    /// The dotted variant name, identical to the serialized `kind` tag.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ZoneChanged { .. } => "zone.changed",
            Self::ZoneModifierAdded { .. } => "zone.modifier_added",
            Self::GovernorPause => "governor.pause",
            Self::GovernorResume => "governor.resume",
            Self::PolicyViolation { .. } => "governor.policy_violation",
            Self::Rollback { .. } => "governor.rollback",
            Self::CheckpointScheduled { .. } => "checkpoint.scheduled",
            Self::CheckpointSaved { .. } => "checkpoint.saved",
            Self::Unknown { .. } => "unknown",
        }
    }

    /// Whether this event fell outside the recognized vocabulary.
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown { .. })
    }
}

/// A raw event after normalization: its timestamp plus one [`EventKind`].
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NormalizedEvent {
    /// Producer timestamp in seconds (`NaN` serializes as `null`).
    pub timestamp: f64,
    /// The typed variant.
    #[serde(flatten)]
    pub kind: EventKind,
}

impl NormalizedEvent {
    /// Pair a timestamp with a variant.
    pub const fn new(timestamp: f64, kind: EventKind) -> Self {
        Self { timestamp, kind }
    }
}
