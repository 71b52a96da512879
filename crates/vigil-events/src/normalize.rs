//! Event normalization: one [`RawEvent`] in, one [`NormalizedEvent`] out.
//!
//! Recognized tags are looked up in a static table. Anything else,
//! including the empty tag, becomes [`EventKind::Unknown`] with the
//! original tag and payload preserved, so the backend can introduce new
//! event kinds without breaking the pipeline.
//!
//! Normalization is total: payload fields that are missing or have the
//! wrong JSON type are coerced to defaults instead of failing.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;
use vigil_types::{EventKind, NormalizedEvent, RawEvent};

/// Builds a variant from a payload.
type VariantBuilder = fn(&Value) -> EventKind;

/// Wire tag to variant table.
static TAG_TABLE: &[(&str, VariantBuilder)] = &[
    ("zone_changed", zone_changed),
    ("zone_modifier_added", zone_modifier_added),
    ("pause", governor_pause),
    ("resume", governor_resume),
    ("policy_violation", policy_violation),
    ("rollback", rollback),
    ("checkpoint_scheduled", checkpoint_scheduled),
    ("checkpoint_saved", checkpoint_saved),
];

/// Normalize a raw event.
pub fn normalize(raw: &RawEvent) -> NormalizedEvent {
    let kind = TAG_TABLE
        .iter()
        .find(|(tag, _)| *tag == raw.tag)
        .map_or_else(
            || {
                debug!(tag = %raw.tag, "unrecognized event tag, routing to unknown");
                EventKind::Unknown {
                    event: raw.tag.clone(),
                    payload: raw.payload.clone(),
                }
            },
            |(_, build)| build(&raw.payload),
        );
    NormalizedEvent::new(raw.timestamp, kind)
}

/// Wire tags with a dedicated variant.
pub fn recognized_tags() -> impl Iterator<Item = &'static str> {
    TAG_TABLE.iter().map(|(tag, _)| *tag)
}

// ---------------------------------------------------------------------------
// Variant builders
// ---------------------------------------------------------------------------

fn zone_changed(payload: &Value) -> EventKind {
    EventKind::ZoneChanged {
        zone_name: string_field(payload, "zone_name"),
        is_new: payload
            .get("is_new")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

fn zone_modifier_added(payload: &Value) -> EventKind {
    EventKind::ZoneModifierAdded {
        zone_name: string_field(payload, "zone_name"),
        modifier: string_field(payload, "modifier"),
    }
}

const fn governor_pause(_: &Value) -> EventKind {
    EventKind::GovernorPause
}

const fn governor_resume(_: &Value) -> EventKind {
    EventKind::GovernorResume
}

fn policy_violation(payload: &Value) -> EventKind {
    let metrics = payload
        .get("metrics")
        .and_then(Value::as_object)
        .map(|object| {
            object
                .iter()
                .filter_map(|(name, value)| value.as_f64().map(|v| (name.clone(), v)))
                .collect()
        })
        .unwrap_or_default();

    EventKind::PolicyViolation {
        policy_name: string_field(payload, "policy_name"),
        zone_name: string_field(payload, "zone_name"),
        metrics,
    }
}

fn rollback(payload: &Value) -> EventKind {
    EventKind::Rollback {
        checkpoint: checkpoint_field(payload),
    }
}

fn checkpoint_scheduled(payload: &Value) -> EventKind {
    EventKind::CheckpointScheduled {
        checkpoint: checkpoint_field(payload),
        details: payload_details(payload),
    }
}

fn checkpoint_saved(payload: &Value) -> EventKind {
    EventKind::CheckpointSaved {
        checkpoint: checkpoint_field(payload),
        details: payload_details(payload),
    }
}

// ---------------------------------------------------------------------------
// Coercion helpers
// ---------------------------------------------------------------------------

/// A string member, or `None` when absent or not a string.
fn string_field(payload: &Value, key: &str) -> Option<String> {
    payload.get(key).and_then(Value::as_str).map(str::to_owned)
}

/// The `checkpoint` member as text. Numeric identifiers are accepted.
fn checkpoint_field(payload: &Value) -> Option<String> {
    match payload.get("checkpoint")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Every member other than `checkpoint`, rendered as text.
///
/// Strings are taken as-is; numbers, booleans, `null`, arrays and objects
/// become their compact JSON text, so nested metadata survives without
/// untyped JSON leaving the `unknown` variant.
fn payload_details(payload: &Value) -> BTreeMap<String, String> {
    let Some(object) = payload.as_object() else {
        return BTreeMap::new();
    };
    object
        .iter()
        .filter(|(key, _)| key.as_str() != "checkpoint")
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), text)
        })
        .collect()
}
