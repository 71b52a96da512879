//! State serialization: live state in, immutable [`HistoryEntry`] out.
//!
//! The canonical form sorts zones by name and modifiers lexically, reduces
//! governor incidents to `{kind, timestamp, zone_name?/checkpoint?}`, and
//! folds negative zero so equal states always produce equal text. The
//! signature covers the presentation and world-view snapshots only; the
//! capture id, capture time and checkpoint never take part in it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;
use vigil_types::{
    CameraState, CaptureId, GovernorSnapshot, HistoryEntry, IncidentKind, IncidentSnapshot,
    LightingState, PresentationState, RealtimeWorldView, RenderState, RollbackRecord,
    ViolationRecord, WorldViewSnapshot, ZoneSnapshot,
};

#[derive(Serialize)]
struct SignaturePayload<'a> {
    presentation: &'a PresentationState,
    realtime: &'a WorldViewSnapshot,
}

/// Capture the given state now.
pub fn serialize(
    presentation: &PresentationState,
    view: &RealtimeWorldView,
    checkpoint: Option<String>,
) -> HistoryEntry {
    serialize_at(presentation, view, checkpoint, Utc::now())
}

/// Capture the given state with an explicit capture time.
pub fn serialize_at(
    presentation: &PresentationState,
    view: &RealtimeWorldView,
    checkpoint: Option<String>,
    captured_at: DateTime<Utc>,
) -> HistoryEntry {
    let presentation = canonical_presentation(presentation);
    let world_view = canonical_world_view(view);
    HistoryEntry {
        id: CaptureId::new(),
        timestamp: captured_at,
        signature: signature(&presentation, &world_view),
        presentation,
        world_view,
        checkpoint,
    }
}

/// Signature text for an already canonical pair of snapshots.
pub fn signature(presentation: &PresentationState, world_view: &WorldViewSnapshot) -> String {
    let payload = SignaturePayload {
        presentation,
        realtime: world_view,
    };
    serde_json::to_string(&payload).unwrap_or_else(|e| {
        warn!(error = %e, "signature serialization failed, using debug form");
        format!("{presentation:?}|{world_view:?}")
    })
}

/// Canonical form of a presentation state.
pub fn canonical_presentation(presentation: &PresentationState) -> PresentationState {
    let CameraState {
        position,
        target,
        fov,
        near,
        far,
    } = presentation.camera;
    PresentationState {
        active_zone: presentation.active_zone.clone(),
        camera: CameraState {
            position: position.map(fold_zero),
            target: target.map(fold_zero),
            fov: fold_zero(fov),
            near: fold_zero(near),
            far: fold_zero(far),
        },
        lighting: LightingState {
            ambient_intensity: fold_zero(presentation.lighting.ambient_intensity),
            exposure: fold_zero(presentation.lighting.exposure),
        },
        render: RenderState {
            frameloop: presentation.render.frameloop,
            dpr: fold_zero(presentation.render.dpr),
        },
    }
}

/// Canonical form of a world-view.
pub fn canonical_world_view(view: &RealtimeWorldView) -> WorldViewSnapshot {
    // BTreeMap and BTreeSet iterate in key order, so both lists come out sorted.
    let zones = view
        .zones
        .values()
        .map(|zone| ZoneSnapshot {
            name: zone.name.clone(),
            is_explored: zone.is_explored,
            modifiers: zone.modifiers.iter().cloned().collect(),
        })
        .collect();

    WorldViewSnapshot {
        active_zone: view.active_zone.clone(),
        zones,
        governor: GovernorSnapshot {
            is_paused: view.governor.is_paused,
            last_violation: view.governor.last_violation.as_ref().map(violation_snapshot),
            last_rollback: view.governor.last_rollback.as_ref().map(rollback_snapshot),
        },
    }
}

fn violation_snapshot(record: &ViolationRecord) -> IncidentSnapshot {
    IncidentSnapshot {
        kind: IncidentKind::PolicyViolation,
        timestamp: fold_zero(record.timestamp),
        zone_name: record.zone_name.clone(),
        checkpoint: None,
    }
}

fn rollback_snapshot(record: &RollbackRecord) -> IncidentSnapshot {
    IncidentSnapshot {
        kind: IncidentKind::Rollback,
        timestamp: fold_zero(record.timestamp),
        zone_name: None,
        checkpoint: record.checkpoint.clone(),
    }
}

/// Adding positive zero turns `-0.0` into `0.0` and leaves every other value alone.
const fn fold_zero(value: f64) -> f64 {
    value + 0.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::TimeZone;
    use vigil_types::{GovernorStatus, Zone};

    use super::*;
    use crate::scene::derive;

    fn sample_view() -> RealtimeWorldView {
        let mut zone_b = Zone::unexplored("Zone-Β");
        zone_b.modifiers.insert("Temporal Drift".to_owned());
        zone_b.modifiers.insert("Entropy Bloom".to_owned());
        let mut zone_a = Zone::unexplored("Zone-Α");
        zone_a.is_explored = true;

        RealtimeWorldView {
            active_zone: Some("Zone-Α".to_owned()),
            zones: BTreeMap::from([
                ("Zone-Β".to_owned(), zone_b),
                ("Zone-Α".to_owned(), zone_a),
            ]),
            governor: GovernorStatus {
                is_paused: false,
                last_violation: Some(ViolationRecord {
                    timestamp: 4.0,
                    zone_name: Some("Zone-Α".to_owned()),
                    policy_name: Some("energy_cap".to_owned()),
                    metrics: BTreeMap::from([("energy".to_owned(), 1.5)]),
                }),
                last_rollback: Some(RollbackRecord {
                    timestamp: 5.0,
                    checkpoint: Some("cp-3".to_owned()),
                }),
            },
        }
    }

    #[test]
    fn zones_and_modifiers_are_sorted() {
        let snapshot = canonical_world_view(&sample_view());
        let names: Vec<&str> = snapshot.zones.iter().map(|z| z.name.as_str()).collect();
        assert_eq!(names, vec!["Zone-Α", "Zone-Β"]);
        let zone_b = snapshot.zones.iter().find(|z| z.name == "Zone-Β").unwrap();
        assert_eq!(zone_b.modifiers, vec!["Entropy Bloom", "Temporal Drift"]);
    }

    #[test]
    fn incidents_are_reduced_to_minimal_shape() {
        let snapshot = canonical_world_view(&sample_view());
        let violation = snapshot.governor.last_violation.unwrap();
        assert_eq!(violation.kind, IncidentKind::PolicyViolation);
        assert_eq!(violation.zone_name.as_deref(), Some("Zone-Α"));
        assert!(violation.checkpoint.is_none());

        let json = serde_json::to_value(snapshot.governor.last_rollback.unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "rollback", "timestamp": 5.0, "checkpoint": "cp-3"})
        );
    }

    #[test]
    fn signature_ignores_capture_time_and_checkpoint() {
        let view = sample_view();
        let scene = derive(&view);
        let early = serialize_at(&scene, &view, None, Utc.timestamp_opt(1_000, 0).unwrap());
        let late = serialize_at(
            &scene,
            &view,
            Some("cp-9".to_owned()),
            Utc.timestamp_opt(9_000, 0).unwrap(),
        );
        assert_eq!(early.signature, late.signature);
        assert_ne!(early.id, late.id);
        assert_ne!(early.timestamp, late.timestamp);
    }

    #[test]
    fn signature_tracks_state_changes() {
        let view = sample_view();
        let before = serialize(&derive(&view), &view, None);
        let mut paused = view;
        paused.governor.is_paused = true;
        let after = serialize(&derive(&paused), &paused, None);
        assert_ne!(before.signature, after.signature);
    }

    #[test]
    fn negative_zero_does_not_change_signature() {
        let view = RealtimeWorldView::new();
        let scene = derive(&view);
        let mut flipped = scene.clone();
        flipped.camera.target = [-0.0, -0.0, -0.0];
        let a = serialize(&scene, &view, None);
        let b = serialize(&flipped, &view, None);
        assert_eq!(a.signature, b.signature);
    }

    #[test]
    fn signature_has_presentation_and_realtime_members() {
        let view = sample_view();
        let entry = serialize(&derive(&view), &view, None);
        let parsed: serde_json::Value = serde_json::from_str(&entry.signature).unwrap();
        assert!(parsed.get("presentation").is_some());
        assert!(parsed.get("realtime").is_some());
        assert_eq!(parsed.as_object().unwrap().len(), 2);
    }

    #[test]
    fn nan_timestamp_still_signs() {
        let mut view = RealtimeWorldView::new();
        view.governor.last_rollback = Some(RollbackRecord {
            timestamp: f64::NAN,
            checkpoint: None,
        });
        let a = serialize(&derive(&view), &view, None);
        let b = serialize(&derive(&view), &view, None);
        assert_eq!(a.signature, b.signature);
        assert!(a.signature.contains("null"));
    }
}
