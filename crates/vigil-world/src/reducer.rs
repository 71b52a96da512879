//! The realtime state reducer.
//!
//! Folds normalized events into a [`RealtimeWorldView`] strictly in
//! arrival order. Every transition is total: an event that cannot be
//! applied meaningfully (no zone name, an informational kind) leaves the
//! view untouched instead of failing.
//!
//! Invariants upheld here:
//!
//! - A zone is created on first reference, by a visit or a modifier.
//! - `is_explored` only ever moves from `false` to `true`.
//! - Modifiers form a set, so re-adding one is a no-op.
//! - Only the latest violation and rollback are retained.

use tracing::debug;
use vigil_types::{
    EventKind, NormalizedEvent, RealtimeWorldView, RollbackRecord, ViolationRecord, Zone,
};

/// Apply one event to the view in place.
///
/// Returns whether any observable state changed.
pub fn apply(view: &mut RealtimeWorldView, event: &NormalizedEvent) -> bool {
    match &event.kind {
        EventKind::ZoneChanged { zone_name, is_new } => {
            visit_zone(view, zone_name.as_deref(), *is_new)
        }
        EventKind::ZoneModifierAdded {
            zone_name: Some(zone_name),
            modifier: Some(modifier),
        } => add_modifier(view, zone_name, modifier),
        EventKind::ZoneModifierAdded { .. } => {
            debug!("modifier event without zone or modifier name, ignored");
            false
        }
        EventKind::GovernorPause => set_paused(view, true),
        EventKind::GovernorResume => set_paused(view, false),
        EventKind::PolicyViolation {
            policy_name,
            zone_name,
            metrics,
        } => {
            let record = ViolationRecord {
                timestamp: event.timestamp,
                zone_name: zone_name.clone().or_else(|| view.active_zone.clone()),
                policy_name: policy_name.clone(),
                metrics: metrics.clone(),
            };
            view.governor.last_violation = Some(record);
            true
        }
        EventKind::Rollback { checkpoint } => {
            view.governor.last_rollback = Some(RollbackRecord {
                timestamp: event.timestamp,
                checkpoint: checkpoint.clone(),
            });
            true
        }
        // Informational only; surfaced through the event log.
        EventKind::CheckpointScheduled { .. }
        | EventKind::CheckpointSaved { .. }
        | EventKind::Unknown { .. } => false,
    }
}

/// Apply one event to an owned view and hand it back.
pub fn applied(mut view: RealtimeWorldView, event: &NormalizedEvent) -> RealtimeWorldView {
    apply(&mut view, event);
    view
}

/// Fold a sequence of events, in order, onto a starting view.
pub fn fold<'a, I>(view: RealtimeWorldView, events: I) -> RealtimeWorldView
where
    I: IntoIterator<Item = &'a NormalizedEvent>,
{
    events.into_iter().fold(view, applied)
}

fn visit_zone(view: &mut RealtimeWorldView, zone_name: Option<&str>, is_new: bool) -> bool {
    let Some(name) = zone_name else {
        let changed = view.active_zone.is_some();
        view.active_zone = None;
        return changed;
    };

    let mut changed = view.active_zone.as_deref() != Some(name);
    view.active_zone = Some(name.to_owned());

    match view.zones.get_mut(name) {
        Some(zone) => {
            if is_new {
                debug!(zone = name, "zone flagged new but already known");
            }
            changed |= !zone.is_explored;
            zone.is_explored = true;
        }
        None => {
            let mut zone = Zone::unexplored(name);
            zone.is_explored = true;
            view.zones.insert(name.to_owned(), zone);
            changed = true;
        }
    }
    changed
}

fn add_modifier(view: &mut RealtimeWorldView, zone_name: &str, modifier: &str) -> bool {
    view.zones
        .entry(zone_name.to_owned())
        .or_insert_with(|| Zone::unexplored(zone_name))
        .modifiers
        .insert(modifier.to_owned())
}

fn set_paused(view: &mut RealtimeWorldView, paused: bool) -> bool {
    let changed = view.governor.is_paused != paused;
    view.governor.is_paused = paused;
    changed
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn ev(timestamp: f64, kind: EventKind) -> NormalizedEvent {
        NormalizedEvent::new(timestamp, kind)
    }

    fn zone_changed(name: &str) -> NormalizedEvent {
        ev(
            1.0,
            EventKind::ZoneChanged {
                zone_name: Some(name.to_owned()),
                is_new: true,
            },
        )
    }

    fn modifier(zone: &str, modifier: &str) -> NormalizedEvent {
        ev(
            2.0,
            EventKind::ZoneModifierAdded {
                zone_name: Some(zone.to_owned()),
                modifier: Some(modifier.to_owned()),
            },
        )
    }

    #[test]
    fn zone_changed_creates_explored_zone() {
        let view = applied(RealtimeWorldView::new(), &zone_changed("Zone-Ω"));
        assert_eq!(view.active_zone.as_deref(), Some("Zone-Ω"));
        let zone = view.zone("Zone-Ω").unwrap();
        assert!(zone.is_explored);
        assert!(zone.modifiers.is_empty());
    }

    #[test]
    fn modifier_creates_unexplored_zone() {
        let view = applied(RealtimeWorldView::new(), &modifier("Zone-Σ", "Gravity Well"));
        assert!(view.active_zone.is_none());
        let zone = view.zone("Zone-Σ").unwrap();
        assert!(!zone.is_explored);
        assert!(zone.modifiers.contains("Gravity Well"));
    }

    #[test]
    fn adding_the_same_modifier_twice_is_idempotent() {
        let mut view = RealtimeWorldView::new();
        assert!(apply(&mut view, &modifier("Zone-Ω", "Luminous Cascade")));
        assert!(!apply(&mut view, &modifier("Zone-Ω", "Luminous Cascade")));
        let zone = view.zone("Zone-Ω").unwrap();
        assert_eq!(zone.modifiers.len(), 1);
    }

    #[test]
    fn exploration_is_monotonic() {
        let events = [
            zone_changed("Zone-Α"),
            modifier("Zone-Α", "Temporal Drift"),
            zone_changed("Zone-Β"),
            ev(3.0, EventKind::GovernorPause),
            ev(
                4.0,
                EventKind::Rollback {
                    checkpoint: Some("cp-1".to_owned()),
                },
            ),
            modifier("Zone-Α", "Entropy Bloom"),
        ];
        let view = fold(RealtimeWorldView::new(), &events);
        assert!(view.zone("Zone-Α").unwrap().is_explored);
        assert!(view.zone("Zone-Β").unwrap().is_explored);
    }

    #[test]
    fn revisiting_a_modified_zone_marks_it_explored() {
        let events = [modifier("Zone-Γ", "Silent Field"), zone_changed("Zone-Γ")];
        let view = fold(RealtimeWorldView::new(), &events);
        let zone = view.zone("Zone-Γ").unwrap();
        assert!(zone.is_explored);
        assert!(zone.modifiers.contains("Silent Field"));
    }

    #[test]
    fn zone_changed_without_name_clears_active_zone() {
        let mut view = applied(RealtimeWorldView::new(), &zone_changed("Zone-Δ"));
        let cleared = ev(
            2.0,
            EventKind::ZoneChanged {
                zone_name: None,
                is_new: false,
            },
        );
        assert!(apply(&mut view, &cleared));
        assert!(view.active_zone.is_none());
        assert!(view.zone("Zone-Δ").is_some());
    }

    #[test]
    fn modifier_without_zone_is_ignored() {
        let mut view = RealtimeWorldView::new();
        let event = ev(
            1.0,
            EventKind::ZoneModifierAdded {
                zone_name: None,
                modifier: Some("Gravity Well".to_owned()),
            },
        );
        assert!(!apply(&mut view, &event));
        assert_eq!(view, RealtimeWorldView::new());
    }

    #[test]
    fn pause_and_resume_toggle_flag() {
        let mut view = RealtimeWorldView::new();
        assert!(apply(&mut view, &ev(1.0, EventKind::GovernorPause)));
        assert!(view.governor.is_paused);
        assert!(!apply(&mut view, &ev(1.5, EventKind::GovernorPause)));
        assert!(apply(&mut view, &ev(2.0, EventKind::GovernorResume)));
        assert!(!view.governor.is_paused);
    }

    #[test]
    fn violation_replaces_previous_and_falls_back_to_active_zone() {
        let mut view = applied(RealtimeWorldView::new(), &zone_changed("Zone-Ω"));
        apply(
            &mut view,
            &ev(
                5.0,
                EventKind::PolicyViolation {
                    policy_name: Some("energy_cap".to_owned()),
                    zone_name: Some("Zone-Σ".to_owned()),
                    metrics: BTreeMap::new(),
                },
            ),
        );
        apply(
            &mut view,
            &ev(
                6.0,
                EventKind::PolicyViolation {
                    policy_name: Some("drift_limit".to_owned()),
                    zone_name: None,
                    metrics: BTreeMap::from([("drift".to_owned(), 0.9)]),
                },
            ),
        );
        let violation = view.governor.last_violation.as_ref().unwrap();
        assert!((violation.timestamp - 6.0).abs() < f64::EPSILON);
        assert_eq!(violation.policy_name.as_deref(), Some("drift_limit"));
        assert_eq!(violation.zone_name.as_deref(), Some("Zone-Ω"));
        assert_eq!(violation.metrics.len(), 1);
    }

    #[test]
    fn rollback_records_checkpoint() {
        let view = applied(
            RealtimeWorldView::new(),
            &ev(
                9.0,
                EventKind::Rollback {
                    checkpoint: Some("cp-42".to_owned()),
                },
            ),
        );
        let rollback = view.governor.last_rollback.unwrap();
        assert_eq!(rollback.checkpoint.as_deref(), Some("cp-42"));
    }

    #[test]
    fn informational_events_do_not_mutate() {
        let start = applied(RealtimeWorldView::new(), &zone_changed("Zone-Α"));
        let events = [
            ev(
                1.0,
                EventKind::CheckpointScheduled {
                    checkpoint: Some("cp-1".to_owned()),
                    details: BTreeMap::new(),
                },
            ),
            ev(
                2.0,
                EventKind::CheckpointSaved {
                    checkpoint: Some("cp-1".to_owned()),
                    details: BTreeMap::new(),
                },
            ),
            ev(
                3.0,
                EventKind::Unknown {
                    event: "mystery_event".to_owned(),
                    payload: serde_json::json!({"mystery": true}),
                },
            ),
        ];
        let end = fold(start.clone(), &events);
        assert_eq!(start, end);
    }
}
