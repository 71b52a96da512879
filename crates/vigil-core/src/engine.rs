//! The scene synchronization engine.
//!
//! [`SceneSyncEngine`] is the single owner of the realtime world-view, the
//! raw event log and the history stack. It is single-writer: every
//! mutating call takes `&mut self`, so a multi-threaded host wraps the
//! whole engine in one mutex. Readers get shared references or owned
//! snapshots, plus a broadcast stream of [`SceneUpdate`]s sent after each
//! applied event and each history navigation.
//!
//! After [`teardown`](SceneSyncEngine::teardown) the engine is inert:
//! events are dropped and history is frozen, but the last state remains
//! readable.

use tokio::sync::broadcast;
use tracing::{debug, info};
use vigil_events::{EventLog, LoggedEvent, normalize};
use vigil_types::{
    EventKind, HistoryEntry, PresentationState, RawEvent, RealtimeWorldView, SceneUpdate,
};

use crate::config::VigilConfig;
use crate::history::{HistoryStack, PushOutcome};
use crate::scene::SceneDeriver;
use crate::serializer;

/// Capacity of the update broadcast channel.
pub const UPDATE_CHANNEL_CAPACITY: usize = 256;

/// Result of feeding one raw event to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The event was normalized, logged and folded into the world-view.
    Applied {
        /// Dotted kind of the normalized event.
        kind: &'static str,
        /// Whether the world-view changed.
        changed: bool,
    },
    /// The engine has been torn down; nothing happened.
    Ignored,
}

/// Owned scene state with change notification.
#[derive(Debug)]
pub struct SceneSyncEngine {
    world: RealtimeWorldView,
    deriver: SceneDeriver,
    log: EventLog,
    history: HistoryStack<HistoryEntry>,
    latest_checkpoint: Option<String>,
    updates: broadcast::Sender<SceneUpdate>,
    sequence: u64,
    torn_down: bool,
}

impl Default for SceneSyncEngine {
    fn default() -> Self {
        Self::new(&VigilConfig::default())
    }
}

impl SceneSyncEngine {
    /// Create an engine with an empty world-view and history.
    pub fn new(config: &VigilConfig) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            world: RealtimeWorldView::new(),
            deriver: SceneDeriver::new(config.scene.clone()),
            log: EventLog::new(config.events.log_capacity),
            history: HistoryStack::new(config.history),
            latest_checkpoint: None,
            updates,
            sequence: 0,
            torn_down: false,
        }
    }

    // -----------------------------------------------------------------------
    // Ingest
    // -----------------------------------------------------------------------

    /// Normalize a raw event, log it and fold it into the world-view.
    pub fn ingest(&mut self, raw: &RawEvent) -> IngestOutcome {
        if self.torn_down {
            debug!(tag = %raw.tag, "engine torn down, dropping event");
            return IngestOutcome::Ignored;
        }

        let event = normalize(raw);
        if let EventKind::CheckpointSaved {
            checkpoint: Some(checkpoint),
            ..
        } = &event.kind
        {
            self.latest_checkpoint = Some(checkpoint.clone());
        }

        let changed = vigil_world::apply(&mut self.world, &event);
        let kind = event.kind.name();
        debug!(kind, changed, timestamp = event.timestamp, "event applied");
        self.log.push(event);
        self.notify(kind);

        IngestOutcome::Applied { kind, changed }
    }

    // -----------------------------------------------------------------------
    // Read API
    // -----------------------------------------------------------------------

    /// Current world-view.
    pub const fn world_view(&self) -> &RealtimeWorldView {
        &self.world
    }

    /// Presentation state derived from the current world-view.
    pub fn presentation(&self) -> PresentationState {
        self.deriver.derive(&self.world)
    }

    /// Most recent events, newest first, optionally filtered by kind.
    pub fn recent_events(&self, limit: usize, kind: Option<&str>) -> Vec<&LoggedEvent> {
        self.log.recent(limit, kind)
    }

    /// The raw event log.
    pub const fn event_log(&self) -> &EventLog {
        &self.log
    }

    /// Checkpoint named by the most recent `checkpoint.saved` event.
    pub fn latest_checkpoint(&self) -> Option<&str> {
        self.latest_checkpoint.as_deref()
    }

    /// The history stack.
    pub const fn history(&self) -> &HistoryStack<HistoryEntry> {
        &self.history
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// Capture the current state onto the history stack.
    ///
    /// Returns `None` after teardown.
    pub fn capture(&mut self, checkpoint: Option<String>) -> Option<PushOutcome> {
        let entry = self.snapshot(checkpoint)?;
        let outcome = self.history.push(entry);
        debug!(?outcome, size = self.history.len(), "state captured");
        self.notify("history.capture");
        Some(outcome)
    }

    /// Capture the current state over the current history entry.
    ///
    /// Returns `None` after teardown.
    pub fn capture_replace(&mut self, checkpoint: Option<String>) -> Option<PushOutcome> {
        let entry = self.snapshot(checkpoint)?;
        let outcome = self.history.replace_current(entry);
        debug!(?outcome, size = self.history.len(), "current entry replaced");
        self.notify("history.replace");
        Some(outcome)
    }

    /// Capture the current state tagged with the latest saved checkpoint.
    pub fn capture_at_latest_checkpoint(&mut self) -> Option<PushOutcome> {
        let checkpoint = self.latest_checkpoint.clone();
        self.capture(checkpoint)
    }

    /// Step the history cursor back and return the current entry.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if !self.torn_down && self.history.can_undo() {
            self.history.undo();
            debug!(cursor = ?self.history.cursor(), "history undo");
            self.notify("history.undo");
        }
        self.history.current()
    }

    /// Step the history cursor forward and return the current entry.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if !self.torn_down && self.history.can_redo() {
            self.history.redo();
            debug!(cursor = ?self.history.cursor(), "history redo");
            self.notify("history.redo");
        }
        self.history.current()
    }

    /// Drop every history entry. Returns whether anything was cleared.
    pub fn clear_history(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        let had_entries = !self.history.is_empty();
        self.history.clear();
        if had_entries {
            debug!("history cleared");
            self.notify("history.clear");
        }
        had_entries
    }

    fn snapshot(&self, checkpoint: Option<String>) -> Option<HistoryEntry> {
        if self.torn_down {
            debug!("engine torn down, capture ignored");
            return None;
        }
        Some(serializer::serialize(
            &self.presentation(),
            &self.world,
            checkpoint,
        ))
    }

    // -----------------------------------------------------------------------
    // Notification and lifecycle
    // -----------------------------------------------------------------------

    /// Subscribe to scene updates.
    pub fn subscribe(&self) -> broadcast::Receiver<SceneUpdate> {
        self.updates.subscribe()
    }

    /// Number of sequence numbers issued so far.
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Make the engine inert. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        info!(
            events_seen = self.log.total_seen(),
            history_size = self.history.len(),
            "scene engine torn down"
        );
    }

    /// Whether [`teardown`](Self::teardown) has run.
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    fn notify(&mut self, trigger: &str) {
        self.sequence = self.sequence.saturating_add(1);
        let update = SceneUpdate {
            sequence: self.sequence,
            trigger: trigger.to_owned(),
            is_paused: self.world.governor.is_paused,
            presentation: self.presentation(),
            history_size: self.history.len(),
            history_cursor: self.history.cursor(),
        };
        self.updates.send(update).unwrap_or(0);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn raw(t: f64, tag: &str, payload: Value) -> RawEvent {
        RawEvent::new(t, tag, payload)
    }

    #[test]
    fn ingest_reports_kind_and_change() {
        let mut engine = SceneSyncEngine::default();
        let outcome = engine.ingest(&raw(1.0, "pause", Value::Null));
        assert_eq!(
            outcome,
            IngestOutcome::Applied {
                kind: "governor.pause",
                changed: true
            }
        );
        let outcome = engine.ingest(&raw(2.0, "pause", Value::Null));
        assert_eq!(
            outcome,
            IngestOutcome::Applied {
                kind: "governor.pause",
                changed: false
            }
        );
        assert_eq!(engine.event_log().len(), 2);
    }

    #[test]
    fn unknown_events_are_logged_not_applied() {
        let mut engine = SceneSyncEngine::default();
        engine.ingest(&raw(1.0, "mystery_event", json!({"mystery": true})));
        assert_eq!(engine.world_view(), &RealtimeWorldView::new());
        let recent = engine.recent_events(10, Some("unknown"));
        assert_eq!(recent.len(), 1);
    }

    #[test]
    fn saved_checkpoint_is_tracked_outside_world_view() {
        let mut engine = SceneSyncEngine::default();
        engine.ingest(&raw(1.0, "checkpoint_scheduled", json!({"checkpoint": "cp-1"})));
        assert!(engine.latest_checkpoint().is_none());
        engine.ingest(&raw(2.0, "checkpoint_saved", json!({"checkpoint": "cp-1"})));
        assert_eq!(engine.latest_checkpoint(), Some("cp-1"));
        assert_eq!(engine.world_view(), &RealtimeWorldView::new());

        engine.capture_at_latest_checkpoint();
        let entry = engine.history().current().unwrap();
        assert_eq!(entry.checkpoint.as_deref(), Some("cp-1"));
    }

    #[test]
    fn capture_and_navigate() {
        let mut engine = SceneSyncEngine::default();
        engine.ingest(&raw(1.0, "zone_changed", json!({"zone_name": "Zone-Α"})));
        engine.capture(None);
        engine.ingest(&raw(2.0, "zone_changed", json!({"zone_name": "Zone-Β"})));
        engine.capture(None);

        let undone = engine.undo().unwrap();
        assert_eq!(undone.presentation.active_zone.as_deref(), Some("Zone-Α"));
        let redone = engine.redo().unwrap();
        assert_eq!(redone.presentation.active_zone.as_deref(), Some("Zone-Β"));

        // Navigation never touches the live world-view.
        engine.undo();
        assert_eq!(engine.world_view().active_zone.as_deref(), Some("Zone-Β"));
    }

    #[test]
    fn capture_replace_overwrites_current() {
        let mut engine = SceneSyncEngine::default();
        engine.capture(None);
        engine.ingest(&raw(1.0, "pause", Value::Null));
        assert_eq!(engine.capture_replace(Some("cp-2".to_owned())), Some(PushOutcome::Replaced));
        assert_eq!(engine.history().len(), 1);
        let entry = engine.history().current().unwrap();
        assert!(entry.world_view.governor.is_paused);
    }

    #[test]
    fn clear_history_reports_whether_anything_went() {
        let mut engine = SceneSyncEngine::default();
        assert!(!engine.clear_history());
        engine.capture(None);
        assert!(engine.clear_history());
        assert!(engine.history().is_empty());
    }

    #[tokio::test]
    async fn subscribers_see_every_change_in_order() {
        let mut engine = SceneSyncEngine::default();
        let mut rx = engine.subscribe();

        engine.ingest(&raw(1.0, "zone_changed", json!({"zone_name": "Zone-Ω"})));
        engine.ingest(&raw(2.0, "pause", Value::Null));
        engine.capture(None);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.sequence, 1);
        assert_eq!(first.trigger, "zone.changed");
        assert_eq!(first.presentation.active_zone.as_deref(), Some("Zone-Ω"));

        let second = rx.recv().await.unwrap();
        assert_eq!(second.trigger, "governor.pause");
        assert!(second.is_paused);

        let third = rx.recv().await.unwrap();
        assert_eq!(third.trigger, "history.capture");
        assert_eq!(third.history_size, 1);
        assert_eq!(third.history_cursor, Some(0));
    }

    #[test]
    fn boundary_navigation_sends_nothing() {
        let mut engine = SceneSyncEngine::default();
        engine.capture(None);
        let before = engine.sequence();
        assert!(engine.undo().is_some());
        assert!(engine.redo().is_some());
        assert_eq!(engine.sequence(), before);
    }

    #[test]
    fn teardown_makes_engine_inert() {
        let mut engine = SceneSyncEngine::default();
        engine.ingest(&raw(1.0, "zone_changed", json!({"zone_name": "Zone-Α"})));
        engine.capture(None);
        engine.capture(Some("cp".to_owned()));
        engine.teardown();
        engine.teardown();
        assert!(engine.is_torn_down());

        let world_before = engine.world_view().clone();
        let cursor_before = engine.history().cursor();
        assert_eq!(
            engine.ingest(&raw(2.0, "zone_changed", json!({"zone_name": "Zone-Β"}))),
            IngestOutcome::Ignored
        );
        assert!(engine.capture(None).is_none());
        assert!(engine.capture_replace(None).is_none());
        assert!(engine.undo().is_some());
        assert!(!engine.clear_history());

        assert_eq!(engine.world_view(), &world_before);
        assert_eq!(engine.history().cursor(), cursor_before);
        assert_eq!(engine.history().len(), 2);
        assert_eq!(engine.event_log().len(), 1);
    }
}
