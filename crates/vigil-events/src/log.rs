//! Capped log of recently received events for display.
//!
//! The log keeps the most recent `capacity` normalized events together
//! with their receive time. Older entries are dropped silently. This is
//! display data only; nothing in the world-view depends on it.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use vigil_types::NormalizedEvent;

/// Default number of events retained.
pub const DEFAULT_LOG_CAPACITY: usize = 200;

/// One log line: a normalized event and when it arrived.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggedEvent {
    /// Arrival sequence number, starting at 1 for the first event ever logged.
    pub seq: u64,
    /// Wall-clock receive time.
    pub received_at: DateTime<Utc>,
    /// The normalized event.
    pub event: NormalizedEvent,
}

/// Ring buffer of the most recent events, oldest first.
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<LoggedEvent>,
    capacity: usize,
    total_seen: u64,
}

impl EventLog {
    /// Create an empty log. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            total_seen: 0,
        }
    }

    /// Append an event received now.
    ///
    /// Returns the entry that fell off the front, if the log was full.
    pub fn push(&mut self, event: NormalizedEvent) -> Option<LoggedEvent> {
        self.push_at(event, Utc::now())
    }

    /// Append an event with an explicit receive time.
    pub fn push_at(
        &mut self,
        event: NormalizedEvent,
        received_at: DateTime<Utc>,
    ) -> Option<LoggedEvent> {
        self.total_seen = self.total_seen.saturating_add(1);
        let dropped = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(LoggedEvent {
            seq: self.total_seen,
            received_at,
            event,
        });
        dropped
    }

    /// Up to `limit` entries, newest first, optionally restricted to one
    /// event kind (`zone.changed`, `unknown`, ...).
    pub fn recent(&self, limit: usize, kind: Option<&str>) -> Vec<&LoggedEvent> {
        self.entries
            .iter()
            .rev()
            .filter(|entry| kind.is_none_or(|k| entry.event.kind.name() == k))
            .take(limit)
            .collect()
    }

    /// Iterate oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &LoggedEvent> {
        self.entries.iter()
    }

    /// The most recently logged entry.
    pub fn latest(&self) -> Option<&LoggedEvent> {
        self.entries.back()
    }

    /// Number of entries currently retained.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been retained.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries retained.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of events ever logged, including dropped ones.
    pub const fn total_seen(&self) -> u64 {
        self.total_seen
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use vigil_types::EventKind;

    use super::*;

    fn event(t: f64, kind: EventKind) -> NormalizedEvent {
        NormalizedEvent::new(t, kind)
    }

    #[test]
    fn drops_oldest_beyond_capacity() {
        let mut log = EventLog::new(2);
        assert!(log.push(event(1.0, EventKind::GovernorPause)).is_none());
        assert!(log.push(event(2.0, EventKind::GovernorResume)).is_none());
        let dropped = log.push(event(3.0, EventKind::GovernorPause));
        assert_eq!(dropped.map(|d| d.seq), Some(1));
        assert_eq!(log.len(), 2);
        assert_eq!(log.total_seen(), 3);
        let seqs: Vec<u64> = log.iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![2, 3]);
    }

    #[test]
    fn recent_is_newest_first_and_filtered() {
        let mut log = EventLog::default();
        log.push(event(1.0, EventKind::GovernorPause));
        log.push(event(2.0, EventKind::GovernorResume));
        log.push(event(3.0, EventKind::GovernorPause));

        let all: Vec<u64> = log.recent(10, None).iter().map(|e| e.seq).collect();
        assert_eq!(all, vec![3, 2, 1]);

        let pauses: Vec<u64> = log
            .recent(10, Some("governor.pause"))
            .iter()
            .map(|e| e.seq)
            .collect();
        assert_eq!(pauses, vec![3, 1]);

        assert_eq!(log.recent(1, None).len(), 1);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut log = EventLog::new(0);
        assert_eq!(log.capacity(), 1);
        log.push(event(1.0, EventKind::GovernorPause));
        log.push(event(2.0, EventKind::GovernorResume));
        assert_eq!(log.len(), 1);
        assert_eq!(
            log.latest().map(|e| e.event.kind.name()),
            Some("governor.resume")
        );
    }
}
