//! Wire parsing, event normalization and the capped event log for Vigil.
//!
//! The governor emits an open-ended vocabulary of telemetry events. This
//! crate is the boundary where that vocabulary becomes the closed
//! [`EventKind`](vigil_types::EventKind) set:
//!
//! - [`wire`] -- Lenient parsing of `{ "t", "event", "payload" }` envelopes
//! - [`normalize`] -- Total mapping from raw events to typed variants
//! - [`log`] -- Capped ring buffer of recent events for display

pub mod error;
pub mod log;
pub mod normalize;
pub mod wire;

pub use error::EventError;
pub use log::{DEFAULT_LOG_CAPACITY, EventLog, LoggedEvent};
pub use normalize::{normalize, recognized_tags};
pub use wire::{parse_envelope, raw_event_from_value};
