//! Realtime world-view reduction and zone descriptions for Vigil.
//!
//! # Modules
//!
//! - [`reducer`] -- Folds normalized events, in arrival order, into the
//!   [`RealtimeWorldView`]. Total and deterministic.
//! - [`catalog`] -- Static tooltip text for known zones and modifiers,
//!   consulted by overlay UI only.
//!
//! [`RealtimeWorldView`]: vigil_types::RealtimeWorldView

pub mod catalog;
pub mod reducer;

// Re-export primary functions at crate root.
pub use catalog::{ModifierNote, ZoneTooltip, tooltip};
pub use reducer::{apply, applied, fold};
