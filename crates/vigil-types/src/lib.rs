//! Shared type definitions for the Vigil scene-state synchronization engine.
//!
//! This crate is the single source of truth for all types used across the
//! Vigil workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the scene dashboard.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for history entries
//! - [`events`] -- Raw telemetry events and the closed normalized variant set
//! - [`world`] -- Zones, governor status and the realtime world-view
//! - [`scene`] -- Presentation parameters and change notifications
//! - [`history`] -- Captured history entries and canonical snapshots

pub mod events;
pub mod history;
pub mod ids;
pub mod scene;
pub mod world;

// Re-export all public types at crate root for convenience.
pub use events::{EventKind, NormalizedEvent, RawEvent};
pub use history::{
    GovernorSnapshot, HistoryEntry, IncidentKind, IncidentSnapshot, WorldViewSnapshot,
    ZoneSnapshot,
};
pub use ids::CaptureId;
pub use scene::{CameraState, FrameLoop, LightingState, PresentationState, RenderState, SceneUpdate};
pub use world::{GovernorStatus, RealtimeWorldView, RollbackRecord, ViolationRecord, Zone};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for the dashboard.

    #[test]
    fn export_bindings() {
        // Exporting writes the bindings to the `bindings/` directory
        // relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::CaptureId::export_all();

        // Events
        let _ = crate::events::EventKind::export_all();
        let _ = crate::events::NormalizedEvent::export_all();

        // World
        let _ = crate::world::Zone::export_all();
        let _ = crate::world::ViolationRecord::export_all();
        let _ = crate::world::RollbackRecord::export_all();
        let _ = crate::world::GovernorStatus::export_all();
        let _ = crate::world::RealtimeWorldView::export_all();

        // Scene
        let _ = crate::scene::CameraState::export_all();
        let _ = crate::scene::LightingState::export_all();
        let _ = crate::scene::FrameLoop::export_all();
        let _ = crate::scene::RenderState::export_all();
        let _ = crate::scene::PresentationState::export_all();
        let _ = crate::scene::SceneUpdate::export_all();

        // History
        let _ = crate::history::IncidentKind::export_all();
        let _ = crate::history::IncidentSnapshot::export_all();
        let _ = crate::history::ZoneSnapshot::export_all();
        let _ = crate::history::GovernorSnapshot::export_all();
        let _ = crate::history::WorldViewSnapshot::export_all();
        let _ = crate::history::HistoryEntry::export_all();
    }
}
