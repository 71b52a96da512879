//! Presentation parameters handed to the rendering surface.
//!
//! A [`PresentationState`] is derived from the world-view on demand and
//! never mutated directly. Renderers see only these numbers, not raw
//! events or governor internals.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Camera placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CameraState {
    /// Eye position `[x, y, z]`.
    pub position: [f64; 3],
    /// Look-at point `[x, y, z]`.
    pub target: [f64; 3],
    /// Vertical field of view in degrees.
    pub fov: f64,
    /// Near clipping plane.
    pub near: f64,
    /// Far clipping plane.
    pub far: f64,
}

/// Scene lighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LightingState {
    /// Ambient light intensity.
    pub ambient_intensity: f64,
    /// Tone-mapping exposure.
    pub exposure: f64,
}

/// When the renderer should produce frames.
///
/// Running scenes render continuously; a paused scene only redraws on
/// demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum FrameLoop {
    /// Render continuously.
    Always,
    /// Render only when something invalidates the frame.
    Demand,
}

/// Render loop parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RenderState {
    /// Frame scheduling mode.
    pub frameloop: FrameLoop,
    /// Device pixel ratio.
    pub dpr: f64,
}

/// Everything the rendering surface needs for one frame of the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PresentationState {
    /// Zone being presented.
    pub active_zone: Option<String>,
    /// Camera placement.
    pub camera: CameraState,
    /// Lighting.
    pub lighting: LightingState,
    /// Render loop parameters.
    pub render: RenderState,
}

/// Change notification pushed to subscribers after every state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SceneUpdate {
    /// Monotonic sequence number, starting at 1.
    pub sequence: u64,
    /// What caused the update: an event kind (`zone.changed`) or a
    /// history operation (`history.undo`).
    pub trigger: String,
    /// Whether the governor is paused after the change.
    pub is_paused: bool,
    /// Presentation state after the change.
    pub presentation: PresentationState,
    /// Number of history entries after the change.
    pub history_size: usize,
    /// History cursor after the change.
    pub history_cursor: Option<usize>,
}
