//! Scene state derivation: world-view in, presentation parameters out.
//!
//! Derivation is a pure function of the [`RealtimeWorldView`] and the
//! configured tuning. It is total: a missing or unmapped active zone gets
//! the baseline camera rig.

use vigil_types::{
    CameraState, FrameLoop, LightingState, PresentationState, RealtimeWorldView, RenderState,
};

use crate::config::SceneConfig;

/// Camera eye offset from the look-at point.
pub const CAMERA_OFFSET: [f64; 3] = [0.0, 6.0, 12.0];

/// Look-at point for zones without an anchor.
pub const BASELINE_TARGET: [f64; 3] = [0.0, 0.0, 0.0];

/// Fixed look-at anchors for the known zones.
static ZONE_ANCHORS: &[(&str, [f64; 3])] = &[
    ("Zone-Α", [-24.0, 0.0, -24.0]),
    ("Zone-Β", [0.0, 0.0, -32.0]),
    ("Zone-Γ", [24.0, 0.0, -24.0]),
    ("Zone-Δ", [-24.0, 0.0, 24.0]),
    ("Zone-Σ", [24.0, 4.0, 24.0]),
    ("Zone-Ω", [0.0, 8.0, 40.0]),
];

/// Look-at anchor for a zone, falling back to the baseline.
pub fn zone_anchor(zone: Option<&str>) -> [f64; 3] {
    zone.and_then(|name| {
        ZONE_ANCHORS
            .iter()
            .find(|(anchor, _)| *anchor == name)
            .map(|(_, target)| *target)
    })
    .unwrap_or(BASELINE_TARGET)
}

/// Derives [`PresentationState`] from a world-view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneDeriver {
    config: SceneConfig,
}

impl SceneDeriver {
    /// Create a deriver with the given tuning.
    pub const fn new(config: SceneConfig) -> Self {
        Self { config }
    }

    /// The tuning in use.
    pub const fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Compute presentation parameters for the view.
    pub fn derive(&self, view: &RealtimeWorldView) -> PresentationState {
        let paused = view.governor.is_paused;
        PresentationState {
            active_zone: view.active_zone.clone(),
            camera: self.camera(view.active_zone.as_deref()),
            lighting: self.lighting(paused),
            render: self.render(paused),
        }
    }

    fn camera(&self, zone: Option<&str>) -> CameraState {
        let target = zone_anchor(zone);
        let [tx, ty, tz] = target;
        let [ox, oy, oz] = CAMERA_OFFSET;
        CameraState {
            position: [tx + ox, ty + oy, tz + oz],
            target,
            fov: self.config.fov,
            near: self.config.near,
            far: self.config.far,
        }
    }

    const fn lighting(&self, paused: bool) -> LightingState {
        if paused {
            LightingState {
                ambient_intensity: self.config.paused_ambient,
                exposure: self.config.paused_exposure,
            }
        } else {
            LightingState {
                ambient_intensity: self.config.nominal_ambient,
                exposure: self.config.nominal_exposure,
            }
        }
    }

    const fn render(&self, paused: bool) -> RenderState {
        if paused {
            RenderState {
                frameloop: FrameLoop::Demand,
                dpr: self.config.paused_dpr,
            }
        } else {
            RenderState {
                frameloop: FrameLoop::Always,
                dpr: self.config.dpr,
            }
        }
    }
}

/// Derive with the default tuning.
pub fn derive(view: &RealtimeWorldView) -> PresentationState {
    SceneDeriver::default().derive(view)
}
