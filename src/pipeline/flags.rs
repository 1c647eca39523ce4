//! Per-frame feature-flag snapshot
//!
//! Flags are mutated by the embedding application between frames and
//! read once at the start of each frame; the copy handed to the pass
//! sequencer stays fixed for the frame's duration.

/// Environment-map sampling mode. Reflection and refraction are an
/// exclusive pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvMapMode {
    #[default]
    Off,
    Reflection,
    Refraction,
}

/// Light source model used by the lighting program and the shadow
/// projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightKind {
    #[default]
    Point,
    Directional,
}

/// Effect toggles controlling pass activation and per-draw shading
#[derive(Debug, Clone, Copy)]
pub struct FeatureFlags {
    pub shadow_on: bool,
    pub sim_transmit_on: bool,
    pub tsd_on: bool,
    pub ssao_on: bool,
    pub sslr_on: bool,
    pub floor_on: bool,
    pub gamma_on: bool,
    pub background_white: bool,
    pub env_map: EnvMapMode,
    pub light_kind: LightKind,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            shadow_on: false,
            sim_transmit_on: false,
            tsd_on: false,
            ssao_on: false,
            sslr_on: false,
            floor_on: true,
            gamma_on: true,
            background_white: false,
            env_map: EnvMapMode::Off,
            light_kind: LightKind::Point,
        }
    }
}

impl FeatureFlags {
    /// The shadow map is produced when either consumer effect wants it
    pub fn needs_shadow_pass(&self) -> bool {
        self.shadow_on || self.sim_transmit_on
    }

    /// The G-buffer is produced only for the screen-space effects
    pub fn needs_gbuffer_pass(&self) -> bool {
        self.ssao_on || self.sslr_on
    }

    /// Whether lighting output must be kept off screen for a later pass
    pub fn needs_offscreen_lighting(&self) -> bool {
        self.tsd_on || self.ssao_on || self.sslr_on
    }

    /// Window clear color for this frame; the zero alpha is what the
    /// alpha-gated blur mask keys on
    pub fn background_color(&self) -> [f32; 4] {
        if self.background_white {
            [1.0, 1.0, 1.0, 0.0]
        } else {
            [0.0, 0.0, 0.0, 0.0]
        }
    }
}
