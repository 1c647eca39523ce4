//! Hybrid renderer - an interactive deferred/forward rendering demo core
//!
//! Loads OBJ meshes (with vertex deduplication, derived normals, and a
//! tangent basis for normal mapping) and shades them through a
//! fixed-order, flag-gated pass pipeline:
//! - Shadow mapping from an orbiting light
//! - G-buffer generation for the screen-space effects
//! - Forward lighting with per-surface material toggles
//! - Texture-space diffusion (lighting blurred in UV space)
//! - Screen-space ambient occlusion
//! - Screen-space light reflections
//!
//! The GPU, the window system, and shader compilation all live behind
//! the [`backend::GraphicsBackend`] trait; the crate ships a
//! state-tracking [`backend::HeadlessBackend`] that validates resource
//! lifecycles and records the frame's command stream.

pub mod backend;
pub mod pipeline;
pub mod resources;
pub mod scene;

pub use backend::{GraphicsBackend, HeadlessBackend};
pub use pipeline::{FeatureFlags, FrameState, PassSequencer};
pub use scene::Scene;

/// Configuration for initializing the renderer
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Window title
    pub title: String,
    /// Initial window width
    pub window_width: u32,
    /// Initial window height
    pub window_height: u32,
    /// Fixed side length of every off-screen render target
    pub target_resolution: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            title: "Hybrid Renderer".to_string(),
            window_width: 1024,
            window_height: 720,
            target_resolution: 2048,
        }
    }
}
