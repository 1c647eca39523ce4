//! Per-frame state snapshot
//!
//! Everything a pass needs to run is captured here at the start of the
//! frame: the flag snapshot, the frame's matrices, and the scalar knobs.
//! Passes receive this by reference and never reach back into mutable
//! scene state mid-frame.

use glam::{Mat3, Mat4, Vec3};

use crate::pipeline::flags::FeatureFlags;
use crate::resources::LitParams;
use crate::scene::Scene;

/// Immutable snapshot of one frame's rendering inputs
#[derive(Debug, Clone, Copy)]
pub struct FrameState {
    pub flags: FeatureFlags,
    pub model: Mat4,
    pub view: Mat4,
    pub proj: Mat4,
    /// Zoom-independent projection for the skybox
    pub fixed_proj: Mat4,
    pub light_view_proj: Mat4,
    pub light_pos: Vec3,
    pub light_color: Vec3,
    pub cam_pos: Vec3,
    /// Attenuation cutoff distance for the lighting program
    pub dist_light_max: f32,
    /// SSAO neighborhood radius; tracks the camera zoom factor
    pub ssao_radius: f32,
    /// User-adjustable width of the texture-space blur
    pub blur_filter_width: i32,
    pub window_width: u32,
    pub window_height: u32,
    pub background: [f32; 4],
}

impl FrameState {
    /// Capture the frame inputs from the scene and the flag snapshot
    pub fn capture(
        scene: &Scene,
        flags: FeatureFlags,
        window_width: u32,
        window_height: u32,
        blur_filter_width: i32,
    ) -> Self {
        Self {
            flags,
            model: scene.model_matrix(),
            view: scene.camera.view_matrix(),
            proj: scene.camera.projection_matrix(),
            fixed_proj: scene.camera.fixed_projection_matrix(),
            light_view_proj: scene.light.view_projection(),
            light_pos: scene.light.position(),
            light_color: scene.light.color,
            cam_pos: scene.camera.position,
            dist_light_max: scene.light.max_distance(),
            ssao_radius: scene.camera.zoom(),
            blur_filter_width,
            window_width,
            window_height,
            background: flags.background_color(),
        }
    }

    /// View for the skybox: rotation only, composed with the model
    /// rotation so the environment turns with the object
    pub fn skybox_view(&self) -> Mat4 {
        Mat4::from_mat3(Mat3::from_mat4(self.view)) * self.model
    }

    /// The lit-draw parameter block shared by the mesh and floor draws
    pub fn lit_params(&self) -> LitParams {
        LitParams {
            model: self.model,
            view: self.view,
            proj: self.proj,
            light_view_proj: self.light_view_proj,
            light_pos: self.light_pos,
            light_color: self.light_color,
            cam_pos: self.cam_pos,
            dist_light_max: self.dist_light_max,
            light_kind: self.flags.light_kind,
            use_gamma: self.flags.gamma_on,
        }
    }
}
