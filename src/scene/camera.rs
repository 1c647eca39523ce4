//! Viewer camera
//!
//! The camera sits on a fixed offset above and in front of the scene
//! and always looks at the origin; the mesh itself is re-centered there
//! by the model matrix, so object rotation happens in model space, not
//! by moving the camera. Scroll zoom scales the field of view.

use glam::{Mat4, Vec3};

/// Scroll wheel units to zoom-factor conversion
const ZOOM_STEP: f32 = 0.1;

/// Perspective camera aimed at the origin with scroll-driven zoom
#[derive(Debug, Clone)]
pub struct ViewCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
    zoom: f32,
}

impl ViewCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Vec3::new(0.0, 2.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: 45.0_f32.to_radians(),
            aspect: width as f32 / height as f32,
            near: 0.01,
            far: 1000.0,
            zoom: 1.0,
        }
    }

    /// Place the camera for a scene of the given radius and reset zoom.
    /// The offset keeps the whole mesh in frame at default zoom.
    pub fn fit_scene(&mut self, radius: f32) {
        self.position = Vec3::new(0.0, radius * 0.6, radius * 3.0);
        self.target = Vec3::ZERO;
        self.far = radius * 8.0;
        self.zoom = 1.0;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    /// Apply one scroll-wheel step. The zoom factor stays strictly
    /// inside (0, 2); a step that would leave the interval is ignored
    /// rather than clamped.
    pub fn apply_scroll(&mut self, delta: f32) {
        let next = self.zoom - delta * ZOOM_STEP;
        if next > 0.0 && next < 2.0 {
            self.zoom = next;
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Projection with the zoom factor applied as a field-of-view scale
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y * self.zoom, self.aspect, self.near, self.far)
    }

    /// Zoom-independent projection, used for the skybox so zooming does
    /// not appear to move the environment
    pub fn fixed_projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }
}
