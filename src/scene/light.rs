//! Scene light source
//!
//! One light orbits the scene center on a sphere: azimuth free,
//! elevation clamped to the upper hemisphere, distance clamped to a
//! range derived from the scene radius. The same object doubles as the
//! shadow camera, so its view-projection bracket follows the orbit
//! distance.

use glam::{Mat4, Vec3};

use crate::pipeline::flags::LightKind;

/// Orbit step per key press, radians for angles and world units for
/// distance
const ORBIT_STEP: f32 = 0.1;

/// Spherical offset to Euclidean, azimuth in the XZ plane and elevation
/// above it
pub fn spherical_to_euclidean(azimuth: f32, elevation: f32, distance: f32) -> Vec3 {
    Vec3::new(
        azimuth.sin() * elevation.cos(),
        elevation.sin(),
        azimuth.cos() * elevation.cos(),
    ) * distance
}

/// The scene's single light source and shadow camera
#[derive(Debug, Clone)]
pub struct SceneLight {
    pub color: Vec3,
    pub kind: LightKind,
    azimuth: f32,
    elevation: f32,
    distance: f32,
    initial_distance: f32,
    min_distance: f32,
    max_distance: f32,
    center: Vec3,
    scene_radius: f32,
}

impl SceneLight {
    pub fn new() -> Self {
        Self {
            color: Vec3::ONE,
            kind: LightKind::Point,
            azimuth: std::f32::consts::FRAC_PI_2,
            elevation: 0.0,
            distance: 6.0,
            initial_distance: 6.0,
            min_distance: 3.5,
            max_distance: 8.0,
            center: Vec3::ZERO,
            scene_radius: 1.0,
        }
    }

    /// Re-derive the orbit ranges and shadow bracket for a scene of the
    /// given center and radius, and reset the orbit to its start pose.
    pub fn fit_scene(&mut self, center: Vec3, radius: f32) {
        self.center = center;
        self.scene_radius = radius;
        self.azimuth = std::f32::consts::FRAC_PI_2;
        self.elevation = 0.0;
        self.distance = radius * 6.0;
        self.initial_distance = self.distance;
        self.min_distance = radius * 3.5;
        self.max_distance = radius * 8.0;
    }

    /// Light position in the shaded scene's space (the mesh is centered
    /// at the origin there, so no center offset applies)
    pub fn position(&self) -> Vec3 {
        spherical_to_euclidean(self.azimuth, self.elevation, self.distance)
    }

    /// Farthest allowed orbit distance, the attenuation cutoff the
    /// lighting program uses
    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    pub fn orbit_azimuth(&mut self, direction: f32) {
        self.azimuth += direction.signum() * ORBIT_STEP;
    }

    /// Raise or lower the light, staying within the upper hemisphere
    pub fn orbit_elevation(&mut self, direction: f32) {
        let next = self.elevation + direction.signum() * ORBIT_STEP;
        if (0.0..=std::f32::consts::FRAC_PI_2).contains(&next) {
            self.elevation = next;
        }
    }

    /// Move the light along its orbit ray. Only meaningful for a point
    /// light; a directional light's shadow camera ignores distance.
    pub fn change_distance(&mut self, direction: f32) {
        if self.kind != LightKind::Point {
            return;
        }
        let next = self.distance + direction.signum() * ORBIT_STEP;
        if next > self.min_distance && next < self.max_distance {
            self.distance = next;
        }
    }

    /// Shadow camera position. The shadow pass draws the mesh in its
    /// un-centered file coordinates, so here the center offset applies.
    /// A directional light keeps the initial distance regardless of
    /// orbit changes.
    fn camera_position(&self) -> Vec3 {
        let distance = match self.kind {
            LightKind::Point => self.distance,
            LightKind::Directional => self.initial_distance,
        };
        spherical_to_euclidean(self.azimuth, self.elevation, distance) + self.center
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.camera_position(), self.center, Vec3::Y)
    }

    /// Shadow projection: a perspective frustum bracketing the scene
    /// around the orbit distance for a point light, an orthographic box
    /// sized to the floor extent for a directional one
    pub fn projection_matrix(&self) -> Mat4 {
        let near = self.distance - self.scene_radius * 3.0;
        let far = self.distance + self.scene_radius * 3.5;
        match self.kind {
            LightKind::Point => {
                Mat4::perspective_rh(45.0_f32.to_radians(), 1.0, near, far)
            }
            LightKind::Directional => {
                let half = self.scene_radius * 2.0;
                Mat4::orthographic_rh(-half, half, -half, half, near, far)
            }
        }
    }

    /// Combined light view-projection for the shadow pass and the
    /// lighting program's shadow lookup
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for SceneLight {
    fn default() -> Self {
        Self::new()
    }
}
