//! Scene state: the loaded mesh, its derived metrics, and the cameras

mod camera;
mod light;

pub use camera::*;
pub use light::*;

use std::path::Path;

use glam::{Mat4, Vec3};
use log::info;

use crate::resources::{MeshError, TriMesh};

/// The single-mesh scene with its viewer camera and light source
pub struct Scene {
    pub mesh: TriMesh,
    pub camera: ViewCamera,
    pub light: SceneLight,
    rotation: Mat4,
    center: Vec3,
    radius: f32,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            mesh: TriMesh::default(),
            camera: ViewCamera::new(width, height),
            light: SceneLight::new(),
            rotation: Mat4::IDENTITY,
            center: Vec3::ZERO,
            radius: 1.0,
        }
    }

    /// Import a mesh file and refit cameras and light to it. Tangent
    /// frames are derived when the mesh carries texture coordinates.
    pub fn load_mesh(&mut self, path: impl AsRef<Path>) -> Result<(), MeshError> {
        let mut mesh = TriMesh::import(path.as_ref())?;
        if mesh.has_uvs() {
            mesh.compute_tangent_basis();
        }
        self.replace_mesh(mesh);
        Ok(())
    }

    /// Install already-built geometry, refitting cameras and light
    pub fn replace_mesh(&mut self, mesh: TriMesh) {
        self.mesh = mesh;
        let (min, max) = self.mesh.bounding_box();
        if min != max {
            self.center = (min + max) * 0.5;
        } else {
            self.center = Vec3::ZERO;
        }
        self.radius = (max - min).length() * 0.5;
        self.rotation = Mat4::IDENTITY;
        self.camera.fit_scene(self.radius);
        self.light.fit_scene(self.center, self.radius);
        info!(
            "scene fitted: center ({:.3}, {:.3}, {:.3}), radius {:.3}",
            self.center.x, self.center.y, self.center.z, self.radius
        );
    }

    /// Object-space rotation, driven by the embedder's pointer input
    pub fn set_rotation(&mut self, rotation: Mat4) {
        self.rotation = rotation;
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Model matrix: re-center the mesh at the origin, then apply the
    /// accumulated rotation
    pub fn model_matrix(&self) -> Mat4 {
        self.rotation * Mat4::from_translation(-self.center)
    }

    /// Lowest point of the mesh in file coordinates, used to place the
    /// floor plane
    pub fn floor_height(&self) -> f32 {
        self.mesh.bounding_box().0.y
    }
}
