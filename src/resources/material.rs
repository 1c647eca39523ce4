//! Material descriptors for lit surfaces
//!
//! A material is a closed set of shading terms, texture-map toggles,
//! and per-surface effect toggles. Enabling something whose geometry
//! prerequisite is missing is allowed; [`Material::validate`] reports
//! the mismatches and the draw proceeds with whatever buffer or texture
//! state exists.

use glam::Vec3;
use thiserror::Error;

use crate::pipeline::flags::EnvMapMode;

/// Which attribute channels a surface's geometry actually provided
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceCaps {
    pub has_normals: bool,
    pub has_colors: bool,
    pub has_uvs: bool,
    pub has_tangents: bool,
    pub has_bitangents: bool,
}

/// Precondition violations between a material and its surface geometry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaterialWarning {
    #[error("{map} map enabled but the geometry has no texture coordinates")]
    MapWithoutUv { map: &'static str },
    #[error("normal map enabled but the geometry has no tangent frame")]
    NormalMapWithoutTangents,
    #[error("{term} shading enabled but the geometry has no normals")]
    ShadingWithoutNormals { term: &'static str },
    #[error("texture-space diffusion enabled but the geometry has no texture coordinates")]
    TsdWithoutUv,
    #[error("environment mapping enabled but the geometry has no normals")]
    EnvMapWithoutNormals,
}

/// Shading terms, texture-map toggles, and effect toggles for one surface
#[derive(Debug, Clone, Copy)]
pub struct Material {
    pub ambient_color: Vec3,
    pub diffuse_color: Vec3,
    pub specular_color: Vec3,
    pub specular_power: f32,
    pub ambient_on: bool,
    pub diffuse_on: bool,
    pub specular_on: bool,
    pub use_albedo_tex: bool,
    pub use_normal_tex: bool,
    pub use_metal_tex: bool,
    pub use_gloss_tex: bool,
    pub use_ambient_tex: bool,
    pub shadow_on: bool,
    pub sim_transmit_on: bool,
    pub tsd_on: bool,
    pub env_map: EnvMapMode,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient_color: Vec3::new(0.0, 0.0, 0.1),
            diffuse_color: Vec3::new(0.95, 0.5, 0.25),
            specular_color: Vec3::new(0.0, 0.8, 0.0),
            specular_power: 128.0,
            ambient_on: true,
            diffuse_on: true,
            specular_on: true,
            use_albedo_tex: false,
            use_normal_tex: false,
            use_metal_tex: false,
            use_gloss_tex: false,
            use_ambient_tex: false,
            shadow_on: false,
            sim_transmit_on: false,
            tsd_on: false,
            env_map: EnvMapMode::Off,
        }
    }
}

impl Material {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ambient(mut self, color: Vec3) -> Self {
        self.ambient_color = color;
        self
    }

    pub fn with_diffuse(mut self, color: Vec3) -> Self {
        self.diffuse_color = color;
        self
    }

    pub fn with_specular(mut self, color: Vec3, power: f32) -> Self {
        self.specular_color = color;
        self.specular_power = power;
        self
    }

    /// Check every enabled toggle against the attributes the geometry
    /// provides. Violations are warnings: the material still applies and
    /// draws use whatever stale or placeholder state is bound.
    pub fn validate(&self, caps: &SurfaceCaps) -> Vec<MaterialWarning> {
        let mut warnings = Vec::new();
        if !caps.has_uvs {
            let maps = [
                ("albedo", self.use_albedo_tex),
                ("normal", self.use_normal_tex),
                ("metalness", self.use_metal_tex),
                ("glossiness", self.use_gloss_tex),
                ("ambient occlusion", self.use_ambient_tex),
            ];
            for (map, enabled) in maps {
                if enabled {
                    warnings.push(MaterialWarning::MapWithoutUv { map });
                }
            }
            if self.tsd_on {
                warnings.push(MaterialWarning::TsdWithoutUv);
            }
        }
        if self.use_normal_tex && !(caps.has_tangents && caps.has_bitangents) {
            warnings.push(MaterialWarning::NormalMapWithoutTangents);
        }
        if !caps.has_normals {
            if self.diffuse_on {
                warnings.push(MaterialWarning::ShadingWithoutNormals { term: "diffuse" });
            }
            if self.specular_on {
                warnings.push(MaterialWarning::ShadingWithoutNormals { term: "specular" });
            }
            if self.env_map != EnvMapMode::Off {
                warnings.push(MaterialWarning::EnvMapWithoutNormals);
            }
        }
        warnings
    }
}
