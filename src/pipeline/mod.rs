//! Hybrid deferred/forward rendering pipeline
//!
//! Each frame runs a fixed-order, flag-gated pass sequence:
//! 1. Shadow map - depth from the light's point of view
//! 2. G-buffer - view-space position/normal/color for the screen-space effects
//! 3. Lighting - forward shading, routed to the target the next consumer needs
//! 4. Texture-space diffusion - blur of lighting written into UV space
//! 5. SSAO - ambient occlusion from the G-buffer
//! 6. SSLR - screen-space reflections from the G-buffer

pub mod flags;
pub mod frame;
pub mod gbuffer_pass;
pub mod lighting_pass;
pub mod sequencer;
pub mod shadow_pass;
pub mod ssao_pass;
pub mod sslr_pass;
pub mod targets;
pub mod tsd_pass;

pub use flags::{EnvMapMode, FeatureFlags, LightKind};
pub use frame::FrameState;
pub use gbuffer_pass::GBufferPass;
pub use lighting_pass::LightingPass;
pub use sequencer::{PassSequencer, RenderStage};
pub use shadow_pass::ShadowPass;
pub use ssao_pass::{SampleKernel, SsaoPass};
pub use sslr_pass::SslrPass;
pub use targets::{GBufferTarget, RenderTargetSet, ScreenTarget, ShadowTarget};
pub use tsd_pass::TsdPass;

use crate::backend::traits::*;
use crate::resources::{DrawSurface, UploadMode};
use crate::scene::Scene;

/// Linked shader programs the pipeline drives, registered by label.
/// Compilation happens on the far side of the backend seam.
pub struct ProgramSet {
    pub lighting: ProgramHandle,
    pub shadow: ProgramHandle,
    pub gbuffer: ProgramHandle,
    pub quad: ProgramHandle,
    pub skybox: ProgramHandle,
    pub flat_texture: ProgramHandle,
    pub ssao: ProgramHandle,
    pub sslr: ProgramHandle,
    pub composite: ProgramHandle,
}

impl ProgramSet {
    pub fn create<B: GraphicsBackend>(backend: &mut B) -> BackendResult<Self> {
        Ok(Self {
            lighting: backend.create_program("lighting")?,
            shadow: backend.create_program("shadow")?,
            gbuffer: backend.create_program("gbuffer")?,
            quad: backend.create_program("quad")?,
            skybox: backend.create_program("skybox")?,
            flat_texture: backend.create_program("flat_texture")?,
            ssao: backend.create_program("ssao")?,
            sslr: backend.create_program("sslr")?,
            composite: backend.create_program("composite")?,
        })
    }
}

/// The four draw surfaces a frame touches: the loaded mesh, the floor
/// plane under it, the unit screen quad, and the skybox cube
pub struct SceneSurfaces {
    pub mesh: DrawSurface,
    pub floor: DrawSurface,
    pub quad: DrawSurface,
    pub skybox: DrawSurface,
}

impl SceneSurfaces {
    /// Build all four surfaces from the scene. The shadow map texture is
    /// wired into the lit surfaces here; its identity is stable for the
    /// program's lifetime.
    pub fn create<B: GraphicsBackend>(
        backend: &mut B,
        scene: &Scene,
        shadow_map: TextureHandle,
    ) -> BackendResult<Self> {
        let mut mesh = DrawSurface::from_mesh(backend, "mesh", &scene.mesh)?;
        let mut floor =
            DrawSurface::floor_quad(backend, scene.center(), scene.radius(), scene.floor_height())?;
        let quad = DrawSurface::screen_quad(backend)?;
        let skybox = DrawSurface::skybox_cube(backend, scene.center(), scene.radius())?;
        mesh.textures.shadow = Some(shadow_map);
        floor.textures.shadow = Some(shadow_map);
        Ok(Self {
            mesh,
            floor,
            quad,
            skybox,
        })
    }

    /// Sync the frame-level effect toggles onto the per-surface
    /// materials: the mesh carries every effect, the floor only casts
    /// and receives shadows.
    pub fn apply_flags(&mut self, flags: &FeatureFlags) {
        self.mesh.material.shadow_on = flags.shadow_on;
        self.mesh.material.sim_transmit_on = flags.sim_transmit_on;
        self.mesh.material.tsd_on = flags.tsd_on;
        self.mesh.material.env_map = flags.env_map;
        self.floor.material.shadow_on = flags.shadow_on;
    }

    /// Swap in newly loaded geometry. The mesh surface is refilled with
    /// fresh buffer identities; the floor and skybox are rebuilt because
    /// their shapes derive from the scene metrics. The screen quad is
    /// scene-independent and survives. Materials and texture wiring
    /// carry over.
    pub fn replace_mesh<B: GraphicsBackend>(
        &mut self,
        backend: &mut B,
        scene: &Scene,
    ) -> BackendResult<()> {
        self.mesh.upload(backend, &scene.mesh, UploadMode::Create)?;

        let mut floor =
            DrawSurface::floor_quad(backend, scene.center(), scene.radius(), scene.floor_height())?;
        floor.material = self.floor.material;
        floor.textures = self.floor.textures;
        std::mem::replace(&mut self.floor, floor).destroy(backend);

        let mut skybox = DrawSurface::skybox_cube(backend, scene.center(), scene.radius())?;
        skybox.material = self.skybox.material;
        skybox.textures = self.skybox.textures;
        std::mem::replace(&mut self.skybox, skybox).destroy(backend);
        Ok(())
    }

    /// Install a cubemap on every surface that samples it: the mesh for
    /// environment mapping, the skybox for the backdrop, the quad for
    /// the reflection pass.
    pub fn set_cubemap(&mut self, cubemap: TextureHandle) {
        self.mesh.textures.cubemap = Some(cubemap);
        self.skybox.textures.cubemap = Some(cubemap);
        self.quad.textures.cubemap = Some(cubemap);
    }
}

/// Everything a pass reads during execution, borrowed for one frame
pub struct PassContext<'a> {
    pub frame: &'a FrameState,
    pub targets: &'a RenderTargetSet,
    pub surfaces: &'a SceneSurfaces,
    pub programs: &'a ProgramSet,
    pub kernel: &'a SampleKernel,
}
