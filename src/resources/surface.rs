//! Draw surfaces: GPU-resident geometry plus parameterized draw calls
//!
//! A surface owns one buffer per attribute channel and an index buffer,
//! built either from a [`TriMesh`] or procedurally (screen quad, floor
//! plane, skybox cube). Every channel stays bound at its fixed slot; a
//! channel the geometry lacks is backed by a single placeholder element.
//!
//! Draw methods cover one pass kind each: they activate the pass's
//! program, populate its named uniform slots, bind the texture units it
//! reads, and issue exactly one indexed draw. Required texture handles
//! are the caller's contract and are not validated here.

use crate::backend::traits::*;
use crate::backend::types::*;
use crate::pipeline::flags::{EnvMapMode, LightKind};
use crate::resources::material::{Material, MaterialWarning, SurfaceCaps};
use crate::resources::mesh::TriMesh;
use glam::{Mat4, Vec2, Vec3};

/// Texture unit assignments shared by every pass kind
pub mod texture_unit {
    pub const ALBEDO: u32 = 0;
    pub const NORMAL: u32 = 1;
    pub const METAL: u32 = 2;
    pub const GLOSS: u32 = 3;
    pub const AMBIENT: u32 = 4;
    pub const CUBEMAP: u32 = 5;
    pub const SHADOW: u32 = 6;
}

/// Whether an upload allocates fresh buffer identities or refills the
/// existing ones. Update keeps identities stable because attribute
/// bindings reference the identity, not the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMode {
    Create,
    Update,
}

/// Texture handles a surface draws with, by role
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceTextures {
    pub albedo: Option<TextureHandle>,
    pub normal: Option<TextureHandle>,
    pub metal: Option<TextureHandle>,
    pub gloss: Option<TextureHandle>,
    pub ambient: Option<TextureHandle>,
    pub cubemap: Option<TextureHandle>,
    pub shadow: Option<TextureHandle>,
}

struct ChannelBuffers {
    position: BufferHandle,
    normal: BufferHandle,
    color: BufferHandle,
    uv: BufferHandle,
    tangent: BufferHandle,
    bitangent: BufferHandle,
    index: BufferHandle,
}

impl ChannelBuffers {
    fn channel(&self, channel: VertexChannel) -> BufferHandle {
        match channel {
            VertexChannel::Position => self.position,
            VertexChannel::Normal => self.normal,
            VertexChannel::Color => self.color,
            VertexChannel::Uv => self.uv,
            VertexChannel::Tangent => self.tangent,
            VertexChannel::Bitangent => self.bitangent,
        }
    }
}

/// Frame-level parameters for the lit-shaded draw. Per-surface effect
/// toggles come from the surface's own [`Material`].
#[derive(Debug, Clone, Copy)]
pub struct LitParams {
    pub model: Mat4,
    pub view: Mat4,
    pub proj: Mat4,
    pub light_view_proj: Mat4,
    pub light_pos: Vec3,
    pub light_color: Vec3,
    pub cam_pos: Vec3,
    pub dist_light_max: f32,
    pub light_kind: LightKind,
    pub use_gamma: bool,
}

/// Parameters for the screen-quad draw with optional separable blur
#[derive(Debug, Clone, Copy)]
pub struct ScreenBlurParams {
    pub blur_on: bool,
    pub horizontal: bool,
    pub filter_size: i32,
}

/// Parameters for the SSAO generation draw. Screen dimensions are the
/// window's, not the target's.
#[derive(Debug, Clone, Copy)]
pub struct SsaoParams<'a> {
    pub proj: Mat4,
    pub samples: &'a [Vec3],
    pub radius: f32,
    pub screen_width: u32,
    pub screen_height: u32,
    pub position_tex: TextureHandle,
    pub normal_tex: TextureHandle,
    pub noise_tex: TextureHandle,
}

/// Parameters for the SSLR generation draw
#[derive(Debug, Clone, Copy)]
pub struct SslrParams<'a> {
    pub view: Mat4,
    pub proj: Mat4,
    pub samples: &'a [Vec3],
    pub radius: f32,
    pub screen_width: u32,
    pub screen_height: u32,
    pub position_tex: TextureHandle,
    pub normal_tex: TextureHandle,
    pub screen_tex: TextureHandle,
    pub noise_tex: TextureHandle,
    pub cubemap: Option<TextureHandle>,
}

/// Parameters for the final occlusion/reflection composite draw
#[derive(Debug, Clone, Copy)]
pub struct CompositeParams {
    pub color_tex: TextureHandle,
    pub overlay_tex: TextureHandle,
    /// 1 composites ambient occlusion, 2 composites reflections
    pub occlusion_type: i32,
}

/// One renderable object: channel buffers, a material, and its textures
pub struct DrawSurface {
    name: String,
    buffers: ChannelBuffers,
    index_count: u32,
    caps: SurfaceCaps,
    pub material: Material,
    pub textures: SurfaceTextures,
}

impl DrawSurface {
    /// Create a surface from imported geometry (Create upload)
    pub fn from_mesh<B: GraphicsBackend>(
        backend: &mut B,
        name: &str,
        mesh: &TriMesh,
    ) -> BackendResult<Self> {
        let caps = surface_caps(mesh);
        let buffers = create_buffers(backend, name, mesh)?;
        Ok(Self {
            name: name.to_string(),
            buffers,
            index_count: mesh.index_count() as u32,
            caps,
            material: Material::default(),
            textures: SurfaceTextures::default(),
        })
    }

    /// Upload geometry again. Create allocates fresh buffer identities
    /// (destroying the old ones); Update refills the existing identities
    /// in place.
    pub fn upload<B: GraphicsBackend>(
        &mut self,
        backend: &mut B,
        mesh: &TriMesh,
        mode: UploadMode,
    ) -> BackendResult<()> {
        self.caps = surface_caps(mesh);
        self.index_count = mesh.index_count() as u32;
        match mode {
            UploadMode::Create => {
                for channel in VertexChannel::ALL {
                    backend.destroy_buffer(self.buffers.channel(channel));
                }
                backend.destroy_buffer(self.buffers.index);
                self.buffers = create_buffers(backend, &self.name, mesh)?;
            }
            UploadMode::Update => {
                for channel in VertexChannel::ALL {
                    backend.write_buffer(self.buffers.channel(channel), &channel_bytes(mesh, channel))?;
                }
                backend.write_buffer(self.buffers.index, &index_bytes(mesh))?;
            }
        }
        Ok(())
    }

    /// Release the channel buffers. Texture handles are shared with
    /// other surfaces and stay alive.
    pub fn destroy<B: GraphicsBackend>(self, backend: &mut B) {
        for channel in VertexChannel::ALL {
            backend.destroy_buffer(self.buffers.channel(channel));
        }
        backend.destroy_buffer(self.buffers.index);
    }

    /// Build the canonical clip-space square used for every screen-space
    /// pass
    pub fn screen_quad<B: GraphicsBackend>(backend: &mut B) -> BackendResult<Self> {
        let mut mesh = TriMesh::default();
        mesh.positions = vec![
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
        ];
        mesh.normals = vec![Vec3::ONE; 4];
        mesh.uvs = quad_uvs();
        mesh.indices = quad_indices();
        Self::from_mesh(backend, "screen quad", &mesh)
    }

    /// Build the floor plane: an XZ quad with a half-edge of twice the
    /// scene radius, dropped slightly below the lowest mesh point so the
    /// two never z-fight
    pub fn floor_quad<B: GraphicsBackend>(
        backend: &mut B,
        center: Vec3,
        radius: f32,
        min_y: f32,
    ) -> BackendResult<Self> {
        let half_edge = radius * 2.0;
        let y = min_y - radius * 0.1;
        let mut mesh = TriMesh::default();
        mesh.positions = vec![
            Vec3::new(center.x - half_edge, y, center.z + half_edge),
            Vec3::new(center.x + half_edge, y, center.z + half_edge),
            Vec3::new(center.x + half_edge, y, center.z - half_edge),
            Vec3::new(center.x - half_edge, y, center.z - half_edge),
        ];
        mesh.normals = vec![Vec3::Y; 4];
        mesh.uvs = quad_uvs();
        mesh.indices = quad_indices();
        Self::from_mesh(backend, "floor", &mesh)
    }

    /// Build the skybox cube, sized far beyond the scene so the camera
    /// frustum always sits inside it, with inward-facing triangles
    pub fn skybox_cube<B: GraphicsBackend>(
        backend: &mut B,
        center: Vec3,
        radius: f32,
    ) -> BackendResult<Self> {
        let extent = radius * 13.0;
        let mut mesh = TriMesh::default();
        mesh.positions = [
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
        ]
        .iter()
        .map(|corner| center + *corner * extent)
        .collect();
        #[rustfmt::skip]
        let indices: [u32; 36] = [
            0, 1, 2,  2, 3, 0, // back
            7, 6, 5,  5, 4, 7, // front
            4, 5, 1,  1, 0, 4, // left
            3, 2, 6,  6, 7, 3, // right
            4, 0, 3,  3, 7, 4, // top
            1, 5, 6,  6, 2, 1, // bottom
        ];
        mesh.indices = indices.to_vec();
        Self::from_mesh(backend, "skybox", &mesh)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn caps(&self) -> SurfaceCaps {
        self.caps
    }

    /// Replace the material, returning any precondition violations. The
    /// material applies regardless; callers log the warnings and proceed.
    pub fn set_material(&mut self, material: Material) -> Vec<MaterialWarning> {
        let warnings = material.validate(&self.caps);
        self.material = material;
        warnings
    }

    fn bind_geometry<B: GraphicsBackend>(&self, backend: &mut B) {
        for channel in VertexChannel::ALL {
            backend.set_vertex_buffer(channel.slot(), self.buffers.channel(channel));
        }
        backend.set_index_buffer(self.buffers.index);
    }

    /// Lit-shaded draw with the full material, light, and per-effect flag
    /// set, reading up to seven texture units
    pub fn draw_lit<B: GraphicsBackend>(
        &self,
        backend: &mut B,
        program: ProgramHandle,
        params: &LitParams,
    ) -> BackendResult<()> {
        backend.set_program(program);
        backend.set_uniform(program, "u_matM", UniformValue::Mat4(params.model))?;
        backend.set_uniform(program, "u_matV", UniformValue::Mat4(params.view))?;
        backend.set_uniform(program, "u_matP", UniformValue::Mat4(params.proj))?;
        backend.set_uniform(
            program,
            "u_matPV_light",
            UniformValue::Mat4(params.light_view_proj),
        )?;
        backend.set_uniform(program, "u_lightPos", UniformValue::Vec3(params.light_pos))?;
        backend.set_uniform(program, "u_lightColor", UniformValue::Vec3(params.light_color))?;
        backend.set_uniform(program, "u_camPos", UniformValue::Vec3(params.cam_pos))?;
        backend.set_uniform(
            program,
            "u_distLightMax",
            UniformValue::Float(params.dist_light_max),
        )?;
        backend.set_uniform(
            program,
            "u_lightKind",
            UniformValue::Int(match params.light_kind {
                LightKind::Point => 0,
                LightKind::Directional => 1,
            }),
        )?;

        let material = &self.material;
        backend.set_uniform(program, "u_ambientColor", UniformValue::Vec3(material.ambient_color))?;
        backend.set_uniform(program, "u_diffuseColor", UniformValue::Vec3(material.diffuse_color))?;
        backend.set_uniform(
            program,
            "u_specularColor",
            UniformValue::Vec3(material.specular_color),
        )?;
        backend.set_uniform(
            program,
            "u_specularPower",
            UniformValue::Float(material.specular_power),
        )?;
        backend.set_uniform(program, "u_useAmbient", UniformValue::Bool(material.ambient_on))?;
        backend.set_uniform(program, "u_useDiffuse", UniformValue::Bool(material.diffuse_on))?;
        backend.set_uniform(program, "u_useSpecular", UniformValue::Bool(material.specular_on))?;
        backend.set_uniform(
            program,
            "u_useAlbedoTex",
            UniformValue::Bool(material.use_albedo_tex),
        )?;
        backend.set_uniform(
            program,
            "u_useNormalTex",
            UniformValue::Bool(material.use_normal_tex),
        )?;
        backend.set_uniform(program, "u_useMetalTex", UniformValue::Bool(material.use_metal_tex))?;
        backend.set_uniform(program, "u_useGlossTex", UniformValue::Bool(material.use_gloss_tex))?;
        backend.set_uniform(
            program,
            "u_useAmbientTex",
            UniformValue::Bool(material.use_ambient_tex),
        )?;
        backend.set_uniform(program, "u_useShadow", UniformValue::Bool(material.shadow_on))?;
        backend.set_uniform(
            program,
            "u_useSimTransmit",
            UniformValue::Bool(material.sim_transmit_on),
        )?;
        backend.set_uniform(program, "u_useTSD", UniformValue::Bool(material.tsd_on))?;
        backend.set_uniform(program, "u_useGamma", UniformValue::Bool(params.use_gamma))?;
        backend.set_uniform(
            program,
            "u_useEnvMap",
            UniformValue::Bool(material.env_map != EnvMapMode::Off),
        )?;
        backend.set_uniform(
            program,
            "u_envMapMode",
            UniformValue::Int(match material.env_map {
                EnvMapMode::Off => 0,
                EnvMapMode::Reflection => 1,
                EnvMapMode::Refraction => 2,
            }),
        )?;

        let units = [
            (texture_unit::ALBEDO, "u_albedoTex", self.textures.albedo),
            (texture_unit::NORMAL, "u_normalTex", self.textures.normal),
            (texture_unit::METAL, "u_metalTex", self.textures.metal),
            (texture_unit::GLOSS, "u_glossTex", self.textures.gloss),
            (texture_unit::AMBIENT, "u_ambientTex", self.textures.ambient),
            (texture_unit::CUBEMAP, "u_cubemapTex", self.textures.cubemap),
            (texture_unit::SHADOW, "u_shadowTex", self.textures.shadow),
        ];
        for (unit, slot, handle) in units {
            if let Some(texture) = handle {
                backend.bind_texture(unit, texture);
                backend.set_uniform(program, slot, UniformValue::Int(unit as i32))?;
            }
        }

        self.bind_geometry(backend);
        backend.draw_indexed(self.index_count);
        Ok(())
    }

    /// Depth-only draw from the light's point of view. The program takes
    /// the combined light view-projection and nothing else; geometry goes
    /// in untransformed.
    pub fn draw_depth_only<B: GraphicsBackend>(
        &self,
        backend: &mut B,
        program: ProgramHandle,
        light_view_proj: Mat4,
    ) -> BackendResult<()> {
        backend.set_program(program);
        backend.set_uniform(program, "u_matPV_light", UniformValue::Mat4(light_view_proj))?;
        self.bind_geometry(backend);
        backend.draw_indexed(self.index_count);
        Ok(())
    }

    /// Geometry draw into the position/normal/color attachments
    pub fn draw_gbuffer<B: GraphicsBackend>(
        &self,
        backend: &mut B,
        program: ProgramHandle,
        model: Mat4,
        view: Mat4,
        proj: Mat4,
    ) -> BackendResult<()> {
        backend.set_program(program);
        backend.set_uniform(program, "u_matM", UniformValue::Mat4(model))?;
        backend.set_uniform(program, "u_matV", UniformValue::Mat4(view))?;
        backend.set_uniform(program, "u_matP", UniformValue::Mat4(proj))?;
        self.bind_geometry(backend);
        backend.draw_indexed(self.index_count);
        Ok(())
    }

    /// Screen-quad draw of a texture, optionally as one direction of a
    /// separable blur
    pub fn draw_screen<B: GraphicsBackend>(
        &self,
        backend: &mut B,
        program: ProgramHandle,
        screen_tex: TextureHandle,
        params: &ScreenBlurParams,
    ) -> BackendResult<()> {
        backend.set_program(program);
        backend.bind_texture(texture_unit::ALBEDO, screen_tex);
        backend.set_uniform(program, "u_screenTex", UniformValue::Int(0))?;
        backend.set_uniform(program, "u_isBlurOn", UniformValue::Bool(params.blur_on))?;
        backend.set_uniform(program, "u_isFilterH", UniformValue::Bool(params.horizontal))?;
        backend.set_uniform(program, "u_filterSize", UniformValue::Int(params.filter_size))?;
        self.bind_geometry(backend);
        backend.draw_indexed(self.index_count);
        Ok(())
    }

    /// Ambient-occlusion generation from G-buffer position/normal data
    /// and the hemisphere sample kernel
    pub fn draw_ssao<B: GraphicsBackend>(
        &self,
        backend: &mut B,
        program: ProgramHandle,
        params: &SsaoParams,
    ) -> BackendResult<()> {
        backend.set_program(program);
        backend.bind_texture(0, params.noise_tex);
        backend.set_uniform(program, "u_noiseTex", UniformValue::Int(0))?;
        backend.bind_texture(1, params.position_tex);
        backend.set_uniform(program, "u_posTex", UniformValue::Int(1))?;
        backend.bind_texture(2, params.normal_tex);
        backend.set_uniform(program, "u_normalTex", UniformValue::Int(2))?;
        backend.set_uniform(program, "u_samples", UniformValue::Vec3Array(params.samples))?;
        backend.set_uniform(program, "u_radius", UniformValue::Float(params.radius))?;
        backend.set_uniform(
            program,
            "u_screenWidth",
            UniformValue::Float(params.screen_width as f32),
        )?;
        backend.set_uniform(
            program,
            "u_screenHeight",
            UniformValue::Float(params.screen_height as f32),
        )?;
        backend.set_uniform(program, "u_matP", UniformValue::Mat4(params.proj))?;
        self.bind_geometry(backend);
        backend.draw_indexed(self.index_count);
        Ok(())
    }

    /// Reflection generation from G-buffer data, the lit screen color,
    /// and the environment cubemap as ray-miss fallback
    pub fn draw_sslr<B: GraphicsBackend>(
        &self,
        backend: &mut B,
        program: ProgramHandle,
        params: &SslrParams,
    ) -> BackendResult<()> {
        backend.set_program(program);
        backend.bind_texture(0, params.noise_tex);
        backend.set_uniform(program, "u_noiseTex", UniformValue::Int(0))?;
        backend.bind_texture(1, params.position_tex);
        backend.set_uniform(program, "u_posTex", UniformValue::Int(1))?;
        backend.bind_texture(2, params.normal_tex);
        backend.set_uniform(program, "u_normalTex", UniformValue::Int(2))?;
        if let Some(cubemap) = params.cubemap {
            backend.bind_texture(3, cubemap);
            backend.set_uniform(program, "u_cubemapTex", UniformValue::Int(3))?;
        }
        backend.bind_texture(4, params.screen_tex);
        backend.set_uniform(program, "u_screenTex", UniformValue::Int(4))?;
        backend.set_uniform(program, "u_samples", UniformValue::Vec3Array(params.samples))?;
        backend.set_uniform(program, "u_radius", UniformValue::Float(params.radius))?;
        backend.set_uniform(
            program,
            "u_screenWidth",
            UniformValue::Float(params.screen_width as f32),
        )?;
        backend.set_uniform(
            program,
            "u_screenHeight",
            UniformValue::Float(params.screen_height as f32),
        )?;
        backend.set_uniform(program, "u_matV", UniformValue::Mat4(params.view))?;
        backend.set_uniform(program, "u_matP", UniformValue::Mat4(params.proj))?;
        self.bind_geometry(backend);
        backend.draw_indexed(self.index_count);
        Ok(())
    }

    /// Final composite of an occlusion or reflection texture over the
    /// lit color
    pub fn draw_composite<B: GraphicsBackend>(
        &self,
        backend: &mut B,
        program: ProgramHandle,
        params: &CompositeParams,
    ) -> BackendResult<()> {
        backend.set_program(program);
        backend.bind_texture(0, params.color_tex);
        backend.set_uniform(program, "u_colorTex", UniformValue::Int(0))?;
        backend.bind_texture(1, params.overlay_tex);
        backend.set_uniform(program, "u_aoTex", UniformValue::Int(1))?;
        backend.set_uniform(
            program,
            "u_occlusionType",
            UniformValue::Int(params.occlusion_type),
        )?;
        self.bind_geometry(backend);
        backend.draw_indexed(self.index_count);
        Ok(())
    }

    /// Flat-textured draw: the geometry rendered with a single texture
    /// and no lighting
    pub fn draw_textured<B: GraphicsBackend>(
        &self,
        backend: &mut B,
        program: ProgramHandle,
        screen_tex: TextureHandle,
        model: Mat4,
        view: Mat4,
        proj: Mat4,
    ) -> BackendResult<()> {
        backend.set_program(program);
        backend.bind_texture(texture_unit::ALBEDO, screen_tex);
        backend.set_uniform(program, "u_screenTex", UniformValue::Int(0))?;
        backend.set_uniform(program, "u_matM", UniformValue::Mat4(model))?;
        backend.set_uniform(program, "u_matV", UniformValue::Mat4(view))?;
        backend.set_uniform(program, "u_matP", UniformValue::Mat4(proj))?;
        self.bind_geometry(backend);
        backend.draw_indexed(self.index_count);
        Ok(())
    }

    /// Skybox draw with the translation-free view
    pub fn draw_skybox<B: GraphicsBackend>(
        &self,
        backend: &mut B,
        program: ProgramHandle,
        view: Mat4,
        proj: Mat4,
    ) -> BackendResult<()> {
        backend.set_program(program);
        backend.set_uniform(program, "u_matV", UniformValue::Mat4(view))?;
        backend.set_uniform(program, "u_matP", UniformValue::Mat4(proj))?;
        if let Some(cubemap) = self.textures.cubemap {
            backend.bind_texture(texture_unit::CUBEMAP, cubemap);
            backend.set_uniform(
                program,
                "u_cubemapTex",
                UniformValue::Int(texture_unit::CUBEMAP as i32),
            )?;
        }
        self.bind_geometry(backend);
        backend.draw_indexed(self.index_count);
        Ok(())
    }
}

fn surface_caps(mesh: &TriMesh) -> SurfaceCaps {
    SurfaceCaps {
        has_normals: mesh.has_normals(),
        has_colors: mesh.has_colors(),
        has_uvs: mesh.has_uvs(),
        has_tangents: mesh.has_tangents(),
        has_bitangents: mesh.has_bitangents(),
    }
}

fn quad_uvs() -> Vec<Vec2> {
    vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ]
}

fn quad_indices() -> Vec<u32> {
    vec![0, 1, 2, 2, 3, 0]
}

/// Bytes for one attribute channel, falling back to a single placeholder
/// element when the mesh lacks the channel
fn channel_bytes(mesh: &TriMesh, channel: VertexChannel) -> Vec<u8> {
    let vec3_or_placeholder = |data: &[Vec3]| -> Vec<u8> {
        if data.is_empty() {
            bytemuck::cast_slice(&[Vec3::ZERO]).to_vec()
        } else {
            bytemuck::cast_slice(data).to_vec()
        }
    };
    match channel {
        VertexChannel::Position => vec3_or_placeholder(&mesh.positions),
        VertexChannel::Normal => vec3_or_placeholder(&mesh.normals),
        VertexChannel::Color => vec3_or_placeholder(&mesh.colors),
        VertexChannel::Tangent => vec3_or_placeholder(&mesh.tangents),
        VertexChannel::Bitangent => vec3_or_placeholder(&mesh.bitangents),
        VertexChannel::Uv => {
            if mesh.uvs.is_empty() {
                bytemuck::cast_slice(&[Vec2::ZERO]).to_vec()
            } else {
                bytemuck::cast_slice(&mesh.uvs).to_vec()
            }
        }
    }
}

fn index_bytes(mesh: &TriMesh) -> Vec<u8> {
    if mesh.indices.is_empty() {
        bytemuck::cast_slice(&[0u32]).to_vec()
    } else {
        bytemuck::cast_slice(&mesh.indices).to_vec()
    }
}

fn create_buffers<B: GraphicsBackend>(
    backend: &mut B,
    name: &str,
    mesh: &TriMesh,
) -> BackendResult<ChannelBuffers> {
    let vertex_buffer = |backend: &mut B, channel: VertexChannel, suffix: &str| {
        backend.create_buffer(
            &BufferDescriptor {
                label: Some(format!("{name}.{suffix}")),
                usage: BufferUsage::VERTEX | BufferUsage::COPY_DST,
            },
            &channel_bytes(mesh, channel),
        )
    };
    Ok(ChannelBuffers {
        position: vertex_buffer(backend, VertexChannel::Position, "position")?,
        normal: vertex_buffer(backend, VertexChannel::Normal, "normal")?,
        color: vertex_buffer(backend, VertexChannel::Color, "color")?,
        uv: vertex_buffer(backend, VertexChannel::Uv, "uv")?,
        tangent: vertex_buffer(backend, VertexChannel::Tangent, "tangent")?,
        bitangent: vertex_buffer(backend, VertexChannel::Bitangent, "bitangent")?,
        index: backend.create_buffer(
            &BufferDescriptor {
                label: Some(format!("{name}.index")),
                usage: BufferUsage::INDEX | BufferUsage::COPY_DST,
            },
            &index_bytes(mesh),
        )?,
    })
}
