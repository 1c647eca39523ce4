//! Draw-surface tests over the headless backend

use glam::{Mat4, Vec2, Vec3};
use hybrid_renderer::backend::headless::OwnedUniform;
use hybrid_renderer::backend::{
    BufferUsage, GraphicsBackend, HeadlessBackend, ProgramHandle, TextureDescriptor,
    TextureFormat, TextureKind, VertexChannel,
};
use hybrid_renderer::pipeline::LightKind;
use hybrid_renderer::resources::{
    texture_unit, CompositeParams, CubemapData, DrawSurface, LitParams, Material, MaterialWarning,
    TextureData, TriMesh, UploadMode,
};

fn backend_with_program() -> (HeadlessBackend, ProgramHandle) {
    let mut backend = HeadlessBackend::new(64, 64).unwrap();
    let program = backend.create_program("test").unwrap();
    (backend, program)
}

fn tri_mesh() -> TriMesh {
    let mut mesh = TriMesh::default();
    mesh.positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
    mesh.indices = vec![0, 1, 2];
    mesh
}

fn quad_mesh() -> TriMesh {
    let mut mesh = TriMesh::default();
    mesh.positions = vec![
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(-1.0, 1.0, 0.0),
    ];
    mesh.uvs = vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];
    mesh.indices = vec![0, 1, 2, 2, 3, 0];
    mesh.compute_tangent_basis();
    mesh
}

fn lit_params() -> LitParams {
    LitParams {
        model: Mat4::IDENTITY,
        view: Mat4::look_at_rh(Vec3::new(0.0, 2.0, 5.0), Vec3::ZERO, Vec3::Y),
        proj: Mat4::perspective_rh(45.0_f32.to_radians(), 1.0, 0.1, 100.0),
        light_view_proj: Mat4::IDENTITY,
        light_pos: Vec3::new(0.0, 4.0, 0.0),
        light_color: Vec3::ONE,
        cam_pos: Vec3::new(0.0, 2.0, 5.0),
        dist_light_max: 8.0,
        light_kind: LightKind::Point,
        use_gamma: true,
    }
}

/// Reassemble a recorded byte buffer into floats regardless of alignment
fn floats(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(bytemuck::pod_read_unaligned::<f32>)
        .collect()
}

#[test]
fn surface_binds_one_buffer_per_channel() {
    let (mut backend, program) = backend_with_program();
    let mut mesh = tri_mesh();
    mesh.uvs = vec![Vec2::ZERO, Vec2::X, Vec2::Y];
    let surface = DrawSurface::from_mesh(&mut backend, "bare", &mesh).unwrap();
    surface
        .draw_depth_only(&mut backend, program, Mat4::IDENTITY)
        .unwrap();

    for channel in VertexChannel::ALL {
        assert!(backend.vertex_slot(channel.slot()).is_some());
    }

    let position = backend.vertex_slot(VertexChannel::Position.slot()).unwrap();
    assert_eq!(backend.buffer_contents(position).unwrap().len(), 3 * 12);
    assert_eq!(backend.buffer_label(position), Some("bare.position"));
    assert!(backend
        .buffer_usage(position)
        .unwrap()
        .contains(BufferUsage::VERTEX));

    let uv = backend.vertex_slot(VertexChannel::Uv.slot()).unwrap();
    assert_eq!(backend.buffer_contents(uv).unwrap().len(), 3 * 8);

    // Channels the geometry lacks get a single placeholder element
    let normal = backend.vertex_slot(VertexChannel::Normal.slot()).unwrap();
    assert_eq!(backend.buffer_contents(normal).unwrap().len(), 12);
    let tangent = backend.vertex_slot(VertexChannel::Tangent.slot()).unwrap();
    assert_eq!(backend.buffer_contents(tangent).unwrap().len(), 12);
}

#[test]
fn update_upload_keeps_buffer_identities() {
    let (mut backend, program) = backend_with_program();
    let mut surface = DrawSurface::from_mesh(&mut backend, "swap", &tri_mesh()).unwrap();
    surface
        .draw_depth_only(&mut backend, program, Mat4::IDENTITY)
        .unwrap();
    let position = backend.vertex_slot(VertexChannel::Position.slot()).unwrap();
    let uv = backend.vertex_slot(VertexChannel::Uv.slot()).unwrap();
    assert_eq!(backend.buffer_contents(position).unwrap().len(), 3 * 12);
    assert_eq!(backend.buffer_contents(uv).unwrap().len(), 8);

    surface
        .upload(&mut backend, &quad_mesh(), UploadMode::Update)
        .unwrap();
    surface
        .draw_depth_only(&mut backend, program, Mat4::IDENTITY)
        .unwrap();

    // Same identities, refilled contents; the placeholder UV channel
    // grew into a real one without rebinding
    assert_eq!(backend.vertex_slot(VertexChannel::Position.slot()), Some(position));
    assert_eq!(backend.vertex_slot(VertexChannel::Uv.slot()), Some(uv));
    assert_eq!(backend.buffer_contents(position).unwrap().len(), 4 * 12);
    assert_eq!(backend.buffer_contents(uv).unwrap().len(), 4 * 8);
    assert_eq!(surface.index_count(), 6);
}

#[test]
fn create_upload_allocates_fresh_buffers() {
    let (mut backend, program) = backend_with_program();
    let mut surface = DrawSurface::from_mesh(&mut backend, "swap", &tri_mesh()).unwrap();
    surface
        .draw_depth_only(&mut backend, program, Mat4::IDENTITY)
        .unwrap();
    let stale = backend.vertex_slot(VertexChannel::Position.slot()).unwrap();

    surface
        .upload(&mut backend, &quad_mesh(), UploadMode::Create)
        .unwrap();
    surface
        .draw_depth_only(&mut backend, program, Mat4::IDENTITY)
        .unwrap();

    let fresh = backend.vertex_slot(VertexChannel::Position.slot()).unwrap();
    assert_ne!(fresh, stale);
    assert!(backend.buffer_contents(stale).is_none());
    assert_eq!(backend.buffer_contents(fresh).unwrap().len(), 4 * 12);
}

#[test]
fn screen_quad_covers_clip_space() {
    let (mut backend, program) = backend_with_program();
    let quad = DrawSurface::screen_quad(&mut backend).unwrap();
    assert_eq!(quad.index_count(), 6);
    quad.draw_depth_only(&mut backend, program, Mat4::IDENTITY)
        .unwrap();

    let buffer = backend.vertex_slot(VertexChannel::Position.slot()).unwrap();
    let positions = floats(backend.buffer_contents(buffer).unwrap());
    assert_eq!(
        positions,
        vec![-1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 1.0, 1.0, 0.0, -1.0, 1.0, 0.0]
    );
}

#[test]
fn floor_quad_sits_below_the_scene() {
    let (mut backend, program) = backend_with_program();
    let floor =
        DrawSurface::floor_quad(&mut backend, Vec3::new(1.0, 0.0, 2.0), 2.0, -1.0).unwrap();
    floor
        .draw_depth_only(&mut backend, program, Mat4::IDENTITY)
        .unwrap();

    let buffer = backend.vertex_slot(VertexChannel::Position.slot()).unwrap();
    let positions = floats(backend.buffer_contents(buffer).unwrap());
    assert_eq!(positions.len(), 12);

    // Half-edge is twice the radius, centered on the scene
    assert_eq!(positions[0], -3.0);
    assert_eq!(positions[2], 6.0);
    // Dropped a tenth of the radius under the lowest mesh point
    for corner in positions.chunks_exact(3) {
        assert!((corner[1] + 1.2).abs() < 1e-6);
    }

    let buffer = backend.vertex_slot(VertexChannel::Normal.slot()).unwrap();
    let normals = floats(backend.buffer_contents(buffer).unwrap());
    assert_eq!(normals, [0.0, 1.0, 0.0].repeat(4));
}

#[test]
fn skybox_cube_spans_far_beyond_the_scene() {
    let (mut backend, program) = backend_with_program();
    let skybox = DrawSurface::skybox_cube(&mut backend, Vec3::ZERO, 2.0).unwrap();
    assert_eq!(skybox.index_count(), 36);
    skybox
        .draw_depth_only(&mut backend, program, Mat4::IDENTITY)
        .unwrap();

    let buffer = backend.vertex_slot(VertexChannel::Position.slot()).unwrap();
    let positions = floats(backend.buffer_contents(buffer).unwrap());
    assert_eq!(positions.len(), 8 * 3);
    assert!(positions.iter().all(|c| c.abs() == 26.0));
}

#[test]
fn default_material_shading_constants() {
    let material = Material::default();
    assert_eq!(material.ambient_color, Vec3::new(0.0, 0.0, 0.1));
    assert_eq!(material.diffuse_color, Vec3::new(0.95, 0.5, 0.25));
    assert_eq!(material.specular_color, Vec3::new(0.0, 0.8, 0.0));
    assert_eq!(material.specular_power, 128.0);
    assert!(material.ambient_on && material.diffuse_on && material.specular_on);
    assert!(!material.shadow_on);
    assert!(!material.tsd_on);

    let tuned = Material::new().with_specular(Vec3::ONE, 32.0);
    assert_eq!(tuned.specular_color, Vec3::ONE);
    assert_eq!(tuned.specular_power, 32.0);
}

#[test]
fn material_validation_reports_missing_attributes() {
    let (mut backend, _) = backend_with_program();
    let mut surface = DrawSurface::from_mesh(&mut backend, "bare", &tri_mesh()).unwrap();

    let mut wanted = Material::default();
    wanted.use_albedo_tex = true;
    wanted.use_normal_tex = true;
    let warnings = surface.set_material(wanted);

    assert!(warnings.contains(&MaterialWarning::MapWithoutUv { map: "albedo" }));
    assert!(warnings.contains(&MaterialWarning::MapWithoutUv { map: "normal" }));
    assert!(warnings.contains(&MaterialWarning::NormalMapWithoutTangents));
    assert!(warnings.contains(&MaterialWarning::ShadingWithoutNormals { term: "diffuse" }));
    assert!(warnings.contains(&MaterialWarning::ShadingWithoutNormals { term: "specular" }));

    // Warnings do not block: the material is installed as given
    assert!(surface.material.use_albedo_tex);

    // A surface with the full attribute set accepts the default quietly
    let mut complete = DrawSurface::from_mesh(&mut backend, "complete", &quad_mesh()).unwrap();
    assert!(complete.set_material(Material::default()).is_empty());
}

#[test]
fn lit_draw_issues_one_indexed_draw() {
    let (mut backend, program) = backend_with_program();
    let surface = DrawSurface::from_mesh(&mut backend, "mesh", &quad_mesh()).unwrap();
    surface.draw_lit(&mut backend, program, &lit_params()).unwrap();

    let draws = backend.draws();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].index_count, 6);
    assert_eq!(draws[0].program, Some(program));

    assert_eq!(
        backend.uniform(program, "u_diffuseColor"),
        Some(&OwnedUniform::Vec3(Vec3::new(0.95, 0.5, 0.25)))
    );
    assert_eq!(
        backend.uniform(program, "u_lightKind"),
        Some(&OwnedUniform::Int(0))
    );
    assert_eq!(
        backend.uniform(program, "u_useGamma"),
        Some(&OwnedUniform::Bool(true))
    );
    assert_eq!(
        backend.uniform(program, "u_distLightMax"),
        Some(&OwnedUniform::Float(8.0))
    );
}

#[test]
fn lit_draw_binds_only_wired_textures() {
    let (mut backend, program) = backend_with_program();
    let mut surface = DrawSurface::from_mesh(&mut backend, "mesh", &quad_mesh()).unwrap();
    surface.draw_lit(&mut backend, program, &lit_params()).unwrap();
    assert_eq!(backend.bound_texture(texture_unit::SHADOW), None);
    assert_eq!(backend.bound_texture(texture_unit::ALBEDO), None);

    let shadow_map = backend
        .create_texture(
            &TextureDescriptor {
                label: Some("shadow.depth".to_string()),
                width: 4,
                height: 4,
                format: TextureFormat::Depth32Float,
                ..TextureDescriptor::default()
            },
            None,
        )
        .unwrap();
    surface.textures.shadow = Some(shadow_map);
    surface.draw_lit(&mut backend, program, &lit_params()).unwrap();

    assert_eq!(backend.bound_texture(texture_unit::SHADOW), Some(shadow_map));
    assert_eq!(
        backend.uniform(program, "u_shadowTex"),
        Some(&OwnedUniform::Int(texture_unit::SHADOW as i32))
    );
    assert_eq!(backend.bound_texture(texture_unit::ALBEDO), None);
}

#[test]
fn solid_color_textures_upload_as_single_texels() {
    let (mut backend, _) = backend_with_program();
    let white = TextureData::white().upload(&mut backend).unwrap();
    let desc = backend.texture_descriptor(white).unwrap();
    assert_eq!((desc.width, desc.height), (1, 1));
    assert_eq!(desc.format, TextureFormat::Rgba8Unorm);
    assert_eq!(backend.texture_data_len(white), Some(4));
}

#[test]
fn missing_cubemap_faces_degrade_instead_of_failing() {
    let (mut backend, _) = backend_with_program();
    let dir = std::env::temp_dir().join("hybrid-renderer-no-such-cubemap");
    let cubemap = CubemapData::load(&dir, "jpg");
    assert!(!cubemap.is_valid);

    // A handle still comes out, zero-filled across all six faces
    let handle = cubemap.upload(&mut backend).unwrap();
    assert_eq!(backend.texture_data_len(handle), Some(6 * 4));
    assert_eq!(
        backend.texture_descriptor(handle).unwrap().kind,
        TextureKind::Cube
    );
}

#[test]
fn composite_draw_carries_the_occlusion_type() {
    let (mut backend, program) = backend_with_program();
    let quad = DrawSurface::screen_quad(&mut backend).unwrap();
    let plain = TextureDescriptor {
        width: 4,
        height: 4,
        format: TextureFormat::Rgba16Float,
        ..TextureDescriptor::default()
    };
    let color = backend.create_texture(&plain, None).unwrap();
    let overlay = backend.create_texture(&plain, None).unwrap();

    quad.draw_composite(
        &mut backend,
        program,
        &CompositeParams {
            color_tex: color,
            overlay_tex: overlay,
            occlusion_type: 2,
        },
    )
    .unwrap();

    assert_eq!(backend.bound_texture(0), Some(color));
    assert_eq!(backend.bound_texture(1), Some(overlay));
    assert_eq!(
        backend.uniform(program, "u_occlusionType"),
        Some(&OwnedUniform::Int(2))
    );
}
