//! Frame-level pass sequencing tests
//!
//! Each test assembles the full rig (scene, targets, programs, kernel,
//! surfaces) over the headless backend, runs one frame under a flag
//! combination, and checks the recorded command stream.

use glam::{Vec2, Vec3};
use hybrid_renderer::backend::headless::{Command, OwnedUniform};
use hybrid_renderer::backend::{
    AddressMode, BackendError, DepthAttachment, GraphicsBackend, HeadlessBackend,
    RenderTargetDescriptor, RenderTargetHandle, TextureDescriptor, TextureFormat,
};
use hybrid_renderer::pipeline::ssao_pass::{build_samples, KERNEL_SIZE, NOISE_DIM};
use hybrid_renderer::pipeline::{
    EnvMapMode, FeatureFlags, FrameState, PassContext, PassSequencer, ProgramSet, RenderTargetSet,
    SampleKernel, SceneSurfaces,
};
use hybrid_renderer::resources::TriMesh;
use hybrid_renderer::scene::Scene;

const WINDOW_W: u32 = 1024;
const WINDOW_H: u32 = 720;
const RESOLUTION: u32 = 512;

fn unit_quad_mesh() -> TriMesh {
    let mut mesh = TriMesh::default();
    mesh.positions = vec![
        Vec3::new(-1.0, 0.0, -1.0),
        Vec3::new(1.0, 0.0, -1.0),
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(-1.0, 0.0, 1.0),
    ];
    mesh.uvs = vec![Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
    mesh.indices = vec![0, 1, 2, 2, 3, 0];
    mesh.compute_tangent_basis();
    mesh
}

fn cube_mesh() -> TriMesh {
    let mut mesh = TriMesh::default();
    mesh.positions = vec![
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, 1.0, 1.0),
    ];
    #[rustfmt::skip]
    let indices: [u32; 36] = [
        0, 2, 1,  0, 3, 2,
        4, 5, 6,  4, 6, 7,
        0, 4, 7,  0, 7, 3,
        1, 2, 6,  1, 6, 5,
        3, 7, 6,  3, 6, 2,
        0, 1, 5,  0, 5, 4,
    ];
    mesh.indices = indices.to_vec();
    mesh.compute_vertex_normals();
    mesh
}

struct Rig {
    backend: HeadlessBackend,
    scene: Scene,
    targets: RenderTargetSet,
    programs: ProgramSet,
    kernel: SampleKernel,
    surfaces: SceneSurfaces,
    sequencer: PassSequencer<HeadlessBackend>,
}

impl Rig {
    fn new() -> Self {
        let mut backend = HeadlessBackend::new(WINDOW_W, WINDOW_H).unwrap();
        let mut scene = Scene::new(WINDOW_W, WINDOW_H);
        scene.replace_mesh(unit_quad_mesh());
        let targets = RenderTargetSet::create(&mut backend, RESOLUTION).unwrap();
        let programs = ProgramSet::create(&mut backend).unwrap();
        let kernel = SampleKernel::create(&mut backend).unwrap();
        let surfaces =
            SceneSurfaces::create(&mut backend, &scene, targets.shadow.depth_tex).unwrap();
        Rig {
            backend,
            scene,
            targets,
            programs,
            kernel,
            surfaces,
            sequencer: PassSequencer::new(),
        }
    }

    fn run(&mut self, flags: FeatureFlags) {
        self.run_with_blur(flags, 2);
    }

    fn run_with_blur(&mut self, flags: FeatureFlags, blur_width: i32) {
        self.surfaces.apply_flags(&flags);
        let frame = FrameState::capture(&self.scene, flags, WINDOW_W, WINDOW_H, blur_width);
        let ctx = PassContext {
            frame: &frame,
            targets: &self.targets,
            surfaces: &self.surfaces,
            programs: &self.programs,
            kernel: &self.kernel,
        };
        self.sequencer.run_frame(&mut self.backend, &ctx).unwrap();
    }

    fn clear_colors_on(&self, target: Option<RenderTargetHandle>) -> Vec<[f32; 4]> {
        self.backend
            .commands()
            .iter()
            .filter_map(|command| match command {
                Command::Clear {
                    target: cleared,
                    color: Some(color),
                    ..
                } if *cleared == target => Some(*color),
                _ => None,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Pass gating
// ---------------------------------------------------------------------------

#[test]
fn bare_frame_never_leaves_the_window() {
    let mut rig = Rig::new();
    rig.run(FeatureFlags::default());

    assert!(!rig.backend.bound_any_offscreen_target());
    assert_eq!(rig.backend.bound_render_target(), None);
    assert_eq!(rig.backend.frame_count(), 1);

    // Lit mesh plus lit floor, nothing else
    let draws = rig.backend.draws();
    assert_eq!(draws.len(), 2);
    assert!(draws
        .iter()
        .all(|d| d.program == Some(rig.programs.lighting) && d.target.is_none()));
}

#[test]
fn active_stages_follow_the_flags() {
    let rig = Rig::new();
    assert_eq!(
        rig.sequencer.active_stage_names(&FeatureFlags::default()),
        vec!["lighting"]
    );

    let everything = FeatureFlags {
        shadow_on: true,
        tsd_on: true,
        ssao_on: true,
        sslr_on: true,
        ..FeatureFlags::default()
    };
    assert_eq!(
        rig.sequencer.active_stage_names(&everything),
        vec!["shadow", "gbuffer", "lighting", "tsd", "ssao", "sslr"]
    );

    // Transmittance needs the depth map even with shadows off
    let transmit = FeatureFlags {
        sim_transmit_on: true,
        ..FeatureFlags::default()
    };
    assert_eq!(
        rig.sequencer.active_stage_names(&transmit),
        vec!["shadow", "lighting"]
    );
}

#[test]
fn shadow_pass_draws_mesh_and_floor() {
    let mut rig = Rig::new();
    rig.run(FeatureFlags {
        shadow_on: true,
        ..FeatureFlags::default()
    });

    let shadow_draws = rig.backend.draws_into(Some(rig.targets.shadow.target));
    assert_eq!(shadow_draws.len(), 2);
    for draw in &shadow_draws {
        assert_eq!(draw.program, Some(rig.programs.shadow));
        assert_eq!(draw.viewport, (0, 0, RESOLUTION, RESOLUTION));
    }

    let mut rig = Rig::new();
    rig.run(FeatureFlags {
        shadow_on: true,
        floor_on: false,
        ..FeatureFlags::default()
    });
    assert_eq!(
        rig.backend.draws_into(Some(rig.targets.shadow.target)).len(),
        1
    );
}

#[test]
fn gbuffer_pass_draws_only_the_mesh() {
    let mut rig = Rig::new();
    rig.run(FeatureFlags {
        ssao_on: true,
        ..FeatureFlags::default()
    });

    let gbuffer_draws = rig.backend.draws_into(Some(rig.targets.gbuffer.target));
    assert_eq!(gbuffer_draws.len(), 1);
    assert_eq!(gbuffer_draws[0].program, Some(rig.programs.gbuffer));
    assert_eq!(gbuffer_draws[0].index_count, 6);
}

#[test]
fn disabled_effects_leave_their_targets_untouched() {
    let mut rig = Rig::new();
    rig.run(FeatureFlags {
        ssao_on: true,
        ..FeatureFlags::default()
    });

    assert!(rig.backend.draws_into(Some(rig.targets.shadow.target)).is_empty());
    assert!(rig.backend.draws_into(Some(rig.targets.tsd.target)).is_empty());
    assert!(rig.backend.draws_into(Some(rig.targets.sslr.target)).is_empty());
    assert!(rig.backend.draws_into(Some(rig.targets.blur2.target)).is_empty());
}

// ---------------------------------------------------------------------------
// Lighting routing
// ---------------------------------------------------------------------------

#[test]
fn lighting_routes_to_the_consumers_target() {
    // Alone it shades straight into the window
    let mut rig = Rig::new();
    rig.run(FeatureFlags::default());
    assert_eq!(rig.backend.draws_into(None).len(), 2);

    // A screen-space effect downstream holds it on the screen target
    let mut rig = Rig::new();
    rig.run(FeatureFlags {
        ssao_on: true,
        ..FeatureFlags::default()
    });
    let screen_draws = rig.backend.draws_into(Some(rig.targets.screen.target));
    assert_eq!(screen_draws.len(), 2);
    assert!(screen_draws
        .iter()
        .all(|d| d.program == Some(rig.programs.lighting)));

    // Diffusion reroutes it into UV space, without the floor
    let mut rig = Rig::new();
    rig.run(FeatureFlags {
        tsd_on: true,
        ..FeatureFlags::default()
    });
    let lit_tsd: Vec<_> = rig
        .backend
        .draws_into(Some(rig.targets.tsd.target))
        .into_iter()
        .filter(|d| d.program == Some(rig.programs.lighting))
        .collect();
    assert_eq!(lit_tsd.len(), 1);
}

#[test]
fn tsd_blurs_in_place_then_redraws_the_scene() {
    let mut rig = Rig::new();
    rig.run_with_blur(
        FeatureFlags {
            tsd_on: true,
            ..FeatureFlags::default()
        },
        5,
    );

    // Lit mesh in UV space, then the two blur directions over it
    let tsd_draws = rig.backend.draws_into(Some(rig.targets.tsd.target));
    assert_eq!(tsd_draws.len(), 3);
    let blur_draws: Vec<_> = tsd_draws
        .iter()
        .filter(|d| d.program == Some(rig.programs.quad))
        .collect();
    assert_eq!(blur_draws.len(), 2);
    assert_eq!(
        rig.backend.uniform(rig.programs.quad, "u_filterSize"),
        Some(&OwnedUniform::Int(5))
    );
    assert_eq!(
        rig.backend.uniform(rig.programs.quad, "u_isFilterH"),
        Some(&OwnedUniform::Bool(false))
    );

    // The redraw on the window: flat-textured mesh plus the lit floor
    let window_draws = rig.backend.draws_into(None);
    assert_eq!(window_draws.len(), 2);
    assert!(window_draws
        .iter()
        .any(|d| d.program == Some(rig.programs.flat_texture)));
    assert!(window_draws
        .iter()
        .any(|d| d.program == Some(rig.programs.lighting)));
    assert_eq!(rig.backend.bound_render_target(), None);
}

// ---------------------------------------------------------------------------
// Screen-space effects
// ---------------------------------------------------------------------------

#[test]
fn ssao_generation_reads_window_dimensions() {
    let mut rig = Rig::new();
    rig.run(FeatureFlags {
        ssao_on: true,
        ..FeatureFlags::default()
    });

    let ssao_draws = rig.backend.draws_into(Some(rig.targets.ssao.target));
    assert_eq!(ssao_draws[0].program, Some(rig.programs.ssao));
    assert_eq!(ssao_draws[0].viewport, (0, 0, RESOLUTION, RESOLUTION));

    // The shader derives its texel steps from the window, not the target
    assert_eq!(
        rig.backend.uniform(rig.programs.ssao, "u_screenWidth"),
        Some(&OwnedUniform::Float(WINDOW_W as f32))
    );
    assert_eq!(
        rig.backend.uniform(rig.programs.ssao, "u_screenHeight"),
        Some(&OwnedUniform::Float(WINDOW_H as f32))
    );
}

#[test]
fn ssao_composites_to_the_window_when_alone() {
    let mut rig = Rig::new();
    rig.run(FeatureFlags {
        ssao_on: true,
        ..FeatureFlags::default()
    });

    let composites: Vec<_> = rig
        .backend
        .draws()
        .into_iter()
        .filter(|d| d.program == Some(rig.programs.composite))
        .collect();
    assert_eq!(composites.len(), 1);
    assert_eq!(composites[0].target, None);
    assert_eq!(
        rig.backend.uniform(rig.programs.composite, "u_occlusionType"),
        Some(&OwnedUniform::Int(1))
    );

    // Blurred occlusion on unit 1 over the lit color on unit 0
    assert_eq!(rig.backend.bound_texture(0), Some(rig.targets.screen.color_tex));
    assert_eq!(rig.backend.bound_texture(1), Some(rig.targets.blur.color_tex));
    assert_eq!(rig.backend.viewport(), (0, 0, WINDOW_W, WINDOW_H));
}

#[test]
fn ssao_composite_feeds_the_reflection_pass() {
    let mut rig = Rig::new();
    rig.run(FeatureFlags {
        ssao_on: true,
        sslr_on: true,
        ..FeatureFlags::default()
    });

    // First composite lands back on the SSAO target, the final one on
    // the window with the occluded color as its base
    let composites: Vec<_> = rig
        .backend
        .draws()
        .into_iter()
        .filter(|d| d.program == Some(rig.programs.composite))
        .collect();
    assert_eq!(composites.len(), 2);
    assert_eq!(composites[0].target, Some(rig.targets.ssao.target));
    assert_eq!(composites[1].target, None);

    assert_eq!(
        rig.backend.uniform(rig.programs.composite, "u_occlusionType"),
        Some(&OwnedUniform::Int(2))
    );
    assert_eq!(rig.backend.bound_texture(0), Some(rig.targets.ssao.color_tex));
    assert_eq!(rig.backend.bound_texture(1), Some(rig.targets.blur2.color_tex));
}

#[test]
fn reflections_fall_back_to_the_lit_color_without_ssao() {
    let mut rig = Rig::new();
    rig.run(FeatureFlags {
        sslr_on: true,
        ..FeatureFlags::default()
    });

    let composites: Vec<_> = rig
        .backend
        .draws()
        .into_iter()
        .filter(|d| d.program == Some(rig.programs.composite))
        .collect();
    assert_eq!(composites.len(), 1);
    assert_eq!(composites[0].target, None);
    assert_eq!(rig.backend.bound_texture(0), Some(rig.targets.screen.color_tex));
    assert_eq!(
        rig.backend.uniform(rig.programs.composite, "u_occlusionType"),
        Some(&OwnedUniform::Int(2))
    );
}

#[test]
fn full_effect_frame_ends_on_the_window() {
    let mut rig = Rig::new();
    rig.run(FeatureFlags {
        shadow_on: true,
        sim_transmit_on: true,
        tsd_on: true,
        ssao_on: true,
        sslr_on: true,
        env_map: EnvMapMode::Reflection,
        ..FeatureFlags::default()
    });

    for target in [
        rig.targets.shadow.target,
        rig.targets.gbuffer.target,
        rig.targets.screen.target,
        rig.targets.tsd.target,
        rig.targets.ssao.target,
        rig.targets.sslr.target,
        rig.targets.blur.target,
        rig.targets.blur2.target,
    ] {
        assert!(!rig.backend.draws_into(Some(target)).is_empty());
    }

    assert_eq!(rig.backend.bound_render_target(), None);
    assert_eq!(rig.backend.viewport(), (0, 0, WINDOW_W, WINDOW_H));
    assert_eq!(rig.backend.frame_count(), 1);
}

// ---------------------------------------------------------------------------
// Clears
// ---------------------------------------------------------------------------

#[test]
fn background_clear_follows_the_white_flag() {
    let mut rig = Rig::new();
    rig.run(FeatureFlags::default());
    assert_eq!(rig.clear_colors_on(None), vec![[0.0, 0.0, 0.0, 0.0]]);

    let mut rig = Rig::new();
    rig.run(FeatureFlags {
        background_white: true,
        ..FeatureFlags::default()
    });
    assert_eq!(rig.clear_colors_on(None), vec![[1.0, 1.0, 1.0, 0.0]]);
}

#[test]
fn occlusion_clears_stay_white_on_the_window() {
    let mut rig = Rig::new();
    rig.run(FeatureFlags {
        ssao_on: true,
        ..FeatureFlags::default()
    });

    // The frame background went to the off-screen lighting target; the
    // window clear before the composite is the occlusion white
    assert_eq!(
        rig.clear_colors_on(Some(rig.targets.screen.target)),
        vec![[0.0, 0.0, 0.0, 0.0]]
    );
    assert_eq!(rig.clear_colors_on(None), vec![[1.0, 1.0, 1.0, 1.0]]);
}

// ---------------------------------------------------------------------------
// Sampling kernel
// ---------------------------------------------------------------------------

#[test]
fn kernel_samples_are_deterministic_and_bounded() {
    let samples = build_samples();
    assert_eq!(samples.len(), KERNEL_SIZE);
    assert_eq!(samples, build_samples());
    for sample in &samples {
        assert!(sample.length() <= 1.0 + 1e-6);
        assert!(sample.z >= 0.0);
    }
}

#[test]
fn noise_texture_is_a_tiled_float_grid() {
    let mut backend = HeadlessBackend::new(WINDOW_W, WINDOW_H).unwrap();
    let kernel = SampleKernel::create(&mut backend).unwrap();

    let desc = backend.texture_descriptor(kernel.noise_tex).unwrap();
    assert_eq!((desc.width, desc.height), (NOISE_DIM, NOISE_DIM));
    assert_eq!(desc.format, TextureFormat::Rgba32Float);
    assert_eq!(desc.address_mode, AddressMode::Repeat);
    assert_eq!(
        backend.texture_data_len(kernel.noise_tex),
        Some((NOISE_DIM * NOISE_DIM * 16) as usize)
    );
}

// ---------------------------------------------------------------------------
// Target completeness
// ---------------------------------------------------------------------------

#[test]
fn incomplete_render_targets_are_rejected() {
    let mut backend = HeadlessBackend::new(64, 64).unwrap();
    let color = backend
        .create_texture(
            &TextureDescriptor {
                width: 64,
                height: 64,
                format: TextureFormat::Rgba16Float,
                ..TextureDescriptor::default()
            },
            None,
        )
        .unwrap();

    // Attachment extent must match the target extent
    let mismatched = backend.create_render_target(&RenderTargetDescriptor {
        width: 32,
        height: 32,
        color_attachments: vec![color],
        ..RenderTargetDescriptor::default()
    });
    assert!(matches!(
        mismatched,
        Err(BackendError::IncompleteRenderTarget { .. })
    ));

    // A color format cannot serve as the depth attachment
    let bad_depth = backend.create_render_target(&RenderTargetDescriptor {
        width: 64,
        height: 64,
        depth_attachment: DepthAttachment::Texture(color),
        ..RenderTargetDescriptor::default()
    });
    assert!(matches!(
        bad_depth,
        Err(BackendError::IncompleteRenderTarget { .. })
    ));

    // No attachments at all
    let empty = backend.create_render_target(&RenderTargetDescriptor {
        width: 64,
        height: 64,
        ..RenderTargetDescriptor::default()
    });
    assert!(matches!(
        empty,
        Err(BackendError::IncompleteRenderTarget { .. })
    ));

    // The well-formed variant goes through
    let depth = backend
        .create_texture(
            &TextureDescriptor {
                width: 64,
                height: 64,
                format: TextureFormat::Depth32Float,
                ..TextureDescriptor::default()
            },
            None,
        )
        .unwrap();
    let complete = backend.create_render_target(&RenderTargetDescriptor {
        width: 64,
        height: 64,
        color_attachments: vec![color],
        depth_attachment: DepthAttachment::Texture(depth),
        ..RenderTargetDescriptor::default()
    });
    assert!(complete.is_ok());
}

// ---------------------------------------------------------------------------
// Reload
// ---------------------------------------------------------------------------

#[test]
fn mesh_reload_refits_the_frame() {
    let mut rig = Rig::new();
    let flags = FeatureFlags {
        ssao_on: true,
        ..FeatureFlags::default()
    };
    rig.run(flags);
    assert_eq!(
        rig.backend.draws_into(Some(rig.targets.gbuffer.target))[0].index_count,
        6
    );

    // Swap in denser geometry mid-session and render again
    rig.scene.replace_mesh(cube_mesh());
    rig.surfaces.replace_mesh(&mut rig.backend, &rig.scene).unwrap();
    rig.backend.reset_commands();
    rig.run(flags);
    assert_eq!(
        rig.backend.draws_into(Some(rig.targets.gbuffer.target))[0].index_count,
        36
    );
    assert_eq!(rig.backend.frame_count(), 2);
}
