//! Headless pipeline demo
//!
//! Loads a mesh, switches on the requested effects, and drives the pass
//! sequencer for a number of frames over the state-tracking backend.
//! Useful for checking which passes a flag combination activates and
//! what the recorded command stream looks like.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use glam::Vec3;
use log::{debug, error, info, warn};

use hybrid_renderer::backend::{GraphicsBackend, HeadlessBackend};
use hybrid_renderer::pipeline::{
    EnvMapMode, FeatureFlags, FrameState, LightKind, PassContext, PassSequencer, ProgramSet,
    RenderTargetSet, SampleKernel, SceneSurfaces,
};
use hybrid_renderer::resources::{CubemapData, TriMesh};
use hybrid_renderer::scene::Scene;
use hybrid_renderer::RendererConfig;

#[derive(Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum EnvArg {
    #[default]
    Off,
    Reflection,
    Refraction,
}

impl From<EnvArg> for EnvMapMode {
    fn from(arg: EnvArg) -> Self {
        match arg {
            EnvArg::Off => EnvMapMode::Off,
            EnvArg::Reflection => EnvMapMode::Reflection,
            EnvArg::Refraction => EnvMapMode::Refraction,
        }
    }
}

#[derive(Parser)]
#[command(about = "Drive the hybrid render pipeline headlessly for a number of frames")]
struct Args {
    /// OBJ file to load; a built-in cube is used when omitted
    #[arg(long)]
    mesh: Option<PathBuf>,

    /// Number of frames to run
    #[arg(long, default_value_t = 4)]
    frames: u32,

    /// Shadow mapping
    #[arg(long)]
    shadow: bool,

    /// Transmittance approximation (also produces the shadow map)
    #[arg(long)]
    sim_transmit: bool,

    /// Texture-space diffusion
    #[arg(long)]
    tsd: bool,

    /// Screen-space ambient occlusion
    #[arg(long)]
    ssao: bool,

    /// Screen-space light reflections
    #[arg(long)]
    sslr: bool,

    /// Environment mapping mode
    #[arg(long, value_enum, default_value_t = EnvArg::Off)]
    env: EnvArg,

    /// Directory holding the six cubemap faces (posx.jpg, negx.jpg, ...)
    #[arg(long)]
    cubemap: Option<PathBuf>,

    /// Use a directional light instead of a point light
    #[arg(long)]
    directional: bool,

    /// Hide the floor plane
    #[arg(long)]
    no_floor: bool,

    /// Clear to white instead of black
    #[arg(long)]
    white_background: bool,

    /// Blur width for texture-space diffusion
    #[arg(long, default_value_t = 2)]
    blur_width: i32,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = RendererConfig::default();
    let mut backend = HeadlessBackend::new(config.window_width, config.window_height)?;

    let mut scene = Scene::new(config.window_width, config.window_height);
    match &args.mesh {
        Some(path) => scene.load_mesh(path)?,
        None => scene.replace_mesh(builtin_cube()),
    }
    scene.light.kind = if args.directional {
        LightKind::Directional
    } else {
        LightKind::Point
    };

    let targets = RenderTargetSet::create(&mut backend, config.target_resolution)?;
    let programs = ProgramSet::create(&mut backend)?;
    let kernel = SampleKernel::create(&mut backend)?;
    let mut surfaces = SceneSurfaces::create(&mut backend, &scene, targets.shadow.depth_tex)?;

    if let Some(dir) = &args.cubemap {
        let cubemap = CubemapData::load(dir, "jpg");
        surfaces.set_cubemap(cubemap.upload(&mut backend)?);
    }

    let flags = FeatureFlags {
        shadow_on: args.shadow,
        sim_transmit_on: args.sim_transmit,
        tsd_on: args.tsd,
        ssao_on: args.ssao,
        sslr_on: args.sslr,
        floor_on: !args.no_floor,
        background_white: args.white_background,
        env_map: args.env.into(),
        light_kind: scene.light.kind,
        ..FeatureFlags::default()
    };
    surfaces.apply_flags(&flags);
    for warning in surfaces.mesh.material.validate(&surfaces.mesh.caps()) {
        warn!("mesh material: {warning}");
    }

    let sequencer = PassSequencer::new();
    info!(
        "active passes: {}",
        sequencer.active_stage_names(&flags).join(", ")
    );

    for frame_index in 0..args.frames {
        // nudge the light so successive frames differ
        scene.light.orbit_azimuth(1.0);
        let frame = FrameState::capture(
            &scene,
            flags,
            config.window_width,
            config.window_height,
            args.blur_width,
        );
        let ctx = PassContext {
            frame: &frame,
            targets: &targets,
            surfaces: &surfaces,
            programs: &programs,
            kernel: &kernel,
        };
        sequencer.run_frame(&mut backend, &ctx)?;
        debug!("frame {frame_index} done");
    }

    info!(
        "ran {} frames, {} commands recorded",
        args.frames,
        backend.commands().len()
    );

    let SceneSurfaces {
        mesh,
        floor,
        quad,
        skybox,
    } = surfaces;
    mesh.destroy(&mut backend);
    floor.destroy(&mut backend);
    quad.destroy(&mut backend);
    skybox.destroy(&mut backend);
    kernel.destroy(&mut backend);
    targets.destroy(&mut backend);
    Ok(())
}

/// Unit cube around the origin, outward winding, derived normals
fn builtin_cube() -> TriMesh {
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
    mesh.indices = vec![
        0, 2, 1, 0, 3, 2, // -z
        4, 5, 6, 4, 6, 7, // +z
        0, 4, 7, 0, 7, 3, // -x
        1, 6, 5, 1, 2, 6, // +x
        3, 7, 6, 3, 6, 2, // +y
        0, 1, 5, 0, 5, 4, // -y
    ];
    mesh.compute_vertex_normals();
    mesh
}
