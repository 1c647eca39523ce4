//! Screen-space ambient occlusion
//!
//! Three quad draws: generate raw occlusion from the G-buffer with a
//! hemisphere sample kernel and a tiled rotation-noise texture, blur
//! it, and composite it over the lit screen color. When SSLR runs next,
//! the composite lands back on the SSAO target so the reflection pass
//! can layer over it; otherwise it goes straight to the window.

use glam::Vec3;

use crate::backend::traits::*;
use crate::backend::types::*;
use crate::pipeline::flags::FeatureFlags;
use crate::pipeline::sequencer::RenderStage;
use crate::pipeline::PassContext;
use crate::resources::{CompositeParams, ScreenBlurParams, SsaoParams};

/// Number of hemisphere samples in the kernel
pub const KERNEL_SIZE: usize = 64;

/// Side length of the tiled rotation-noise texture
pub const NOISE_DIM: u32 = 4;

/// Fixed blur width for the occlusion texture
const BLUR_WIDTH: i32 = 4;

/// Texels no geometry touched must multiply the lit color by 1
const OPAQUE_WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Tiny deterministic congruential generator; the kernel must come out
/// identical run to run.
struct KernelRng(u64);

impl KernelRng {
    fn new() -> Self {
        Self(0x853c49e6748fea9b)
    }

    /// Uniform float in [0, 1)
    fn next_f32(&mut self) -> f32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 40) as f32 / (1u64 << 24) as f32
    }
}

/// Fixed sampling data shared by the SSAO and SSLR programs: the
/// hemisphere directions and the rotation-noise texture tiled across
/// the screen
pub struct SampleKernel {
    pub samples: Vec<Vec3>,
    pub noise_tex: TextureHandle,
}

impl SampleKernel {
    pub fn create<B: GraphicsBackend>(backend: &mut B) -> BackendResult<Self> {
        Ok(Self {
            samples: build_samples(),
            noise_tex: create_noise_texture(backend)?,
        })
    }

    pub fn destroy<B: GraphicsBackend>(self, backend: &mut B) {
        backend.destroy_texture(self.noise_tex);
    }
}

/// Rejection-sample directions in the z >= 0 half of the unit ball,
/// then normalize and scale each by a random magnitude
pub fn build_samples() -> Vec<Vec3> {
    let mut rng = KernelRng::new();
    let mut samples = Vec::with_capacity(KERNEL_SIZE);
    while samples.len() < KERNEL_SIZE {
        let candidate = Vec3::new(
            rng.next_f32() * 2.0 - 1.0,
            rng.next_f32() * 2.0 - 1.0,
            rng.next_f32(),
        );
        if candidate.length() <= 1.0 {
            samples.push(candidate.normalize_or_zero() * rng.next_f32());
        }
    }
    samples
}

/// Rotations around z, zero-padded into four-channel float texels
fn create_noise_texture<B: GraphicsBackend>(backend: &mut B) -> BackendResult<TextureHandle> {
    let mut rng = KernelRng::new();
    let mut texels = [[0.0f32; 4]; (NOISE_DIM * NOISE_DIM) as usize];
    for texel in texels.iter_mut() {
        texel[0] = rng.next_f32() * 2.0 - 1.0;
        texel[1] = rng.next_f32() * 2.0 - 1.0;
    }
    backend.create_texture(
        &TextureDescriptor {
            label: Some("noise".to_string()),
            width: NOISE_DIM,
            height: NOISE_DIM,
            format: TextureFormat::Rgba32Float,
            mag_filter: FilterMode::Nearest,
            min_filter: FilterMode::Nearest,
            address_mode: AddressMode::Repeat,
            ..TextureDescriptor::default()
        },
        Some(bytemuck::cast_slice(&texels)),
    )
}

pub struct SsaoPass;

impl<B: GraphicsBackend> RenderStage<B> for SsaoPass {
    fn name(&self) -> &'static str {
        "ssao"
    }

    fn enabled(&self, flags: &FeatureFlags) -> bool {
        flags.ssao_on
    }

    fn execute(&self, backend: &mut B, ctx: &PassContext) -> BackendResult<()> {
        let frame = ctx.frame;
        let res = ctx.targets.resolution();
        let quad = &ctx.surfaces.quad;

        backend.bind_render_target(Some(ctx.targets.ssao.target));
        backend.set_viewport(0, 0, res, res);
        backend.clear(Some(OPAQUE_WHITE), Some(1.0));

        quad.draw_ssao(
            backend,
            ctx.programs.ssao,
            &SsaoParams {
                proj: frame.proj,
                samples: &ctx.kernel.samples,
                radius: frame.ssao_radius,
                screen_width: frame.window_width,
                screen_height: frame.window_height,
                position_tex: ctx.targets.gbuffer.position_tex,
                normal_tex: ctx.targets.gbuffer.normal_tex,
                noise_tex: ctx.kernel.noise_tex,
            },
        )?;

        // Horizontal into the blur target, vertical over itself
        backend.bind_render_target(Some(ctx.targets.blur.target));
        backend.set_viewport(0, 0, res, res);
        let mut blur = ScreenBlurParams {
            blur_on: true,
            horizontal: true,
            filter_size: BLUR_WIDTH,
        };
        quad.draw_screen(backend, ctx.programs.quad, ctx.targets.ssao.color_tex, &blur)?;
        blur.horizontal = false;
        quad.draw_screen(backend, ctx.programs.quad, ctx.targets.blur.color_tex, &blur)?;

        // The composite overwrites the SSAO texture when SSLR layers
        // over it afterwards; the clear stays white, not the frame
        // background
        if frame.flags.sslr_on {
            backend.bind_render_target(Some(ctx.targets.ssao.target));
            backend.set_viewport(0, 0, res, res);
        } else {
            backend.bind_render_target(None);
            backend.set_viewport(0, 0, frame.window_width, frame.window_height);
        }
        backend.clear(Some(OPAQUE_WHITE), Some(1.0));

        quad.draw_composite(
            backend,
            ctx.programs.composite,
            &CompositeParams {
                color_tex: ctx.targets.screen.color_tex,
                overlay_tex: ctx.targets.blur.color_tex,
                occlusion_type: 1,
            },
        )?;
        Ok(())
    }
}
