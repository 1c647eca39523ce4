//! Screen-space light reflections
//!
//! Mirrors the SSAO structure: generate reflections by marching the
//! G-buffer in view space (the cubemap catches rays that leave the
//! screen), blur through the second blur target, then composite onto
//! the window. When SSAO ran earlier its composited output is the color
//! source; otherwise the raw lit screen color is.

use crate::backend::traits::*;
use crate::pipeline::flags::FeatureFlags;
use crate::pipeline::sequencer::RenderStage;
use crate::pipeline::PassContext;
use crate::resources::{CompositeParams, ScreenBlurParams, SslrParams};

/// Fixed blur width for the reflection texture
const BLUR_WIDTH: i32 = 4;

const OPAQUE_WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

pub struct SslrPass;

impl<B: GraphicsBackend> RenderStage<B> for SslrPass {
    fn name(&self) -> &'static str {
        "sslr"
    }

    fn enabled(&self, flags: &FeatureFlags) -> bool {
        flags.sslr_on
    }

    fn execute(&self, backend: &mut B, ctx: &PassContext) -> BackendResult<()> {
        let frame = ctx.frame;
        let res = ctx.targets.resolution();
        let quad = &ctx.surfaces.quad;

        backend.bind_render_target(Some(ctx.targets.sslr.target));
        backend.set_viewport(0, 0, res, res);
        backend.clear(Some(OPAQUE_WHITE), Some(1.0));

        quad.draw_sslr(
            backend,
            ctx.programs.sslr,
            &SslrParams {
                view: frame.view,
                proj: frame.proj,
                samples: &ctx.kernel.samples,
                radius: frame.ssao_radius,
                screen_width: frame.window_width,
                screen_height: frame.window_height,
                position_tex: ctx.targets.gbuffer.position_tex,
                normal_tex: ctx.targets.gbuffer.normal_tex,
                screen_tex: ctx.targets.screen.color_tex,
                noise_tex: ctx.kernel.noise_tex,
                cubemap: quad.textures.cubemap,
            },
        )?;

        backend.bind_render_target(Some(ctx.targets.blur2.target));
        backend.set_viewport(0, 0, res, res);
        let mut blur = ScreenBlurParams {
            blur_on: true,
            horizontal: true,
            filter_size: BLUR_WIDTH,
        };
        quad.draw_screen(backend, ctx.programs.quad, ctx.targets.sslr.color_tex, &blur)?;
        blur.horizontal = false;
        quad.draw_screen(backend, ctx.programs.quad, ctx.targets.blur2.color_tex, &blur)?;

        // Last pass of the frame: the composite always lands on the
        // window
        backend.bind_render_target(None);
        backend.set_viewport(0, 0, frame.window_width, frame.window_height);
        backend.clear(Some(OPAQUE_WHITE), Some(1.0));

        let color_tex = if frame.flags.ssao_on {
            ctx.targets.ssao.color_tex
        } else {
            ctx.targets.screen.color_tex
        };
        quad.draw_composite(
            backend,
            ctx.programs.composite,
            &CompositeParams {
                color_tex,
                overlay_tex: ctx.targets.blur2.color_tex,
                occlusion_type: 2,
            },
        )?;
        Ok(())
    }
}
