//! Texture-space diffusion
//!
//! The lighting pass has already written the shaded mesh into UV space
//! on the TSD target. This pass blurs that texture in place (separable
//! horizontal/vertical at the user-set width), then redraws the scene:
//! the mesh flat-textured with its diffused lighting, the floor and
//! skybox shaded normally on top.

use crate::backend::traits::*;
use crate::pipeline::flags::{EnvMapMode, FeatureFlags};
use crate::pipeline::sequencer::RenderStage;
use crate::pipeline::PassContext;
use crate::resources::ScreenBlurParams;

pub struct TsdPass;

impl<B: GraphicsBackend> RenderStage<B> for TsdPass {
    fn name(&self) -> &'static str {
        "tsd"
    }

    fn enabled(&self, flags: &FeatureFlags) -> bool {
        flags.tsd_on
    }

    fn execute(&self, backend: &mut B, ctx: &PassContext) -> BackendResult<()> {
        let frame = ctx.frame;
        let flags = &frame.flags;
        let res = ctx.targets.resolution();
        let quad = &ctx.surfaces.quad;

        // The lighting pass rendered off screen, so the window still
        // holds the previous frame
        backend.clear(Some(frame.background), Some(1.0));

        // In-place separable blur: each draw samples the TSD texture
        // while writing the TSD target
        backend.bind_render_target(Some(ctx.targets.tsd.target));
        backend.set_viewport(0, 0, res, res);
        let mut blur = ScreenBlurParams {
            blur_on: true,
            horizontal: true,
            filter_size: frame.blur_filter_width,
        };
        quad.draw_screen(backend, ctx.programs.quad, ctx.targets.tsd.color_tex, &blur)?;
        blur.horizontal = false;
        quad.draw_screen(backend, ctx.programs.quad, ctx.targets.tsd.color_tex, &blur)?;

        if flags.needs_gbuffer_pass() {
            backend.bind_render_target(Some(ctx.targets.screen.target));
            backend.set_viewport(0, 0, res, res);
        } else {
            backend.bind_render_target(None);
            backend.set_viewport(0, 0, frame.window_width, frame.window_height);
        }
        backend.clear(Some(frame.background), Some(1.0));

        ctx.surfaces.mesh.draw_textured(
            backend,
            ctx.programs.flat_texture,
            ctx.targets.tsd.color_tex,
            frame.model,
            frame.view,
            frame.proj,
        )?;

        if flags.floor_on {
            ctx.surfaces
                .floor
                .draw_lit(backend, ctx.programs.lighting, &frame.lit_params())?;
        }

        if flags.env_map != EnvMapMode::Off {
            ctx.surfaces.skybox.draw_skybox(
                backend,
                ctx.programs.skybox,
                frame.skybox_view(),
                frame.fixed_proj,
            )?;
        }

        backend.bind_render_target(None);
        backend.set_viewport(0, 0, frame.window_width, frame.window_height);
        Ok(())
    }
}
