//! Forward lighting
//!
//! The one unconditional pass. Its output target depends on who consumes
//! the shaded image next: the TSD target when diffusion will re-read it
//! in texture space, the screen target when a screen-space effect will
//! composite over it, the default framebuffer otherwise.

use log::error;

use crate::backend::traits::*;
use crate::pipeline::flags::{EnvMapMode, FeatureFlags};
use crate::pipeline::sequencer::RenderStage;
use crate::pipeline::PassContext;

pub struct LightingPass;

impl<B: GraphicsBackend> RenderStage<B> for LightingPass {
    fn name(&self) -> &'static str {
        "lighting"
    }

    fn enabled(&self, _flags: &FeatureFlags) -> bool {
        true
    }

    fn execute(&self, backend: &mut B, ctx: &PassContext) -> BackendResult<()> {
        let frame = ctx.frame;
        let flags = &frame.flags;
        let res = ctx.targets.resolution();

        if flags.tsd_on {
            if !ctx.surfaces.mesh.caps().has_uvs {
                error!("texture space diffusion needs a UV-mapped mesh");
            }
            backend.bind_render_target(Some(ctx.targets.tsd.target));
            backend.set_viewport(0, 0, res, res);
        } else if flags.needs_gbuffer_pass() {
            backend.bind_render_target(Some(ctx.targets.screen.target));
            backend.set_viewport(0, 0, res, res);
        }

        backend.clear(Some(frame.background), Some(1.0));

        let params = frame.lit_params();
        ctx.surfaces
            .mesh
            .draw_lit(backend, ctx.programs.lighting, &params)?;
        if flags.floor_on && !flags.tsd_on {
            ctx.surfaces
                .floor
                .draw_lit(backend, ctx.programs.lighting, &params)?;
        }

        // Backdrop last, with translation stripped from the view and the
        // zoom-independent projection
        if flags.env_map != EnvMapMode::Off && !flags.tsd_on {
            ctx.surfaces.skybox.draw_skybox(
                backend,
                ctx.programs.skybox,
                frame.skybox_view(),
                frame.fixed_proj,
            )?;
        }

        if flags.needs_offscreen_lighting() {
            backend.bind_render_target(None);
            backend.set_viewport(0, 0, frame.window_width, frame.window_height);
        }
        Ok(())
    }
}
