//! Shadow map generation
//!
//! Renders scene depth from the light's point of view into the
//! depth-only shadow target. Runs when either consumer effect (shadow
//! mapping or transmittance approximation) wants the map.

use crate::backend::traits::*;
use crate::pipeline::flags::FeatureFlags;
use crate::pipeline::sequencer::RenderStage;
use crate::pipeline::PassContext;

pub struct ShadowPass;

impl<B: GraphicsBackend> RenderStage<B> for ShadowPass {
    fn name(&self) -> &'static str {
        "shadow"
    }

    fn enabled(&self, flags: &FeatureFlags) -> bool {
        flags.needs_shadow_pass()
    }

    fn execute(&self, backend: &mut B, ctx: &PassContext) -> BackendResult<()> {
        let frame = ctx.frame;
        let res = ctx.targets.resolution();

        backend.bind_render_target(Some(ctx.targets.shadow.target));
        backend.set_viewport(0, 0, res, res);
        backend.clear(Some(frame.background), Some(1.0));

        ctx.surfaces
            .mesh
            .draw_depth_only(backend, ctx.programs.shadow, frame.light_view_proj)?;
        if frame.flags.floor_on {
            ctx.surfaces
                .floor
                .draw_depth_only(backend, ctx.programs.shadow, frame.light_view_proj)?;
        }

        backend.bind_render_target(None);
        backend.set_viewport(0, 0, frame.window_width, frame.window_height);
        Ok(())
    }
}
