//! G-buffer generation
//!
//! Writes view-space position, normal, and albedo for the mesh into the
//! three-attachment G-buffer. Only the screen-space effects consume it,
//! so it only runs when one of them is on. The clear is forced to black
//! regardless of the frame background so empty texels read as invalid
//! geometry downstream.

use crate::backend::traits::*;
use crate::pipeline::flags::FeatureFlags;
use crate::pipeline::sequencer::RenderStage;
use crate::pipeline::PassContext;

pub struct GBufferPass;

impl<B: GraphicsBackend> RenderStage<B> for GBufferPass {
    fn name(&self) -> &'static str {
        "gbuffer"
    }

    fn enabled(&self, flags: &FeatureFlags) -> bool {
        flags.needs_gbuffer_pass()
    }

    fn execute(&self, backend: &mut B, ctx: &PassContext) -> BackendResult<()> {
        let frame = ctx.frame;
        let res = ctx.targets.resolution();

        backend.bind_render_target(Some(ctx.targets.gbuffer.target));
        backend.set_viewport(0, 0, res, res);
        backend.clear(Some([0.0, 0.0, 0.0, 0.0]), Some(1.0));

        ctx.surfaces.mesh.draw_gbuffer(
            backend,
            ctx.programs.gbuffer,
            frame.model,
            frame.view,
            frame.proj,
        )?;

        backend.bind_render_target(None);
        backend.set_viewport(0, 0, frame.window_width, frame.window_height);
        Ok(())
    }
}
