//! Fixed-order frame orchestration
//!
//! Pass order never changes; the flag snapshot decides which passes run.
//! Ordering is load-bearing: each pass may consume the previous pass's
//! target contents, and a disabled pass leaves its targets untouched, so
//! stale content is only ever read behind the flag that wrote it.

use log::{debug, trace};

use crate::backend::traits::*;
use crate::pipeline::flags::FeatureFlags;
use crate::pipeline::{
    GBufferPass, LightingPass, PassContext, ShadowPass, SsaoPass, SslrPass, TsdPass,
};

/// One stage of the frame
pub trait RenderStage<B: GraphicsBackend> {
    fn name(&self) -> &'static str;

    /// Whether this stage runs under the given flag snapshot
    fn enabled(&self, flags: &FeatureFlags) -> bool;

    fn execute(&self, backend: &mut B, ctx: &PassContext) -> BackendResult<()>;
}

/// Drives the six passes in their fixed order, skipping disabled ones
pub struct PassSequencer<B: GraphicsBackend> {
    stages: Vec<Box<dyn RenderStage<B>>>,
}

impl<B: GraphicsBackend> PassSequencer<B> {
    pub fn new() -> Self {
        Self {
            stages: vec![
                Box::new(ShadowPass),
                Box::new(GBufferPass),
                Box::new(LightingPass),
                Box::new(TsdPass),
                Box::new(SsaoPass),
                Box::new(SslrPass),
            ],
        }
    }

    /// Execute one frame over the captured state
    pub fn run_frame(&self, backend: &mut B, ctx: &PassContext) -> BackendResult<()> {
        backend.begin_frame();
        for stage in &self.stages {
            if stage.enabled(&ctx.frame.flags) {
                debug!("pass {}", stage.name());
                stage.execute(backend, ctx)?;
            } else {
                trace!("pass {} skipped", stage.name());
            }
        }
        backend.end_frame();
        Ok(())
    }

    /// Names of the stages that would run under the given flags
    pub fn active_stage_names(&self, flags: &FeatureFlags) -> Vec<&'static str> {
        self.stages
            .iter()
            .filter(|stage| stage.enabled(flags))
            .map(|stage| stage.name())
            .collect()
    }
}

impl<B: GraphicsBackend> Default for PassSequencer<B> {
    fn default() -> Self {
        Self::new()
    }
}
