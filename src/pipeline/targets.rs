//! Off-screen render target pool
//!
//! All targets share one fixed resolution chosen at startup,
//! independent of the window; resizing the window never touches them.
//! Construction validates completeness through the backend, and an
//! incomplete target is a fatal startup error surfaced as a
//! [`BackendError`].
//!
//! [`BackendError`]: crate::backend::BackendError

use crate::backend::traits::*;
use crate::backend::types::*;

/// Depth-only target the shadow pass renders into. Sampling outside the
/// light frustum hits the white border, reading as unoccluded.
pub struct ShadowTarget {
    pub target: RenderTargetHandle,
    pub depth_tex: TextureHandle,
}

impl ShadowTarget {
    pub fn create<B: GraphicsBackend>(backend: &mut B, size: u32) -> BackendResult<Self> {
        let depth_tex = backend.create_texture(
            &TextureDescriptor {
                label: Some("shadow.depth".to_string()),
                width: size,
                height: size,
                format: TextureFormat::Depth32Float,
                mag_filter: FilterMode::Nearest,
                min_filter: FilterMode::Nearest,
                address_mode: AddressMode::ClampToBorder,
                border_color: Some([1.0, 1.0, 1.0, 1.0]),
                ..TextureDescriptor::default()
            },
            None,
        )?;
        let target = backend.create_render_target(&RenderTargetDescriptor {
            label: Some("shadow".to_string()),
            width: size,
            height: size,
            color_attachments: Vec::new(),
            depth_attachment: DepthAttachment::Texture(depth_tex),
            initial_zero_clear: false,
        })?;
        Ok(Self { target, depth_tex })
    }

    pub fn destroy<B: GraphicsBackend>(self, backend: &mut B) {
        backend.destroy_render_target(self.target);
        backend.destroy_texture(self.depth_tex);
    }
}

/// Single-color screen-space target, the shape shared by the lighting,
/// diffusion, occlusion, reflection, and blur stages
pub struct ScreenTarget {
    pub target: RenderTargetHandle,
    pub color_tex: TextureHandle,
}

impl ScreenTarget {
    pub fn create<B: GraphicsBackend>(
        backend: &mut B,
        label: &str,
        size: u32,
        with_depth: bool,
        initial_zero_clear: bool,
    ) -> BackendResult<Self> {
        let color_tex = backend.create_texture(
            &TextureDescriptor {
                label: Some(format!("{label}.color")),
                width: size,
                height: size,
                format: TextureFormat::Rgba16Float,
                mag_filter: FilterMode::Nearest,
                min_filter: FilterMode::Nearest,
                ..TextureDescriptor::default()
            },
            None,
        )?;
        let target = backend.create_render_target(&RenderTargetDescriptor {
            label: Some(label.to_string()),
            width: size,
            height: size,
            color_attachments: vec![color_tex],
            depth_attachment: if with_depth {
                DepthAttachment::Renderbuffer
            } else {
                DepthAttachment::None
            },
            initial_zero_clear,
        })?;
        Ok(Self { target, color_tex })
    }

    pub fn destroy<B: GraphicsBackend>(self, backend: &mut B) {
        backend.destroy_render_target(self.target);
        backend.destroy_texture(self.color_tex);
    }
}

/// Three-attachment geometry buffer: view-space position, normal, and
/// albedo written in one pass
pub struct GBufferTarget {
    pub target: RenderTargetHandle,
    pub position_tex: TextureHandle,
    pub normal_tex: TextureHandle,
    pub color_tex: TextureHandle,
}

impl GBufferTarget {
    pub fn create<B: GraphicsBackend>(backend: &mut B, size: u32) -> BackendResult<Self> {
        let attachment = |backend: &mut B, name: &str| {
            backend.create_texture(
                &TextureDescriptor {
                    label: Some(format!("gbuffer.{name}")),
                    width: size,
                    height: size,
                    format: TextureFormat::Rgba16Float,
                    mag_filter: FilterMode::Nearest,
                    min_filter: FilterMode::Nearest,
                    ..TextureDescriptor::default()
                },
                None,
            )
        };
        let position_tex = attachment(backend, "position")?;
        let normal_tex = attachment(backend, "normal")?;
        let color_tex = attachment(backend, "color")?;
        let target = backend.create_render_target(&RenderTargetDescriptor {
            label: Some("gbuffer".to_string()),
            width: size,
            height: size,
            color_attachments: vec![position_tex, normal_tex, color_tex],
            depth_attachment: DepthAttachment::Renderbuffer,
            initial_zero_clear: false,
        })?;
        Ok(Self {
            target,
            position_tex,
            normal_tex,
            color_tex,
        })
    }

    pub fn destroy<B: GraphicsBackend>(self, backend: &mut B) {
        backend.destroy_render_target(self.target);
        backend.destroy_texture(self.position_tex);
        backend.destroy_texture(self.normal_tex);
        backend.destroy_texture(self.color_tex);
    }
}

/// Every off-screen target the pass graph touches, allocated together
/// at startup
pub struct RenderTargetSet {
    pub shadow: ShadowTarget,
    pub screen: ScreenTarget,
    pub gbuffer: GBufferTarget,
    pub tsd: ScreenTarget,
    pub ssao: ScreenTarget,
    pub sslr: ScreenTarget,
    pub blur: ScreenTarget,
    pub blur2: ScreenTarget,
    resolution: u32,
}

impl RenderTargetSet {
    pub fn create<B: GraphicsBackend>(backend: &mut B, resolution: u32) -> BackendResult<Self> {
        Ok(Self {
            shadow: ShadowTarget::create(backend, resolution)?,
            screen: ScreenTarget::create(backend, "screen", resolution, true, false)?,
            gbuffer: GBufferTarget::create(backend, resolution)?,
            tsd: ScreenTarget::create(backend, "tsd", resolution, false, true)?,
            ssao: ScreenTarget::create(backend, "ssao", resolution, false, false)?,
            sslr: ScreenTarget::create(backend, "sslr", resolution, true, false)?,
            blur: ScreenTarget::create(backend, "blur", resolution, false, false)?,
            blur2: ScreenTarget::create(backend, "blur2", resolution, false, false)?,
            resolution,
        })
    }

    /// Fixed side length shared by every off-screen target
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn destroy<B: GraphicsBackend>(self, backend: &mut B) {
        self.shadow.destroy(backend);
        self.screen.destroy(backend);
        self.gbuffer.destroy(backend);
        self.tsd.destroy(backend);
        self.ssao.destroy(backend);
        self.sslr.destroy(backend);
        self.blur.destroy(backend);
        self.blur2.destroy(backend);
    }
}
