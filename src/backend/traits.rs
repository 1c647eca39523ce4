//! Core backend abstraction traits
//!
//! The render core talks to the GPU exclusively through this interface.
//! Shader source and compilation, windowing, and the concrete graphics API
//! all live on the far side of it; the core only holds opaque handles and
//! the named-uniform contract of each program.

use crate::backend::types::*;
use thiserror::Error;

/// Backend error type
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Failed to create buffer: {0}")]
    BufferCreationFailed(String),
    #[error("Failed to create texture: {0}")]
    TextureCreationFailed(String),
    #[error("Failed to create program: {0}")]
    ProgramCreationFailed(String),
    #[error("Render target {label} is incomplete: {reason}")]
    IncompleteRenderTarget { label: String, reason: String },
    #[error("Uniform {name} not found in program {program}")]
    UniformNotFound { program: String, name: String },
    #[error("Stale or unknown handle: {0}")]
    InvalidHandle(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Handle to a GPU buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub(crate) u64);

/// Handle to a GPU texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub(crate) u64);

/// Handle to an off-screen render target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTargetHandle(pub(crate) u64);

/// Handle to a linked shader program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub(crate) u64);

/// Main graphics backend trait
///
/// The contract is stateful: a render target, viewport, program, vertex
/// buffers, and texture units are bound, then a draw call consumes the
/// bound state. Binding `None` as the render target selects the default
/// framebuffer, whose size tracks the window.
pub trait GraphicsBackend: Sized {
    /// Create a backend whose default framebuffer has the given size
    fn new(width: u32, height: u32) -> BackendResult<Self>;

    /// Resize the default framebuffer. Off-screen targets keep their
    /// fixed resolution.
    fn resize(&mut self, width: u32, height: u32);

    /// Current default-framebuffer size
    fn surface_size(&self) -> (u32, u32);

    /// Begin a new frame
    fn begin_frame(&mut self);

    /// End the frame and present
    fn end_frame(&mut self);

    // Resource creation

    /// Create a buffer with initial contents, returning a fresh identity
    fn create_buffer(&mut self, desc: &BufferDescriptor, data: &[u8])
        -> BackendResult<BufferHandle>;

    /// Refill an existing buffer, keeping its identity
    fn write_buffer(&mut self, buffer: BufferHandle, data: &[u8]) -> BackendResult<()>;

    /// Create a texture, optionally with initial pixel data. Cubemap data
    /// is six concatenated faces in +x, -x, +y, -y, +z, -z order.
    fn create_texture(
        &mut self,
        desc: &TextureDescriptor,
        data: Option<&[u8]>,
    ) -> BackendResult<TextureHandle>;

    /// Create an off-screen render target from already-created attachment
    /// textures. Completeness is validated here: an invalid attachment
    /// layout is an error, never a usable handle.
    fn create_render_target(
        &mut self,
        desc: &RenderTargetDescriptor,
    ) -> BackendResult<RenderTargetHandle>;

    /// Register a linked shader program under a label. Compilation is the
    /// collaborator's concern; the core never sees source text.
    fn create_program(&mut self, label: &str) -> BackendResult<ProgramHandle>;

    // Per-frame state

    /// Bind a render target, or the default framebuffer when `None`
    fn bind_render_target(&mut self, target: Option<RenderTargetHandle>);

    /// Set the viewport in pixels
    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Clear the bound target's color and/or depth
    fn clear(&mut self, color: Option<[f32; 4]>, depth: Option<f32>);

    /// Activate a program for subsequent uniform writes and draws
    fn set_program(&mut self, program: ProgramHandle);

    /// Write one named uniform slot of a program
    fn set_uniform(
        &mut self,
        program: ProgramHandle,
        name: &str,
        value: UniformValue,
    ) -> BackendResult<()>;

    /// Bind a texture to a numbered unit
    fn bind_texture(&mut self, unit: u32, texture: TextureHandle);

    // Geometry binding and drawing

    /// Bind a vertex buffer to an attribute slot
    fn set_vertex_buffer(&mut self, slot: u32, buffer: BufferHandle);

    /// Bind the index buffer
    fn set_index_buffer(&mut self, buffer: BufferHandle);

    /// Issue one indexed triangle-list draw over the bound state
    fn draw_indexed(&mut self, index_count: u32);

    // Resource cleanup

    /// Destroy a buffer
    fn destroy_buffer(&mut self, buffer: BufferHandle);

    /// Destroy a texture
    fn destroy_texture(&mut self, texture: TextureHandle);

    /// Destroy a render target (not its attachment textures)
    fn destroy_render_target(&mut self, target: RenderTargetHandle);
}
