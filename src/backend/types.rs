//! Common types shared between backends

use glam::{Mat4, Vec2, Vec3, Vec4};

/// Texture format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    Rgba8Unorm,
    Rgba16Float,
    Rgba32Float,
    Depth32Float,
}

impl TextureFormat {
    pub fn is_depth(&self) -> bool {
        matches!(self, TextureFormat::Depth32Float)
    }

    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            TextureFormat::Rgba8Unorm | TextureFormat::Depth32Float => 4,
            TextureFormat::Rgba16Float => 8,
            TextureFormat::Rgba32Float => 16,
        }
    }
}

/// Texture dimensionality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    D2,
    Cube,
}

/// Filter mode for texture sampling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Nearest,
    Linear,
}

/// Address mode for texture sampling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    ClampToEdge,
    ClampToBorder,
    Repeat,
}

/// Texture descriptor
#[derive(Debug, Clone)]
pub struct TextureDescriptor {
    pub label: Option<String>,
    pub width: u32,
    pub height: u32,
    pub kind: TextureKind,
    pub format: TextureFormat,
    pub mag_filter: FilterMode,
    pub min_filter: FilterMode,
    pub address_mode: AddressMode,
    /// Only meaningful with [`AddressMode::ClampToBorder`].
    pub border_color: Option<[f32; 4]>,
}

impl Default for TextureDescriptor {
    fn default() -> Self {
        Self {
            label: None,
            width: 1,
            height: 1,
            kind: TextureKind::D2,
            format: TextureFormat::Rgba8Unorm,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            address_mode: AddressMode::ClampToEdge,
            border_color: None,
        }
    }
}

/// Buffer usage flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferUsage(u32);

impl BufferUsage {
    pub const VERTEX: Self = Self(1 << 0);
    pub const INDEX: Self = Self(1 << 1);
    pub const COPY_DST: Self = Self(1 << 2);

    pub fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn bits(&self) -> u32 {
        self.0
    }
}

impl std::ops::BitOr for BufferUsage {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// Buffer descriptor
#[derive(Debug, Clone)]
pub struct BufferDescriptor {
    pub label: Option<String>,
    pub usage: BufferUsage,
}

/// The fixed vertex-layout contract: one buffer per attribute channel,
/// bound at a fixed slot. Surfaces that lack a channel still bind a
/// single-element placeholder buffer at that slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexChannel {
    Position,
    Normal,
    Color,
    Uv,
    Tangent,
    Bitangent,
}

impl VertexChannel {
    pub const ALL: [VertexChannel; 6] = [
        VertexChannel::Position,
        VertexChannel::Normal,
        VertexChannel::Color,
        VertexChannel::Uv,
        VertexChannel::Tangent,
        VertexChannel::Bitangent,
    ];

    /// Attribute slot the channel binds to.
    pub fn slot(&self) -> u32 {
        match self {
            VertexChannel::Position => 0,
            VertexChannel::Normal => 1,
            VertexChannel::Color => 2,
            VertexChannel::Uv => 3,
            VertexChannel::Tangent => 4,
            VertexChannel::Bitangent => 5,
        }
    }

    /// Number of float components per element.
    pub fn components(&self) -> u32 {
        match self {
            VertexChannel::Uv => 2,
            _ => 3,
        }
    }
}

/// A uniform value for one named slot of a shader program
#[derive(Debug, Clone, Copy)]
pub enum UniformValue<'a> {
    Float(f32),
    Int(i32),
    Bool(bool),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
    Vec3Array(&'a [Vec3]),
}

/// Depth attachment configuration for a render target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthAttachment {
    None,
    /// Write-only depth storage, cannot be sampled afterwards.
    Renderbuffer,
    /// A sampleable depth texture created by the caller.
    Texture(crate::backend::TextureHandle),
}

/// Render target descriptor: up to three color attachments plus an
/// optional depth attachment, all at one fixed resolution
#[derive(Debug, Clone)]
pub struct RenderTargetDescriptor {
    pub label: Option<String>,
    pub width: u32,
    pub height: u32,
    pub color_attachments: Vec<crate::backend::TextureHandle>,
    pub depth_attachment: DepthAttachment,
    /// Zero the color attachment once at construction. Used by targets
    /// whose content is later blurred with alpha-gated masking, so
    /// never-written texels carry zero alpha.
    pub initial_zero_clear: bool,
}

impl Default for RenderTargetDescriptor {
    fn default() -> Self {
        Self {
            label: None,
            width: 1,
            height: 1,
            color_attachments: Vec::new(),
            depth_attachment: DepthAttachment::None,
            initial_zero_clear: false,
        }
    }
}
