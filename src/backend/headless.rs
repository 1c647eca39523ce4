//! Headless backend implementation
//!
//! Tracks the complete binding and resource state of the stateful contract
//! without touching a GPU: live buffers with their contents, textures,
//! render-target layouts, per-program uniform values, and an ordered command
//! log. The integration tests and the demo binary drive this backend; it is
//! also the reference for what a hardware backend must validate, in
//! particular render-target completeness.

use crate::backend::traits::*;
use crate::backend::types::*;
use glam::{Mat4, Vec2, Vec3, Vec4};
use log::{error, warn};
use std::collections::HashMap;

/// A uniform value as recorded by the headless backend (owned, comparable)
#[derive(Debug, Clone, PartialEq)]
pub enum OwnedUniform {
    Float(f32),
    Int(i32),
    Bool(bool),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
    Vec3Array(Vec<Vec3>),
}

impl From<UniformValue<'_>> for OwnedUniform {
    fn from(value: UniformValue<'_>) -> Self {
        match value {
            UniformValue::Float(v) => OwnedUniform::Float(v),
            UniformValue::Int(v) => OwnedUniform::Int(v),
            UniformValue::Bool(v) => OwnedUniform::Bool(v),
            UniformValue::Vec2(v) => OwnedUniform::Vec2(v),
            UniformValue::Vec3(v) => OwnedUniform::Vec3(v),
            UniformValue::Vec4(v) => OwnedUniform::Vec4(v),
            UniformValue::Mat4(v) => OwnedUniform::Mat4(v),
            UniformValue::Vec3Array(v) => OwnedUniform::Vec3Array(v.to_vec()),
        }
    }
}

/// One indexed draw with the state that was bound when it was issued
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub target: Option<RenderTargetHandle>,
    pub program: Option<ProgramHandle>,
    pub viewport: (i32, i32, u32, u32),
    pub index_count: u32,
}

/// One recorded backend command, in issue order
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    BeginFrame,
    EndFrame,
    BindRenderTarget(Option<RenderTargetHandle>),
    SetViewport {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    Clear {
        target: Option<RenderTargetHandle>,
        color: Option<[f32; 4]>,
        depth: Option<f32>,
    },
    SetProgram(ProgramHandle),
    SetUniform {
        program: ProgramHandle,
        name: String,
        value: OwnedUniform,
    },
    BindTexture {
        unit: u32,
        texture: TextureHandle,
    },
    SetVertexBuffer {
        slot: u32,
        buffer: BufferHandle,
    },
    SetIndexBuffer(BufferHandle),
    DrawIndexed(DrawRecord),
}

struct BufferRecord {
    label: Option<String>,
    usage: BufferUsage,
    contents: Vec<u8>,
}

struct TextureRecord {
    desc: TextureDescriptor,
    data_len: usize,
}

struct TargetRecord {
    desc: RenderTargetDescriptor,
}

struct ProgramRecord {
    label: String,
    uniforms: HashMap<String, OwnedUniform>,
}

/// Headless backend
pub struct HeadlessBackend {
    surface_width: u32,
    surface_height: u32,

    // Resource storage
    buffers: HashMap<u64, BufferRecord>,
    textures: HashMap<u64, TextureRecord>,
    targets: HashMap<u64, TargetRecord>,
    programs: HashMap<u64, ProgramRecord>,

    // Handle counters
    next_buffer_id: u64,
    next_texture_id: u64,
    next_target_id: u64,
    next_program_id: u64,

    // Bound state
    bound_target: Option<RenderTargetHandle>,
    viewport: (i32, i32, u32, u32),
    current_program: Option<ProgramHandle>,
    texture_units: HashMap<u32, TextureHandle>,
    vertex_slots: HashMap<u32, BufferHandle>,
    index_buffer: Option<BufferHandle>,

    frame_count: u64,
    commands: Vec<Command>,
}

impl HeadlessBackend {
    fn validate_target(&self, desc: &RenderTargetDescriptor) -> Result<(), String> {
        if desc.width == 0 || desc.height == 0 {
            return Err("zero extent".into());
        }
        if desc.color_attachments.len() > 3 {
            return Err(format!(
                "{} color attachments, at most 3 supported",
                desc.color_attachments.len()
            ));
        }
        if desc.color_attachments.is_empty()
            && matches!(desc.depth_attachment, DepthAttachment::None)
        {
            return Err("no attachments".into());
        }
        for handle in &desc.color_attachments {
            let tex = self
                .textures
                .get(&handle.0)
                .ok_or_else(|| format!("unknown color attachment texture {}", handle.0))?;
            if tex.desc.format.is_depth() {
                return Err("depth format bound as a color attachment".into());
            }
            if tex.desc.kind != TextureKind::D2 {
                return Err("cubemap bound as a color attachment".into());
            }
            if tex.desc.width != desc.width || tex.desc.height != desc.height {
                return Err(format!(
                    "color attachment is {}x{} but the target is {}x{}",
                    tex.desc.width, tex.desc.height, desc.width, desc.height
                ));
            }
        }
        if let DepthAttachment::Texture(handle) = desc.depth_attachment {
            let tex = self
                .textures
                .get(&handle.0)
                .ok_or_else(|| format!("unknown depth attachment texture {}", handle.0))?;
            if !tex.desc.format.is_depth() {
                return Err("color format bound as the depth attachment".into());
            }
            if tex.desc.kind != TextureKind::D2 {
                return Err("cubemap bound as the depth attachment".into());
            }
            if tex.desc.width != desc.width || tex.desc.height != desc.height {
                return Err(format!(
                    "depth attachment is {}x{} but the target is {}x{}",
                    tex.desc.width, tex.desc.height, desc.width, desc.height
                ));
            }
        }
        Ok(())
    }

    // State and log queries used by tests and the demo

    pub fn bound_render_target(&self) -> Option<RenderTargetHandle> {
        self.bound_target
    }

    pub fn viewport(&self) -> (i32, i32, u32, u32) {
        self.viewport
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn reset_commands(&mut self) {
        self.commands.clear();
    }

    /// All indexed draws in issue order
    pub fn draws(&self) -> Vec<&DrawRecord> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::DrawIndexed(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Draws issued while the given target (or the default framebuffer,
    /// for `None`) was bound
    pub fn draws_into(&self, target: Option<RenderTargetHandle>) -> Vec<&DrawRecord> {
        self.draws()
            .into_iter()
            .filter(|d| d.target == target)
            .collect()
    }

    /// Whether any command bound an off-screen target
    pub fn bound_any_offscreen_target(&self) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c, Command::BindRenderTarget(Some(_))))
    }

    pub fn buffer_contents(&self, buffer: BufferHandle) -> Option<&[u8]> {
        self.buffers.get(&buffer.0).map(|b| b.contents.as_slice())
    }

    pub fn buffer_label(&self, buffer: BufferHandle) -> Option<&str> {
        self.buffers.get(&buffer.0).and_then(|b| b.label.as_deref())
    }

    pub fn buffer_usage(&self, buffer: BufferHandle) -> Option<BufferUsage> {
        self.buffers.get(&buffer.0).map(|b| b.usage)
    }

    /// Bytes of pixel data the texture was created with (0 when allocated
    /// without data)
    pub fn texture_data_len(&self, texture: TextureHandle) -> Option<usize> {
        self.textures.get(&texture.0).map(|t| t.data_len)
    }

    pub fn texture_descriptor(&self, texture: TextureHandle) -> Option<&TextureDescriptor> {
        self.textures.get(&texture.0).map(|t| &t.desc)
    }

    pub fn target_descriptor(&self, target: RenderTargetHandle) -> Option<&RenderTargetDescriptor> {
        self.targets.get(&target.0).map(|t| &t.desc)
    }

    pub fn program_label(&self, program: ProgramHandle) -> Option<&str> {
        self.programs.get(&program.0).map(|p| p.label.as_str())
    }

    /// Last value written to a named uniform slot
    pub fn uniform(&self, program: ProgramHandle, name: &str) -> Option<&OwnedUniform> {
        self.programs.get(&program.0).and_then(|p| p.uniforms.get(name))
    }

    pub fn bound_texture(&self, unit: u32) -> Option<TextureHandle> {
        self.texture_units.get(&unit).copied()
    }

    pub fn vertex_slot(&self, slot: u32) -> Option<BufferHandle> {
        self.vertex_slots.get(&slot).copied()
    }
}

impl GraphicsBackend for HeadlessBackend {
    fn new(width: u32, height: u32) -> BackendResult<Self> {
        Ok(Self {
            surface_width: width,
            surface_height: height,
            buffers: HashMap::new(),
            textures: HashMap::new(),
            targets: HashMap::new(),
            programs: HashMap::new(),
            next_buffer_id: 1,
            next_texture_id: 1,
            next_target_id: 1,
            next_program_id: 1,
            bound_target: None,
            viewport: (0, 0, width, height),
            current_program: None,
            texture_units: HashMap::new(),
            vertex_slots: HashMap::new(),
            index_buffer: None,
            frame_count: 0,
            commands: Vec::new(),
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.surface_width = width;
        self.surface_height = height;
    }

    fn surface_size(&self) -> (u32, u32) {
        (self.surface_width, self.surface_height)
    }

    fn begin_frame(&mut self) {
        self.frame_count += 1;
        self.commands.push(Command::BeginFrame);
    }

    fn end_frame(&mut self) {
        self.commands.push(Command::EndFrame);
    }

    fn create_buffer(
        &mut self,
        desc: &BufferDescriptor,
        data: &[u8],
    ) -> BackendResult<BufferHandle> {
        let id = self.next_buffer_id;
        self.next_buffer_id += 1;
        self.buffers.insert(
            id,
            BufferRecord {
                label: desc.label.clone(),
                usage: desc.usage,
                contents: data.to_vec(),
            },
        );
        Ok(BufferHandle(id))
    }

    fn write_buffer(&mut self, buffer: BufferHandle, data: &[u8]) -> BackendResult<()> {
        let record = self
            .buffers
            .get_mut(&buffer.0)
            .ok_or_else(|| BackendError::InvalidHandle(format!("buffer {}", buffer.0)))?;
        record.contents.clear();
        record.contents.extend_from_slice(data);
        Ok(())
    }

    fn create_texture(
        &mut self,
        desc: &TextureDescriptor,
        data: Option<&[u8]>,
    ) -> BackendResult<TextureHandle> {
        let faces = match desc.kind {
            TextureKind::D2 => 1,
            TextureKind::Cube => 6,
        };
        let expected =
            desc.width as usize * desc.height as usize * desc.format.bytes_per_pixel() as usize * faces;
        if let Some(bytes) = data {
            if bytes.len() != expected {
                return Err(BackendError::TextureCreationFailed(format!(
                    "{}: got {} bytes, expected {}",
                    desc.label.as_deref().unwrap_or("unnamed"),
                    bytes.len(),
                    expected
                )));
            }
        }
        let id = self.next_texture_id;
        self.next_texture_id += 1;
        self.textures.insert(
            id,
            TextureRecord {
                desc: desc.clone(),
                data_len: data.map(|d| d.len()).unwrap_or(0),
            },
        );
        Ok(TextureHandle(id))
    }

    fn create_render_target(
        &mut self,
        desc: &RenderTargetDescriptor,
    ) -> BackendResult<RenderTargetHandle> {
        let label = desc.label.clone().unwrap_or_else(|| "unnamed".into());
        if let Err(reason) = self.validate_target(desc) {
            return Err(BackendError::IncompleteRenderTarget { label, reason });
        }
        let id = self.next_target_id;
        self.next_target_id += 1;
        self.targets.insert(id, TargetRecord { desc: desc.clone() });
        Ok(RenderTargetHandle(id))
    }

    fn create_program(&mut self, label: &str) -> BackendResult<ProgramHandle> {
        let id = self.next_program_id;
        self.next_program_id += 1;
        self.programs.insert(
            id,
            ProgramRecord {
                label: label.to_string(),
                uniforms: HashMap::new(),
            },
        );
        Ok(ProgramHandle(id))
    }

    fn bind_render_target(&mut self, target: Option<RenderTargetHandle>) {
        if let Some(handle) = target {
            if !self.targets.contains_key(&handle.0) {
                error!("binding unknown render target {}", handle.0);
            }
        }
        self.bound_target = target;
        self.commands.push(Command::BindRenderTarget(target));
    }

    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.viewport = (x, y, width, height);
        self.commands.push(Command::SetViewport {
            x,
            y,
            width,
            height,
        });
    }

    fn clear(&mut self, color: Option<[f32; 4]>, depth: Option<f32>) {
        self.commands.push(Command::Clear {
            target: self.bound_target,
            color,
            depth,
        });
    }

    fn set_program(&mut self, program: ProgramHandle) {
        if !self.programs.contains_key(&program.0) {
            error!("activating unknown program {}", program.0);
        }
        self.current_program = Some(program);
        self.commands.push(Command::SetProgram(program));
    }

    fn set_uniform(
        &mut self,
        program: ProgramHandle,
        name: &str,
        value: UniformValue,
    ) -> BackendResult<()> {
        let record = self
            .programs
            .get_mut(&program.0)
            .ok_or_else(|| BackendError::InvalidHandle(format!("program {}", program.0)))?;
        let owned = OwnedUniform::from(value);
        record.uniforms.insert(name.to_string(), owned.clone());
        self.commands.push(Command::SetUniform {
            program,
            name: name.to_string(),
            value: owned,
        });
        Ok(())
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        if !self.textures.contains_key(&texture.0) {
            warn!("binding unknown texture {} to unit {}", texture.0, unit);
        }
        self.texture_units.insert(unit, texture);
        self.commands.push(Command::BindTexture { unit, texture });
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: BufferHandle) {
        self.vertex_slots.insert(slot, buffer);
        self.commands.push(Command::SetVertexBuffer { slot, buffer });
    }

    fn set_index_buffer(&mut self, buffer: BufferHandle) {
        self.index_buffer = Some(buffer);
        self.commands.push(Command::SetIndexBuffer(buffer));
    }

    fn draw_indexed(&mut self, index_count: u32) {
        if self.current_program.is_none() {
            error!("draw issued with no program bound");
        }
        if self.index_buffer.is_none() {
            error!("draw issued with no index buffer bound");
        }
        self.commands.push(Command::DrawIndexed(DrawRecord {
            target: self.bound_target,
            program: self.current_program,
            viewport: self.viewport,
            index_count,
        }));
    }

    fn destroy_buffer(&mut self, buffer: BufferHandle) {
        self.buffers.remove(&buffer.0);
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        self.textures.remove(&texture.0);
    }

    fn destroy_render_target(&mut self, target: RenderTargetHandle) {
        self.targets.remove(&target.0);
        if self.bound_target == Some(target) {
            self.bound_target = None;
        }
    }
}
