//! Texture loading and management
//!
//! Decode failures are fatal for single 2D textures and propagate as
//! errors. Cubemaps degrade instead: a partial face failure produces a
//! zero-initialized texture flagged invalid, but a handle is still
//! created and used.

use crate::backend::traits::*;
use crate::backend::types::*;
use image::GenericImageView;
use log::warn;
use std::path::Path;
use thiserror::Error;

/// Texture decode error type
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to decode {path}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// Cubemap face names, in the fixed +x, -x, +y, -y, +z, -z order
pub const CUBEMAP_FACES: [&str; 6] = ["posx", "negx", "posy", "negy", "posz", "negz"];

/// Decoded 2D texture data
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub data: Vec<u8>,
    pub name: String,
}

impl TextureData {
    /// Decode a texture from an image file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        let img = image::open(path).map_err(|source| TextureError::Decode {
            path: path.display().to_string(),
            source,
        })?;
        let (width, height) = img.dimensions();
        Ok(Self {
            width,
            height,
            format: TextureFormat::Rgba8Unorm,
            data: img.to_rgba8().into_raw(),
            name,
        })
    }

    /// Create a solid color texture
    pub fn solid_color(color: [u8; 4], name: &str) -> Self {
        Self {
            width: 1,
            height: 1,
            format: TextureFormat::Rgba8Unorm,
            data: color.to_vec(),
            name: name.to_string(),
        }
    }

    /// Create a default white texture
    pub fn white() -> Self {
        Self::solid_color([255, 255, 255, 255], "white")
    }

    /// Create a default normal map (pointing up in tangent space)
    pub fn default_normal() -> Self {
        Self::solid_color([128, 128, 255, 255], "default_normal")
    }

    /// Upload to the backend
    pub fn upload<B: GraphicsBackend>(&self, backend: &mut B) -> BackendResult<TextureHandle> {
        backend.create_texture(
            &TextureDescriptor {
                label: Some(self.name.clone()),
                width: self.width,
                height: self.height,
                kind: TextureKind::D2,
                format: self.format,
                mag_filter: FilterMode::Linear,
                min_filter: FilterMode::Linear,
                address_mode: AddressMode::Repeat,
                border_color: None,
            },
            Some(&self.data),
        )
    }
}

/// Decoded cubemap data, six square faces
pub struct CubemapData {
    pub size: u32,
    /// Concatenated face data in the fixed face order
    pub data: Vec<u8>,
    /// False when any face failed to decode or did not match the first
    /// face's dimensions; the data is zero-filled for those faces.
    pub is_valid: bool,
    pub name: String,
}

impl CubemapData {
    /// Decode the six faces `<dir>/{posx,negx,posy,negy,posz,negz}.<ext>`.
    ///
    /// Face failures do not propagate: the failed faces stay zero-filled,
    /// `is_valid` turns false, and loading continues.
    pub fn load(dir: impl AsRef<Path>, extension: &str) -> Self {
        let dir = dir.as_ref();
        let name = dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("cubemap")
            .to_string();

        let mut faces: [Option<TextureData>; 6] = [None, None, None, None, None, None];
        for (slot, face) in faces.iter_mut().zip(CUBEMAP_FACES) {
            let path = dir.join(format!("{face}.{extension}"));
            match TextureData::from_file(&path) {
                Ok(data) => *slot = Some(data),
                Err(err) => warn!("cubemap face {}: {err}", path.display()),
            }
        }

        let size = faces
            .iter()
            .flatten()
            .next()
            .map(|face| face.width)
            .unwrap_or(1);
        let face_bytes = (size * size * 4) as usize;
        let mut data = Vec::with_capacity(face_bytes * 6);
        let mut is_valid = true;
        for (face, face_name) in faces.iter().zip(CUBEMAP_FACES) {
            match face {
                Some(decoded) if decoded.width == size && decoded.height == size => {
                    data.extend_from_slice(&decoded.data);
                }
                Some(decoded) => {
                    warn!(
                        "cubemap face {face_name} is {}x{}, expected {size}x{size}",
                        decoded.width, decoded.height
                    );
                    data.resize(data.len() + face_bytes, 0);
                    is_valid = false;
                }
                None => {
                    data.resize(data.len() + face_bytes, 0);
                    is_valid = false;
                }
            }
        }
        if !is_valid {
            warn!("cubemap {name} is incomplete and will sample as garbage");
        }
        Self {
            size,
            data,
            is_valid,
            name,
        }
    }

    /// Upload to the backend. An invalid cubemap still produces a handle,
    /// zero-initialized where faces failed.
    pub fn upload<B: GraphicsBackend>(&self, backend: &mut B) -> BackendResult<TextureHandle> {
        backend.create_texture(
            &TextureDescriptor {
                label: Some(self.name.clone()),
                width: self.size,
                height: self.size,
                kind: TextureKind::Cube,
                format: TextureFormat::Rgba8Unorm,
                mag_filter: FilterMode::Linear,
                min_filter: FilterMode::Linear,
                address_mode: AddressMode::ClampToEdge,
                border_color: None,
            },
            Some(&self.data),
        )
    }
}
