//! Resource management
//!
//! Handles loading and management of meshes, textures, materials, and
//! the draw surfaces built from them.

mod material;
mod mesh;
mod surface;
mod texture;

pub use material::*;
pub use mesh::*;
pub use surface::*;
pub use texture::*;
