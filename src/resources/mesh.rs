//! Triangle mesh import and derived-attribute computation
//!
//! Meshes are stored as one array per attribute channel rather than
//! interleaved, because surfaces upload each channel into its own buffer.

use glam::{Vec2, Vec3};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Mesh import error type
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Unsupported mesh format: {0}")]
    UnsupportedFormat(String),
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Face-corner index syntax, determined per face line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CornerSyntax {
    /// `v`
    Position,
    /// `v/t`
    PositionUv,
    /// `v//n`
    PositionNormal,
    /// `v/t/n`
    Full,
}

/// A triangle mesh with per-channel attribute arrays
///
/// `positions` and `indices` are always populated after a successful
/// import. `normals` matches the vertex count (derived when the source has
/// none). `uvs`, `tangents`, and `bitangents` are empty when the source
/// did not provide texture coordinates; tangent data always derives from
/// UV deltas and never exists without them.
#[derive(Debug, Clone, Default)]
pub struct TriMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub colors: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub tangents: Vec<Vec3>,
    pub bitangents: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl TriMesh {
    /// Import a mesh from a Wavefront OBJ file.
    ///
    /// Recognizes the four face-corner syntaxes (`v`, `v/t`, `v//n`,
    /// `v/t/n`) with 1-based indices. Face corners are deduplicated on
    /// their `(position, uv, normal)` index triple, 0 standing in for an
    /// absent slot, through an ordered map so re-imports of the same file
    /// yield identical vertex and index sequences. Only the first three
    /// corners of a face are used. Normals are derived when the source has
    /// none.
    pub fn import(path: impl AsRef<Path>) -> Result<TriMesh, MeshError> {
        let path = path.as_ref();
        let extension = path.extension().and_then(|e| e.to_str());
        if extension != Some("obj") {
            return Err(MeshError::UnsupportedFormat(path.display().to_string()));
        }
        let text = fs::read_to_string(path).map_err(|source| MeshError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut raw_positions: Vec<Vec3> = Vec::new();
        let mut raw_uvs: Vec<Vec2> = Vec::new();
        let mut raw_normals: Vec<Vec3> = Vec::new();

        // First pass: attribute records
        for (line_no, line) in text.lines().enumerate() {
            let line_no = line_no + 1;
            let mut parts = line.split_whitespace();
            match parts.next() {
                Some("v") => raw_positions.push(parse_vec3(parts, line_no)?),
                Some("vt") => raw_uvs.push(parse_vec2(parts, line_no)?),
                Some("vn") => raw_normals.push(parse_vec3(parts, line_no)?),
                _ => {}
            }
        }

        let mut mesh = TriMesh::default();
        let mut corner_map: BTreeMap<[u32; 3], u32> = BTreeMap::new();
        let mut skipped_corners = false;

        // Second pass: faces
        for (line_no, line) in text.lines().enumerate() {
            let line_no = line_no + 1;
            let mut parts = line.split_whitespace();
            if parts.next() != Some("f") {
                continue;
            }
            let corners: Vec<&str> = parts.collect();
            if corners.len() < 3 {
                warn!("line {}: face with fewer than 3 corners, skipped", line_no);
                continue;
            }
            if corners.len() > 3 {
                skipped_corners = true;
            }
            let syntax = corner_syntax(corners[0]);
            for corner in &corners[..3] {
                let key = parse_corner(
                    corner,
                    syntax,
                    line_no,
                    raw_positions.len(),
                    raw_uvs.len(),
                    raw_normals.len(),
                )?;
                let next = corner_map.len() as u32;
                let index = *corner_map.entry(key).or_insert_with(|| {
                    mesh.positions.push(raw_positions[key[0] as usize - 1]);
                    if key[1] > 0 {
                        mesh.uvs.push(raw_uvs[key[1] as usize - 1]);
                    }
                    if key[2] > 0 {
                        mesh.normals.push(raw_normals[key[2] as usize - 1]);
                    }
                    next
                });
                mesh.indices.push(index);
            }
        }

        if skipped_corners {
            warn!(
                "{}: non-triangular faces found, extra corners ignored",
                path.display()
            );
        }
        if mesh.normals.is_empty() && !mesh.positions.is_empty() {
            mesh.compute_vertex_normals();
        }
        info!(
            "imported {} ({} vertices, {} triangles)",
            path.display(),
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Ok(mesh)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    pub fn has_colors(&self) -> bool {
        !self.colors.is_empty()
    }

    pub fn has_uvs(&self) -> bool {
        !self.uvs.is_empty()
    }

    pub fn has_tangents(&self) -> bool {
        !self.tangents.is_empty()
    }

    pub fn has_bitangents(&self) -> bool {
        !self.bitangents.is_empty()
    }

    /// Derive per-vertex normals: accumulate the unnormalized cross
    /// product of each triangle's edges into its three vertices, then
    /// normalize. The unnormalized cross weighs contributions by triangle
    /// area. Vertices referenced by no triangle keep a zero vector.
    pub fn compute_vertex_normals(&mut self) {
        let mut accumulators = vec![Vec3::ZERO; self.positions.len()];
        for triangle in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            ];
            let edge1 = self.positions[i1] - self.positions[i0];
            let edge2 = self.positions[i2] - self.positions[i0];
            let cross = edge1.cross(edge2);
            accumulators[i0] += cross;
            accumulators[i1] += cross;
            accumulators[i2] += cross;
        }
        let mut zero_count = 0usize;
        self.normals = accumulators
            .into_iter()
            .map(|acc| {
                let normal = acc.normalize_or_zero();
                if normal == Vec3::ZERO {
                    zero_count += 1;
                }
                normal
            })
            .collect();
        if zero_count > 0 {
            debug!("{} vertices with no incident triangle keep a zero normal", zero_count);
        }
    }

    /// Derive a per-vertex tangent/bitangent frame from position and UV
    /// edge deltas. Requires UV coordinates; computes normals first when
    /// they are missing.
    ///
    /// Every corner of every triangle writes its vertex's slot, so a
    /// vertex shared between triangles carries the basis of the last
    /// triangle visited. Corners whose UV determinant vanishes are
    /// skipped.
    pub fn compute_tangent_basis(&mut self) {
        if self.uvs.is_empty() {
            warn!("tangent basis requested for a mesh without texture coordinates");
            return;
        }
        if self.normals.is_empty() {
            self.compute_vertex_normals();
        }
        self.tangents = vec![Vec3::ZERO; self.positions.len()];
        self.bitangents = vec![Vec3::ZERO; self.positions.len()];
        let mut degenerate = 0usize;
        for triangle in self.indices.chunks_exact(3) {
            let corners = [
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            ];
            for rotation in 0..3 {
                let a = corners[rotation];
                let b = corners[(rotation + 1) % 3];
                let c = corners[(rotation + 2) % 3];
                let delta_pos1 = self.positions[b] - self.positions[a];
                let delta_pos2 = self.positions[c] - self.positions[a];
                let delta_uv1 = self.uvs[b] - self.uvs[a];
                let delta_uv2 = self.uvs[c] - self.uvs[a];
                let det = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
                if det.abs() < f32::EPSILON {
                    degenerate += 1;
                    continue;
                }
                let r = 1.0 / det;
                self.tangents[a] = (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r;
                self.bitangents[a] = (delta_pos2 * delta_uv1.x - delta_pos1 * delta_uv2.x) * r;
            }
        }
        if degenerate > 0 {
            debug!("{} corners with degenerate UVs skipped in tangent computation", degenerate);
        }
    }

    /// Min/max corner of all vertex positions. An empty mesh yields a
    /// zero-sized box.
    pub fn bounding_box(&self) -> (Vec3, Vec3) {
        if self.positions.is_empty() {
            warn!("bounding box of an empty mesh");
            return (Vec3::ZERO, Vec3::ZERO);
        }
        let mut min = self.positions[0];
        let mut max = self.positions[0];
        for &position in &self.positions[1..] {
            min = min.min(position);
            max = max.max(position);
        }
        (min, max)
    }

    /// Bounding-box center
    pub fn center(&self) -> Vec3 {
        let (min, max) = self.bounding_box();
        (min + max) * 0.5
    }

    /// Half the bounding-box diagonal, the scene's characteristic size
    pub fn radius(&self) -> f32 {
        let (min, max) = self.bounding_box();
        (max - min).length() * 0.5
    }
}

fn parse_vec3<'a>(
    mut parts: impl Iterator<Item = &'a str>,
    line_no: usize,
) -> Result<Vec3, MeshError> {
    let mut out = [0.0f32; 3];
    for slot in &mut out {
        let token = parts.next().ok_or(MeshError::Parse {
            line: line_no,
            message: "expected 3 components".into(),
        })?;
        *slot = token.parse().map_err(|_| MeshError::Parse {
            line: line_no,
            message: format!("bad number {token:?}"),
        })?;
    }
    Ok(Vec3::from_array(out))
}

fn parse_vec2<'a>(
    mut parts: impl Iterator<Item = &'a str>,
    line_no: usize,
) -> Result<Vec2, MeshError> {
    let mut out = [0.0f32; 2];
    for slot in &mut out {
        let token = parts.next().ok_or(MeshError::Parse {
            line: line_no,
            message: "expected 2 components".into(),
        })?;
        *slot = token.parse().map_err(|_| MeshError::Parse {
            line: line_no,
            message: format!("bad number {token:?}"),
        })?;
    }
    Ok(Vec2::from_array(out))
}

fn corner_syntax(token: &str) -> CornerSyntax {
    if token.contains("//") {
        CornerSyntax::PositionNormal
    } else {
        match token.matches('/').count() {
            0 => CornerSyntax::Position,
            1 => CornerSyntax::PositionUv,
            _ => CornerSyntax::Full,
        }
    }
}

/// Parse one face corner into its `(position, uv, normal)` dedup key,
/// 1-based with 0 for an absent slot, validating every index against the
/// attribute counts seen in the first pass.
fn parse_corner(
    token: &str,
    syntax: CornerSyntax,
    line_no: usize,
    position_count: usize,
    uv_count: usize,
    normal_count: usize,
) -> Result<[u32; 3], MeshError> {
    let parse_index = |part: Option<&str>, limit: usize, what: &str| -> Result<u32, MeshError> {
        let part = part.ok_or(MeshError::Parse {
            line: line_no,
            message: format!("missing {what} index in {token:?}"),
        })?;
        let index: u32 = part.parse().map_err(|_| MeshError::Parse {
            line: line_no,
            message: format!("bad {what} index {part:?}"),
        })?;
        if index == 0 || index as usize > limit {
            return Err(MeshError::Parse {
                line: line_no,
                message: format!("{what} index {index} out of range (1..={limit})"),
            });
        }
        Ok(index)
    };

    let mut slots = token.split('/');
    let position = parse_index(slots.next(), position_count, "position")?;
    match syntax {
        CornerSyntax::Position => Ok([position, 0, 0]),
        CornerSyntax::PositionUv => {
            let uv = parse_index(slots.next(), uv_count, "uv")?;
            Ok([position, uv, 0])
        }
        CornerSyntax::PositionNormal => {
            // Empty slot between the two slashes
            slots.next();
            let normal = parse_index(slots.next(), normal_count, "normal")?;
            Ok([position, 0, normal])
        }
        CornerSyntax::Full => {
            let uv = parse_index(slots.next(), uv_count, "uv")?;
            let normal = parse_index(slots.next(), normal_count, "normal")?;
            Ok([position, uv, normal])
        }
    }
}
