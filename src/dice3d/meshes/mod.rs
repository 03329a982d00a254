pub mod d10;
pub mod d12;
pub mod d20;
pub mod d4;
pub mod d6;
pub mod d8;

use bevy::log::warn;
use bevy::math::{Vec2, Vec3};
use bevy::prelude::Mesh;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use super::atlas::{AtlasDescriptor, UvRect};

pub use d10::{build_d10_faces, create_d10, D10Faces};
pub use d12::create_d12;
pub use d20::create_d20;
pub use d4::create_d4;
pub use d6::create_d6;
pub use d8::create_d8;

/// A triangle whose cross product comes out shorter than this is treated as
/// degenerate and given a fallback normal instead of a divide-by-near-zero.
pub const DEGENERATE_NORMAL_EPS: f32 = 1e-9;

/// CPU-side mesh buffers for one die.
///
/// Faces never share vertices across face boundaries, so flat normals stay
/// flat after the shared normal pass.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a triangle, re-winding it outward if the vertex order faces
    /// the origin.
    pub fn push_triangle(&mut self, mut verts: [Vec3; 3], mut uvs: [Vec2; 3]) {
        let normal = (verts[1] - verts[0]).cross(verts[2] - verts[0]);
        let centroid = (verts[0] + verts[1] + verts[2]) / 3.0;
        if normal.dot(centroid) < 0.0 {
            verts.swap(1, 2);
            uvs.swap(1, 2);
        }
        let base = self.positions.len() as u32;
        self.positions.extend(verts);
        self.uvs.extend(uvs);
        self.indices.extend([base, base + 1, base + 2]);
    }

    /// Append a planar quad as two triangles sharing four vertices.
    pub fn push_quad(&mut self, mut verts: [Vec3; 4], mut uvs: [Vec2; 4]) {
        let normal = (verts[1] - verts[0]).cross(verts[2] - verts[0]);
        let centroid = (verts[0] + verts[1] + verts[2] + verts[3]) / 4.0;
        if normal.dot(centroid) < 0.0 {
            verts.swap(1, 3);
            uvs.swap(1, 3);
        }
        let base = self.positions.len() as u32;
        self.positions.extend(verts);
        self.uvs.extend(uvs);
        self.indices
            .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// The shared normal pass every builder finishes with: one flat normal
    /// per triangle, assigned to its (unshared) vertices. No cross-face
    /// smoothing; the dice stay faceted.
    pub fn compute_flat_normals(&mut self) {
        self.normals = vec![Vec3::Y; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let cross = (self.positions[b] - self.positions[a])
                .cross(self.positions[c] - self.positions[a]);
            let normal = if cross.length_squared() > DEGENERATE_NORMAL_EPS {
                cross.normalize()
            } else {
                warn!("degenerate triangle while computing normals, using +Y");
                Vec3::Y
            };
            self.normals[a] = normal;
            self.normals[b] = normal;
            self.normals[c] = normal;
        }
    }

    /// Local-space bounding box, consumed by the optical centering pass.
    pub fn aabb(&self) -> (Vec3, Vec3) {
        if self.positions.is_empty() {
            return (Vec3::ZERO, Vec3::ZERO);
        }
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for p in &self.positions {
            min = min.min(*p);
            max = max.max(*p);
        }
        (min, max)
    }

    pub fn to_mesh(&self) -> Mesh {
        let positions: Vec<[f32; 3]> = self.positions.iter().map(|p| p.to_array()).collect();
        let normals: Vec<[f32; 3]> = self.normals.iter().map(|n| n.to_array()).collect();
        let uvs: Vec<[f32; 2]> = self.uvs.iter().map(|uv| uv.to_array()).collect();

        Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::default(),
        )
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
        .with_inserted_indices(Indices::U32(self.indices.clone()))
    }
}

/// UVs for a triangular face: an equilateral triangle centered in the tile,
/// apex up, scaled by `radius` (a fraction of the tile half-extent).
pub(crate) fn triangle_tile_uvs(rect: &UvRect, radius: f32) -> [Vec2; 3] {
    let mut out = [Vec2::ZERO; 3];
    for (k, uv) in out.iter_mut().enumerate() {
        let angle = std::f32::consts::FRAC_PI_2 + k as f32 * std::f32::consts::TAU / 3.0;
        *uv = rect.lerp(Vec2::new(
            0.5 + radius * angle.cos(),
            0.5 + radius * angle.sin(),
        ));
    }
    out
}

/// UVs for a pentagonal face rim: a regular pentagon centered in the tile,
/// apex up, scaled by `radius`.
pub(crate) fn pentagon_tile_uvs(rect: &UvRect, radius: f32) -> [Vec2; 5] {
    let mut out = [Vec2::ZERO; 5];
    for (k, uv) in out.iter_mut().enumerate() {
        let angle = std::f32::consts::FRAC_PI_2 + k as f32 * std::f32::consts::TAU / 5.0;
        *uv = rect.lerp(Vec2::new(
            0.5 + radius * angle.cos(),
            0.5 + radius * angle.sin(),
        ));
    }
    out
}

/// Build the mesh for a die with `sides` faces.
///
/// Unsupported side counts fall back to the cube so a bad caller value can
/// never take down the surrounding view.
pub fn build_geometry(sides: u32, atlas: &AtlasDescriptor) -> MeshData {
    match sides {
        4 => create_d4(atlas),
        6 => create_d6(atlas),
        8 => create_d8(atlas),
        10 => create_d10(atlas),
        12 => create_d12(atlas),
        20 => create_d20(atlas),
        other => {
            warn!("unsupported die side count {other}, falling back to d6");
            create_d6(atlas)
        }
    }
}
