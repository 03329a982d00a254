use bevy::math::Vec3;

use crate::dice3d::atlas::AtlasDescriptor;

use super::{triangle_tile_uvs, MeshData};

/// Face index -> printed number. The tetrahedron has no opposite faces, so
/// the table is a plain enumeration.
const FACE_NUMBERS: [u32; 4] = [1, 2, 3, 4];

/// Tetrahedron: 4 vertices, 4 triangular faces.
pub fn create_d4(atlas: &AtlasDescriptor) -> MeshData {
    let size = 0.8;
    let s = size / 3.0_f32.sqrt();

    // Alternating cube corners give a regular tetrahedron centered at origin.
    let verts = [
        Vec3::new(1.0, 1.0, 1.0) * s,
        Vec3::new(1.0, -1.0, -1.0) * s,
        Vec3::new(-1.0, 1.0, -1.0) * s,
        Vec3::new(-1.0, -1.0, 1.0) * s,
    ];

    let faces: [[usize; 3]; 4] = [[1, 3, 2], [0, 2, 3], [0, 3, 1], [0, 1, 2]];

    let mut mesh = MeshData::new();
    for (face, number) in faces.iter().zip(FACE_NUMBERS) {
        let rect = atlas.layout.rect_for(number);
        let uvs = triangle_tile_uvs(&rect, atlas.config.tri_uv_radius);
        mesh.push_triangle([verts[face[0]], verts[face[1]], verts[face[2]]], uvs);
    }
    mesh.compute_flat_normals();
    mesh
}
