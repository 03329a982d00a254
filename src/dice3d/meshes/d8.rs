use bevy::math::Vec3;

use crate::dice3d::atlas::AtlasDescriptor;

use super::{triangle_tile_uvs, MeshData};

/// Octahedron: 6 vertices, 8 triangular faces. Each face sits in one octant;
/// the sign triple picks its three axis vertices.
pub fn create_d8(atlas: &AtlasDescriptor) -> MeshData {
    let size = 0.5;

    let px = Vec3::new(size, 0.0, 0.0);
    let nx = Vec3::new(-size, 0.0, 0.0);
    let py = Vec3::new(0.0, size, 0.0);
    let ny = Vec3::new(0.0, -size, 0.0);
    let pz = Vec3::new(0.0, 0.0, size);
    let nz = Vec3::new(0.0, 0.0, -size);

    // One face per octant, vertices ordered outward, numbered so the upper
    // half carries 1-4 and the lower half 5-8.
    let faces: [([Vec3; 3], u32); 8] = [
        ([px, py, pz], 1),
        ([nx, pz, py], 2),
        ([px, nz, py], 3),
        ([nx, py, nz], 4),
        ([nx, nz, ny], 5),
        ([px, ny, nz], 6),
        ([nx, ny, pz], 7),
        ([px, pz, ny], 8),
    ];

    let mut mesh = MeshData::new();
    for (verts, number) in faces {
        let rect = atlas.layout.rect_for(number);
        let uvs = triangle_tile_uvs(&rect, atlas.config.tri_uv_radius);
        mesh.push_triangle(verts, uvs);
    }
    mesh.compute_flat_normals();
    mesh
}
