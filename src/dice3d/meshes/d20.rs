use bevy::math::Vec3;

use crate::dice3d::atlas::AtlasDescriptor;

use super::{triangle_tile_uvs, MeshData};

/// Triangular faces over the golden-rectangle vertices.
const FACES: [[usize; 3]; 20] = [
    [0, 1, 8],
    [0, 8, 4],
    [0, 4, 5],
    [0, 5, 9],
    [0, 9, 1],
    [1, 6, 8],
    [8, 6, 10],
    [8, 10, 4],
    [4, 10, 2],
    [4, 2, 5],
    [5, 2, 11],
    [5, 11, 9],
    [9, 11, 7],
    [9, 7, 1],
    [1, 7, 6],
    [3, 6, 7],
    [3, 10, 6],
    [3, 2, 10],
    [3, 11, 2],
    [3, 7, 11],
];

/// Icosahedron: 12 vertices from three golden rectangles, normalized onto
/// the unit sphere, 20 triangular faces numbered in table order.
pub fn create_d20(atlas: &AtlasDescriptor) -> MeshData {
    let size = 0.6;
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;

    let verts: [Vec3; 12] = [
        Vec3::new(0.0, 1.0, phi),
        Vec3::new(0.0, -1.0, phi),
        Vec3::new(0.0, 1.0, -phi),
        Vec3::new(0.0, -1.0, -phi),
        Vec3::new(1.0, phi, 0.0),
        Vec3::new(-1.0, phi, 0.0),
        Vec3::new(1.0, -phi, 0.0),
        Vec3::new(-1.0, -phi, 0.0),
        Vec3::new(phi, 0.0, 1.0),
        Vec3::new(-phi, 0.0, 1.0),
        Vec3::new(phi, 0.0, -1.0),
        Vec3::new(-phi, 0.0, -1.0),
    ]
    .map(|v| v.normalize() * size);

    let mut mesh = MeshData::new();
    for (i, face) in FACES.iter().enumerate() {
        let number = (i + 1) as u32;
        let rect = atlas.layout.rect_for(number);
        let uvs = triangle_tile_uvs(&rect, atlas.config.tri_uv_radius);
        mesh.push_triangle([verts[face[0]], verts[face[1]], verts[face[2]]], uvs);
    }
    mesh.compute_flat_normals();
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice3d::atlas::build_atlas;
    use crate::dice3d::config::resolve_render_config;

    #[test]
    fn test_d20_has_20_faces() {
        let config = resolve_render_config(20, None);
        let atlas = build_atlas(20, &config, None);
        let mesh = create_d20(&atlas);
        assert_eq!(mesh.indices.len() / 3, 20);
    }

    #[test]
    fn test_vertices_sit_on_a_sphere() {
        let config = resolve_render_config(20, None);
        let atlas = build_atlas(20, &config, None);
        let mesh = create_d20(&atlas);
        let r = mesh.positions[0].length();
        for p in &mesh.positions {
            assert!((p.length() - r).abs() < 1e-5);
        }
    }

    #[test]
    fn test_faces_are_equilateral() {
        let config = resolve_render_config(20, None);
        let atlas = build_atlas(20, &config, None);
        let mesh = create_d20(&atlas);
        for tri in mesh.indices.chunks_exact(3) {
            let a = mesh.positions[tri[0] as usize];
            let b = mesh.positions[tri[1] as usize];
            let c = mesh.positions[tri[2] as usize];
            let e0 = (b - a).length();
            let e1 = (c - b).length();
            let e2 = (a - c).length();
            assert!((e0 - e1).abs() < 1e-5);
            assert!((e1 - e2).abs() < 1e-5);
        }
    }
}
