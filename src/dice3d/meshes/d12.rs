use bevy::math::Vec3;

use crate::dice3d::atlas::AtlasDescriptor;

use super::{pentagon_tile_uvs, MeshData};

/// Pentagonal faces as rim-vertex rings (outward winding) with printed
/// numbers. Opposite faces sum to 13.
const FACES: [([usize; 5], u32); 12] = [
    ([13, 15, 7, 11, 3], 1),
    ([7, 19, 6, 10, 11], 2),
    ([5, 18, 19, 7, 15], 3),
    ([14, 12, 2, 10, 6], 4),
    ([9, 8, 4, 18, 5], 5),
    ([16, 1, 13, 3, 17], 6),
    ([1, 9, 5, 15, 13], 9),
    ([2, 17, 3, 11, 10], 8),
    ([18, 4, 14, 6, 19], 7),
    ([4, 8, 0, 12, 14], 12),
    ([8, 9, 1, 16, 0], 11),
    ([0, 16, 17, 2, 12], 10),
];

/// Dodecahedron: 20 vertices from the golden-ratio construction, 12
/// pentagonal faces fan-triangulated around their centroids.
pub fn create_d12(atlas: &AtlasDescriptor) -> MeshData {
    let size = 0.5;
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let inv_phi = 1.0 / phi;
    let s = size * 0.4;

    // Cube corners plus the three golden rectangles.
    let verts: [Vec3; 20] = [
        Vec3::new(-s, -s, -s),
        Vec3::new(-s, -s, s),
        Vec3::new(-s, s, -s),
        Vec3::new(-s, s, s),
        Vec3::new(s, -s, -s),
        Vec3::new(s, -s, s),
        Vec3::new(s, s, -s),
        Vec3::new(s, s, s),
        Vec3::new(0.0, -phi * s, -inv_phi * s),
        Vec3::new(0.0, -phi * s, inv_phi * s),
        Vec3::new(0.0, phi * s, -inv_phi * s),
        Vec3::new(0.0, phi * s, inv_phi * s),
        Vec3::new(-inv_phi * s, 0.0, -phi * s),
        Vec3::new(-inv_phi * s, 0.0, phi * s),
        Vec3::new(inv_phi * s, 0.0, -phi * s),
        Vec3::new(inv_phi * s, 0.0, phi * s),
        Vec3::new(-phi * s, -inv_phi * s, 0.0),
        Vec3::new(-phi * s, inv_phi * s, 0.0),
        Vec3::new(phi * s, -inv_phi * s, 0.0),
        Vec3::new(phi * s, inv_phi * s, 0.0),
    ];

    let mut mesh = MeshData::new();
    for (rim, number) in FACES {
        let centroid: Vec3 = rim.iter().map(|&k| verts[k]).sum::<Vec3>() / 5.0;
        let rect = atlas.layout.rect_for(number);
        let rim_uvs = pentagon_tile_uvs(&rect, atlas.config.pent_uv_radius);

        // Centroid plus rim, shared inside the face only.
        let base = mesh.positions.len() as u32;
        mesh.positions.push(centroid);
        mesh.uvs.push(rect.center());
        for (&k, uv) in rim.iter().zip(rim_uvs) {
            mesh.positions.push(verts[k]);
            mesh.uvs.push(uv);
        }
        for k in 0..5u32 {
            let next = (k + 1) % 5;
            mesh.indices.extend([base, base + 1 + k, base + 1 + next]);
        }
    }
    mesh.compute_flat_normals();
    mesh
}
