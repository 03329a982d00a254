use bevy::math::{Vec2, Vec3};

use crate::dice3d::atlas::AtlasDescriptor;

use super::MeshData;

/// Cube: 8 corners, 6 quad faces. Opposite faces sum to 7.
pub fn create_d6(atlas: &AtlasDescriptor) -> MeshData {
    let size = 0.6;
    let s = size / 2.0;

    // Axis direction and printed number per face:
    // +Y=6 -Y=1 +X=3 -X=4 +Z=2 -Z=5.
    let faces: [(Vec3, u32); 6] = [
        (Vec3::Y, 6),
        (Vec3::NEG_Y, 1),
        (Vec3::X, 3),
        (Vec3::NEG_X, 4),
        (Vec3::Z, 2),
        (Vec3::NEG_Z, 5),
    ];

    let mut mesh = MeshData::new();
    for (axis, number) in faces {
        // In-plane basis as seen from outside the face.
        let reference = if axis.y.abs() > 0.5 { Vec3::Z } else { Vec3::Y };
        let right = reference.cross(axis).normalize();
        let face_up = axis.cross(right);
        let center = axis * s;

        // Bottom-left, bottom-right, top-right, top-left.
        let corners = [
            center - right * s - face_up * s,
            center + right * s - face_up * s,
            center + right * s + face_up * s,
            center - right * s + face_up * s,
        ];

        // Axis-aligned faces map straight onto the tile rect, no projection.
        let rect = atlas.layout.rect_for(number);
        let uvs = [
            Vec2::new(rect.u0, rect.v0),
            Vec2::new(rect.u1, rect.v0),
            Vec2::new(rect.u1, rect.v1),
            Vec2::new(rect.u0, rect.v1),
        ];
        mesh.push_quad(corners, uvs);
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
    fn test_d6_has_6_quads() {
        let config = resolve_render_config(6, None);
        let atlas = build_atlas(6, &config, None);
        let mesh = create_d6(&atlas);
        assert_eq!(mesh.positions.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
    }

    #[test]
    fn test_d6_quads_fill_their_tiles() {
        let config = resolve_render_config(6, None);
        let atlas = build_atlas(6, &config, None);
        let mesh = create_d6(&atlas);
        // Each face's four UVs span exactly the tile rect of some number.
        for quad in mesh.uvs.chunks_exact(4) {
            let center_u = quad.iter().map(|uv| uv.x).sum::<f32>() / 4.0;
            let center_v = quad.iter().map(|uv| uv.y).sum::<f32>() / 4.0;
            let number = atlas.layout.number_at(center_u, center_v);
            let rect = atlas.layout.rect_for(number);
            let min_u = quad.iter().map(|uv| uv.x).fold(f32::INFINITY, f32::min);
            let max_u = quad.iter().map(|uv| uv.x).fold(f32::NEG_INFINITY, f32::max);
            assert!((min_u - rect.u0).abs() < 1e-6);
            assert!((max_u - rect.u1).abs() < 1e-6);
        }
    }
}
