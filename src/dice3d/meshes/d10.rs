//! Pentagonal trapezohedron.
//!
//! Ten kite-shaped faces built from two half-step-twisted pentagonal rings
//! plus two apexes. The apex height is not a free constant: it is solved so
//! every kite is exactly planar, which the UV projection below relies on.

use bevy::log::warn;
use bevy::math::{Vec2, Vec3};

use crate::dice3d::atlas::AtlasDescriptor;

use super::MeshData;

/// Belt ring radius before the final die scale.
pub const RING_RADIUS: f32 = 1.0;
/// Half-height of the belt rings. The planar-apex solve puts the apexes at
/// roughly 9.5x this value.
pub const BELT_HALF_HEIGHT: f32 = 0.105;
/// A face plane whose normal has |y| under this is too horizontal to solve
/// the apex height against; the fallback constant is used instead.
pub const DEGENERATE_PLANE_EPS: f32 = 1e-6;
/// Apex height used when the plane solve is degenerate.
pub const FALLBACK_APEX_HEIGHT: f32 = 0.95;
/// Uniform scale from the unit construction to die size.
const D10_SIZE: f32 = 0.5;

/// A projected-extent axis shorter than this maps to the tile midpoint
/// instead of dividing by a near-zero range.
pub const ZERO_EXTENT_EPS: f32 = 1e-6;

/// Face index -> printed number, interleaved top/bottom caps.
///
/// Even indices are top-cap kites and carry 1..=5; odd indices are
/// bottom-cap kites and carry 6..=10. Opposite faces (i, i+5) sum to 11 and
/// walking the list alternates between the low and high groups, matching a
/// physical d10.
pub const FACE_NUMBERS: [u32; 10] = [1, 7, 5, 9, 3, 10, 4, 6, 2, 8];

/// The raw d10 construction, exposed for direct testing.
#[derive(Debug, Clone)]
pub struct D10Faces {
    pub faces: [[Vec3; 4]; 10],
    pub face_numbers: [u32; 10],
    pub upper_ring: [Vec3; 5],
    pub lower_ring: [Vec3; 5],
    pub top_apex: Vec3,
    pub bottom_apex: Vec3,
}

/// Solve the apex Y that puts `(0, y, 0)` on the plane through `a`, `b`, `c`.
///
/// Solved in f64 so the emitted f32 quads stay planar to well under the
/// test tolerance.
fn solve_apex_height(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    let (a, b, c) = (a.as_dvec3(), b.as_dvec3(), c.as_dvec3());
    let n = (b - a).cross(c - a);
    if n.y.abs() < DEGENERATE_PLANE_EPS as f64 {
        warn!("degenerate d10 face plane, using fallback apex height");
        return FALLBACK_APEX_HEIGHT;
    }
    (n.dot(a) / n.y) as f32
}

pub fn build_d10_faces() -> D10Faces {
    let step = std::f32::consts::TAU / 5.0;

    let mut upper_ring = [Vec3::ZERO; 5];
    let mut lower_ring = [Vec3::ZERO; 5];
    for i in 0..5 {
        let a = i as f32 * step;
        upper_ring[i] = Vec3::new(a.cos() * RING_RADIUS, BELT_HALF_HEIGHT, a.sin() * RING_RADIUS);
        let a = (i as f32 + 0.5) * step;
        lower_ring[i] = Vec3::new(a.cos() * RING_RADIUS, -BELT_HALF_HEIGHT, a.sin() * RING_RADIUS);
    }

    let apex_y = solve_apex_height(upper_ring[0], lower_ring[0], upper_ring[1]).abs();
    let top_apex = Vec3::new(0.0, apex_y, 0.0);
    let bottom_apex = -top_apex;

    // Kites listed with outward winding: apex, then the rim walked
    // counter-clockwise as seen from outside.
    let mut faces = [[Vec3::ZERO; 4]; 10];
    for i in 0..5 {
        let next = (i + 1) % 5;
        faces[i * 2] = [top_apex, upper_ring[next], lower_ring[i], upper_ring[i]];
        faces[i * 2 + 1] = [bottom_apex, lower_ring[i], upper_ring[next], lower_ring[next]];
    }

    // Scale the whole construction down to die size.
    for face in &mut faces {
        for v in face.iter_mut() {
            *v *= D10_SIZE;
        }
    }
    for v in upper_ring.iter_mut().chain(lower_ring.iter_mut()) {
        *v *= D10_SIZE;
    }

    D10Faces {
        faces,
        face_numbers: FACE_NUMBERS,
        upper_ring,
        lower_ring,
        top_apex: top_apex * D10_SIZE,
        bottom_apex: bottom_apex * D10_SIZE,
    }
}

pub fn create_d10(atlas: &AtlasDescriptor) -> MeshData {
    let built = build_d10_faces();

    let mut mesh = MeshData::new();
    for (face, number) in built.faces.iter().zip(built.face_numbers) {
        let mut quad = *face;
        ensure_outward(&mut quad);
        let uvs = project_quad_uvs(&quad, number, atlas);
        mesh.push_quad(quad, uvs);
    }
    mesh.compute_flat_normals();
    mesh
}

/// Reverse the quad's vertex order if its winding normal disagrees with the
/// centroid direction. Must run before projection so the projected corners
/// keep a consistent orientation.
fn ensure_outward(quad: &mut [Vec3; 4]) {
    let normal = (quad[1] - quad[0]).cross(quad[2] - quad[0]);
    let centroid = (quad[0] + quad[1] + quad[2] + quad[3]) / 4.0;
    if normal.dot(centroid) < 0.0 {
        quad.swap(1, 3);
    }
}

/// Project a kite's corners into its atlas tile.
///
/// The corners are flattened into an in-plane basis, normalized by their
/// projected bounding box, optionally recentered and nudged per cap, then
/// mapped into the tile rect with an inward padding.
fn project_quad_uvs(quad: &[Vec3; 4], number: u32, atlas: &AtlasDescriptor) -> [Vec2; 4] {
    let config = &atlas.config;

    let normal = (quad[1] - quad[0]).cross(quad[2] - quad[0]).normalize_or_zero();
    // Any axis not parallel to the face works as the in-plane reference.
    let reference = if normal.y.abs() < 0.99 { Vec3::Y } else { Vec3::X };
    let tangent = reference.cross(normal).normalize_or_zero();
    let bitangent = normal.cross(tangent);

    let projected = quad.map(|p| Vec2::new(p.dot(tangent), p.dot(bitangent)));

    let mut min = projected[0];
    let mut max = projected[0];
    for p in &projected[1..] {
        min = min.min(*p);
        max = max.max(*p);
    }
    let extent = max - min;

    let mut normalized = projected.map(|p| {
        Vec2::new(
            normalize_axis(p.x, min.x, extent.x),
            normalize_axis(p.y, min.y, extent.y),
        )
    });

    if config.d10_auto_center {
        let mean = normalized.iter().copied().sum::<Vec2>() / 4.0;
        let shift = Vec2::splat(0.5) - mean;
        for p in &mut normalized {
            *p += shift;
        }
    }

    // Empirically tuned per-cap correction for the kite asymmetry.
    let group_offset = if number <= 5 {
        Vec2::new(config.d10_top_offset_x, config.d10_top_offset_y)
    } else {
        Vec2::new(config.d10_bottom_offset_x, config.d10_bottom_offset_y)
    };

    let rect = atlas.layout.rect_for(number);
    let pad = config.d10_padding;
    normalized.map(|p| {
        let p = (p + group_offset).clamp(Vec2::ZERO, Vec2::ONE);
        rect.lerp(Vec2::new(
            pad + p.x * (1.0 - 2.0 * pad),
            pad + p.y * (1.0 - 2.0 * pad),
        ))
    })
}

fn normalize_axis(v: f32, min: f32, extent: f32) -> f32 {
    if extent < ZERO_EXTENT_EPS {
        0.5
    } else {
        (v - min) / extent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice3d::atlas::build_atlas;
    use crate::dice3d::config::resolve_render_config;

    /// Planarity error of a quad, evaluated in f64 so the assertion measures
    /// the construction rather than f32 arithmetic noise.
    fn planarity_error(quad: &[Vec3; 4]) -> f64 {
        let p: Vec<[f64; 3]> = quad
            .iter()
            .map(|v| [v.x as f64, v.y as f64, v.z as f64])
            .collect();
        let sub = |a: &[f64; 3], b: &[f64; 3]| [a[0] - b[0], a[1] - b[1], a[2] - b[2]];
        let ab = sub(&p[1], &p[0]);
        let ac = sub(&p[2], &p[0]);
        let ad = sub(&p[3], &p[0]);
        let n = [
            ab[1] * ac[2] - ab[2] * ac[1],
            ab[2] * ac[0] - ab[0] * ac[2],
            ab[0] * ac[1] - ab[1] * ac[0],
        ];
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        ((n[0] * ad[0] + n[1] * ad[1] + n[2] * ad[2]) / len).abs()
    }

    #[test]
    fn test_every_kite_is_planar() {
        let built = build_d10_faces();
        for (i, face) in built.faces.iter().enumerate() {
            let err = planarity_error(face);
            assert!(err < 1e-6, "face {i} planarity error {err}");
        }
    }

    #[test]
    fn test_ring_and_apex_heights() {
        let built = build_d10_faces();
        for v in &built.upper_ring {
            assert!(v.y > 0.0, "upper ring vertex below the equator");
        }
        for v in &built.lower_ring {
            assert!(v.y < 0.0, "lower ring vertex above the equator");
        }
        assert!(built.top_apex.y > 0.0);
        assert!(built.bottom_apex.y < 0.0);
        assert!(built.top_apex.y > built.upper_ring[0].y);
    }

    #[test]
    fn test_face_numbers_are_a_physical_d10() {
        let numbers = FACE_NUMBERS;
        let mut sorted = numbers;
        sorted.sort_unstable();
        assert_eq!(sorted, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        for i in 0..5 {
            assert_eq!(numbers[i] + numbers[i + 5], 11, "opposite pair {i}");
        }
        for i in 0..10 {
            let a = numbers[i] > 5;
            let b = numbers[(i + 1) % 10] > 5;
            assert_ne!(a, b, "faces {i} and {} are in the same group", (i + 1) % 10);
        }
    }

    #[test]
    fn test_top_cap_carries_the_low_numbers() {
        let built = build_d10_faces();
        for (face, number) in built.faces.iter().zip(built.face_numbers) {
            let centroid: Vec3 = face.iter().sum::<Vec3>() / 4.0;
            if number <= 5 {
                assert!(centroid.y > 0.0, "face {number} should be on the top cap");
            } else {
                assert!(centroid.y < 0.0, "face {number} should be on the bottom cap");
            }
        }
    }

    #[test]
    fn test_degenerate_plane_uses_fallback_height() {
        // Three collinear points give a zero-normal plane.
        let y = solve_apex_height(
            Vec3::new(0.0, 0.2, 0.0),
            Vec3::new(1.0, 0.2, 0.0),
            Vec3::new(2.0, 0.2, 0.0),
        );
        assert_eq!(y, FALLBACK_APEX_HEIGHT);
    }

    #[test]
    fn test_projected_uvs_stay_inside_their_tile() {
        let config = resolve_render_config(10, None);
        let atlas = build_atlas(10, &config, None);
        let mesh = create_d10(&atlas);
        for chunk in mesh.uvs.chunks_exact(4) {
            let center_u = chunk.iter().map(|uv| uv.x).sum::<f32>() / 4.0;
            let center_v = chunk.iter().map(|uv| uv.y).sum::<f32>() / 4.0;
            let number = atlas.layout.number_at(center_u, center_v);
            let rect = atlas.layout.rect_for(number);
            for uv in chunk {
                assert!(uv.x >= rect.u0 - 1e-5 && uv.x <= rect.u1 + 1e-5);
                assert!(uv.y >= rect.v0 - 1e-5 && uv.y <= rect.v1 + 1e-5);
            }
        }
    }
}
