//! Optical centering: screen-space offset that recenters the settled die's
//! visual bounding box in its viewport.
//!
//! Polyhedra with an odd silhouette (the d4 especially) settle with their
//! visual mass off the geometric origin; this pass projects the mesh bounds
//! through the camera and nudges the rendered image back to center.

use bevy::math::{Mat4, Vec2, Vec3, Vec4};
use bevy::prelude::Component;

/// Exponential smoothing factor per frame toward the newly computed offset.
pub const OPTICAL_EASE: f32 = 0.12;
/// Hard cap on the offset, as a fraction of the viewport's smaller
/// dimension; suppresses projection spikes during transient states such as
/// the frame of a mesh rebuild.
pub const MAX_OFFSET_FRACTION: f32 = 0.25;
/// Projected w under this means the corner is behind or on the camera
/// plane; the previous offset is kept rather than dividing by it.
pub const MIN_PROJECTED_W: f32 = 1e-4;

/// Smoothed pixel offset for one die view. Reset to zero on teardown.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct OpticalOffset {
    pub x: f32,
    pub y: f32,
}

impl OpticalOffset {
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// The eight corners of a local-space AABB.
pub fn aabb_corners(min: Vec3, max: Vec3) -> [Vec3; 8] {
    [
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(min.x, max.y, min.z),
        Vec3::new(min.x, max.y, max.z),
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(max.x, max.y, max.z),
    ]
}

/// Project the corner extremes through `clip_from_world` and derive the
/// smoothed, clamped pixel offset that recenters their screen bounding box
/// in a `viewport`-sized view.
///
/// Degenerate projections (a corner at or behind the camera plane) keep the
/// previous offset for this frame.
pub fn compute_optical_offset(
    corners: &[Vec3; 8],
    clip_from_world: Mat4,
    viewport: Vec2,
    previous: Vec2,
) -> Vec2 {
    let mut min = Vec2::splat(f32::INFINITY);
    let mut max = Vec2::splat(f32::NEG_INFINITY);

    for corner in corners {
        let clip = clip_from_world * Vec4::new(corner.x, corner.y, corner.z, 1.0);
        if clip.w < MIN_PROJECTED_W {
            return previous;
        }
        let ndc = Vec2::new(clip.x, clip.y) / clip.w;
        let px = Vec2::new(
            (ndc.x * 0.5 + 0.5) * viewport.x,
            (1.0 - (ndc.y * 0.5 + 0.5)) * viewport.y,
        );
        min = min.min(px);
        max = max.max(px);
    }

    let bbox_center = (min + max) * 0.5;
    let target = viewport * 0.5 - bbox_center;
    let eased = previous.lerp(target, OPTICAL_EASE);

    let limit = viewport.min_element() * MAX_OFFSET_FRACTION;
    eased.clamp(Vec2::splat(-limit), Vec2::splat(limit))
}
